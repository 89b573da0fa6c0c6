//! Representation of a parsed ASN.1 module definition (NOT an encoded message)
//!
//! The tree is built once by the parser and never modified afterwards; later
//! stages only borrow from it.

mod constraint;
mod module;
mod ty;
mod value;

pub use self::{
    constraint::{Constraint, Elements, Intersections, RangeEndpoint},
    module::{Assignment, ModuleDefinition, ModuleIdentifier, ModuleOidComponent, TagDefault},
    ty::{
        ComponentTypeList, EnumItem, NamedComponentType, NamedNumber, Presence, StringKind, Tag,
        TagClass, TagMode, TimeKind, Type,
    },
    value::Value,
};

/// A name as it was spelled in the source, together with where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ident<'a> {
    /// The declared spelling, case significant
    pub name: &'a str,

    /// Byte offset of the name within the source text
    pub offset: usize,
}

impl<'a> Ident<'a> {
    /// Create an identifier that does not point into any source text
    pub fn new(name: &'a str) -> Self {
        Self { name, offset: 0 }
    }
}
