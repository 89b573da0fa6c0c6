//! The resolved form of a module, ready for code generation.  Every reference
//! has been checked and every component carries its final tag directive.

use crate::ast::{StringKind, TagClass, TagDefault, TimeKind};

/// A module after name resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModule<'a> {
    /// Module name as written in the source
    pub name: &'a str,

    pub tag_default: TagDefault,

    /// Assignments in declaration order
    pub assignments: Vec<ResolvedAssignment<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAssignment<'a> {
    Type {
        name: &'a str,
        ty: ResolvedType<'a>,
        class: Classification,

        /// Named numbers of an INTEGER or the items of an ENUMERATED
        constants: Vec<Constant<'a>>,
    },
    Value {
        name: &'a str,
        ty: ResolvedType<'a>,
        value: ResolvedValue<'a>,
    },
}

/// How a type assignment has to be declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    /// Maps onto a single existing type, references to it are replaced by
    /// that type
    Aliasable,

    /// Needs a struct declaration
    Sequence,

    /// Needs a struct declaration plus the SET wrapper
    Set,

    /// A list of inline structs, `set` for SET OF
    List { set: bool },
}

impl Classification {
    /// Does this classification need its own declaration to be referenced
    pub fn is_structural(self) -> bool {
        self != Classification::Aliasable
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType<'a> {
    Builtin(Builtin),

    /// Reference to a structural type assignment, kept by name
    Named {
        name: &'a str,
        class: Classification,
    },

    Sequence(Vec<Field<'a>>),
    Set(Vec<Field<'a>>),
    SequenceOf(Box<ResolvedType<'a>>),
    SetOf(Box<ResolvedType<'a>>),
}

/// Types with a direct equivalent in the generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Builtin {
    Boolean,
    Integer,
    Real,
    OctetString,
    BitString,

    /// A character string, [`None`] for the unrestricted CHARACTER STRING
    String(Option<StringKind>),

    Time(TimeKind),
    ObjectIdentifier,
    Enumerated,
}

impl Builtin {
    /// Would both types be rendered as the same type in the output
    pub fn same_representation(self, other: Builtin) -> bool {
        match (self, other) {
            (Builtin::String(_), Builtin::String(_)) => true,
            (Builtin::Time(_), Builtin::Time(_)) => true,
            (a, b) => a == b,
        }
    }

    /// Human readable name used in errors
    pub fn describe(self) -> &'static str {
        match self {
            Builtin::Boolean => "BOOLEAN",
            Builtin::Integer => "INTEGER",
            Builtin::Real => "REAL",
            Builtin::OctetString => "OCTET STRING",
            Builtin::BitString => "BIT STRING",
            Builtin::String(_) => "character string",
            Builtin::Time(_) => "time",
            Builtin::ObjectIdentifier => "OBJECT IDENTIFIER",
            Builtin::Enumerated => "ENUMERATED",
        }
    }
}

/// A single component of a SEQUENCE or SET
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    pub name: &'a str,
    pub ty: ResolvedType<'a>,

    /// The tag after applying the module's tag default
    pub tag: Option<TagDirective>,

    /// OPTIONAL, or DEFAULT which can be omitted in the encoding
    pub optional: bool,

    /// Numeric DEFAULT value of an INTEGER component
    pub default: Option<i64>,
}

/// The effective tagging of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagDirective {
    pub class: TagClass,
    pub number: u64,
    pub explicit: bool,
}

/// A named value attached to a type assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Constant<'a> {
    pub name: &'a str,
    pub value: ResolvedValue<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue<'a> {
    Number(i64),
    Boolean(bool),
    Real(f64),
    String(String),

    /// Another value assignment, kept by name rather than inlined
    Reference(&'a str),
}
