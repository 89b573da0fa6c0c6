use super::{Ident, Type, Value};

/// A group of ASN.1 assignments and settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDefinition<'a> {
    /// Identifier for the module
    pub identifier: ModuleIdentifier<'a>,

    /// How tags without an `EXPLICIT` or `IMPLICIT` keyword behave
    pub tag_default: TagDefault,

    /// Is extensibility implied in this module
    pub extensibility: bool,

    /// All type and value assignments in declaration order
    pub assignments: Vec<Assignment<'a>>,
}

/// Name of a module and its optional object identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIdentifier<'a> {
    /// Identifier for the module
    pub name: Ident<'a>,

    /// The module's definitive object identifier, empty if not present
    pub oid: Vec<ModuleOidComponent<'a>>,
}

/// A single component of a definitive object identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleOidComponent<'a> {
    /// the non-integer label for the component
    pub label: Option<&'a str>,

    /// the integer label for the component.  note that this is not a number as
    /// math should not be done to it, it is an identifier.
    pub number: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TagDefault {
    /// No `TAGS` clause in the module header, behaves as explicit
    #[default]
    Unspecified,
    Explicit,
    Implicit,
    Automatic,
}

/// A single named definition within a module
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment<'a> {
    /// `Name ::= Type`
    Type { name: Ident<'a>, ty: Type<'a> },

    /// `name Type ::= Value`
    Value {
        name: Ident<'a>,
        ty: Type<'a>,
        value: Value<'a>,
    },
}

impl<'a> ModuleDefinition<'a> {
    /// Create a module with the given name and no assignments
    pub fn new(name: &'a str) -> Self {
        Self {
            identifier: ModuleIdentifier {
                name: Ident::new(name),
                oid: vec![],
            },
            tag_default: TagDefault::Unspecified,
            extensibility: false,
            assignments: vec![],
        }
    }
}

impl<'a> Assignment<'a> {
    /// The name being assigned to
    pub fn name(&self) -> Ident<'a> {
        match self {
            Assignment::Type { name, .. } | Assignment::Value { name, .. } => *name,
        }
    }

    /// Is this a type assignment, rather than a value assignment
    pub fn is_type(&self) -> bool {
        matches!(self, Assignment::Type { .. })
    }
}
