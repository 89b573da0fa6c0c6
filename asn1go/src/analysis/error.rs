use std::fmt::Display;

use thiserror::Error;

/// Any error that can be produced while resolving a module
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Two assignments share the same name
    #[error("`{name}` is defined more than once")]
    Duplicate {
        name: String,
        offset: usize,
        first: usize,
    },

    /// A reference to a name with no assignment in the module
    #[error("`{name}` is not defined")]
    Undefined { name: String, offset: usize },

    /// A type reference naming a value assignment or the reverse
    #[error("`{name}` is a {found} but a {expected} is required here")]
    WrongNamespace {
        name: String,
        offset: usize,
        expected: Namespace,
        found: Namespace,
    },

    /// A chain of references that leads back to itself
    #[error("`{name}` is defined in terms of itself")]
    Circular { name: String, offset: usize },

    /// Type references nested past the resolver's limit
    #[error("`{name}` is nested too deeply")]
    DepthExceeded { name: String, offset: usize },

    /// A value that cannot be held by the type it is assigned to
    #[error("value of `{name}` is not a valid {expected}")]
    TypeMismatch {
        name: String,
        offset: usize,
        expected: &'static str,
    },

    /// Valid ASN.1 that has no representation in the generated code
    #[error("{construct} is not supported (in `{name}`)")]
    Unsupported {
        construct: UnsupportedConstruct,
        name: String,
        offset: usize,
    },
}

pub type Result<T = (), E = AnalysisError> = std::result::Result<T, E>;

/// The two kinds of assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    Type,
    Value,
}

/// Constructs that parse correctly but that the generator cannot express
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Error)]
pub enum UnsupportedConstruct {
    #[error("AUTOMATIC TAGS")]
    AutomaticTags,

    #[error("CHOICE")]
    Choice,

    #[error("NULL")]
    Null,

    #[error("a UNIVERSAL class tag")]
    UniversalTag,

    #[error("more than one tag on a component")]
    StackedTags,

    #[error("a tag on the type of a type assignment")]
    AssignmentTag,

    #[error("a tag on a SEQUENCE OF or SET OF element")]
    TaggedElement,

    #[error("a SET that is not directly assigned to a type name")]
    NestedSet,

    #[error("value notation for this type")]
    Value,
}

impl AnalysisError {
    /// Byte offset of the name the error refers to
    pub fn offset(&self) -> usize {
        match *self {
            AnalysisError::Duplicate { offset, .. }
            | AnalysisError::Undefined { offset, .. }
            | AnalysisError::WrongNamespace { offset, .. }
            | AnalysisError::Circular { offset, .. }
            | AnalysisError::DepthExceeded { offset, .. }
            | AnalysisError::TypeMismatch { offset, .. }
            | AnalysisError::Unsupported { offset, .. } => offset,
        }
    }

    /// The name the error refers to, as written in the source
    pub fn name(&self) -> &str {
        match self {
            AnalysisError::Duplicate { name, .. }
            | AnalysisError::Undefined { name, .. }
            | AnalysisError::WrongNamespace { name, .. }
            | AnalysisError::Circular { name, .. }
            | AnalysisError::DepthExceeded { name, .. }
            | AnalysisError::TypeMismatch { name, .. }
            | AnalysisError::Unsupported { name, .. } => name,
        }
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Namespace::Type => write!(f, "type"),
            Namespace::Value => write!(f, "value"),
        }
    }
}
