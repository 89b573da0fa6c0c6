use super::{Constraint, Ident, Value};

/// Any ASN.1 type notation understood by the parser
#[derive(Debug, Clone, PartialEq)]
pub enum Type<'a> {
    Boolean,

    /// `INTEGER`, optionally with a list of named values
    Integer(Vec<NamedNumber<'a>>),

    Real,
    Null,
    OctetString,

    /// `BIT STRING`, optionally with a list of named bits
    BitString(Vec<NamedNumber<'a>>),

    /// The unrestricted `CHARACTER STRING`
    CharacterString,

    RestrictedString(StringKind),
    Time(TimeKind),
    ObjectIdentifier,

    Enumerated {
        items: Vec<EnumItem<'a>>,

        /// Index into `items` where the extension marker was found
        extension: Option<usize>,
    },

    Sequence(ComponentTypeList<'a>),
    Set(ComponentTypeList<'a>),
    SequenceOf(Box<Type<'a>>),
    SetOf(Box<Type<'a>>),
    Choice(ComponentTypeList<'a>),

    /// Reference to a type assignment, only resolved during analysis
    Reference(Ident<'a>),

    Constrained {
        ty: Box<Type<'a>>,
        constraint: Constraint<'a>,
    },

    /// `[n] Type`, `[n] EXPLICIT Type` or `[n] IMPLICIT Type`
    Tagged {
        tag: Tag,
        mode: TagMode,
        ty: Box<Type<'a>>,
    },
}

/// The restricted character string types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StringKind {
    Bmp,
    General,
    Graphic,
    IA5,
    ISO646,
    Numeric,
    Printable,
    Teletex,
    T61,
    Universal,
    UTF8,
    Videotex,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeKind {
    Generalized,
    Utc,
}

/// Class and number of a tag, `[APPLICATION 5]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    pub class: TagClass,
    pub number: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TagClass {
    /// No class keyword inside the brackets
    #[default]
    ContextSpecific,
    Application,
    Private,
    Universal,
}

/// The keyword written after a tag, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum TagMode {
    /// Neither keyword, the module's tag default applies
    #[default]
    Default,
    Explicit,
    Implicit,
}

/// The components of a SEQUENCE, SET or CHOICE
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentTypeList<'a> {
    pub components: Vec<NamedComponentType<'a>>,

    /// Index into `components` where the `...` marker was found.  Components
    /// before it are the root, components after it are extension additions.
    pub extension: Option<usize>,
}

/// A single named field within a structured type
#[derive(Debug, Clone, PartialEq)]
pub struct NamedComponentType<'a> {
    pub name: Ident<'a>,
    pub ty: Type<'a>,
    pub presence: Presence<'a>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Presence<'a> {
    #[default]
    Required,
    Optional,
    Default(Value<'a>),
}

/// `name(value)` within an INTEGER or BIT STRING type
#[derive(Debug, Clone, PartialEq)]
pub struct NamedNumber<'a> {
    pub name: Ident<'a>,

    /// Either a [`Value::Number`] or a [`Value::Identifier`]
    pub value: Value<'a>,
}

/// `name` or `name(value)` within an ENUMERATED type
#[derive(Debug, Clone, PartialEq)]
pub struct EnumItem<'a> {
    pub name: Ident<'a>,
    pub value: Option<Value<'a>>,
}

impl<'a> ComponentTypeList<'a> {
    /// A component list without an extension marker
    pub fn new(components: Vec<NamedComponentType<'a>>) -> Self {
        Self {
            components,
            extension: None,
        }
    }

    /// Components before the extension marker
    pub fn root(&self) -> &[NamedComponentType<'a>] {
        &self.components[..self.extension.unwrap_or(self.components.len())]
    }

    /// Components after the extension marker
    pub fn additions(&self) -> &[NamedComponentType<'a>] {
        &self.components[self.extension.unwrap_or(self.components.len())..]
    }
}

impl<'a> NamedComponentType<'a> {
    /// A required component
    pub fn new(name: &'a str, ty: Type<'a>) -> Self {
        Self {
            name: Ident::new(name),
            ty,
            presence: Presence::Required,
        }
    }
}

impl<'a> Type<'a> {
    /// Reference to another type by name
    pub fn reference(name: &'a str) -> Self {
        Type::Reference(Ident::new(name))
    }

    /// A context specific tag around this type
    pub fn tagged(self, number: u64, mode: TagMode) -> Self {
        Type::Tagged {
            tag: Tag {
                class: TagClass::ContextSpecific,
                number,
            },
            mode,
            ty: Box::new(self),
        }
    }
}
