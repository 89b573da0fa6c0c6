use super::Ident;

/// Value notation
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Number(i64),
    Boolean(bool),
    Real(f64),

    /// Reference to a value assignment, only resolved during analysis
    Identifier(Ident<'a>),

    /// Contents of a character string literal with the `""` escapes removed
    String(String),
}

impl<'a> Value<'a> {
    /// Reference to another value by name
    pub fn reference(name: &'a str) -> Self {
        Value::Identifier(Ident::new(name))
    }
}
