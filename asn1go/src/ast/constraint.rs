use super::Value;

/// A subtype constraint, `(SIZE (1..MAX) | 5)`.  The outermost level is a
/// union of intersections.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint<'a> {
    pub unions: Vec<Intersections<'a>>,
}

/// Elements joined by `^` or `INTERSECTION`
#[derive(Debug, Clone, PartialEq)]
pub struct Intersections<'a> {
    pub elements: Vec<Elements<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Elements<'a> {
    /// `SIZE (constraint)`
    Size(Constraint<'a>),

    /// `lower..upper`
    ValueRange {
        lower: RangeEndpoint<'a>,
        upper: RangeEndpoint<'a>,
    },

    SingleValue(Value<'a>),

    /// A parenthesised constraint used as an element
    Nested(Constraint<'a>),

    /// The `...` extension marker within a constraint
    Extension,
}

/// One end of a value range, [`None`] for `MIN` or `MAX`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeEndpoint<'a> {
    pub value: Option<Value<'a>>,

    /// `<` excludes the endpoint from the range, `1<..<5`
    pub exclusive: bool,
}
