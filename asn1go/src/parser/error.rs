use thiserror::Error;

use crate::{token::TokenKind, util::CowVec};

/// Any error that can be emitted by the parser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// The next token was not one of the kinds the grammar allows here
    #[error("expected {expected}, found {got:?}")]
    Expected {
        expected: CowVec<TokenKind>,
        got: TokenKind,
        offset: usize,
    },

    /// Recursion depth limit reached in the parser (try to avoid stack overflow)
    #[error("types or constraints are nested too deeply")]
    DepthExceeded { offset: usize },

    /// A number literal that does not fit the range the generator can represent
    #[error("number literal is out of range")]
    IntegerOverflow { offset: usize },
}

pub type Result<T = (), E = ParserError> = std::result::Result<T, E>;

impl ParserError {
    /// Byte offset of the token that caused the error
    pub fn offset(&self) -> usize {
        match *self {
            ParserError::Expected { offset, .. }
            | ParserError::DepthExceeded { offset }
            | ParserError::IntegerOverflow { offset } => offset,
        }
    }
}
