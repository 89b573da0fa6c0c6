#![forbid(unsafe_code)]

//! Generate Go `encoding/asn1` bindings from ASN.1 module definitions.
//!
//! The pipeline runs in four stages, each of which can be used on its own:
//! [`tokenize`], [`parse`], [`resolve`] and [`generate`].  [`AsnCompiler`]
//! runs all of them in order.

mod analysis;
pub mod ast;
mod codegen;
mod compiler;
mod diagnostic;
mod lexer;
mod parser;
mod token;
mod util;

use thiserror::Error;

pub use analysis::{
    resolve, AnalysisError, Builtin, Classification, Constant, Field, Namespace,
    ResolvedAssignment, ResolvedModule, ResolvedType, ResolvedValue, TagDirective,
    UnsupportedConstruct,
};
pub use codegen::{generate, CodegenError};
pub use compiler::{AsnCompiler, IntegerRepr, Options};
pub use diagnostic::{Diagnostic, Label};
pub use lexer::{tokenize, LexerError};
pub use parser::{parse, ParserError};
pub use token::{Token, TokenKind};

/// Any error produced while compiling a module
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexerError),

    #[error(transparent)]
    Syntax(#[from] ParserError),

    #[error(transparent)]
    Resolution(AnalysisError),

    /// Valid ASN.1 that cannot be expressed in the generated code
    #[error(transparent)]
    Unsupported(AnalysisError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl From<AnalysisError> for Error {
    fn from(value: AnalysisError) -> Self {
        match value {
            AnalysisError::Unsupported { .. } => Error::Unsupported(value),
            _ => Error::Resolution(value),
        }
    }
}
