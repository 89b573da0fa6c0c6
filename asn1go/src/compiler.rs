//! The primary interface to the lexer, parser, resolver and code generator.

use std::{
    fmt::Write,
    ops::{Deref, DerefMut},
};

use tracing::debug;

use crate::{analysis::resolve, codegen::generate, lexer::tokenize, parser::parse, Error};

/// Translates ASN.1 module definitions into Go source code.  Holds no state
/// between calls other than the options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AsnCompiler {
    /// The enabled options.
    options: Options,
}

/// All settings that change the generated code
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Options {
    /// Name of the generated package, defaults to the module name
    pub package: Option<String>,

    /// How INTEGER types are represented
    pub integer_repr: IntegerRepr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum IntegerRepr {
    /// `int64`, values outside its range are rejected by the parser
    #[default]
    Int64,

    /// `*big.Int` from `math/big`
    BigInt,
}

impl AsnCompiler {
    /// Create a new compiler with the default options
    pub fn new() -> Self {
        Default::default()
    }

    /// Create a new compiler with the given options
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }

    /// Compile a single module, writing the generated code to `out`.  Stops at
    /// the first error, anything already written stays written.
    pub fn compile(&self, source: &str, out: &mut impl Write) -> Result<(), Error> {
        let tokens = tokenize(source)?;
        debug!(tokens = tokens.len(), "lexed source");

        let module = parse(tokens)?;
        debug!(
            module = module.identifier.name.name,
            assignments = module.assignments.len(),
            "parsed module"
        );

        let resolved = resolve(&module)?;
        generate(&resolved, &self.options, out)?;

        Ok(())
    }

    /// Compile a single module into a new string
    pub fn compile_to_string(&self, source: &str) -> Result<String, Error> {
        let mut out = String::new();
        self.compile(source, &mut out)?;
        Ok(out)
    }

    /// Parse a module and pretty print its syntax tree
    pub fn print_ast(&self, source: &str) -> Result<String, Error> {
        let module = parse(tokenize(source)?)?;
        Ok(format!("{module:#?}"))
    }
}

impl Deref for AsnCompiler {
    type Target = Options;

    fn deref(&self) -> &Self::Target {
        &self.options
    }
}

impl DerefMut for AsnCompiler {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.options
    }
}
