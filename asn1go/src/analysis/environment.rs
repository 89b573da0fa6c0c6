use std::collections::HashMap;

use crate::ast::{Assignment, Ident, ModuleDefinition, Type, Value};

use super::{
    error::{Namespace, Result},
    AnalysisError,
};

/// Name resolution environment for a single module, keyed by the name as it
/// is written in the source
#[derive(Debug, Clone)]
pub struct Environment<'a, 'm> {
    symbols: HashMap<&'a str, &'m Assignment<'a>>,
}

impl<'a, 'm> Environment<'a, 'm> {
    /// Register every assignment of a module, failing on the first name that
    /// is used twice
    pub fn new(module: &'m ModuleDefinition<'a>) -> Result<Self> {
        let mut symbols = HashMap::with_capacity(module.assignments.len());

        for assignment in &module.assignments {
            let name = assignment.name();
            if let Some(first) = symbols.insert(name.name, assignment) {
                return Err(AnalysisError::Duplicate {
                    name: name.name.to_string(),
                    offset: name.offset,
                    first: first.name().offset,
                });
            }
        }

        Ok(Self { symbols })
    }

    /// Is there any assignment with this name
    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Look up a name that must refer to a type assignment
    pub fn lookup_type(&self, name: Ident<'a>) -> Result<(Ident<'a>, &'m Type<'a>)> {
        match self.find(name)? {
            Assignment::Type { name, ty } => Ok((*name, ty)),
            Assignment::Value { .. } => Err(wrong_namespace(name, Namespace::Type)),
        }
    }

    /// Look up a name that must refer to a value assignment
    pub fn lookup_value(&self, name: Ident<'a>) -> Result<(Ident<'a>, &'m Type<'a>, &'m Value<'a>)> {
        match self.find(name)? {
            Assignment::Value { name, ty, value } => Ok((*name, ty, value)),
            Assignment::Type { .. } => Err(wrong_namespace(name, Namespace::Value)),
        }
    }

    fn find(&self, name: Ident<'a>) -> Result<&'m Assignment<'a>> {
        self.symbols
            .get(name.name)
            .copied()
            .ok_or_else(|| AnalysisError::Undefined {
                name: name.name.to_string(),
                offset: name.offset,
            })
    }
}

fn wrong_namespace(name: Ident<'_>, expected: Namespace) -> AnalysisError {
    let found = match expected {
        Namespace::Type => Namespace::Value,
        Namespace::Value => Namespace::Type,
    };

    AnalysisError::WrongNamespace {
        name: name.name.to_string(),
        offset: name.offset,
        expected,
        found,
    }
}
