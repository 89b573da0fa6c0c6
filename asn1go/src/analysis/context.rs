use std::collections::HashMap;

use tracing::trace;

use crate::ast::{Assignment, Ident, ModuleDefinition, TagDefault, Type};

use super::{
    environment::Environment,
    error::{Result, UnsupportedConstruct},
    AnalysisError, Classification, ResolvedAssignment, ResolvedModule, ResolvedType,
};

/// State used while resolving a single module
#[derive(Debug)]
pub(super) struct AnalysisContext<'a, 'm> {
    pub(super) module: &'m ModuleDefinition<'a>,

    pub(super) env: Environment<'a, 'm>,

    /// Type assignments currently being resolved, used to find cycles
    pub(super) visiting: Vec<&'a str>,

    /// Already resolved aliasable type assignments
    pub(super) aliases: HashMap<&'a str, ResolvedType<'a>>,
}

impl<'a, 'm> AnalysisContext<'a, 'm> {
    /// Create a new context, registering every name in the module
    pub(super) fn new(module: &'m ModuleDefinition<'a>) -> Result<Self> {
        Ok(Self {
            module,
            env: Environment::new(module)?,
            visiting: vec![],
            aliases: HashMap::new(),
        })
    }

    /// Resolve every assignment in declaration order
    pub(super) fn run(mut self) -> Result<ResolvedModule<'a>> {
        let module = self.module;

        if module.tag_default == TagDefault::Automatic {
            return unsupported(module.identifier.name, UnsupportedConstruct::AutomaticTags);
        }

        let mut assignments = Vec::with_capacity(module.assignments.len());
        for assignment in &module.assignments {
            let resolved = self.assignment(assignment)?;
            trace!(name = assignment.name().name, ?resolved, "resolved assignment");
            assignments.push(resolved);
        }

        Ok(ResolvedModule {
            name: module.identifier.name.name,
            tag_default: module.tag_default,
            assignments,
        })
    }

    fn assignment(&mut self, assignment: &'m Assignment<'a>) -> Result<ResolvedAssignment<'a>> {
        match assignment {
            Assignment::Type { name, ty } => {
                let resolved = self.type_assignment(*name, ty)?;
                let constants = self.constants(ty)?;

                Ok(ResolvedAssignment::Type {
                    name: name.name,
                    ty: resolved,
                    class: classify(ty),
                    constants,
                })
            }
            Assignment::Value { name, ty, value } => {
                let ty = self.value_type(*name, ty)?;
                let value = self.value(*name, value, &ty)?;

                Ok(ResolvedAssignment::Value {
                    name: name.name,
                    ty,
                    value,
                })
            }
        }
    }
}

/// Decide how a type assignment has to be declared, from its syntax alone.
/// References always count as aliasable here, whatever they point at.
pub(super) fn classify(ty: &Type<'_>) -> Classification {
    match ty {
        Type::Constrained { ty, .. } | Type::Tagged { ty, .. } => classify(ty),
        Type::Sequence(_) => Classification::Sequence,
        Type::Set(_) => Classification::Set,
        Type::SequenceOf(element) if classify(element).is_structural() => {
            Classification::List { set: false }
        }
        Type::SetOf(element) if classify(element).is_structural() => {
            Classification::List { set: true }
        }
        _ => Classification::Aliasable,
    }
}

/// Report a construct that has no representation in the output
pub(super) fn unsupported<T>(at: Ident<'_>, construct: UnsupportedConstruct) -> Result<T> {
    Err(AnalysisError::Unsupported {
        construct,
        name: at.name.to_string(),
        offset: at.offset,
    })
}
