use crate::ast::{Ident, Value};

use super::{
    context::{unsupported, AnalysisContext},
    error::{Result, UnsupportedConstruct},
    AnalysisError, Builtin, ResolvedType, ResolvedValue,
};

impl<'a, 'm> AnalysisContext<'a, 'm> {
    /// Check a value against the type it is assigned to.  References are
    /// kept as references.
    pub(super) fn value(
        &mut self,
        at: Ident<'a>,
        value: &'m Value<'a>,
        ty: &ResolvedType<'a>,
    ) -> Result<ResolvedValue<'a>> {
        let builtin = match ty {
            ResolvedType::Builtin(
                builtin @ (Builtin::Boolean
                | Builtin::Integer
                | Builtin::Real
                | Builtin::String(_)
                | Builtin::Enumerated),
            ) => *builtin,
            _ => return unsupported(at, UnsupportedConstruct::Value),
        };

        let mismatch = || AnalysisError::TypeMismatch {
            name: at.name.to_string(),
            offset: at.offset,
            expected: builtin.describe(),
        };

        match (value, builtin) {
            (Value::Identifier(id), _) => {
                self.literal(value)?;

                let (name, target, _) = self.env.lookup_value(*id)?;
                match self.value_type(name, target)? {
                    ResolvedType::Builtin(target) if target.same_representation(builtin) => {
                        Ok(ResolvedValue::Reference(id.name))
                    }
                    _ => Err(mismatch()),
                }
            }
            (Value::Number(n), Builtin::Integer | Builtin::Enumerated | Builtin::Real) => {
                Ok(ResolvedValue::Number(*n))
            }
            (Value::Boolean(b), Builtin::Boolean) => Ok(ResolvedValue::Boolean(*b)),
            (Value::Real(r), Builtin::Real) => Ok(ResolvedValue::Real(*r)),
            (Value::String(s), Builtin::String(_)) => Ok(ResolvedValue::String(s.clone())),
            _ => Err(mismatch()),
        }
    }

    /// Follow references from a value until a literal is found
    pub(super) fn literal(&self, value: &'m Value<'a>) -> Result<&'m Value<'a>> {
        let mut seen = vec![];
        let mut current = value;

        while let Value::Identifier(id) = current {
            if seen.contains(&id.name) {
                return Err(AnalysisError::Circular {
                    name: id.name.to_string(),
                    offset: id.offset,
                });
            }
            seen.push(id.name);

            let (_, _, value) = self.env.lookup_value(*id)?;
            current = value;
        }

        Ok(current)
    }
}
