use std::collections::{BTreeSet, HashSet};

use crate::ast::{
    ComponentTypeList, EnumItem, Ident, NamedComponentType, Presence, TagClass, TagDefault,
    TagMode, TimeKind, Type, Value,
};

use super::{
    context::{classify, unsupported, AnalysisContext},
    error::{Result, UnsupportedConstruct},
    AnalysisError, Builtin, Constant, Field, ResolvedType, ResolvedValue, TagDirective,
};

/// Maximum number of type assignments resolved inside each other
const MAX_DEPTH: usize = 100;

/// Where a type appears, which decides what is allowed in it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Directly on the right of a type assignment
    Assignment,

    /// The type of a value assignment, tags have no effect on it
    Value,

    /// A SEQUENCE or SET component, after its own tag was removed
    Component,

    /// The element of a SEQUENCE OF or SET OF
    Element,
}

impl<'a, 'm> AnalysisContext<'a, 'm> {
    /// Resolve the right hand side of a type assignment, reusing the result
    /// if it was already needed by an earlier reference
    pub(super) fn type_assignment(
        &mut self,
        name: Ident<'a>,
        ty: &'m Type<'a>,
    ) -> Result<ResolvedType<'a>> {
        if let Some(resolved) = self.aliases.get(name.name) {
            return Ok(resolved.clone());
        }

        if self.visiting.len() >= MAX_DEPTH {
            return Err(AnalysisError::DepthExceeded {
                name: name.name.to_string(),
                offset: name.offset,
            });
        }

        self.visiting.push(name.name);
        let resolved = self.ty(name, ty, Position::Assignment);
        self.visiting.pop();
        let resolved = resolved?;

        if !classify(ty).is_structural() {
            self.aliases.insert(name.name, resolved.clone());
        }

        Ok(resolved)
    }

    /// Resolve the declared type of a value assignment
    pub(super) fn value_type(&mut self, name: Ident<'a>, ty: &'m Type<'a>) -> Result<ResolvedType<'a>> {
        self.ty(name, ty, Position::Value)
    }

    /// Resolve a type.  `at` is the closest enclosing name, used to report
    /// errors.
    fn ty(&mut self, at: Ident<'a>, ty: &'m Type<'a>, position: Position) -> Result<ResolvedType<'a>> {
        let builtin = match ty {
            Type::Boolean => Builtin::Boolean,
            Type::Integer(_) => Builtin::Integer,
            Type::Real => Builtin::Real,
            Type::OctetString => Builtin::OctetString,
            Type::BitString(_) => Builtin::BitString,
            Type::CharacterString => Builtin::String(None),
            Type::RestrictedString(kind) => Builtin::String(Some(*kind)),
            Type::Time(kind) => Builtin::Time(*kind),
            Type::ObjectIdentifier => Builtin::ObjectIdentifier,
            Type::Enumerated { .. } => Builtin::Enumerated,
            Type::Null => return unsupported(at, UnsupportedConstruct::Null),
            Type::Choice(_) => return unsupported(at, UnsupportedConstruct::Choice),
            Type::Sequence(list) => return Ok(ResolvedType::Sequence(self.fields(list)?)),
            Type::Set(list) => {
                if position != Position::Assignment {
                    return unsupported(at, UnsupportedConstruct::NestedSet);
                }
                return Ok(ResolvedType::Set(self.fields(list)?));
            }
            Type::SequenceOf(element) => {
                let element = self.ty(at, element, Position::Element)?;
                return Ok(ResolvedType::SequenceOf(Box::new(element)));
            }
            Type::SetOf(element) => {
                let element = self.ty(at, element, Position::Element)?;
                return Ok(ResolvedType::SetOf(Box::new(element)));
            }
            Type::Reference(name) => return self.reference(*name),

            // constraints are checked by the parser but have no effect on the output
            Type::Constrained { ty, .. } => return self.ty(at, ty, position),

            Type::Tagged { tag, ty, .. } => {
                if tag.class == TagClass::Universal {
                    return unsupported(at, UnsupportedConstruct::UniversalTag);
                }

                return match position {
                    Position::Assignment => unsupported(at, UnsupportedConstruct::AssignmentTag),
                    Position::Value => self.ty(at, ty, position),
                    Position::Component => unsupported(at, UnsupportedConstruct::StackedTags),
                    Position::Element => unsupported(at, UnsupportedConstruct::TaggedElement),
                };
            }
        };

        Ok(ResolvedType::Builtin(builtin))
    }

    /// Resolve a type reference.  Aliasable targets are replaced by what they
    /// resolve to, structural targets are kept by name.  Chains of plain
    /// aliases are followed in a loop and every name on the way is cached.
    fn reference(&mut self, id: Ident<'a>) -> Result<ResolvedType<'a>> {
        let mut chain = HashSet::new();
        let mut next = id;

        let resolved = loop {
            if let Some(kind) = self.useful_time(next) {
                break ResolvedType::Builtin(Builtin::Time(kind));
            }

            let (name, ty) = self.env.lookup_type(next)?;

            let class = classify(ty);
            if class.is_structural() {
                break ResolvedType::Named {
                    name: name.name,
                    class,
                };
            }

            if let Some(resolved) = self.aliases.get(name.name) {
                break resolved.clone();
            }

            if self.visiting.contains(&name.name) || !chain.insert(name.name) {
                return Err(AnalysisError::Circular {
                    name: id.name.to_string(),
                    offset: id.offset,
                });
            }

            match strip_constraints(ty) {
                Type::Reference(target) => next = *target,
                _ => break self.type_assignment(name, ty)?,
            }
        };

        for name in chain {
            self.aliases.insert(name, resolved.clone());
        }

        Ok(resolved)
    }

    /// The useful time types, unless the module defines its own
    fn useful_time(&self, id: Ident<'a>) -> Option<TimeKind> {
        if self.env.contains(id.name) {
            return None;
        }

        match id.name {
            "GeneralizedTime" => Some(TimeKind::Generalized),
            "UTCTime" => Some(TimeKind::Utc),
            _ => None,
        }
    }

    fn fields(&mut self, list: &'m ComponentTypeList<'a>) -> Result<Vec<Field<'a>>> {
        // extension additions are ordinary fields in the output
        list.components.iter().map(|c| self.field(c)).collect()
    }

    /// Resolve a single component, working out its effective tag
    fn field(&mut self, component: &'m NamedComponentType<'a>) -> Result<Field<'a>> {
        let at = component.name;

        let (tag, inner) = match strip_constraints(&component.ty) {
            Type::Tagged { tag, mode, ty } => {
                if tag.class == TagClass::Universal {
                    return unsupported(at, UnsupportedConstruct::UniversalTag);
                }

                let explicit = match mode {
                    TagMode::Explicit => true,
                    TagMode::Implicit => false,
                    TagMode::Default => self.module.tag_default != TagDefault::Implicit,
                };

                let directive = TagDirective {
                    class: tag.class,
                    number: tag.number,
                    explicit,
                };
                (Some(directive), strip_constraints(ty))
            }
            ty => (None, ty),
        };

        let ty = self.ty(at, inner, Position::Component)?;

        let (optional, default) = match &component.presence {
            Presence::Required => (false, None),
            Presence::Optional => (true, None),
            Presence::Default(value) => {
                self.value(at, value, &ty)?;

                let default = match (&ty, self.literal(value)?) {
                    (ResolvedType::Builtin(Builtin::Integer), Value::Number(n)) => {
                        Some(*n)
                    }
                    _ => None,
                };
                (true, default)
            }
        };

        Ok(Field {
            name: at.name,
            ty,
            tag,
            optional,
            default,
        })
    }

    /// Named numbers of an INTEGER or the numbered items of an ENUMERATED
    pub(super) fn constants(&mut self, ty: &'m Type<'a>) -> Result<Vec<Constant<'a>>> {
        match ty {
            Type::Constrained { ty, .. } | Type::Tagged { ty, .. } => self.constants(ty),
            Type::Integer(numbers) => {
                let integer = ResolvedType::Builtin(Builtin::Integer);
                numbers
                    .iter()
                    .map(|number| -> Result<Constant<'a>> {
                        Ok(Constant {
                            name: number.name.name,
                            value: self.value(number.name, &number.value, &integer)?,
                        })
                    })
                    .collect()
            }
            Type::Enumerated { items, extension } => self.enumeration(items, *extension),
            _ => Ok(vec![]),
        }
    }

    /// Number the items of an ENUMERATED.  Root items without a value take the
    /// smallest unused value, later additions count up from the largest value
    /// seen so far.
    fn enumeration(
        &mut self,
        items: &'m [EnumItem<'a>],
        extension: Option<usize>,
    ) -> Result<Vec<Constant<'a>>> {
        let mut explicit = Vec::with_capacity(items.len());
        for item in items {
            let value = match &item.value {
                Some(value) => match self.literal(value)? {
                    Value::Number(n) => Some(*n),
                    _ => {
                        return Err(AnalysisError::TypeMismatch {
                            name: item.name.name.to_string(),
                            offset: item.name.offset,
                            expected: Builtin::Integer.describe(),
                        })
                    }
                },
                None => None,
            };
            explicit.push(value);
        }

        let split = extension.unwrap_or(items.len()).min(items.len());
        let mut used: BTreeSet<i64> = explicit[..split].iter().flatten().copied().collect();

        let mut values = Vec::with_capacity(items.len());
        let mut next = 0;
        for value in &explicit[..split] {
            let value = match *value {
                Some(value) => value,
                None => {
                    while used.contains(&next) {
                        next += 1;
                    }
                    used.insert(next);
                    next
                }
            };
            values.push(value);
        }

        let mut largest = values.iter().copied().max();
        for (item, value) in items[split..].iter().zip(&explicit[split..]) {
            let value = match (value, largest) {
                (Some(value), _) => *value,
                (None, None) => 0,
                (None, Some(largest)) => {
                    largest
                        .checked_add(1)
                        .ok_or_else(|| AnalysisError::TypeMismatch {
                            name: item.name.name.to_string(),
                            offset: item.name.offset,
                            expected: Builtin::Integer.describe(),
                        })?
                }
            };
            largest = Some(largest.map_or(value, |n| n.max(value)));
            values.push(value);
        }

        Ok(items
            .iter()
            .zip(values)
            .map(|(item, value)| Constant {
                name: item.name.name,
                value: ResolvedValue::Number(value),
            })
            .collect())
    }
}

/// Remove any constraints wrapping a type
fn strip_constraints<'m, 'a>(ty: &'m Type<'a>) -> &'m Type<'a> {
    match ty {
        Type::Constrained { ty, .. } => strip_constraints(ty),
        _ => ty,
    }
}
