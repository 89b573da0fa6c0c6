//! Name resolution and type checking for a parsed module
//!
//! Resolution happens in two passes.  The first registers every assignment
//! name in a flat symbol table, the second walks the assignments in order,
//! resolving references, computing the effective tag of every component and
//! deciding how each type assignment will have to be declared.

mod context;
mod environment;
mod error;
mod module;
mod ty;
mod value;

use tracing::debug;

use crate::ast::ModuleDefinition;

use self::context::AnalysisContext;

pub use self::{
    error::{AnalysisError, Namespace, Result, UnsupportedConstruct},
    module::{
        Builtin, Classification, Constant, Field, ResolvedAssignment, ResolvedModule,
        ResolvedType, ResolvedValue, TagDirective,
    },
};

/// Resolve every reference in a module and compute the facts needed to
/// generate code for it
pub fn resolve<'a>(module: &ModuleDefinition<'a>) -> Result<ResolvedModule<'a>> {
    let resolved = AnalysisContext::new(module)?.run()?;

    debug!(
        module = resolved.name,
        assignments = resolved.assignments.len(),
        "resolved module"
    );

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{
            Assignment, ComponentTypeList, Ident, NamedComponentType, StringKind, TagClass,
            TagDefault, TimeKind, Type,
        },
        lexer::tokenize,
        parser::parse,
    };

    use super::*;

    fn resolve_str(source: &str) -> Result<ResolvedModule<'_>> {
        let module = parse(tokenize(source).unwrap()).unwrap();
        let module = Box::leak(Box::new(module));
        resolve(module)
    }

    fn module(body: &str) -> ResolvedModule<'static> {
        let source = format!("M DEFINITIONS ::= BEGIN {body} END").leak();
        resolve_str(source).unwrap()
    }

    fn error(body: &str) -> AnalysisError {
        let source = format!("M DEFINITIONS ::= BEGIN {body} END").leak();
        resolve_str(source).unwrap_err()
    }

    fn fields<'a>(module: &'a ResolvedModule<'_>, index: usize) -> &'a [Field<'a>] {
        match &module.assignments[index] {
            ResolvedAssignment::Type {
                ty: ResolvedType::Sequence(fields) | ResolvedType::Set(fields),
                ..
            } => fields.as_slice(),
            other => panic!("expected a structured type, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_names() {
        let err = error("A ::= BOOLEAN A ::= INTEGER");
        assert_eq!(
            err,
            AnalysisError::Duplicate {
                name: "A".to_string(),
                offset: 38,
                first: 24,
            }
        );
    }

    #[test]
    fn undefined_reference() {
        let err = error("A ::= B");
        assert_eq!(
            err,
            AnalysisError::Undefined {
                name: "B".to_string(),
                offset: 30,
            }
        );
    }

    #[test]
    fn wrong_namespace() {
        let mut ast = crate::ast::ModuleDefinition::new("M");
        ast.assignments.push(Assignment::Value {
            name: Ident::new("b"),
            ty: Type::Boolean,
            value: crate::ast::Value::Boolean(true),
        });
        ast.assignments.push(Assignment::Type {
            name: Ident::new("A"),
            ty: Type::reference("b"),
        });

        assert!(matches!(
            resolve(&ast).unwrap_err(),
            AnalysisError::WrongNamespace {
                expected: Namespace::Type,
                found: Namespace::Value,
                ..
            }
        ));
    }

    #[test]
    fn circular_aliases() {
        let err = error("A ::= B B ::= SEQUENCE OF A");
        assert!(matches!(err, AnalysisError::Circular { .. }));

        let err = error("a INTEGER ::= b b INTEGER ::= a");
        assert!(matches!(err, AnalysisError::Circular { .. }));
    }

    #[test]
    fn recursive_structure() {
        let module = module("Node ::= SEQUENCE { value INTEGER, next Node OPTIONAL }");
        let fields = fields(&module, 0);
        assert_eq!(
            fields[1].ty,
            ResolvedType::Named {
                name: "Node",
                class: Classification::Sequence
            }
        );
        assert!(fields[1].optional);
    }

    #[test]
    fn aliases_collapse() {
        let module = module(
            "MyTime ::= GeneralizedTime Other ::= MyTime S ::= SEQUENCE { t Other, s T } T ::= SET { a BOOLEAN }",
        );
        let fields = fields(&module, 2);
        assert_eq!(
            fields[0].ty,
            ResolvedType::Builtin(Builtin::Time(TimeKind::Generalized))
        );
        assert_eq!(
            fields[1].ty,
            ResolvedType::Named {
                name: "T",
                class: Classification::Set
            }
        );
    }

    #[test]
    fn useful_time_fallback() {
        let mut ast = crate::ast::ModuleDefinition::new("M");
        ast.assignments.push(Assignment::Type {
            name: Ident::new("T"),
            ty: Type::reference("UTCTime"),
        });

        let module = resolve(&ast).unwrap();
        assert!(matches!(
            module.assignments[0],
            ResolvedAssignment::Type {
                ty: ResolvedType::Builtin(Builtin::Time(TimeKind::Utc)),
                ..
            }
        ));
    }

    #[test]
    fn tag_directives() {
        let body = "S ::= SEQUENCE { a [1] BOOLEAN, b [2] EXPLICIT BOOLEAN, c [3] IMPLICIT BOOLEAN, d BOOLEAN }";
        let expected = [
            ("", [true, true, false]),
            ("EXPLICIT TAGS", [true, true, false]),
            ("IMPLICIT TAGS", [false, true, false]),
        ];

        for (default, explicit) in expected {
            let source = format!("M DEFINITIONS {default} ::= BEGIN {body} END").leak();
            let module = resolve_str(source).unwrap();
            let fields = fields(&module, 0);

            for (field, explicit) in fields.iter().zip(explicit) {
                let tag = field.tag.unwrap();
                assert_eq!(tag.explicit, explicit, "{default} {}", field.name);
                assert_eq!(tag.class, TagClass::ContextSpecific);
            }
            assert_eq!(fields[3].tag, None);
        }
    }

    #[test]
    fn unsupported_constructs() {
        let cases = [
            ("C ::= CHOICE { a BOOLEAN }", UnsupportedConstruct::Choice),
            ("N ::= NULL", UnsupportedConstruct::Null),
            (
                "S ::= SEQUENCE { a [UNIVERSAL 1] BOOLEAN }",
                UnsupportedConstruct::UniversalTag,
            ),
            (
                "S ::= SEQUENCE { a [1] [2] BOOLEAN }",
                UnsupportedConstruct::StackedTags,
            ),
            (
                "S ::= SEQUENCE { a SET { b BOOLEAN } }",
                UnsupportedConstruct::NestedSet,
            ),
            (
                "L ::= SEQUENCE OF [0] INTEGER",
                UnsupportedConstruct::TaggedElement,
            ),
            (
                "S ::= SEQUENCE { a BOOLEAN } s S ::= TRUE",
                UnsupportedConstruct::Value,
            ),
        ];

        for (body, expected) in cases {
            match error(body) {
                AnalysisError::Unsupported { construct, .. } => assert_eq!(construct, expected),
                other => panic!("expected {expected:?}, got {other:?}"),
            }
        }

        let source = "M DEFINITIONS AUTOMATIC TAGS ::= BEGIN END";
        assert!(matches!(
            resolve_str(source).unwrap_err(),
            AnalysisError::Unsupported {
                construct: UnsupportedConstruct::AutomaticTags,
                ..
            }
        ));
    }

    #[test]
    fn type_mismatch() {
        let err = error("b BOOLEAN ::= 5");
        assert_eq!(
            err,
            AnalysisError::TypeMismatch {
                name: "b".to_string(),
                offset: 24,
                expected: "BOOLEAN",
            }
        );

        let err = error("s IA5String ::= \"x\" i INTEGER ::= s");
        assert!(matches!(err, AnalysisError::TypeMismatch { ref name, .. } if name == "i"));

        // strings of different kinds are the same type once generated
        module("s IA5String ::= \"x\" t UTF8String ::= s");
    }

    #[test]
    fn named_numbers_keep_references() {
        let module = module("d INTEGER ::= 42 Int ::= INTEGER { a(42), b(-1), c(d) }");
        let ResolvedAssignment::Type { constants, .. } = &module.assignments[1] else {
            panic!("expected a type assignment");
        };

        let values: Vec<_> = constants.iter().map(|c| (c.name, &c.value)).collect();
        assert_eq!(
            values,
            vec![
                ("a", &ResolvedValue::Number(42)),
                ("b", &ResolvedValue::Number(-1)),
                ("c", &ResolvedValue::Reference("d")),
            ]
        );
    }

    #[test]
    fn enumeration_numbering() {
        let module = module("E ::= ENUMERATED { a, b(0), c, ..., d, e(10), f }");
        let ResolvedAssignment::Type { constants, .. } = &module.assignments[0] else {
            panic!("expected a type assignment");
        };

        let values: Vec<_> = constants
            .iter()
            .map(|c| match c.value {
                ResolvedValue::Number(n) => (c.name, n),
                ref other => panic!("expected a number, got {other:?}"),
            })
            .collect();
        assert_eq!(
            values,
            vec![("a", 1), ("b", 0), ("c", 2), ("d", 3), ("e", 10), ("f", 11)]
        );
    }

    #[test]
    fn classification() {
        let module = module(
            "A ::= SEQUENCE OF INTEGER B ::= SEQUENCE OF SEQUENCE { a BOOLEAN } C ::= SET OF B D ::= SET { a BOOLEAN }",
        );
        let classes: Vec<_> = module
            .assignments
            .iter()
            .map(|a| match a {
                ResolvedAssignment::Type { class, .. } => *class,
                ResolvedAssignment::Value { .. } => panic!("expected a type assignment"),
            })
            .collect();
        assert_eq!(
            classes,
            vec![
                Classification::Aliasable,
                Classification::List { set: false },
                Classification::Aliasable,
                Classification::Set,
            ]
        );

        let module = self::module("L ::= SET OF SEQUENCE { a BOOLEAN } S ::= SEQUENCE { l L }");
        assert_eq!(
            fields(&module, 1)[0].ty,
            ResolvedType::Named {
                name: "L",
                class: Classification::List { set: true }
            }
        );
    }

    #[test]
    fn defaults_and_extensions() {
        let module = module(
            "S ::= SEQUENCE { a INTEGER DEFAULT 3, b BOOLEAN DEFAULT TRUE, ..., c IA5String }",
        );
        let fields = fields(&module, 0);
        assert_eq!((fields[0].optional, fields[0].default), (true, Some(3)));
        assert_eq!((fields[1].optional, fields[1].default), (true, None));
        assert_eq!(
            fields[2].ty,
            ResolvedType::Builtin(Builtin::String(Some(StringKind::IA5)))
        );
        assert!(!fields[2].optional);
    }

    #[test]
    fn tagged_type_assignment_is_unsupported() {
        let mut ast = crate::ast::ModuleDefinition::new("M");
        ast.tag_default = TagDefault::Implicit;
        ast.assignments.push(Assignment::Type {
            name: Ident::new("S"),
            ty: Type::Sequence(ComponentTypeList::new(vec![NamedComponentType::new(
                "a",
                Type::Boolean,
            )]))
            .tagged(5, crate::ast::TagMode::Default),
        });

        assert!(matches!(
            resolve(&ast).unwrap_err(),
            AnalysisError::Unsupported {
                construct: UnsupportedConstruct::AssignmentTag,
                ..
            }
        ));

        let err = error("Cert ::= [APPLICATION 1] SEQUENCE { a BOOLEAN } S ::= SEQUENCE { c Cert }");
        assert!(matches!(
            err,
            AnalysisError::Unsupported {
                construct: UnsupportedConstruct::AssignmentTag,
                ref name,
                ..
            } if name == "Cert"
        ));

        let err = error("A ::= B B ::= [1] INTEGER");
        assert!(matches!(
            err,
            AnalysisError::Unsupported {
                construct: UnsupportedConstruct::AssignmentTag,
                ..
            }
        ));
    }

    #[test]
    fn long_alias_chains() {
        let mut body = String::new();
        for i in 0..1000 {
            body.push_str(&format!("A{i} ::= A{} ", i + 1));
        }
        body.push_str("A1000 ::= BOOLEAN");

        let module = module(&body);
        assert_eq!(module.assignments.len(), 1001);
        for assignment in &module.assignments {
            assert!(matches!(
                assignment,
                ResolvedAssignment::Type {
                    ty: ResolvedType::Builtin(Builtin::Boolean),
                    ..
                }
            ));
        }

        let mut body = String::new();
        for i in 0..1000 {
            body.push_str(&format!("A{i} ::= A{} ", i + 1));
        }
        body.push_str("A1000 ::= A0");
        assert!(matches!(error(&body), AnalysisError::Circular { .. }));
    }

    #[test]
    fn nesting_limit() {
        let mut body = String::new();
        for i in 0..150 {
            body.push_str(&format!("L{i} ::= SEQUENCE OF L{} ", i + 1));
        }
        body.push_str("L150 ::= BOOLEAN");

        assert!(matches!(error(&body), AnalysisError::DepthExceeded { .. }));
    }

    #[test]
    fn enumeration_overflow() {
        let err = error("E ::= ENUMERATED { a, ..., b(9223372036854775807), c }");
        assert!(matches!(err, AnalysisError::TypeMismatch { ref name, .. } if name == "c"));
    }
}
