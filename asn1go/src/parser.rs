mod constraint;
mod error;
mod module;
mod ty;
mod value;

use crate::{
    ast::{Ident, ModuleDefinition},
    token::{Token, TokenKind},
    util::CowVec,
};

pub use self::error::{ParserError, Result};

/// Maximum nesting of types and constraints before the parser gives up
const MAX_DEPTH: usize = 100;

/// Recursive descent parser for a single ASN.1 module definition
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    /// Tokens from the lexer, normally ending with an Eof token
    tokens: Vec<Token<'a>>,

    /// Index of the next token to be consumed
    position: usize,

    /// Current recursion depth of the parser
    depth: usize,
}

/// Parse a token stream into a module definition.  Stops at the first token
/// that does not match the grammar, no partial tree is returned.
pub fn parse(tokens: Vec<Token<'_>>) -> Result<ModuleDefinition<'_>> {
    Parser::new(tokens).run()
}

impl<'a> Parser<'a> {
    /// Create a new parser from a list of tokens
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Run the parser to produce a module definition
    pub fn run(mut self) -> Result<ModuleDefinition<'a>> {
        let module = self.module_definition()?;
        self.next(&[TokenKind::Eof])?;

        Ok(module)
    }

    /// The next token, or a synthesised Eof token if the stream ran out
    fn current(&self) -> Token<'a> {
        self.tokens.get(self.position).copied().unwrap_or_else(|| {
            let offset = self.tokens.last().map_or(0, |t| t.offset + t.value.len());
            Token {
                kind: TokenKind::Eof,
                value: "",
                offset,
            }
        })
    }

    /// Peek a token without consuming it or return an error if the token is not
    /// of one of the provided kinds. If an empty list is given, returns any token.
    fn peek(&self, kind: impl Into<CowVec<TokenKind>>) -> Result<Token<'a>> {
        let kind = kind.into();
        let peek = self.current();

        if kind.is_empty() || kind.contains(&peek.kind) {
            Ok(peek)
        } else {
            Err(ParserError::Expected {
                expected: kind,
                got: peek.kind,
                offset: peek.offset,
            })
        }
    }

    /// Consume a token of the given kind or return an error.  If an empty list
    /// is given, returns any token.
    fn next(&mut self, kind: impl Into<CowVec<TokenKind>>) -> Result<Token<'a>> {
        let tok = self.peek(kind)?;
        self.position += 1;
        Ok(tok)
    }

    /// Is the next token of the given kind
    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    /// Consume the next token if it is of the given kind
    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Consume an identifier-like token and return it as a name
    fn ident(&mut self, kind: &'static [TokenKind]) -> Result<Ident<'a>> {
        let tok = self.next(kind)?;
        Ok(Ident {
            name: tok.value,
            offset: tok.offset,
        })
    }

    /// Note the start of a nested construct, erroring if the nesting is too deep
    fn enter(&mut self) -> Result {
        // TODO: make the limit part of the compiler options
        if self.depth >= MAX_DEPTH {
            return Err(ParserError::DepthExceeded {
                offset: self.current().offset,
            });
        }
        self.depth += 1;

        Ok(())
    }

    /// Note the end of the most recent nested construct
    fn leave(&mut self) {
        self.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{
            Assignment, Constraint, Elements, Ident, Intersections, Presence,
            RangeEndpoint, StringKind, Tag, TagClass, TagDefault, TagMode, TimeKind, Type, Value,
        },
        lexer::tokenize,
        token::TokenKind,
    };

    use super::*;

    fn parse_str(source: &str) -> Result<ModuleDefinition<'_>> {
        parse(tokenize(source).unwrap())
    }

    fn single_type(body: &str) -> Type<'static> {
        let source = format!("M DEFINITIONS ::= BEGIN {body} END").leak();
        let module = parse_str(source).unwrap();
        match module.assignments.into_iter().next() {
            Some(Assignment::Type { ty, .. }) => ty,
            other => panic!("expected a type assignment, got {other:?}"),
        }
    }

    #[test]
    fn empty_module() {
        let module = parse_str("My-Module DEFINITIONS ::= BEGIN END").unwrap();
        assert_eq!(module.identifier.name.name, "My-Module");
        assert_eq!(module.tag_default, TagDefault::Unspecified);
        assert!(module.assignments.is_empty());
    }

    #[test]
    fn module_header_defaults() {
        let module = parse_str(
            "M { iso(1) member-body(2) 840 } DEFINITIONS IMPLICIT TAGS EXTENSIBILITY IMPLIED ::= BEGIN END",
        )
        .unwrap();
        assert_eq!(module.tag_default, TagDefault::Implicit);
        assert!(module.extensibility);
        assert_eq!(module.identifier.oid.len(), 3);
        assert_eq!(module.identifier.oid[1].label, Some("member-body"));
        assert_eq!(module.identifier.oid[1].number, Some("2"));
        assert_eq!(module.identifier.oid[2].label, None);

        let module = parse_str("M DEFINITIONS AUTOMATIC TAGS ::= BEGIN END").unwrap();
        assert_eq!(module.tag_default, TagDefault::Automatic);
    }

    #[test]
    fn primitive_types() {
        assert_eq!(single_type("A ::= BOOLEAN"), Type::Boolean);
        assert_eq!(single_type("A ::= OCTET STRING"), Type::OctetString);
        assert_eq!(single_type("A ::= CHARACTER STRING"), Type::CharacterString);
        assert_eq!(
            single_type("A ::= IA5String"),
            Type::RestrictedString(StringKind::IA5)
        );
        assert_eq!(
            single_type("A ::= GeneralizedTime"),
            Type::Time(TimeKind::Generalized)
        );
        assert_eq!(
            single_type("A ::= OBJECT IDENTIFIER"),
            Type::ObjectIdentifier
        );
    }

    #[test]
    fn integer_named_numbers() {
        let Type::Integer(numbers) = single_type("Int ::= INTEGER { a(42), b(-1), c(d) }") else {
            panic!("expected an integer type");
        };
        let values: Vec<_> = numbers.iter().map(|n| (n.name.name, &n.value)).collect();
        assert_eq!(
            values,
            vec![
                ("a", &Value::Number(42)),
                ("b", &Value::Number(-1)),
                (
                    "c",
                    &Value::Identifier(Ident {
                        name: "d",
                        offset: 58
                    })
                ),
            ]
        );
    }

    #[test]
    fn tagged_components() {
        let Type::Sequence(list) = single_type(
            "S ::= SEQUENCE { a BOOLEAN, b [1] BOOLEAN, c [APPLICATION 2] EXPLICIT BOOLEAN, d [3] IMPLICIT BOOLEAN OPTIONAL }",
        ) else {
            panic!("expected a sequence type");
        };

        assert_eq!(list.components[0].ty, Type::Boolean);
        assert_eq!(list.components[1].ty, Type::Boolean.tagged(1, TagMode::Default));
        assert_eq!(
            list.components[2].ty,
            Type::Tagged {
                tag: Tag {
                    class: TagClass::Application,
                    number: 2
                },
                mode: TagMode::Explicit,
                ty: Box::new(Type::Boolean),
            }
        );
        assert_eq!(list.components[3].ty, Type::Boolean.tagged(3, TagMode::Implicit));
        assert_eq!(list.components[3].presence, Presence::Optional);
    }

    #[test]
    fn extension_marker() {
        let Type::Set(list) = single_type("S ::= SET { a BOOLEAN, ..., b BOOLEAN DEFAULT TRUE }")
        else {
            panic!("expected a set type");
        };
        assert_eq!(list.extension, Some(1));
        assert_eq!(list.root().len(), 1);
        assert_eq!(list.additions()[0].name.name, "b");
        assert_eq!(
            list.additions()[0].presence,
            Presence::Default(Value::Boolean(true))
        );
    }

    #[test]
    fn second_extension_marker_is_rejected() {
        let err = parse_str("M DEFINITIONS ::= BEGIN S ::= SEQUENCE { a BOOLEAN, ..., ... } END")
            .unwrap_err();
        assert!(matches!(
            err,
            ParserError::Expected {
                got: TokenKind::Ellipsis,
                ..
            }
        ));
    }

    #[test]
    fn size_constraint() {
        let ty = single_type("B ::= BIT STRING (SIZE (32..MAX))");
        let size = Constraint {
            unions: vec![Intersections {
                elements: vec![Elements::ValueRange {
                    lower: RangeEndpoint {
                        value: Some(Value::Number(32)),
                        exclusive: false,
                    },
                    upper: RangeEndpoint::default(),
                }],
            }],
        };
        assert_eq!(
            ty,
            Type::Constrained {
                ty: Box::new(Type::BitString(vec![])),
                constraint: Constraint {
                    unions: vec![Intersections {
                        elements: vec![Elements::Size(size)],
                    }],
                },
            }
        );
    }

    #[test]
    fn sequence_of_with_size() {
        let ty = single_type("L ::= SEQUENCE SIZE (1..10) OF INTEGER");
        let Type::Constrained { ty, .. } = ty else {
            panic!("expected a constrained type");
        };
        assert_eq!(*ty, Type::SequenceOf(Box::new(Type::Integer(vec![]))));

        let ty = single_type("L ::= SET OF item UTF8String");
        assert_eq!(
            ty,
            Type::SetOf(Box::new(Type::RestrictedString(StringKind::UTF8)))
        );
    }

    #[test]
    fn complex_constraint() {
        let ty = single_type("I ::= INTEGER (0<..<5 | 7 ^ (MIN..10), ...)");
        let Type::Constrained { constraint, .. } = ty else {
            panic!("expected a constrained type");
        };
        assert_eq!(constraint.unions.len(), 3);
        assert_eq!(constraint.unions[1].elements.len(), 2);
        assert_eq!(
            constraint.unions[2].elements,
            vec![Elements::Extension]
        );
    }

    #[test]
    fn enumerated() {
        let Type::Enumerated { items, extension } =
            single_type("E ::= ENUMERATED { a, b(5), ..., c }")
        else {
            panic!("expected an enumerated type");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].value, Some(Value::Number(5)));
        assert_eq!(extension, Some(2));
    }

    #[test]
    fn value_assignments() {
        let module = parse_str(
            r#"M DEFINITIONS ::= BEGIN
                i INTEGER ::= -42
                b BOOLEAN ::= FALSE
                r REAL ::= 2.5
                s IA5String ::= "a ""quoted"" word"
                d INTEGER ::= i
            END"#,
        )
        .unwrap();

        let values: Vec<_> = module
            .assignments
            .iter()
            .map(|a| match a {
                Assignment::Value { value, .. } => value.clone(),
                Assignment::Type { .. } => panic!("expected a value assignment"),
            })
            .collect();
        assert_eq!(values[0], Value::Number(-42));
        assert_eq!(values[1], Value::Boolean(false));
        assert_eq!(values[2], Value::Real(2.5));
        assert_eq!(values[3], Value::String("a \"quoted\" word".to_string()));
        assert!(matches!(values[4], Value::Identifier(Ident { name: "i", .. })));
    }

    #[test]
    fn syntax_error_reports_expected_tokens() {
        let err = parse_str("M DEFINITIONS ::= BEGIN A ::= END").unwrap_err();
        let ParserError::Expected { got, offset, .. } = err else {
            panic!("expected a token mismatch");
        };
        assert_eq!(got, TokenKind::KwEnd);
        assert_eq!(offset, 30);
    }

    #[test]
    fn trailing_tokens() {
        let err = parse_str("M DEFINITIONS ::= BEGIN END A").unwrap_err();
        let ParserError::Expected {
            expected,
            got,
            offset,
        } = err
        else {
            panic!("expected a token mismatch");
        };
        assert_eq!(&*expected, &[TokenKind::Eof]);
        assert_eq!(got, TokenKind::TypeReference);
        assert_eq!(offset, 28);
    }

    #[test]
    fn integer_overflow() {
        let err =
            parse_str("M DEFINITIONS ::= BEGIN i INTEGER ::= 99999999999999999999 END").unwrap_err();
        assert_eq!(err, ParserError::IntegerOverflow { offset: 38 });
    }

    #[test]
    fn depth_limit() {
        let nested = "SEQUENCE OF ".repeat(200);
        let source = format!("M DEFINITIONS ::= BEGIN A ::= {nested} BOOLEAN END");
        let err = parse_str(&source).unwrap_err();
        assert!(matches!(err, ParserError::DepthExceeded { .. }));
    }
}
