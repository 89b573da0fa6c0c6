use crate::{
    ast::{
        ComponentTypeList, Constraint, Elements, EnumItem, Intersections, NamedComponentType,
        NamedNumber, Presence, StringKind, Tag, TagClass, TagMode, TimeKind, Type,
    },
    token::TokenKind,
};

use super::{Parser, ParserError, Result};

/// Every token that can begin a type
static TYPE_START: &[TokenKind] = &[
    TokenKind::LeftSquare,
    TokenKind::TypeReference,
    TokenKind::KwBoolean,
    TokenKind::KwInteger,
    TokenKind::KwReal,
    TokenKind::KwNull,
    TokenKind::KwOctet,
    TokenKind::KwBit,
    TokenKind::KwCharacter,
    TokenKind::KwObject,
    TokenKind::KwEnumerated,
    TokenKind::KwSequence,
    TokenKind::KwSet,
    TokenKind::KwChoice,
    TokenKind::KwGeneralizedTime,
    TokenKind::KwUTCTime,
    TokenKind::KwBmpString,
    TokenKind::KwGeneralString,
    TokenKind::KwGraphicString,
    TokenKind::KwIA5String,
    TokenKind::KwISO646String,
    TokenKind::KwNumericString,
    TokenKind::KwPrintableString,
    TokenKind::KwTeletexString,
    TokenKind::KwT61String,
    TokenKind::KwUniversalString,
    TokenKind::KwUTF8String,
    TokenKind::KwVideotexString,
    TokenKind::KwVisibleString,
];

impl<'a> Parser<'a> {
    /// Parse a type, either prefixed with a tag or followed by any number of
    /// constraints
    pub(super) fn ty(&mut self) -> Result<Type<'a>> {
        self.enter()?;

        let ty = if self.at(TokenKind::LeftSquare) {
            self.tagged_type()?
        } else {
            let mut ty = self.base_type()?;
            while self.at(TokenKind::LeftParen) {
                let constraint = self.constraint()?;
                ty = Type::Constrained {
                    ty: Box::new(ty),
                    constraint,
                };
            }
            ty
        };

        self.leave();
        Ok(ty)
    }

    /// `[APPLICATION 5] IMPLICIT Type`
    fn tagged_type(&mut self) -> Result<Type<'a>> {
        self.next(&[TokenKind::LeftSquare])?;

        let tok = self.peek(&[
            TokenKind::KwApplication,
            TokenKind::KwPrivate,
            TokenKind::KwUniversal,
            TokenKind::Number,
        ])?;
        let class = match tok.kind {
            TokenKind::KwApplication => TagClass::Application,
            TokenKind::KwPrivate => TagClass::Private,
            TokenKind::KwUniversal => TagClass::Universal,
            _ => TagClass::ContextSpecific,
        };
        if class != TagClass::ContextSpecific {
            self.next(&[])?;
        }

        let tok = self.next(&[TokenKind::Number])?;
        let number = tok
            .value
            .parse()
            .map_err(|_| ParserError::IntegerOverflow { offset: tok.offset })?;

        self.next(&[TokenKind::RightSquare])?;

        let mode = if self.eat(TokenKind::KwExplicit) {
            TagMode::Explicit
        } else if self.eat(TokenKind::KwImplicit) {
            TagMode::Implicit
        } else {
            TagMode::Default
        };

        Ok(Type::Tagged {
            tag: Tag { class, number },
            mode,
            ty: Box::new(self.ty()?),
        })
    }

    /// Any type without a tag prefix or constraint suffix
    fn base_type(&mut self) -> Result<Type<'a>> {
        let tok = self.peek(TYPE_START)?;

        let ty = match tok.kind {
            TokenKind::TypeReference => {
                return Ok(Type::Reference(self.ident(&[TokenKind::TypeReference])?));
            }
            TokenKind::KwInteger => {
                self.next(&[TokenKind::KwInteger])?;
                return Ok(Type::Integer(self.named_number_list()?));
            }
            TokenKind::KwBit => {
                self.next(&[TokenKind::KwBit])?;
                self.next(&[TokenKind::KwString])?;
                return Ok(Type::BitString(self.named_number_list()?));
            }
            TokenKind::KwOctet => {
                self.next(&[TokenKind::KwOctet])?;
                self.next(&[TokenKind::KwString])?;
                return Ok(Type::OctetString);
            }
            TokenKind::KwCharacter => {
                self.next(&[TokenKind::KwCharacter])?;
                self.next(&[TokenKind::KwString])?;
                return Ok(Type::CharacterString);
            }
            TokenKind::KwObject => {
                self.next(&[TokenKind::KwObject])?;
                self.next(&[TokenKind::KwIdentifier])?;
                return Ok(Type::ObjectIdentifier);
            }
            TokenKind::KwEnumerated => return self.enumerated_type(),
            TokenKind::KwSequence | TokenKind::KwSet => return self.sequence_or_set(),
            TokenKind::KwChoice => {
                self.next(&[TokenKind::KwChoice])?;
                return Ok(Type::Choice(self.component_type_list()?));
            }
            TokenKind::KwBoolean => Type::Boolean,
            TokenKind::KwReal => Type::Real,
            TokenKind::KwNull => Type::Null,
            TokenKind::KwGeneralizedTime => Type::Time(TimeKind::Generalized),
            TokenKind::KwUTCTime => Type::Time(TimeKind::Utc),
            TokenKind::KwBmpString => Type::RestrictedString(StringKind::Bmp),
            TokenKind::KwGeneralString => Type::RestrictedString(StringKind::General),
            TokenKind::KwGraphicString => Type::RestrictedString(StringKind::Graphic),
            TokenKind::KwIA5String => Type::RestrictedString(StringKind::IA5),
            TokenKind::KwISO646String => Type::RestrictedString(StringKind::ISO646),
            TokenKind::KwNumericString => Type::RestrictedString(StringKind::Numeric),
            TokenKind::KwPrintableString => Type::RestrictedString(StringKind::Printable),
            TokenKind::KwTeletexString => Type::RestrictedString(StringKind::Teletex),
            TokenKind::KwT61String => Type::RestrictedString(StringKind::T61),
            TokenKind::KwUniversalString => Type::RestrictedString(StringKind::Universal),
            TokenKind::KwUTF8String => Type::RestrictedString(StringKind::UTF8),
            TokenKind::KwVideotexString => Type::RestrictedString(StringKind::Videotex),
            TokenKind::KwVisibleString => Type::RestrictedString(StringKind::Visible),
            _ => unreachable!("peek only returns type start tokens"),
        };

        // single keyword types
        self.next(&[])?;
        Ok(ty)
    }

    /// `SEQUENCE { ... }`, `SET { ... }`, or their `OF` forms with an
    /// optional size constraint before the `OF`
    fn sequence_or_set(&mut self) -> Result<Type<'a>> {
        let tok = self.next(&[TokenKind::KwSequence, TokenKind::KwSet])?;
        let is_set = tok.kind == TokenKind::KwSet;

        let tok = self.peek(&[
            TokenKind::LeftCurly,
            TokenKind::KwOf,
            TokenKind::KwSize,
            TokenKind::LeftParen,
        ])?;

        let constraint = match tok.kind {
            TokenKind::LeftCurly => {
                let list = self.component_type_list()?;
                return Ok(if is_set {
                    Type::Set(list)
                } else {
                    Type::Sequence(list)
                });
            }
            TokenKind::KwSize => {
                self.next(&[TokenKind::KwSize])?;
                let size = self.constraint()?;
                Some(Constraint {
                    unions: vec![Intersections {
                        elements: vec![Elements::Size(size)],
                    }],
                })
            }
            TokenKind::LeftParen => Some(self.constraint()?),
            _ => None,
        };

        self.next(&[TokenKind::KwOf])?;

        // the element name in `SEQUENCE OF item Type` has no meaning here
        self.eat(TokenKind::Identifier);

        let element = Box::new(self.ty()?);
        let ty = if is_set {
            Type::SetOf(element)
        } else {
            Type::SequenceOf(element)
        };

        Ok(match constraint {
            Some(constraint) => Type::Constrained {
                ty: Box::new(ty),
                constraint,
            },
            None => ty,
        })
    }

    /// Braced list of named components, with at most one extension marker
    fn component_type_list(&mut self) -> Result<ComponentTypeList<'a>> {
        self.next(&[TokenKind::LeftCurly])?;

        let mut list = ComponentTypeList::default();
        if self.eat(TokenKind::RightCurly) {
            return Ok(list);
        }

        loop {
            let kind: &'static [TokenKind] = if list.extension.is_none() {
                &[TokenKind::Identifier, TokenKind::Ellipsis]
            } else {
                &[TokenKind::Identifier]
            };

            let tok = self.peek(kind)?;
            if tok.kind == TokenKind::Ellipsis {
                self.next(&[TokenKind::Ellipsis])?;
                list.extension = Some(list.components.len());
            } else {
                list.components.push(self.component_type()?);
            }

            let tok = self.next(&[TokenKind::Comma, TokenKind::RightCurly])?;
            if tok.kind == TokenKind::RightCurly {
                break;
            }
        }

        Ok(list)
    }

    /// `name Type [OPTIONAL | DEFAULT value]`
    fn component_type(&mut self) -> Result<NamedComponentType<'a>> {
        let name = self.ident(&[TokenKind::Identifier])?;
        let ty = self.ty()?;

        let presence = if self.eat(TokenKind::KwOptional) {
            Presence::Optional
        } else if self.eat(TokenKind::KwDefault) {
            Presence::Default(self.value()?)
        } else {
            Presence::Required
        };

        Ok(NamedComponentType { name, ty, presence })
    }

    /// Optional `{ a(1), b(-2), c(ref) }` after INTEGER or BIT STRING
    fn named_number_list(&mut self) -> Result<Vec<NamedNumber<'a>>> {
        let mut numbers = vec![];
        if !self.eat(TokenKind::LeftCurly) {
            return Ok(numbers);
        }

        loop {
            let name = self.ident(&[TokenKind::Identifier])?;
            self.next(&[TokenKind::LeftParen])?;
            self.peek(&[TokenKind::Number, TokenKind::Hyphen, TokenKind::Identifier])?;
            let value = self.value()?;
            self.next(&[TokenKind::RightParen])?;

            numbers.push(NamedNumber { name, value });

            let tok = self.next(&[TokenKind::Comma, TokenKind::RightCurly])?;
            if tok.kind == TokenKind::RightCurly {
                break;
            }
        }

        Ok(numbers)
    }

    /// `ENUMERATED { a, b(5), ..., c }`
    fn enumerated_type(&mut self) -> Result<Type<'a>> {
        self.next(&[TokenKind::KwEnumerated])?;
        self.next(&[TokenKind::LeftCurly])?;

        let mut items = vec![];
        let mut extension = None;
        loop {
            let kind: &'static [TokenKind] = if extension.is_none() {
                &[TokenKind::Identifier, TokenKind::Ellipsis]
            } else {
                &[TokenKind::Identifier]
            };

            let tok = self.peek(kind)?;
            if tok.kind == TokenKind::Ellipsis {
                self.next(&[TokenKind::Ellipsis])?;
                extension = Some(items.len());
            } else {
                let name = self.ident(&[TokenKind::Identifier])?;
                let mut value = None;
                if self.eat(TokenKind::LeftParen) {
                    self.peek(&[TokenKind::Number, TokenKind::Hyphen, TokenKind::Identifier])?;
                    value = Some(self.value()?);
                    self.next(&[TokenKind::RightParen])?;
                }
                items.push(EnumItem { name, value });
            }

            let tok = self.next(&[TokenKind::Comma, TokenKind::RightCurly])?;
            if tok.kind == TokenKind::RightCurly {
                break;
            }
        }

        Ok(Type::Enumerated { items, extension })
    }
}
