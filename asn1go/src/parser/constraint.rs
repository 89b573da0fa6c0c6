use crate::{
    ast::{Constraint, Elements, Intersections, RangeEndpoint, Value},
    token::TokenKind,
};

use super::{Parser, Result};

impl<'a> Parser<'a> {
    /// Parenthesised subtype constraint, `(SIZE (1..10), ...)`
    pub(super) fn constraint(&mut self) -> Result<Constraint<'a>> {
        self.enter()?;
        self.next(&[TokenKind::LeftParen])?;

        let mut unions = vec![self.intersections()?];
        loop {
            let tok = self.next(&[
                TokenKind::Pipe,
                TokenKind::KwUnion,
                TokenKind::Comma,
                TokenKind::RightParen,
            ])?;

            match tok.kind {
                TokenKind::RightParen => break,
                TokenKind::Comma if self.eat(TokenKind::Ellipsis) => {
                    unions.push(Intersections {
                        elements: vec![Elements::Extension],
                    });
                }
                _ => unions.push(self.intersections()?),
            }
        }

        self.leave();
        Ok(Constraint { unions })
    }

    /// Elements joined by `^` or `INTERSECTION`
    fn intersections(&mut self) -> Result<Intersections<'a>> {
        let mut elements = vec![self.elements()?];
        while self.eat(TokenKind::Caret) || self.eat(TokenKind::KwIntersection) {
            elements.push(self.elements()?);
        }

        Ok(Intersections { elements })
    }

    /// A single constraint element
    fn elements(&mut self) -> Result<Elements<'a>> {
        let tok = self.peek(&[
            TokenKind::KwSize,
            TokenKind::LeftParen,
            TokenKind::Ellipsis,
            TokenKind::KwMin,
            TokenKind::KwMax,
            TokenKind::Number,
            TokenKind::RealNumber,
            TokenKind::Hyphen,
            TokenKind::KwTrue,
            TokenKind::KwFalse,
            TokenKind::Identifier,
            TokenKind::CString,
        ])?;

        match tok.kind {
            TokenKind::KwSize => {
                self.next(&[TokenKind::KwSize])?;
                return Ok(Elements::Size(self.constraint()?));
            }
            TokenKind::LeftParen => return Ok(Elements::Nested(self.constraint()?)),
            TokenKind::Ellipsis => {
                self.next(&[TokenKind::Ellipsis])?;
                return Ok(Elements::Extension);
            }
            _ => (),
        }

        let lower = self.range_endpoint()?;
        let lower_exclusive = self.eat(TokenKind::Less);

        // MIN and MAX only make sense as part of a range
        let lower = match lower {
            Some(value) if !lower_exclusive && !self.at(TokenKind::Range) => {
                return Ok(Elements::SingleValue(value));
            }
            lower => lower,
        };

        self.next(&[TokenKind::Range])?;
        let upper_exclusive = self.eat(TokenKind::Less);
        let upper = self.range_endpoint()?;

        Ok(Elements::ValueRange {
            lower: RangeEndpoint {
                value: lower,
                exclusive: lower_exclusive,
            },
            upper: RangeEndpoint {
                value: upper,
                exclusive: upper_exclusive,
            },
        })
    }

    /// `MIN`, `MAX` or a value, [`None`] for the keywords
    fn range_endpoint(&mut self) -> Result<Option<Value<'a>>> {
        if self.eat(TokenKind::KwMin) || self.eat(TokenKind::KwMax) {
            Ok(None)
        } else {
            Ok(Some(self.value()?))
        }
    }
}
