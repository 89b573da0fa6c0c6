use crate::{ast::Value, token::TokenKind};

use super::{Parser, ParserError, Result};

impl<'a> Parser<'a> {
    /// Parse a value literal or a reference to a value assignment
    pub(super) fn value(&mut self) -> Result<Value<'a>> {
        let tok = self.peek(&[
            TokenKind::Number,
            TokenKind::RealNumber,
            TokenKind::Hyphen,
            TokenKind::KwTrue,
            TokenKind::KwFalse,
            TokenKind::Identifier,
            TokenKind::CString,
        ])?;

        match tok.kind {
            TokenKind::Number | TokenKind::RealNumber | TokenKind::Hyphen => self.number(),
            TokenKind::KwTrue => {
                self.next(&[TokenKind::KwTrue])?;
                Ok(Value::Boolean(true))
            }
            TokenKind::KwFalse => {
                self.next(&[TokenKind::KwFalse])?;
                Ok(Value::Boolean(false))
            }
            TokenKind::Identifier => Ok(Value::Identifier(self.ident(&[TokenKind::Identifier])?)),
            _ => {
                let tok = self.next(&[TokenKind::CString])?;
                let inner = &tok.value[1..tok.value.len() - 1];
                Ok(Value::String(inner.replace("\"\"", "\"")))
            }
        }
    }

    /// Signed integer or real literal
    fn number(&mut self) -> Result<Value<'a>> {
        let start = self.current().offset;
        let negative = self.eat(TokenKind::Hyphen);

        let tok = self.next(&[TokenKind::Number, TokenKind::RealNumber])?;
        let overflow = || ParserError::IntegerOverflow { offset: start };

        if tok.kind == TokenKind::RealNumber {
            let value: f64 = tok.value.parse().map_err(|_| overflow())?;
            if !value.is_finite() {
                return Err(overflow());
            }
            return Ok(Value::Real(if negative { -value } else { value }));
        }

        let value: i128 = tok.value.parse().map_err(|_| overflow())?;
        let value = if negative { -value } else { value };

        Ok(Value::Number(value.try_into().map_err(|_| overflow())?))
    }
}
