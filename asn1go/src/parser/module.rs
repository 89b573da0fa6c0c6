use crate::{
    ast::{Assignment, ModuleDefinition, ModuleIdentifier, ModuleOidComponent, TagDefault},
    token::TokenKind,
};

use super::{Parser, Result};

impl<'a> Parser<'a> {
    /// Parse a single ASN.1 module definition
    pub(super) fn module_definition(&mut self) -> Result<ModuleDefinition<'a>> {
        let identifier = self.module_identifier()?;
        self.next(&[TokenKind::KwDefinitions])?;
        let tag_default = self.tag_default()?;
        let extensibility = self.extension_default()?;
        self.next(&[TokenKind::Assignment])?;
        self.next(&[TokenKind::KwBegin])?;

        let mut assignments = vec![];
        loop {
            let tok = self.peek(&[
                TokenKind::TypeReference,
                TokenKind::Identifier,
                TokenKind::KwEnd,
            ])?;
            if tok.kind == TokenKind::KwEnd {
                break;
            }

            assignments.push(self.assignment()?);
        }

        self.next(&[TokenKind::KwEnd])?;

        Ok(ModuleDefinition {
            identifier,
            tag_default,
            extensibility,
            assignments,
        })
    }

    /// Identifier at the start of a module
    fn module_identifier(&mut self) -> Result<ModuleIdentifier<'a>> {
        let name = self.ident(&[TokenKind::TypeReference])?;

        let tok = self.peek(&[TokenKind::LeftCurly, TokenKind::KwDefinitions])?;
        let oid = if tok.kind == TokenKind::LeftCurly {
            self.definitive_oid()?
        } else {
            vec![]
        };

        Ok(ModuleIdentifier { name, oid })
    }

    /// Object identifier after the name of a module, only name and number
    /// forms are accepted
    fn definitive_oid(&mut self) -> Result<Vec<ModuleOidComponent<'a>>> {
        self.next(&[TokenKind::LeftCurly])?;

        let mut oid = vec![];
        loop {
            oid.push(self.definitive_oid_component()?);

            let tok = self.peek(&[
                TokenKind::Identifier,
                TokenKind::Number,
                TokenKind::RightCurly,
            ])?;
            if tok.kind == TokenKind::RightCurly {
                self.next(&[TokenKind::RightCurly])?;
                break;
            }
        }

        Ok(oid)
    }

    /// Single component of the object identifier after the name of a module,
    /// `iso`, `1` or `iso(1)`
    fn definitive_oid_component(&mut self) -> Result<ModuleOidComponent<'a>> {
        let tok = self.next(&[TokenKind::Identifier, TokenKind::Number])?;

        if tok.kind == TokenKind::Number {
            return Ok(ModuleOidComponent {
                label: None,
                number: Some(tok.value),
            });
        }

        let mut number = None;
        if self.eat(TokenKind::LeftParen) {
            number = Some(self.next(&[TokenKind::Number])?.value);
            self.next(&[TokenKind::RightParen])?;
        }

        Ok(ModuleOidComponent {
            label: Some(tok.value),
            number,
        })
    }

    /// Parse `EXPLICIT TAGS` or `IMPLICIT TAGS` or `AUTOMATIC TAGS` or none
    fn tag_default(&mut self) -> Result<TagDefault> {
        let tok = self.peek(&[
            TokenKind::KwExplicit,
            TokenKind::KwImplicit,
            TokenKind::KwAutomatic,
            TokenKind::KwExtensibility,
            TokenKind::Assignment,
        ])?;

        let res = match tok.kind {
            TokenKind::KwExplicit => TagDefault::Explicit,
            TokenKind::KwImplicit => TagDefault::Implicit,
            TokenKind::KwAutomatic => TagDefault::Automatic,
            _ => return Ok(TagDefault::Unspecified),
        };

        self.next(&[])?;
        self.next(&[TokenKind::KwTags])?;

        Ok(res)
    }

    /// Parse `EXTENSIBILITY IMPLIED` or none
    fn extension_default(&mut self) -> Result<bool> {
        let tok = self.peek(&[TokenKind::KwExtensibility, TokenKind::Assignment])?;
        if tok.kind != TokenKind::KwExtensibility {
            return Ok(false);
        }

        self.next(&[TokenKind::KwExtensibility])?;
        self.next(&[TokenKind::KwImplied])?;

        Ok(true)
    }

    /// Parse a single assignment to a name
    fn assignment(&mut self) -> Result<Assignment<'a>> {
        let tok = self.peek(&[TokenKind::TypeReference, TokenKind::Identifier])?;

        if tok.kind == TokenKind::TypeReference {
            let name = self.ident(&[TokenKind::TypeReference])?;
            self.next(&[TokenKind::Assignment])?;
            let ty = self.ty()?;

            Ok(Assignment::Type { name, ty })
        } else {
            let name = self.ident(&[TokenKind::Identifier])?;
            let ty = self.ty()?;
            self.next(&[TokenKind::Assignment])?;
            let value = self.value()?;

            Ok(Assignment::Value { name, ty, value })
        }
    }
}
