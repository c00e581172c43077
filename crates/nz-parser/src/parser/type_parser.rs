//! Types, type parameter lists and type argument lists.

use nz_core::Effect;

use super::Parser;
use crate::ast::{TypeExpr, TypeParamDecl};
use crate::error::{ParseErrorKind, ParseResult};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// `[effect] Name[<args>]`
    pub(super) fn parse_type(&mut self) -> ParseResult<TypeExpr<'ast>> {
        let start = self.peek().span;
        let mut effect = None;
        if self.check(TokenKind::Ident) && self.peek_nth(1).kind == TokenKind::TypeName {
            effect = Effect::from_keyword(self.peek().lexeme);
            if effect.is_some() {
                self.advance();
            }
        }
        if !self.check(TokenKind::TypeName) {
            return Err(self.error(
                ParseErrorKind::ExpectedType,
                format!("found {}", self.peek().kind),
            ));
        }
        let name = self.advance();
        let args = self.parse_type_args_opt()?;
        Ok(TypeExpr {
            effect,
            name: name.lexeme,
            args,
            span: start.through(name.span),
        })
    }

    /// `<A, B>` if present, else an empty slice.
    pub(super) fn parse_type_args_opt(&mut self) -> ParseResult<&'ast [TypeExpr<'ast>]> {
        if self.eat(TokenKind::Less).is_none() {
            return Ok(&[]);
        }
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Greater)?;
        Ok(self.alloc_slice(args))
    }

    /// `<T, U>` if present, else an empty slice.
    pub(super) fn parse_type_params_opt(&mut self) -> ParseResult<&'ast [TypeParamDecl<'ast>]> {
        if self.eat(TokenKind::Less).is_none() {
            return Ok(&[]);
        }
        let mut params = Vec::new();
        loop {
            let name = self.expect(TokenKind::TypeName)?;
            params.push(TypeParamDecl {
                name: name.lexeme,
                span: name.span,
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Greater)?;
        Ok(self.alloc_slice(params))
    }
}
