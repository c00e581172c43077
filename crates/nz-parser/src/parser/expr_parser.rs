//! Expression blocks and single-line expressions.

use super::Parser;
use crate::ast::{
    AssertExpr, CallExpr, CaseAst, Expr, IdentExpr, LetExpr, LiteralExpr, SeqExpr,
    StructCreateExpr, TypeAnnotateExpr, WhenExpr,
};
use crate::error::{ParseError, ParseErrorKind, ParseResult};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// An indented block: `Indent lines Dedent`.
    pub(super) fn parse_block(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        self.expect(TokenKind::Indent)?;
        let body = self.parse_lines()?;
        self.expect(TokenKind::Dedent)?;
        Ok(body)
    }

    /// The remaining lines of a block, up to but not including its `Dedent`.
    fn parse_lines(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        if self.check(TokenKind::Ident) && self.peek_nth(1).kind == TokenKind::Equals {
            let name = self.advance();
            self.advance();
            let init = self.parse_expr()?;
            self.expect(TokenKind::Newline)?;
            if self.at_block_end() {
                return Err(ParseError::new(
                    ParseErrorKind::LetWithoutContinuation,
                    name.span,
                    format!("'{}' is never used", name.lexeme),
                ));
            }
            let then = self.parse_lines()?;
            return Ok(self.alloc(Expr::Let(LetExpr {
                name: name.lexeme,
                init: self.alloc(init),
                then,
                span: name.span,
            })));
        }

        let first = self.parse_line()?;
        if self.at_block_end() {
            return Ok(first);
        }
        let then = self.parse_lines()?;
        Ok(self.alloc(Expr::Seq(SeqExpr {
            first,
            then,
            span: first.span(),
        })))
    }

    fn at_block_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Dedent | TokenKind::Eof)
    }

    /// One line, including its terminator.
    fn parse_line(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        match self.peek().kind {
            TokenKind::When => self.parse_when(),
            TokenKind::Assert => {
                let start = self.advance();
                let asserted = self.parse_expr()?;
                self.expect(TokenKind::Newline)?;
                Ok(self.alloc(Expr::Assert(AssertExpr {
                    asserted: self.alloc(asserted),
                    span: start.span,
                })))
            }
            TokenKind::Pass => {
                let start = self.advance();
                self.expect(TokenKind::Newline)?;
                Ok(self.alloc(Expr::Pass(start.span)))
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Newline)?;
                Ok(self.alloc(expr))
            }
        }
    }

    /// ```text
    /// when
    ///     cond
    ///         branch
    ///     else
    ///         branch
    /// ```
    fn parse_when(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        let start = self.expect(TokenKind::When)?;
        self.expect(TokenKind::Newline)?;
        self.expect(TokenKind::Indent)?;
        let mut cases = Vec::new();
        loop {
            if self.eat(TokenKind::Else).is_some() {
                self.expect(TokenKind::Newline)?;
                let otherwise = self.parse_block()?;
                self.expect(TokenKind::Dedent)?;
                return Ok(self.alloc(Expr::When(WhenExpr {
                    cases: self.alloc_slice(cases),
                    otherwise,
                    span: start.span,
                })));
            }
            let cond = self.parse_expr()?;
            self.expect(TokenKind::Newline)?;
            let then = self.parse_block()?;
            cases.push(CaseAst {
                cond: self.alloc(cond),
                then,
            });
        }
    }

    /// A single-line expression: a primary followed by `.name` calls.
    pub(super) fn parse_expr(&mut self) -> ParseResult<Expr<'ast>> {
        let mut expr = self.parse_primary()?;
        while self.eat(TokenKind::Dot).is_some() {
            let name = self.expect(TokenKind::Ident)?;
            let type_args = self.parse_type_args_opt()?;
            let mut args = vec![expr];
            if self.check(TokenKind::LParen) {
                args.extend(self.parse_call_args()?);
            }
            expr = Expr::Call(CallExpr {
                name: name.lexeme,
                type_args,
                args: self.alloc_slice(args),
                span: name.span,
            });
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr<'ast>> {
        let token = self.peek();
        match token.kind {
            TokenKind::Ident => {
                self.advance();
                let type_args = self.parse_type_args_opt()?;
                if !self.check(TokenKind::LParen) && type_args.is_empty() {
                    return Ok(Expr::Identifier(IdentExpr {
                        name: token.lexeme,
                        span: token.span,
                    }));
                }
                let args = if self.check(TokenKind::LParen) {
                    self.parse_call_args()?
                } else {
                    Vec::new()
                };
                Ok(Expr::Call(CallExpr {
                    name: token.lexeme,
                    type_args,
                    args: self.alloc_slice(args),
                    span: token.span,
                }))
            }
            TokenKind::TypeName => {
                self.advance();
                let type_args = self.parse_type_args_opt()?;
                let args = self.parse_call_args()?;
                Ok(Expr::StructCreate(StructCreateExpr {
                    name: token.lexeme,
                    type_args,
                    args: self.alloc_slice(args),
                    span: token.span,
                }))
            }
            TokenKind::Number | TokenKind::String => {
                self.advance();
                let type_args = self.parse_type_args_opt()?;
                let args = if self.check(TokenKind::LParen) {
                    self.parse_call_args()?
                } else {
                    Vec::new()
                };
                Ok(Expr::Literal(LiteralExpr {
                    text: token.lexeme,
                    type_args,
                    args: self.alloc_slice(args),
                    span: token.span,
                }))
            }
            TokenKind::As => {
                self.advance();
                self.expect(TokenKind::Less)?;
                let ty = self.parse_type()?;
                self.expect(TokenKind::Greater)?;
                self.expect(TokenKind::LParen)?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::TypeAnnotate(TypeAnnotateExpr {
                    ty,
                    expr: self.alloc(inner),
                    span: token.span,
                }))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(self.error(
                ParseErrorKind::ExpectedExpression,
                format!("found {}", token.kind),
            )),
        }
    }

    /// `(a, b, c)`
    fn parse_call_args(&mut self) -> ParseResult<Vec<Expr<'ast>>> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.eat(TokenKind::RParen).is_some() {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;

    use crate::ast::{Expr, FunBodyAst};
    use crate::error::ParseErrorKind;
    use crate::parser::Parser;

    fn body<'ast>(arena: &'ast Bump, lines: &str) -> &'ast Expr<'ast> {
        let source = format!("fun Void f()\n{}", lines);
        let file = Parser::parse_file(&source, arena).unwrap();
        match file.funs().next().unwrap().body {
            FunBodyAst::Expr(expr) => expr,
            FunBodyAst::Passthrough(_) => panic!("expected a body"),
        }
    }

    #[test]
    fn let_takes_rest_of_block() {
        let arena = Bump::new();
        let expr = body(&arena, "\tx = 1\n\ty = x\n\ty\n");
        let Expr::Let(outer) = expr else {
            panic!("expected let, got {:?}", expr);
        };
        assert_eq!(outer.name, "x");
        let Expr::Let(inner) = outer.then else {
            panic!("expected nested let");
        };
        assert!(matches!(inner.then, Expr::Identifier(i) if i.name == "y"));
    }

    #[test]
    fn lines_form_a_sequence() {
        let arena = Bump::new();
        let expr = body(&arena, "\tpass\n\tassert b\n\tz\n");
        let Expr::Seq(seq) = expr else {
            panic!("expected seq");
        };
        assert!(matches!(seq.first, Expr::Pass(_)));
        assert!(matches!(seq.then, Expr::Seq(s) if matches!(s.first, Expr::Assert(_))));
    }

    #[test]
    fn when_with_cases_and_else() {
        let arena = Bump::new();
        let expr = body(&arena, "\twhen\n\t\ta\n\t\t\tb\n\t\telse\n\t\t\tc\n\tpass\n");
        let Expr::Seq(seq) = expr else {
            panic!("expected seq");
        };
        let Expr::When(when) = seq.first else {
            panic!("expected when");
        };
        assert_eq!(when.cases.len(), 1);
        assert!(matches!(when.otherwise, Expr::Identifier(i) if i.name == "c"));
    }

    #[test]
    fn dot_calls_prepend_receiver() {
        let arena = Bump::new();
        let expr = body(&arena, "\tp.x.add(1, 2)\n");
        let Expr::Call(call) = expr else {
            panic!("expected call");
        };
        assert_eq!(call.name, "add");
        assert_eq!(call.args.len(), 3);
        assert!(matches!(call.args[0], Expr::Call(inner) if inner.name == "x" && inner.args.len() == 1));
    }

    #[test]
    fn creates_literals_and_annotations() {
        let arena = Bump::new();
        let expr = body(&arena, "\tPoint<Nat>(as<Nat>(5), \"s\")\n");
        let Expr::StructCreate(create) = expr else {
            panic!("expected struct create");
        };
        assert_eq!(create.type_args.len(), 1);
        assert!(matches!(create.args[0], Expr::TypeAnnotate(_)));
        assert!(matches!(create.args[1], Expr::Literal(l) if l.text == "s"));
    }

    #[test]
    fn explicit_type_args_make_a_call() {
        let arena = Bump::new();
        let expr = body(&arena, "\tnone<Nat>\n");
        assert!(matches!(expr, Expr::Call(c) if c.args.is_empty() && c.type_args.len() == 1));
    }

    #[test]
    fn let_must_have_continuation() {
        let arena = Bump::new();
        let err = Parser::parse_file("fun Void f()\n\tx = 1\n", &arena).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::LetWithoutContinuation);
    }
}
