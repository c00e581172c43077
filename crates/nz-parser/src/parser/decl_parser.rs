//! Imports and top-level declarations.

use super::Parser;
use crate::ast::{
    FieldDecl, File, FunBodyAst, FunDecl, Import, Item, ParamAst, SignatureAst, SpecDecl,
    SpecUseAst, StructBodyAst, StructDecl, TypeParamDecl,
};
use crate::error::{ParseErrorKind, ParseResult};
use crate::lexer::{Token, TokenKind};

impl<'ast> Parser<'ast> {
    pub(super) fn parse_items(&mut self) -> ParseResult<File<'ast>> {
        let mut imports = Vec::new();
        while self.check(TokenKind::Import) {
            self.parse_import_line(&mut imports)?;
        }

        let mut items = Vec::new();
        let mut is_public = true;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Private => {
                    self.advance();
                    self.expect(TokenKind::Newline)?;
                    is_public = false;
                }
                TokenKind::Struct => items.push(Item::Struct(self.parse_struct(is_public)?)),
                TokenKind::Spec => items.push(Item::Spec(self.parse_spec(is_public)?)),
                TokenKind::Fun => items.push(Item::Fun(self.parse_fun(is_public)?)),
                TokenKind::Extern => match self.peek_nth(1).kind {
                    TokenKind::Struct => items.push(Item::Struct(self.parse_struct(is_public)?)),
                    TokenKind::Fun => items.push(Item::Fun(self.parse_fun(is_public)?)),
                    _ => {
                        return Err(self.error(
                            ParseErrorKind::ExpectedDeclaration,
                            "'extern' must be followed by 'struct' or 'fun'",
                        ));
                    }
                },
                _ => {
                    return Err(self.error(
                        ParseErrorKind::ExpectedDeclaration,
                        format!("found {}", token.kind),
                    ));
                }
            }
        }

        Ok(File {
            imports: self.alloc_slice(imports),
            items: self.alloc_slice(items),
        })
    }

    /// `import .a, ..b.c, d`
    fn parse_import_line(&mut self, imports: &mut Vec<Import<'ast>>) -> ParseResult<()> {
        self.expect(TokenKind::Import)?;
        loop {
            let start = self.peek().span;
            let mut parents = 0;
            while self.eat(TokenKind::Dot).is_some() {
                parents += 1;
            }
            let mut segments = vec![self.expect_name()?.lexeme];
            while self.eat(TokenKind::Dot).is_some() {
                segments.push(self.expect_name()?.lexeme);
            }
            imports.push(Import {
                parents,
                segments: self.alloc_slice(segments),
                span: start,
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::Newline)?;
        Ok(())
    }

    fn expect_name(&mut self) -> ParseResult<Token<'ast>> {
        match self.peek().kind {
            TokenKind::Ident | TokenKind::TypeName => Ok(self.advance()),
            _ => self.expect(TokenKind::Ident),
        }
    }

    fn parse_struct(&mut self, is_public: bool) -> ParseResult<StructDecl<'ast>> {
        let is_extern = self.eat(TokenKind::Extern).is_some();
        self.expect(TokenKind::Struct)?;
        let name = self.expect(TokenKind::TypeName)?;
        let type_params = self.parse_type_params_opt()?;

        let body = if is_extern {
            let text = self.expect(TokenKind::String)?;
            self.expect(TokenKind::Newline)?;
            StructBodyAst::Passthrough(text.lexeme)
        } else {
            self.expect(TokenKind::Newline)?;
            let mut fields = Vec::new();
            if self.eat(TokenKind::Indent).is_some() {
                while self.eat(TokenKind::Dedent).is_none() {
                    let ty = self.parse_type()?;
                    let field = self.expect(TokenKind::Ident)?;
                    self.expect(TokenKind::Newline)?;
                    fields.push(FieldDecl {
                        ty,
                        name: field.lexeme,
                        span: field.span,
                    });
                }
            }
            StructBodyAst::Fields(self.alloc_slice(fields))
        };

        Ok(StructDecl {
            is_public,
            name: name.lexeme,
            span: name.span,
            type_params,
            body,
        })
    }

    fn parse_spec(&mut self, is_public: bool) -> ParseResult<SpecDecl<'ast>> {
        self.expect(TokenKind::Spec)?;
        let name = self.expect(TokenKind::TypeName)?;
        let type_params = self.parse_type_params_opt()?;
        self.expect(TokenKind::Newline)?;
        self.expect(TokenKind::Indent)?;
        let mut signatures = Vec::new();
        while self.eat(TokenKind::Dedent).is_none() {
            let sig_type_params = self.parse_type_params_opt()?;
            signatures.push(self.parse_signature(sig_type_params)?);
            self.expect(TokenKind::Newline)?;
        }
        Ok(SpecDecl {
            is_public,
            name: name.lexeme,
            span: name.span,
            type_params,
            signatures: self.alloc_slice(signatures),
        })
    }

    fn parse_fun(&mut self, is_public: bool) -> ParseResult<FunDecl<'ast>> {
        let is_extern = self.eat(TokenKind::Extern).is_some();
        self.expect(TokenKind::Fun)?;
        let type_params = self.parse_type_params_opt()?;
        let signature = self.parse_signature(type_params)?;
        self.expect(TokenKind::Newline)?;

        let body = if is_extern {
            self.expect(TokenKind::Indent)?;
            let text = self.expect(TokenKind::String)?;
            self.expect(TokenKind::Newline)?;
            self.expect(TokenKind::Dedent)?;
            FunBodyAst::Passthrough(text.lexeme)
        } else {
            FunBodyAst::Expr(self.parse_block()?)
        };

        Ok(FunDecl {
            is_public,
            signature,
            body,
        })
    }

    /// `Ret name(T a, U b) with Spec<T>` after any type parameters.
    fn parse_signature(
        &mut self,
        type_params: &'ast [TypeParamDecl<'ast>],
    ) -> ParseResult<SignatureAst<'ast>> {
        let return_type = self.parse_type()?;
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let ty = self.parse_type()?;
                let param = self.expect(TokenKind::Ident)?;
                params.push(ParamAst {
                    ty,
                    name: param.lexeme,
                    span: param.span,
                });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let mut specs = Vec::new();
        if self.eat(TokenKind::With).is_some() {
            loop {
                let spec = self.expect(TokenKind::TypeName)?;
                let args = self.parse_type_args_opt()?;
                specs.push(SpecUseAst {
                    name: spec.lexeme,
                    args,
                    span: spec.span,
                });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        Ok(SignatureAst {
            type_params,
            return_type,
            name: name.lexeme,
            span: name.span,
            params: self.alloc_slice(params),
            specs: self.alloc_slice(specs),
        })
    }
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;

    use crate::ast::{Expr, FunBodyAst, Item, StructBodyAst};
    use crate::error::ParseErrorKind;
    use crate::parser::Parser;

    #[test]
    fn parses_imports() {
        let arena = Bump::new();
        let file = Parser::parse_file("import .a, ..b.c, std.d\n", &arena).unwrap();
        assert_eq!(file.imports.len(), 3);
        assert_eq!(file.imports[0].parents, 1);
        assert_eq!(file.imports[1].parents, 2);
        assert_eq!(file.imports[1].segments, &["b", "c"]);
        assert_eq!(file.imports[2].parents, 0);
    }

    #[test]
    fn parses_structs() {
        let arena = Bump::new();
        let source = "struct Point\n\tNat x\n\tNat y\nstruct Void\nextern struct Nat \"uint64_t\"\n";
        let file = Parser::parse_file(source, &arena).unwrap();
        let structs: Vec<_> = file.structs().collect();
        assert_eq!(structs.len(), 3);
        assert!(matches!(structs[0].body, StructBodyAst::Fields(f) if f.len() == 2));
        assert!(matches!(structs[1].body, StructBodyAst::Fields(f) if f.is_empty()));
        assert!(matches!(structs[2].body, StructBodyAst::Passthrough("uint64_t")));
    }

    #[test]
    fn parses_generic_fun_with_specs() {
        let arena = Bump::new();
        let source = "fun<T> String describe(get T x) with Show<T>\n\tshow(x)\n";
        let file = Parser::parse_file(source, &arena).unwrap();
        let Item::Fun(fun) = file.items[0] else {
            panic!("expected a fun");
        };
        assert_eq!(fun.signature.name, "describe");
        assert_eq!(fun.signature.type_params.len(), 1);
        assert_eq!(fun.signature.specs[0].name, "Show");
        assert_eq!(fun.signature.specs[0].args[0].name, "T");
        assert!(matches!(fun.body, FunBodyAst::Expr(Expr::Call(c)) if c.name == "show"));
    }

    #[test]
    fn parses_spec_and_extern_fun() {
        let arena = Bump::new();
        let source = "spec Show<T>\n\tString show(T value)\n\t<U> U pick(T a, U b)\nprivate\nextern fun Nat literal(String s)\n\t\"return 0;\"\n";
        let file = Parser::parse_file(source, &arena).unwrap();
        let spec = file.specs().next().unwrap();
        assert_eq!(spec.signatures.len(), 2);
        assert_eq!(spec.signatures[1].type_params[0].name, "U");
        let fun = file.funs().next().unwrap();
        assert!(!fun.is_public);
        assert!(spec.is_public);
        assert!(matches!(fun.body, FunBodyAst::Passthrough("return 0;")));
    }

    #[test]
    fn rejects_stray_tokens() {
        let arena = Bump::new();
        let err = Parser::parse_file("x\n", &arena).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedDeclaration);
    }
}
