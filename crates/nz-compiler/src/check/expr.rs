//! Expression checking.
//!
//! Each `check_*` method takes the untyped node and an [`Expected`] and
//! returns a [`Typed`]. Failures are reported once and yield a bogus result
//! that matches anything further up.

use nz_core::{Diag, Effect, Identifier, Span};
use nz_parser::ast::{
    AssertExpr, Expr, IdentExpr, LetExpr, LiteralExpr, NoCallLiteralExpr, SeqExpr,
    StructCreateExpr, TypeAnnotateExpr, TypeExpr, WhenExpr,
};
use rustc_hash::FxHashSet;

use super::bodies::convert_type;
use super::expected::{Expected, Typed};
use super::scope::{DiagSink, Found, ModuleView};
use crate::matching::{Inferring, Position, does_type_match_no_infer, try_match_types};
use crate::model::{
    BuiltinTypes, CallSiteId, Case, Declarations, Expression, FunSignature, GenericOwner,
    InstStruct, Let, LocalId, Type, When,
};

/// A local introduced by a `Let`, visible in its continuation.
#[derive(Debug, Clone)]
struct LocalBinding {
    id: LocalId,
    name: Identifier,
    ty: Type,
}

/// Checks the body of one function.
pub(crate) struct ExprChecker<'a, 's> {
    pub(super) view: &'a ModuleView<'a>,
    pub(super) builtins: &'a BuiltinTypes,
    /// Signature of the function whose body is being checked.
    pub(super) signature: &'a FunSignature,
    pub(super) field_names: &'a FxHashSet<Identifier>,
    locals: Vec<LocalBinding>,
    next_local: u32,
    next_call_site: u32,
    pub(super) sink: DiagSink<'s>,
}

impl<'a, 's> ExprChecker<'a, 's> {
    pub fn new(
        view: &'a ModuleView<'a>,
        builtins: &'a BuiltinTypes,
        signature: &'a FunSignature,
        field_names: &'a FxHashSet<Identifier>,
        sink: DiagSink<'s>,
    ) -> Self {
        Self {
            view,
            builtins,
            signature,
            field_names,
            locals: Vec::new(),
            next_local: 0,
            next_call_site: 0,
            sink,
        }
    }

    pub fn check(&mut self, ast: &Expr<'_>, expected: Expected) -> Typed {
        match ast {
            Expr::Identifier(ident) => self.check_identifier(ident, expected),
            Expr::Literal(literal) => self.check_literal(literal, expected),
            Expr::NoCallLiteral(literal) => self.check_no_call_literal(literal, expected),
            Expr::Call(call) => {
                self.check_call(call.name, call.args, call.type_args, call.span, expected)
            }
            Expr::StructCreate(create) => self.check_struct_create(create, expected),
            Expr::TypeAnnotate(annotate) => self.check_type_annotate(annotate, expected),
            Expr::Let(let_expr) => self.check_let(let_expr, expected),
            Expr::Seq(seq) => self.check_seq(seq, expected),
            Expr::When(when) => self.check_when(when, expected),
            Expr::Assert(assert) => self.check_assert(assert, expected),
            Expr::Pass(span) => self.check_pass(*span, expected),
        }
    }

    pub(super) fn report(&mut self, span: Span, diag: Diag) {
        self.sink.report(span, diag);
    }

    pub(super) fn describe(&self, ty: &Type) -> String {
        self.view.describe_type(ty)
    }

    /// Accept `actual` if it satisfies the expectation, else report a mismatch.
    pub(super) fn confirm(
        &mut self,
        expected: &Expected,
        expr: Expression,
        actual: Type,
        span: Span,
    ) -> Typed {
        match expected {
            Expected::Check(ty) if !does_type_match_no_infer(ty, &actual) => {
                let diag = Diag::TypeMismatch {
                    expected: self.describe(ty),
                    actual: self.describe(&actual),
                };
                self.report(span, diag);
                Typed::bogus()
            }
            _ => Typed::new(expr, actual),
        }
    }

    /// Resolve a type written inside the body, with the function's type
    /// parameters in scope.
    pub(super) fn convert_type(&mut self, ast: &TypeExpr<'_>) -> Type {
        let view = self.view;
        let scopes = [self.signature.type_parameters.as_slice()];
        convert_type(view, ast, &scopes, &mut self.sink)
    }

    pub(super) fn next_call_site(&mut self) -> CallSiteId {
        let site = CallSiteId(self.next_call_site);
        self.next_call_site += 1;
        site
    }

    /// Whether a spec required by the current function has a signature `name`.
    pub(super) fn spec_signature_named(&self, name: &str) -> bool {
        self.signature.specs.iter().any(|spec_use| {
            self.view
                .spec_decl(spec_use.spec)
                .signatures
                .iter()
                .any(|sig| sig.name == name)
        })
    }

    fn check_identifier(&mut self, ident: &IdentExpr<'_>, expected: Expected) -> Typed {
        let signature = self.signature;
        if let Some((index, param)) = signature
            .parameters
            .iter()
            .enumerate()
            .find(|(_, p)| p.name == ident.name)
        {
            let expr = Expression::ParameterReference {
                index,
                ty: param.ty.clone(),
            };
            return self.confirm(&expected, expr, param.ty.clone(), ident.span);
        }

        if let Some(local) = self.locals.iter().rev().find(|l| l.name == ident.name) {
            let (ty, expr) = (
                local.ty.clone(),
                Expression::LocalReference {
                    local: local.id,
                    name: local.name.clone(),
                    ty: local.ty.clone(),
                },
            );
            return self.confirm(&expected, expr, ty, ident.span);
        }

        if self.view.names.has_fun_named(ident.name) || self.spec_signature_named(ident.name) {
            return self.check_call(ident.name, &[], &[], ident.span, expected);
        }

        self.report(
            ident.span,
            Diag::UnrecognizedParameterOrLocal {
                name: ident.name.to_string(),
            },
        );
        Typed::bogus()
    }

    fn check_literal(&mut self, literal: &LiteralExpr<'_>, expected: Expected) -> Typed {
        let Some(string) = self.builtins.string.clone() else {
            self.report(literal.span, Diag::MissingStringType);
            return Typed::bogus();
        };

        let wants_string = match &expected {
            Expected::Infer => true,
            Expected::Check(ty) => same_struct(ty, &string),
        };
        if literal.args.is_empty() && literal.type_args.is_empty() && wants_string {
            let expr = Expression::StringLiteral(literal.text.to_string());
            return self.confirm(&expected, expr, string, literal.span);
        }

        // `5` where a Nat is expected means `literal("5")`.
        let mut args = Vec::with_capacity(literal.args.len() + 1);
        args.push(Expr::NoCallLiteral(NoCallLiteralExpr {
            text: literal.text,
            span: literal.span,
        }));
        args.extend_from_slice(literal.args);
        self.check_call("literal", &args, literal.type_args, literal.span, expected)
    }

    fn check_no_call_literal(&mut self, literal: &NoCallLiteralExpr<'_>, expected: Expected) -> Typed {
        let Some(string) = self.builtins.string.clone() else {
            self.report(literal.span, Diag::MissingStringType);
            return Typed::bogus();
        };
        let expr = Expression::StringLiteral(literal.text.to_string());
        self.confirm(&expected, expr, string, literal.span)
    }

    fn check_struct_create(&mut self, create: &StructCreateExpr<'_>, expected: Expected) -> Typed {
        let id = match self.view.names.find_struct(create.name) {
            Found::One(id) => id,
            Found::Missing => {
                self.report(
                    create.span,
                    Diag::StructNameNotFound {
                        name: create.name.to_string(),
                    },
                );
                return Typed::bogus();
            }
            Found::Ambiguous => {
                self.report(
                    create.span,
                    Diag::AmbiguousName {
                        name: create.name.to_string(),
                    },
                );
                return Typed::bogus();
            }
        };

        let view = self.view;
        let decl = view.struct_decl(id);
        let Some(fields) = decl.fields() else {
            self.report(
                create.span,
                Diag::CantCreateNonStruct {
                    name: decl.name.clone(),
                },
            );
            return Typed::bogus();
        };
        if create.args.len() != fields.len() {
            self.report(
                create.span,
                Diag::WrongNumberNewStructArguments {
                    expected: fields.len(),
                    actual: create.args.len(),
                },
            );
            return Typed::bogus();
        }

        let mut inferring = Inferring::new(GenericOwner::Struct(id), decl.type_parameters.len());
        if !create.type_args.is_empty() {
            if create.type_args.len() != decl.type_parameters.len() {
                self.report(
                    create.span,
                    Diag::WrongNumberTypeArguments {
                        expected: decl.type_parameters.len(),
                        actual: create.type_args.len(),
                    },
                );
                return Typed::bogus();
            }
            let explicit: Vec<Type> = create
                .type_args
                .iter()
                .map(|arg| self.convert_type(arg))
                .collect();
            inferring.seed(&explicit);
        } else if let Some(Type::Struct(inst)) = expected.as_type() {
            if inst.strukt == id {
                inferring.seed(&inst.type_arguments);
            }
        }

        let mut arguments = Vec::with_capacity(fields.len());
        for (field, arg) in fields.iter().zip(create.args) {
            let field_expected = inferring
                .resolve(&field.ty)
                .map_or(Expected::Infer, Expected::Check);
            let typed = self.check(arg, field_expected);
            if try_match_types(&field.ty, &typed.ty, Position::Parameter, &mut inferring) {
                arguments.push(typed.expr);
            } else {
                let diag = Diag::TypeMismatch {
                    expected: self.describe(&field.ty),
                    actual: self.describe(&typed.ty),
                };
                self.report(arg.span(), diag);
                arguments.push(Expression::Bogus);
            }
        }

        let Some(type_arguments) = inferring.arguments() else {
            self.report(
                create.span,
                Diag::CantInferTypeArguments {
                    name: decl.name.clone(),
                },
            );
            return Typed::bogus();
        };
        let ty = Type::Struct(InstStruct {
            strukt: id,
            type_arguments,
            effect: Effect::Io,
        });
        let expr = Expression::StructCreate {
            ty: ty.clone(),
            arguments,
        };
        self.confirm(&expected, expr, ty, create.span)
    }

    fn check_type_annotate(&mut self, annotate: &TypeAnnotateExpr<'_>, expected: Expected) -> Typed {
        if expected.is_check() {
            self.report(annotate.ty.span, Diag::UnnecessaryTypeAnnotate);
            return Typed::bogus();
        }
        let ty = self.convert_type(&annotate.ty);
        self.check(annotate.expr, Expected::Check(ty))
    }

    fn check_let(&mut self, let_expr: &LetExpr<'_>, expected: Expected) -> Typed {
        let name = let_expr.name;
        if self.view.names.has_fun_named(name) {
            self.report(let_expr.span, Diag::LocalShadowsFun { name: name.to_string() });
        } else if self.spec_signature_named(name) {
            self.report(let_expr.span, Diag::LocalShadowsSpecSig { name: name.to_string() });
        }
        if self.signature.parameters.iter().any(|p| p.name == name) {
            self.report(
                let_expr.span,
                Diag::LocalShadowsParameter { name: name.to_string() },
            );
        }
        if self.locals.iter().any(|l| l.name == name) {
            self.report(let_expr.span, Diag::LocalShadowsLocal { name: name.to_string() });
        }

        let init = self.check(let_expr.init, Expected::Infer);
        let local = LocalId(self.next_local);
        self.next_local += 1;

        self.locals.push(LocalBinding {
            id: local,
            name: name.to_string(),
            ty: init.ty.clone(),
        });
        let then = self.check(let_expr.then, expected);
        self.locals.pop();

        let ty = then.ty;
        let expr = Expression::Let(Let {
            local,
            name: name.to_string(),
            ty: init.ty,
            init: Box::new(init.expr),
            then: Box::new(then.expr),
        });
        Typed::new(expr, ty)
    }

    fn check_seq(&mut self, seq: &SeqExpr<'_>, expected: Expected) -> Typed {
        let Some(void) = self.builtins.void.as_ref().map(Type::weakest) else {
            self.report(seq.span, Diag::MissingVoidType);
            return Typed::bogus();
        };
        let first = self.check(seq.first, Expected::Check(void));
        let then = self.check(seq.then, expected);
        let expr = Expression::Seq {
            first: Box::new(first.expr),
            then: Box::new(then.expr),
        };
        Typed::new(expr, then.ty)
    }

    fn check_when(&mut self, when: &WhenExpr<'_>, expected: Expected) -> Typed {
        let Some(condition) = self.builtins.bool.as_ref().map(Type::weakest) else {
            self.report(when.span, Diag::MissingBoolType);
            return Typed::bogus();
        };

        let mut expected = expected;
        let mut cases = Vec::with_capacity(when.cases.len());
        for case in when.cases {
            let cond = self.check(case.cond, Expected::Check(condition.clone())).expr;
            let then = self.check_branch(case.then, &mut expected);
            cases.push(Case { cond, then });
        }
        let otherwise = self.check_branch(when.otherwise, &mut expected);

        let ty = expected.as_type().cloned().unwrap_or(Type::Bogus);
        let expr = Expression::When(When {
            cases,
            otherwise: Box::new(otherwise),
            ty: ty.clone(),
        });
        Typed::new(expr, ty)
    }

    /// Without an outside demand the first real branch type becomes the
    /// demand for the others.
    fn check_branch(&mut self, ast: &Expr<'_>, expected: &mut Expected) -> Expression {
        let typed = self.check(ast, expected.clone());
        if matches!(expected, Expected::Infer) && !typed.ty.is_bogus() {
            *expected = Expected::Check(typed.ty.clone());
        }
        typed.expr
    }

    fn check_assert(&mut self, assert: &AssertExpr<'_>, expected: Expected) -> Typed {
        let Some(void) = self.builtins.void.clone() else {
            self.report(assert.span, Diag::MissingVoidType);
            return Typed::bogus();
        };
        let Some(condition) = self.builtins.bool.as_ref().map(Type::weakest) else {
            self.report(assert.span, Diag::MissingBoolType);
            return Typed::bogus();
        };
        let asserted = self.check(assert.asserted, Expected::Check(condition));
        self.confirm(
            &expected,
            Expression::Assert(Box::new(asserted.expr)),
            void,
            assert.span,
        )
    }

    fn check_pass(&mut self, span: Span, expected: Expected) -> Typed {
        let Some(void) = self.builtins.void.clone() else {
            self.report(span, Diag::MissingVoidType);
            return Typed::bogus();
        };
        self.confirm(&expected, Expression::Pass, void, span)
    }
}

fn same_struct(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Struct(a), Type::Struct(b)) => a.strukt == b.strukt,
        _ => false,
    }
}
