//! Expression nodes.
//!
//! Blocks are continuation-passing: a `Let` or `Seq` holds the rest of its
//! block in `then`, so a function body is a single expression.

use nz_core::Span;

use super::TypeExpr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    Identifier(IdentExpr<'ast>),
    Literal(LiteralExpr<'ast>),
    /// A bare literal passed as the first argument of a `literal` call.
    /// Only the checker creates these.
    NoCallLiteral(NoCallLiteralExpr<'ast>),
    Call(CallExpr<'ast>),
    StructCreate(StructCreateExpr<'ast>),
    TypeAnnotate(TypeAnnotateExpr<'ast>),
    Let(LetExpr<'ast>),
    Seq(SeqExpr<'ast>),
    When(WhenExpr<'ast>),
    Assert(AssertExpr<'ast>),
    Pass(Span),
}

impl<'ast> Expr<'ast> {
    pub fn span(&self) -> Span {
        match self {
            Expr::Identifier(e) => e.span,
            Expr::Literal(e) => e.span,
            Expr::NoCallLiteral(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::StructCreate(e) => e.span,
            Expr::TypeAnnotate(e) => e.span,
            Expr::Let(e) => e.span,
            Expr::Seq(e) => e.span,
            Expr::When(e) => e.span,
            Expr::Assert(e) => e.span,
            Expr::Pass(span) => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdentExpr<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

/// `5`, `"text"`, or `5<Big>(arena)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub text: &'ast str,
    pub type_args: &'ast [TypeExpr<'ast>],
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoCallLiteralExpr<'ast> {
    pub text: &'ast str,
    pub span: Span,
}

/// `f(a, b)`, `f<T>(a)`, `a.f`, `a.f(b)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub name: &'ast str,
    pub type_args: &'ast [TypeExpr<'ast>],
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `Point(1, 2)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructCreateExpr<'ast> {
    pub name: &'ast str,
    pub type_args: &'ast [TypeExpr<'ast>],
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

/// `as<Nat>(expr)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeAnnotateExpr<'ast> {
    pub ty: TypeExpr<'ast>,
    pub expr: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetExpr<'ast> {
    pub name: &'ast str,
    pub init: &'ast Expr<'ast>,
    pub then: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeqExpr<'ast> {
    pub first: &'ast Expr<'ast>,
    pub then: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseAst<'ast> {
    pub cond: &'ast Expr<'ast>,
    pub then: &'ast Expr<'ast>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhenExpr<'ast> {
    pub cases: &'ast [CaseAst<'ast>],
    pub otherwise: &'ast Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssertExpr<'ast> {
    pub asserted: &'ast Expr<'ast>,
    pub span: Span,
}
