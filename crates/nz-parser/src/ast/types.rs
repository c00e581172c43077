//! Type expressions as written in source.

use nz_core::{Effect, Span};

/// A type reference like `get List<Nat>` or `T`.
///
/// Whether `name` refers to a struct or a type parameter is decided by the
/// checker, which knows the type parameters in scope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeExpr<'ast> {
    /// Explicit effect keyword, if any.
    pub effect: Option<Effect>,
    pub name: &'ast str,
    pub args: &'ast [TypeExpr<'ast>],
    pub span: Span,
}

/// A type parameter declaration, `T` in `fun<T>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeParamDecl<'ast> {
    pub name: &'ast str,
    pub span: Span,
}
