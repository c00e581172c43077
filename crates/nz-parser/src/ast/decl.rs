//! Top-level declarations.

use nz_core::Span;

use super::{Expr, TypeExpr, TypeParamDecl};

/// A parsed document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct File<'ast> {
    pub imports: &'ast [Import<'ast>],
    pub items: &'ast [Item<'ast>],
}

impl<'ast> File<'ast> {
    pub fn structs(&self) -> impl Iterator<Item = &StructDecl<'ast>> {
        self.items.iter().filter_map(|item| match item {
            Item::Struct(s) => Some(s),
            _ => None,
        })
    }

    pub fn specs(&self) -> impl Iterator<Item = &SpecDecl<'ast>> {
        self.items.iter().filter_map(|item| match item {
            Item::Spec(s) => Some(s),
            _ => None,
        })
    }

    pub fn funs(&self) -> impl Iterator<Item = &FunDecl<'ast>> {
        self.items.iter().filter_map(|item| match item {
            Item::Fun(f) => Some(f),
            _ => None,
        })
    }
}

/// `import ..lib.list`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Import<'ast> {
    /// Number of leading dots. Zero means rooted at the compile root.
    pub parents: u32,
    pub segments: &'ast [&'ast str],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'ast> {
    Struct(StructDecl<'ast>),
    Spec(SpecDecl<'ast>),
    Fun(FunDecl<'ast>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructDecl<'ast> {
    pub is_public: bool,
    pub name: &'ast str,
    pub span: Span,
    pub type_params: &'ast [TypeParamDecl<'ast>],
    pub body: StructBodyAst<'ast>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StructBodyAst<'ast> {
    Fields(&'ast [FieldDecl<'ast>]),
    /// `extern struct Name "text"`
    Passthrough(&'ast str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    pub ty: TypeExpr<'ast>,
    pub name: &'ast str,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecDecl<'ast> {
    pub is_public: bool,
    pub name: &'ast str,
    pub span: Span,
    pub type_params: &'ast [TypeParamDecl<'ast>],
    pub signatures: &'ast [SignatureAst<'ast>],
}

/// `Show<T>` in a `with` clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecUseAst<'ast> {
    pub name: &'ast str,
    pub args: &'ast [TypeExpr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamAst<'ast> {
    pub ty: TypeExpr<'ast>,
    pub name: &'ast str,
    pub span: Span,
}

/// `<T> Ret name(T a, Nat b) with Spec<T>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignatureAst<'ast> {
    pub type_params: &'ast [TypeParamDecl<'ast>],
    pub return_type: TypeExpr<'ast>,
    pub name: &'ast str,
    pub span: Span,
    pub params: &'ast [ParamAst<'ast>],
    pub specs: &'ast [SpecUseAst<'ast>],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunDecl<'ast> {
    pub is_public: bool,
    pub signature: SignatureAst<'ast>,
    pub body: FunBodyAst<'ast>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FunBodyAst<'ast> {
    Expr(&'ast Expr<'ast>),
    /// Opaque source emitted verbatim by the code generator.
    Passthrough(&'ast str),
}
