//! Diagnostics produced while parsing and checking nz modules.
//!
//! The checker never returns semantic problems as `Err`. It appends a
//! [`Diagnostic`] to a [`Diagnostics`] collector and substitutes a bogus
//! value so that checking can continue.

use std::fmt;

use thiserror::Error;

use crate::{ModulePath, Span};

/// One kind of problem, with the data needed to explain it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diag {
    // =========================================
    // Parsing and loading
    // =========================================
    #[error("{0}")]
    Parse(String),

    #[error("could not find module '{path}'")]
    ImportNotFound { path: String },

    #[error("module '{path}' is part of an import cycle")]
    CircularImport { path: String },

    // =========================================
    // Declarations
    // =========================================
    #[error("could not find a struct named '{name}'")]
    StructNameNotFound { name: String },

    #[error("could not find a spec named '{name}'")]
    SpecNameNotFound { name: String },

    #[error("duplicate declaration of '{name}'")]
    DuplicateDeclaration { name: String },

    #[error("'{name}' is declared by more than one imported module")]
    AmbiguousName { name: String },

    #[error("special type '{name}' should not have type parameters")]
    SpecialTypeShouldNotHaveTypeParameters { name: String },

    #[error("wrong number of type arguments: expected {expected}, got {actual}")]
    WrongNumberTypeArguments { expected: usize, actual: usize },

    #[error("type parameter '{name}' shadows one on the spec")]
    TypeParameterShadowsSpecTypeParameter { name: String },

    #[error("type parameter '{name}' shadows a previous type parameter")]
    TypeParameterShadowsPrevious { name: String },

    #[error("type parameter '{name}' shadows a struct")]
    TypeParameterShadowsStruct { name: String },

    #[error("duplicate parameter '{name}'")]
    DuplicateParameter { name: String },

    // =========================================
    // Expressions
    // =========================================
    #[error("could not find a parameter or local variable named '{name}'")]
    UnrecognizedParameterOrLocal { name: String },

    #[error("can't create non-struct '{name}'")]
    CantCreateNonStruct { name: String },

    #[error("wrong number of arguments to create struct: expected {expected}, got {actual}")]
    WrongNumberNewStructArguments { expected: usize, actual: usize },

    #[error("unnecessary type annotation: the type is already known")]
    UnnecessaryTypeAnnotate,

    #[error("local '{name}' shadows a function")]
    LocalShadowsFun { name: String },

    #[error("local '{name}' shadows a spec signature")]
    LocalShadowsSpecSig { name: String },

    #[error("local '{name}' shadows a parameter")]
    LocalShadowsParameter { name: String },

    #[error("local '{name}' shadows a local")]
    LocalShadowsLocal { name: String },

    #[error("must have a 'Void' type to use a sequence, 'assert' or 'pass'")]
    MissingVoidType,

    #[error("must have a 'Bool' type to use a 'when' or 'assert' expression")]
    MissingBoolType,

    #[error("must have a 'String' type to use a literal")]
    MissingStringType,

    #[error("expected type '{expected}', got '{actual}'")]
    TypeMismatch { expected: String, actual: String },

    // =========================================
    // Calls
    // =========================================
    #[error("no overload of '{name}' takes {arity} argument(s)")]
    NoOverloadWithArity { name: String, arity: usize },

    #[error("no overload of '{name}' returns '{expected}'")]
    NoOverloadReturnsExpected { name: String, expected: String },

    #[error("no overload of '{name}' accepts '{actual}' as argument {index}")]
    NoOverloadMatchesArgument {
        name: String,
        index: usize,
        actual: String,
    },

    #[error("call to '{name}' is ambiguous between {count} candidates")]
    AmbiguousCall { name: String, count: usize },

    #[error("could not infer all type arguments of '{name}'")]
    CantInferTypeArguments { name: String },

    #[error("no implementation of '{signature}' for spec '{spec}'")]
    SpecImplNotFound { spec: String, signature: String },

    #[error("more than one implementation of '{signature}' for spec '{spec}'")]
    SpecImplAmbiguous { spec: String, signature: String },

    #[error("unsupported feature: {feature}")]
    UnsupportedFeature { feature: String },
}

/// A [`Diag`] located in a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub module: ModulePath,
    pub span: Span,
    pub diag: Diag,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.module, self.span, self.diag)
    }
}

/// Append-only collector for diagnostics.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, module: &ModulePath, span: Span, diag: Diag) {
        self.items.push(Diagnostic {
            module: module.clone(),
            span,
            diag,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Whether any recorded diagnostic satisfies `pred`.
    pub fn any(&self, pred: impl Fn(&Diag) -> bool) -> bool {
        self.items.iter().any(|d| pred(&d.diag))
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}
