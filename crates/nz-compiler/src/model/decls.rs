//! Structs, specs, signatures and functions.
//!
//! These are immutable once the module that declares them has been checked.

use nz_core::{Identifier, Span};

use super::{Expression, FunId, GenericOwner, SpecId, StructId, Type, TypeParamId};

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParameter {
    pub name: Identifier,
    pub span: Span,
    pub id: TypeParamId,
}

/// Build the type parameter list for `owner` from names, in order.
pub fn type_parameters_for(
    owner: GenericOwner,
    names: impl IntoIterator<Item = (Identifier, Span)>,
) -> Vec<TypeParameter> {
    names
        .into_iter()
        .enumerate()
        .map(|(index, (name, span))| TypeParameter {
            name,
            span,
            id: TypeParamId {
                owner,
                index: index as u32,
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: Identifier,
    pub span: Span,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StructBody {
    Fields(Vec<StructField>),
    /// Defined outside nz; the text is emitted verbatim.
    Passthrough(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDeclaration {
    pub id: StructId,
    pub name: Identifier,
    pub span: Span,
    pub is_public: bool,
    pub type_parameters: Vec<TypeParameter>,
    pub body: StructBody,
}

impl StructDeclaration {
    pub fn fields(&self) -> Option<&[StructField]> {
        match &self.body {
            StructBody::Fields(fields) => Some(fields),
            StructBody::Passthrough(_) => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<(usize, &StructField)> {
        self.fields()?
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Identifier,
    pub span: Span,
    pub ty: Type,
}

/// A spec bound to type arguments inside one signature's `with` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecUse {
    pub spec: SpecId,
    pub type_arguments: Vec<Type>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunSignature {
    /// [`GenericOwner::Fun`] or [`GenericOwner::SpecSignature`].
    pub owner: GenericOwner,
    pub name: Identifier,
    pub span: Span,
    pub type_parameters: Vec<TypeParameter>,
    pub return_type: Type,
    pub parameters: Vec<Parameter>,
    pub specs: Vec<SpecUse>,
}

impl FunSignature {
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty() || !self.specs.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecDeclaration {
    pub id: SpecId,
    pub name: Identifier,
    pub span: Span,
    pub is_public: bool,
    pub type_parameters: Vec<TypeParameter>,
    pub signatures: Vec<FunSignature>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunBody {
    Expression(Expression),
    /// Opaque source, never analyzed.
    Passthrough(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunDeclaration {
    pub id: FunId,
    pub is_public: bool,
    pub signature: FunSignature,
    pub body: FunBody,
}

impl FunDeclaration {
    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn expression(&self) -> Option<&Expression> {
        match &self.body {
            FunBody::Expression(expr) => Some(expr),
            FunBody::Passthrough(_) => None,
        }
    }
}
