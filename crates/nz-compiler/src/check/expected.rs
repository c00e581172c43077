//! Expectations passed down and typed results passed back up.

use crate::model::{Expression, Type};

/// What the context demands of an expression's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// No demand; the checker reports whatever type it finds.
    Infer,
    /// The result must satisfy this type.
    Check(Type),
}

impl Expected {
    pub fn as_type(&self) -> Option<&Type> {
        match self {
            Expected::Infer => None,
            Expected::Check(ty) => Some(ty),
        }
    }

    pub fn is_check(&self) -> bool {
        matches!(self, Expected::Check(_))
    }
}

/// A checked expression together with its type.
///
/// `ty` always equals `type_of_expr(&expr)`, and satisfies the
/// [`Expected`] the expression was checked against.
#[derive(Debug, Clone, PartialEq)]
pub struct Typed {
    pub expr: Expression,
    pub ty: Type,
}

impl Typed {
    pub fn new(expr: Expression, ty: Type) -> Self {
        Self { expr, ty }
    }

    pub fn bogus() -> Self {
        Self {
            expr: Expression::Bogus,
            ty: Type::Bogus,
        }
    }
}
