//! The checked expression tree.
//!
//! Every node has exactly one result type, computed by [`type_of_expr`].
//! The checker builds nodes so that this type is the one it threaded
//! through checking; it is never re-verified afterwards.

use nz_core::Identifier;

use super::{BuiltinTypes, CallSiteId, FunId, LocalId, StructId, Type};

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A diagnostic already explains this slot.
    Bogus,
    ParameterReference {
        index: usize,
        ty: Type,
    },
    LocalReference {
        local: LocalId,
        name: Identifier,
        ty: Type,
    },
    StructFieldAccess {
        target: Box<Expression>,
        strukt: StructId,
        field_index: usize,
        ty: Type,
    },
    Let(Let),
    Seq {
        first: Box<Expression>,
        then: Box<Expression>,
    },
    Call(Call),
    StructCreate {
        ty: Type,
        arguments: Vec<Expression>,
    },
    StringLiteral(String),
    When(When),
    Assert(Box<Expression>),
    Pass,
}

/// Binds one local for the duration of `then`.
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub local: LocalId,
    pub name: Identifier,
    pub ty: Type,
    pub init: Box<Expression>,
    pub then: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub site: CallSiteId,
    pub called: Called,
    pub arguments: Vec<Expression>,
    pub return_type: Type,
}

/// The resolved target of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct Called {
    pub declaration: CalledDeclaration,
    /// One per type parameter of the called signature, in the caller's terms.
    pub type_arguments: Vec<Type>,
    /// For a function with spec requirements: the implementation chosen for
    /// each signature of each required spec, `[spec][signature]`.
    pub spec_impls: Vec<Vec<CalledDeclaration>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalledDeclaration {
    Fun(FunId),
    /// Whatever implements signature `signature` of the calling function's
    /// `spec_use`th spec requirement.
    Spec { spec_use: usize, signature: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub cond: Expression,
    pub then: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct When {
    pub cases: Vec<Case>,
    pub otherwise: Box<Expression>,
    pub ty: Type,
}

/// The result type of a checked expression.
pub fn type_of_expr(expr: &Expression, builtins: &BuiltinTypes) -> Type {
    match expr {
        Expression::Bogus => Type::Bogus,
        Expression::ParameterReference { ty, .. }
        | Expression::LocalReference { ty, .. }
        | Expression::StructFieldAccess { ty, .. }
        | Expression::StructCreate { ty, .. } => ty.clone(),
        Expression::Let(let_expr) => type_of_expr(&let_expr.then, builtins),
        Expression::Seq { then, .. } => type_of_expr(then, builtins),
        Expression::Call(call) => call.return_type.clone(),
        Expression::StringLiteral(_) => builtins.string.clone().unwrap_or(Type::Bogus),
        Expression::When(when) => when.ty.clone(),
        Expression::Assert(_) | Expression::Pass => builtins.void.clone().unwrap_or(Type::Bogus),
    }
}

/// Visit every call in `expr`, outermost first and left to right.
pub fn each_call<'e>(expr: &'e Expression, visit: &mut impl FnMut(&'e Call)) {
    match expr {
        Expression::Bogus
        | Expression::ParameterReference { .. }
        | Expression::LocalReference { .. }
        | Expression::StringLiteral(_)
        | Expression::Pass => {}
        Expression::StructFieldAccess { target, .. } => each_call(target, visit),
        Expression::Let(let_expr) => {
            each_call(&let_expr.init, visit);
            each_call(&let_expr.then, visit);
        }
        Expression::Seq { first, then } => {
            each_call(first, visit);
            each_call(then, visit);
        }
        Expression::Call(call) => {
            visit(call);
            for argument in &call.arguments {
                each_call(argument, visit);
            }
        }
        Expression::StructCreate { arguments, .. } => {
            for argument in arguments {
                each_call(argument, visit);
            }
        }
        Expression::When(when) => {
            for case in &when.cases {
                each_call(&case.cond, visit);
                each_call(&case.then, visit);
            }
            each_call(&when.otherwise, visit);
        }
        Expression::Assert(asserted) => each_call(asserted, visit),
    }
}
