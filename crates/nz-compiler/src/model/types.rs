//! The `Type` sum type.

use nz_core::Effect;

use super::{StructId, TypeParamId};

/// A type as the checker sees it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Stands in for a type that already produced a diagnostic.
    /// Matches anything.
    Bogus,
    Param(TypeParamId),
    Struct(InstStruct),
}

/// A struct applied to type arguments.
///
/// Invariant: `type_arguments.len()` equals the struct's type parameter count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstStruct {
    pub strukt: StructId,
    pub type_arguments: Vec<Type>,
    pub effect: Effect,
}

impl Type {
    /// A non-generic struct type with the given effect.
    pub fn plain(strukt: StructId, effect: Effect) -> Type {
        Type::Struct(InstStruct {
            strukt,
            type_arguments: Vec::new(),
            effect,
        })
    }

    pub fn is_bogus(&self) -> bool {
        matches!(self, Type::Bogus)
    }

    pub fn as_struct(&self) -> Option<&InstStruct> {
        match self {
            Type::Struct(inst) => Some(inst),
            _ => None,
        }
    }

    /// Whether no type parameter occurs anywhere inside.
    pub fn is_concrete(&self) -> bool {
        match self {
            Type::Bogus => true,
            Type::Param(_) => false,
            Type::Struct(inst) => inst.type_arguments.iter().all(Type::is_concrete),
        }
    }

    /// The same type with the weakest effect at the top level, for use as an
    /// expectation that any effect satisfies.
    pub fn weakest(&self) -> Type {
        match self {
            Type::Struct(inst) => Type::Struct(InstStruct {
                effect: Effect::WEAKEST,
                ..inst.clone()
            }),
            other => other.clone(),
        }
    }

    /// Replace type parameters for which `lookup` returns a type.
    ///
    /// Substitution is a single pass: replacement types are not visited again.
    pub fn substitute(&self, lookup: &impl Fn(TypeParamId) -> Option<Type>) -> Type {
        match self {
            Type::Bogus => Type::Bogus,
            Type::Param(param) => lookup(*param).unwrap_or(Type::Param(*param)),
            Type::Struct(inst) => Type::Struct(InstStruct {
                strukt: inst.strukt,
                type_arguments: inst
                    .type_arguments
                    .iter()
                    .map(|arg| arg.substitute(lookup))
                    .collect(),
                effect: inst.effect,
            }),
        }
    }

    /// Like [`substitute`](Self::substitute) but fails if `lookup` misses
    /// any parameter.
    pub fn try_substitute(&self, lookup: &impl Fn(TypeParamId) -> Option<Type>) -> Option<Type> {
        match self {
            Type::Bogus => Some(Type::Bogus),
            Type::Param(param) => lookup(*param),
            Type::Struct(inst) => {
                let type_arguments = inst
                    .type_arguments
                    .iter()
                    .map(|arg| arg.try_substitute(lookup))
                    .collect::<Option<Vec<_>>>()?;
                Some(Type::Struct(InstStruct {
                    strukt: inst.strukt,
                    type_arguments,
                    effect: inst.effect,
                }))
            }
        }
    }
}
