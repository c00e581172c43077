//! Whole-program monomorphization.
//!
//! Starting from every non-generic function, follow calls and record each
//! distinct instantiation of a function once. A call inside a generic body
//! is resolved in the context of each instantiation of that body, so the
//! same call site can lead to different targets.

mod error;

pub use error::MonomorphizeError;

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::model::{
    Call, CalledDeclaration, CallSiteId, FunId, GenericOwner, Program, Type, each_call,
};

/// Names one [`ConcreteFun`]: its declaration and its position among that
/// declaration's instantiations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConcreteFunId {
    pub fun: FunId,
    pub index: usize,
}

/// What a spec requirement is bound to inside one instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecImpl {
    /// A non-generic function, already instantiated.
    Concrete(ConcreteFunId),
    /// A generic function implementing a generic spec signature. It is
    /// instantiated with the type arguments of each call through the spec.
    Generic(FunId),
}

/// A function with every type parameter bound to a concrete type.
///
/// Equality and hashing only look at the declaration and the type
/// arguments.
#[derive(Debug, Clone)]
pub struct ConcreteFun {
    pub fun: FunId,
    pub type_arguments: Vec<Type>,
    /// Indexed `[spec use][signature]`, like `Called::spec_impls`.
    pub spec_impls: Vec<Vec<SpecImpl>>,
}

impl PartialEq for ConcreteFun {
    fn eq(&self, other: &Self) -> bool {
        self.fun == other.fun && self.type_arguments == other.type_arguments
    }
}

impl Eq for ConcreteFun {}

impl Hash for ConcreteFun {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fun.hash(state);
        self.type_arguments.hash(state);
    }
}

/// Result of [`monomorphize`].
#[derive(Debug, Clone, Default)]
pub struct EveryConcreteFun {
    /// Instantiations per declaration, in discovery order.
    pub fun_instantiations: IndexMap<FunId, IndexSet<ConcreteFun, FxBuildHasher>, FxBuildHasher>,
    /// The instantiation each call site leads to, per calling instantiation.
    pub resolved_calls: FxHashMap<(ConcreteFunId, CallSiteId), ConcreteFunId>,
}

impl EveryConcreteFun {
    pub fn get(&self, id: ConcreteFunId) -> Option<&ConcreteFun> {
        self.fun_instantiations.get(&id.fun)?.get_index(id.index)
    }

    pub fn instantiations_of(&self, fun: FunId) -> impl Iterator<Item = (ConcreteFunId, &ConcreteFun)> {
        self.fun_instantiations
            .get(&fun)
            .into_iter()
            .flat_map(move |set| {
                set.iter()
                    .enumerate()
                    .map(move |(index, concrete)| (ConcreteFunId { fun, index }, concrete))
            })
    }

    pub fn resolved_call(&self, caller: ConcreteFunId, site: CallSiteId) -> Option<ConcreteFunId> {
        self.resolved_calls.get(&(caller, site)).copied()
    }

    /// Total number of instantiations.
    pub fn len(&self) -> usize {
        self.fun_instantiations.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute every instantiation reachable from the non-generic functions of
/// `program`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn monomorphize(program: &Program) -> Result<EveryConcreteFun, MonomorphizeError> {
    let mut state = Monomorphizer {
        program,
        every: EveryConcreteFun::default(),
        worklist: VecDeque::new(),
    };

    for fun in program.funs() {
        if !fun.signature.is_generic() {
            state.instantiate(fun.id, Vec::new(), Vec::new());
        }
    }

    while let Some(id) = state.worklist.pop_front() {
        state.visit(id)?;
    }

    log::debug!(
        "monomorphized {} instantiation(s), {} resolved call(s)",
        state.every.len(),
        state.every.resolved_calls.len()
    );
    Ok(state.every)
}

struct Monomorphizer<'p> {
    program: &'p Program,
    every: EveryConcreteFun,
    worklist: VecDeque<ConcreteFunId>,
}

impl<'p> Monomorphizer<'p> {
    /// Memoize an instantiation, queueing it if it is new.
    fn instantiate(
        &mut self,
        fun: FunId,
        type_arguments: Vec<Type>,
        spec_impls: Vec<Vec<SpecImpl>>,
    ) -> ConcreteFunId {
        let set = self.every.fun_instantiations.entry(fun).or_default();
        let (index, inserted) = set.insert_full(ConcreteFun {
            fun,
            type_arguments,
            spec_impls,
        });
        let id = ConcreteFunId { fun, index };
        if inserted {
            log::trace!("new instantiation {} #{index}", self.program.fun(fun).name());
            self.worklist.push_back(id);
        }
        id
    }

    fn visit(&mut self, id: ConcreteFunId) -> Result<(), MonomorphizeError> {
        let Some(caller) = self.every.get(id).cloned() else {
            return Ok(());
        };
        let program = self.program;
        let Some(body) = program.fun(caller.fun).expression() else {
            return Ok(());
        };

        let mut calls = Vec::new();
        each_call(body, &mut |call| calls.push(call));
        for call in calls {
            let target = self.resolve_call(&caller, call)?;
            self.every.resolved_calls.insert((id, call.site), target);
        }
        Ok(())
    }

    fn resolve_call(
        &mut self,
        caller: &ConcreteFun,
        call: &Call,
    ) -> Result<ConcreteFunId, MonomorphizeError> {
        let type_arguments = call
            .called
            .type_arguments
            .iter()
            .map(|ty| self.concrete(caller, ty))
            .collect::<Result<Vec<_>, _>>()?;

        match call.called.declaration {
            CalledDeclaration::Spec { .. } => match self.spec_impl(caller, call.called.declaration)? {
                SpecImpl::Concrete(id) => Ok(id),
                SpecImpl::Generic(fun) => Ok(self.instantiate(fun, type_arguments, Vec::new())),
            },
            CalledDeclaration::Fun(fun) => {
                let mut spec_impls = Vec::with_capacity(call.called.spec_impls.len());
                for signatures in &call.called.spec_impls {
                    let resolved = signatures
                        .iter()
                        .map(|declaration| self.spec_impl(caller, *declaration))
                        .collect::<Result<Vec<_>, _>>()?;
                    spec_impls.push(resolved);
                }
                Ok(self.instantiate(fun, type_arguments, spec_impls))
            }
        }
    }

    /// Bind one chosen spec implementation in the context of `caller`.
    fn spec_impl(
        &mut self,
        caller: &ConcreteFun,
        declaration: CalledDeclaration,
    ) -> Result<SpecImpl, MonomorphizeError> {
        match declaration {
            CalledDeclaration::Spec {
                spec_use,
                signature,
            } => caller
                .spec_impls
                .get(spec_use)
                .and_then(|signatures| signatures.get(signature))
                .copied()
                .ok_or_else(|| MonomorphizeError::MissingSpecImpl {
                    fun: self.program.fun(caller.fun).name().to_string(),
                    spec_use,
                    signature,
                }),
            CalledDeclaration::Fun(fun) if self.program.fun(fun).signature.is_generic() => {
                Ok(SpecImpl::Generic(fun))
            }
            CalledDeclaration::Fun(fun) => {
                Ok(SpecImpl::Concrete(self.instantiate(fun, Vec::new(), Vec::new())))
            }
        }
    }

    /// Express a type from `caller`'s body in concrete terms.
    fn concrete(&self, caller: &ConcreteFun, ty: &Type) -> Result<Type, MonomorphizeError> {
        let owner = GenericOwner::Fun(caller.fun);
        let name = || self.program.fun(caller.fun).name().to_string();
        let concrete = ty
            .try_substitute(&|param| {
                if param.owner == owner {
                    caller.type_arguments.get(param.slot()).cloned()
                } else {
                    None
                }
            })
            .ok_or_else(|| MonomorphizeError::UnresolvedTypeParameter { fun: name() })?;
        if contains_bogus(&concrete) {
            return Err(MonomorphizeError::BogusType { fun: name() });
        }
        Ok(concrete)
    }
}

fn contains_bogus(ty: &Type) -> bool {
    match ty {
        Type::Bogus => true,
        Type::Param(_) => false,
        Type::Struct(inst) => inst.type_arguments.iter().any(contains_bogus),
    }
}
