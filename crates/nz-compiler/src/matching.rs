//! Type matching engine.
//!
//! Three kinds of comparison, kept apart so that inference state is only
//! touched where inference is intended:
//! - [`types_exactly_equal`]: structural equality, effects included.
//! - [`try_match_plain`] / [`does_type_match_no_infer`]: does an actual type
//!   satisfy a fully known expected type.
//! - [`try_match_types`]: unification of a candidate signature's type
//!   against a caller-supplied type, binding the candidate's own type
//!   parameters in its [`Inferring`] slots.
//!
//! [`Type::Bogus`] matches anything on every path.

use nz_core::Effect;

use crate::model::{GenericOwner, SpecId, Type, TypeParamId};

/// Where a comparison happens, which decides the direction of the effect check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The candidate declares the type, the caller supplies a value:
    /// the value's effect must be at least the declared one.
    Parameter,
    /// The candidate produces the value, the caller expects a type:
    /// the produced effect must be at least the expected one.
    Return,
    /// Nested type arguments: effects must be equal.
    Exact,
}

pub(crate) fn effect_ok(position: Position, declared: Effect, external: Effect) -> bool {
    match position {
        Position::Parameter => external.satisfies(declared),
        Position::Return => declared.satisfies(external),
        Position::Exact => declared == external,
    }
}

/// Structural equality including effects. Bogus equals anything.
pub fn types_exactly_equal(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Bogus, _) | (_, Type::Bogus) => true,
        (Type::Param(x), Type::Param(y)) => x == y,
        (Type::Struct(x), Type::Struct(y)) => {
            x.strukt == y.strukt
                && x.effect == y.effect
                && x.type_arguments.len() == y.type_arguments.len()
                && x
                    .type_arguments
                    .iter()
                    .zip(&y.type_arguments)
                    .all(|(l, r)| types_exactly_equal(l, r))
        }
        _ => false,
    }
}

/// Compare without binding anything. `declared` is the candidate or
/// context side, `external` the other.
fn match_without_inference(declared: &Type, external: &Type, position: Position) -> bool {
    match (declared, external) {
        (Type::Bogus, _) | (_, Type::Bogus) => true,
        (Type::Param(x), Type::Param(y)) => x == y,
        (Type::Struct(d), Type::Struct(e)) => {
            d.strukt == e.strukt
                && effect_ok(position, d.effect, e.effect)
                && d.type_arguments.len() == e.type_arguments.len()
                && d
                    .type_arguments
                    .iter()
                    .zip(&e.type_arguments)
                    .all(|(l, r)| types_exactly_equal(l, r))
        }
        _ => false,
    }
}

/// Does `actual` satisfy the fully known `expected`?
///
/// Both must instantiate the same struct with equal type arguments, and
/// `actual` must have at least `expected`'s effect. Expecting a struct and
/// receiving a type parameter never matches.
pub fn try_match_plain(expected: &Type, actual: &Type) -> bool {
    match_without_inference(expected, actual, Position::Parameter)
}

/// Check an expression's type against an expectation that involves no
/// inference, such as a struct field or a known local.
pub fn does_type_match_no_infer(expected: &Type, actual: &Type) -> bool {
    try_match_plain(expected, actual)
}

/// Inference state for one candidate: a slot per type parameter of the
/// declaration being inferred.
#[derive(Debug, Clone)]
pub struct Inferring<'s> {
    owner: GenericOwner,
    slots: Vec<Option<Type>>,
    /// Slots bound only from the expected return type. The first argument
    /// that reaches one may raise its effect.
    from_return: Vec<bool>,
    /// For a spec signature candidate: the spec's type parameters are
    /// replaced by the arguments of the spec use that brought it in.
    spec_arguments: Option<(SpecId, &'s [Type])>,
}

impl<'s> Inferring<'s> {
    pub fn new(owner: GenericOwner, count: usize) -> Self {
        Self {
            owner,
            slots: vec![None; count],
            from_return: vec![false; count],
            spec_arguments: None,
        }
    }

    pub fn for_spec_signature(
        owner: GenericOwner,
        count: usize,
        spec: SpecId,
        arguments: &'s [Type],
    ) -> Self {
        Self {
            owner,
            slots: vec![None; count],
            from_return: vec![false; count],
            spec_arguments: Some((spec, arguments)),
        }
    }

    /// Pre-fill slots from explicit type arguments.
    pub fn seed(&mut self, explicit: &[Type]) {
        for (slot, ty) in self.slots.iter_mut().zip(explicit) {
            *slot = Some(ty.clone());
        }
    }

    pub fn owner(&self) -> GenericOwner {
        self.owner
    }

    pub fn slot(&self, index: usize) -> Option<&Type> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// The inferred arguments, if every slot is filled.
    pub fn arguments(&self) -> Option<Vec<Type>> {
        self.slots.iter().cloned().collect()
    }

    fn spec_argument(&self, param: TypeParamId) -> Option<Type> {
        match self.spec_arguments {
            Some((spec, arguments)) if param.owner == GenericOwner::Spec(spec) => {
                Some(arguments.get(param.slot()).cloned().unwrap_or(Type::Bogus))
            }
            _ => None,
        }
    }

    /// Express a candidate type in the caller's terms, as far as known.
    ///
    /// Returns `None` while any of the candidate's own parameters inside it
    /// is still uninferred.
    pub fn resolve(&self, ty: &Type) -> Option<Type> {
        ty.try_substitute(&|param| {
            if param.owner == self.owner {
                self.slots.get(param.slot()).cloned().flatten()
            } else if let Some(arg) = self.spec_argument(param) {
                Some(arg)
            } else {
                Some(Type::Param(param))
            }
        })
    }
}

/// Unify a candidate signature type with a caller-supplied type.
///
/// A candidate parameter of its own binds on first sight; afterwards later
/// evidence must agree with the binding or the match fails. A binding made
/// at the return position is weaker: the first argument with the same type
/// and an effect at least as strong replaces it. Argument bindings are
/// never overwritten.
pub fn try_match_types(
    from_candidate: &Type,
    from_external: &Type,
    position: Position,
    inferring: &mut Inferring<'_>,
) -> bool {
    match from_candidate {
        Type::Bogus => true,
        Type::Param(param) if param.owner == inferring.owner => {
            match inferring.slots.get(param.slot()) {
                Some(Some(bound)) => {
                    let bound = bound.clone();
                    let slot = param.slot();
                    if inferring.from_return[slot] && position != Position::Return {
                        let raised = match_without_inference(&bound, from_external, Position::Parameter);
                        if raised {
                            inferring.slots[slot] = Some(from_external.clone());
                            inferring.from_return[slot] = false;
                        }
                        raised
                    } else {
                        match_without_inference(&bound, from_external, position)
                    }
                }
                Some(None) => {
                    inferring.slots[param.slot()] = Some(from_external.clone());
                    inferring.from_return[param.slot()] = position == Position::Return;
                    true
                }
                None => false,
            }
        }
        Type::Param(param) => match inferring.spec_argument(*param) {
            Some(substituted) => try_match_types(&substituted, from_external, position, inferring),
            None => match from_external {
                Type::Bogus => true,
                Type::Param(other) => other == param,
                Type::Struct(_) => false,
            },
        },
        Type::Struct(declared) => match from_external {
            Type::Bogus => true,
            Type::Param(_) => false,
            Type::Struct(external) => {
                declared.strukt == external.strukt
                    && effect_ok(position, declared.effect, external.effect)
                    && declared.type_arguments.len() == external.type_arguments.len()
                    && declared
                        .type_arguments
                        .iter()
                        .zip(&external.type_arguments)
                        .all(|(d, e)| try_match_types(d, e, Position::Exact, inferring))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FunId, InstStruct, ModuleId, StructId};

    fn nat(effect: Effect) -> Type {
        Type::plain(StructId::new(ModuleId(0), 0), effect)
    }

    fn string() -> Type {
        Type::plain(StructId::new(ModuleId(0), 1), Effect::Io)
    }

    fn list(arg: Type) -> Type {
        Type::Struct(InstStruct {
            strukt: StructId::new(ModuleId(0), 2),
            type_arguments: vec![arg],
            effect: Effect::Io,
        })
    }

    fn fun_owner(index: usize) -> GenericOwner {
        GenericOwner::Fun(FunId::new(ModuleId(0), index))
    }

    fn param_of(owner: GenericOwner, index: u32) -> Type {
        Type::Param(TypeParamId { owner, index })
    }

    #[test]
    fn exact_equality_includes_effect() {
        assert!(types_exactly_equal(&nat(Effect::Io), &nat(Effect::Io)));
        assert!(!types_exactly_equal(&nat(Effect::Io), &nat(Effect::Get)));
        assert!(!types_exactly_equal(&nat(Effect::Io), &string()));
        assert!(types_exactly_equal(&Type::Bogus, &string()));
    }

    #[test]
    fn plain_match_respects_effect_order() {
        assert!(try_match_plain(&nat(Effect::Get), &nat(Effect::Io)));
        assert!(!try_match_plain(&nat(Effect::Io), &nat(Effect::Get)));
        assert!(!try_match_plain(&list(nat(Effect::Get)), &list(nat(Effect::Io))));
    }

    #[test]
    fn concrete_expectation_rejects_parameter() {
        let t = param_of(fun_owner(0), 0);
        assert!(!try_match_plain(&nat(Effect::Io), &t));
        assert!(does_type_match_no_infer(&t, &t));
    }

    #[test]
    fn first_binding_wins_later_must_agree() {
        let owner = fun_owner(1);
        let t = param_of(owner, 0);
        let mut inferring = Inferring::new(owner, 1);
        assert!(try_match_types(&t, &nat(Effect::Io), Position::Parameter, &mut inferring));
        assert_eq!(inferring.slot(0), Some(&nat(Effect::Io)));
        assert!(!try_match_types(&t, &string(), Position::Parameter, &mut inferring));
        assert_eq!(inferring.slot(0), Some(&nat(Effect::Io)));
        assert!(try_match_types(&t, &nat(Effect::Own), Position::Parameter, &mut inferring));

        let mut reversed = Inferring::new(owner, 1);
        assert!(try_match_types(&t, &nat(Effect::Own), Position::Parameter, &mut reversed));
        assert!(!try_match_types(&t, &nat(Effect::Io), Position::Parameter, &mut reversed));
    }

    #[test]
    fn binds_inside_struct_arguments() {
        let owner = fun_owner(1);
        let mut inferring = Inferring::new(owner, 1);
        let candidate = list(param_of(owner, 0));
        assert!(try_match_types(
            &candidate,
            &list(nat(Effect::Get)),
            Position::Parameter,
            &mut inferring
        ));
        assert_eq!(inferring.resolve(&param_of(owner, 0)), Some(nat(Effect::Get)));
        assert!(inferring.is_complete());
    }

    #[test]
    fn foreign_parameters_match_by_identity() {
        let owner = fun_owner(1);
        let foreign = param_of(fun_owner(2), 0);
        let mut inferring = Inferring::new(owner, 0);
        assert!(try_match_types(&foreign, &foreign, Position::Parameter, &mut inferring));
        assert!(!try_match_types(&foreign, &nat(Effect::Io), Position::Parameter, &mut inferring));
    }

    #[test]
    fn spec_parameters_substitute_through_spec_use() {
        let spec = SpecId::new(ModuleId(0), 0);
        let owner = GenericOwner::SpecSignature(spec, 0);
        let spec_t = param_of(GenericOwner::Spec(spec), 0);
        let arguments = [nat(Effect::Io)];
        let mut inferring = Inferring::for_spec_signature(owner, 0, spec, &arguments);
        assert!(try_match_types(&spec_t, &nat(Effect::Io), Position::Parameter, &mut inferring));
        assert!(!try_match_types(&spec_t, &string(), Position::Parameter, &mut inferring));
        assert_eq!(inferring.resolve(&list(spec_t)), Some(list(nat(Effect::Io))));
    }

    #[test]
    fn return_position_reverses_effect_check() {
        let mut inferring = Inferring::new(fun_owner(0), 0);
        assert!(try_match_types(&nat(Effect::Io), &nat(Effect::Get), Position::Return, &mut inferring));
        assert!(!try_match_types(&nat(Effect::Get), &nat(Effect::Io), Position::Return, &mut inferring));
    }

    #[test]
    fn argument_raises_effect_bound_from_return() {
        let owner = fun_owner(1);
        let t = param_of(owner, 0);
        let mut inferring = Inferring::new(owner, 1);
        assert!(try_match_types(&t, &nat(Effect::Get), Position::Return, &mut inferring));
        assert!(try_match_types(&t, &nat(Effect::Io), Position::Parameter, &mut inferring));
        assert_eq!(inferring.slot(0), Some(&nat(Effect::Io)));
        assert!(try_match_types(&t, &nat(Effect::Own), Position::Parameter, &mut inferring));
        assert!(!try_match_types(&t, &nat(Effect::Get), Position::Parameter, &mut inferring));
        assert_eq!(inferring.slot(0), Some(&nat(Effect::Io)));
    }

    #[test]
    fn return_bound_slot_still_rejects_weaker_or_other_types() {
        let owner = fun_owner(1);
        let t = param_of(owner, 0);
        let mut inferring = Inferring::new(owner, 1);
        assert!(try_match_types(&t, &nat(Effect::Io), Position::Return, &mut inferring));
        assert!(!try_match_types(&t, &nat(Effect::Get), Position::Parameter, &mut inferring));
        assert!(!try_match_types(&t, &string(), Position::Parameter, &mut inferring));
        assert_eq!(inferring.slot(0), Some(&nat(Effect::Io)));
    }

    #[test]
    fn resolve_is_none_until_inferred() {
        let owner = fun_owner(3);
        let mut inferring = Inferring::new(owner, 2);
        inferring.seed(&[string()]);
        assert_eq!(inferring.resolve(&param_of(owner, 0)), Some(string()));
        assert_eq!(inferring.resolve(&param_of(owner, 1)), None);
        assert_eq!(inferring.arguments(), None);
    }
}
