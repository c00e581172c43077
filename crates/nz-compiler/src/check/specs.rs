//! Finding implementations for a callee's spec requirements.
//!
//! When a function `with Show<T>` is called, every signature of `Show`
//! needs exactly one implementation visible at the call site. Candidates
//! are the caller's own spec signatures and the functions of the same name.
//! Matching is by shape: a concrete spec signature is implemented only by a
//! non-generic function with the same types, and a generic one only by a
//! function with type parameters in the same positions.

use nz_core::{Diag, Span};

use super::expr::ExprChecker;
use super::scope::Found;
use crate::matching::{Position, effect_ok};
use crate::model::{
    CalledDeclaration, Declarations, FunSignature, GenericOwner, SpecId, Type, TypeParamId,
};

impl<'a> ExprChecker<'a, '_> {
    /// Resolve the spec requirements of `callee`, instantiated with
    /// `type_arguments`. `None` if any implementation is missing or
    /// ambiguous; each such problem has been reported.
    pub(super) fn check_specs(
        &mut self,
        callee: &'a FunSignature,
        type_arguments: &[Type],
        span: Span,
    ) -> Option<Vec<Vec<CalledDeclaration>>> {
        let view = self.view;
        let mut complete = true;
        let mut impls = Vec::with_capacity(callee.specs.len());

        for spec_use in &callee.specs {
            let spec_arguments: Vec<Type> = spec_use
                .type_arguments
                .iter()
                .map(|ty| ty.substitute(&|param| argument_of(callee.owner, type_arguments, param)))
                .collect();
            let spec = view.spec_decl(spec_use.spec);

            let mut found = Vec::with_capacity(spec.signatures.len());
            for spec_sig in &spec.signatures {
                match self.find_spec_impl(spec_use.spec, &spec_arguments, spec_sig) {
                    Found::One(called) => found.push(called),
                    Found::Missing => {
                        complete = false;
                        self.report(
                            span,
                            Diag::SpecImplNotFound {
                                spec: spec.name.clone(),
                                signature: spec_sig.name.clone(),
                            },
                        );
                    }
                    Found::Ambiguous => {
                        complete = false;
                        self.report(
                            span,
                            Diag::SpecImplAmbiguous {
                                spec: spec.name.clone(),
                                signature: spec_sig.name.clone(),
                            },
                        );
                    }
                }
            }
            impls.push(found);
        }

        complete.then_some(impls)
    }

    fn find_spec_impl(
        &self,
        spec: SpecId,
        spec_arguments: &[Type],
        spec_sig: &FunSignature,
    ) -> Found<CalledDeclaration> {
        let view = self.view;
        let required = |ty: &Type| {
            ty.substitute(&|param| argument_of(GenericOwner::Spec(spec), spec_arguments, param))
        };

        let mut found = Found::Missing;
        let mut record = |called: CalledDeclaration| {
            log::trace!("{} implemented by {called:?}", spec_sig.name);
            found = match found {
                Found::Missing => Found::One(called),
                _ => Found::Ambiguous,
            };
        };

        for (spec_use_index, spec_use) in self.signature.specs.iter().enumerate() {
            let own_spec = GenericOwner::Spec(spec_use.spec);
            let provided = |ty: &Type| {
                ty.substitute(&|param| argument_of(own_spec, &spec_use.type_arguments, param))
            };
            let signatures = &view.spec_decl(spec_use.spec).signatures;
            for (sig_index, sig) in signatures.iter().enumerate() {
                if sig.name == spec_sig.name && signature_matches(spec_sig, &required, sig, &provided) {
                    record(CalledDeclaration::Spec {
                        spec_use: spec_use_index,
                        signature: sig_index,
                    });
                }
            }
        }

        for fun in view.names.funs_named(&spec_sig.name) {
            let sig = view.fun_signature(fun);
            if signature_matches(spec_sig, &required, sig, &|ty: &Type| ty.clone()) {
                record(CalledDeclaration::Fun(fun));
            }
        }

        found
    }
}

fn argument_of(owner: GenericOwner, arguments: &[Type], param: TypeParamId) -> Option<Type> {
    if param.owner == owner {
        arguments.get(param.slot()).cloned()
    } else {
        None
    }
}

/// Whether `actual` implements `required`. Both sides' types are first
/// mapped into the caller's terms by `required_ty` and `actual_ty`.
fn signature_matches(
    required: &FunSignature,
    required_ty: &dyn Fn(&Type) -> Type,
    actual: &FunSignature,
    actual_ty: &dyn Fn(&Type) -> Type,
) -> bool {
    let owners = (required.owner, actual.owner);
    required.specs.is_empty()
        && actual.specs.is_empty()
        && required.type_parameters.len() == actual.type_parameters.len()
        && required.arity() == actual.arity()
        && signature_types_equal(
            &required_ty(&required.return_type),
            &actual_ty(&actual.return_type),
            owners,
            Position::Return,
        )
        && required
            .parameters
            .iter()
            .zip(&actual.parameters)
            .all(|(r, a)| {
                signature_types_equal(&required_ty(&r.ty), &actual_ty(&a.ty), owners, Position::Parameter)
            })
}

/// Like exact equality, except that a type parameter of the required
/// signature corresponds to the implementation's type parameter at the same
/// index, and top-level effects may differ in the safe direction.
fn signature_types_equal(
    required: &Type,
    actual: &Type,
    owners: (GenericOwner, GenericOwner),
    position: Position,
) -> bool {
    match (required, actual) {
        (Type::Bogus, _) | (_, Type::Bogus) => true,
        (Type::Param(r), Type::Param(a)) if r.owner == owners.0 => {
            a.owner == owners.1 && a.index == r.index
        }
        (Type::Param(r), Type::Param(a)) => r == a,
        (Type::Struct(r), Type::Struct(a)) => {
            r.strukt == a.strukt
                && effect_ok(position, a.effect, r.effect)
                && r.type_arguments.len() == a.type_arguments.len()
                && r
                    .type_arguments
                    .iter()
                    .zip(&a.type_arguments)
                    .all(|(r, a)| signature_types_equal(r, a, owners, Position::Exact))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use nz_core::Diag;

    use crate::model::{CalledDeclaration, Expression};
    use crate::test_support::{check_clean, diags_of, fun};

    const SHOW: &str = "spec Show<T>\n\tString show(T value)\nfun<T> String describe(T item) with Show<T>\n\tshow(item)\n";

    #[test]
    fn spec_call_stays_abstract_inside_generic_body() {
        let program = check_clean(&format!("{SHOW}fun String show(Nat n)\n\t\"nat\"\n"));
        let Some(Expression::Call(call)) = fun(&program, "describe").expression() else {
            panic!("expected a call");
        };
        assert_eq!(
            call.called.declaration,
            CalledDeclaration::Spec {
                spec_use: 0,
                signature: 0
            }
        );
    }

    #[test]
    fn call_site_resolves_spec_implementation() {
        let program = check_clean(&format!(
            "{SHOW}fun String show(Nat n)\n\t\"nat\"\nfun String main()\n\tdescribe(as<Nat>(1))\n"
        ));
        let Some(Expression::Call(call)) = fun(&program, "main").expression() else {
            panic!("expected a call");
        };
        let show = fun(&program, "show").id;
        assert_eq!(call.called.spec_impls, vec![vec![CalledDeclaration::Fun(show)]]);
    }

    #[test]
    fn missing_implementation() {
        let diags = diags_of(&format!("{SHOW}fun String main()\n\tdescribe(as<Nat>(1))\n"));
        assert_eq!(
            diags,
            vec![Diag::SpecImplNotFound {
                spec: "Show".to_string(),
                signature: "show".to_string()
            }]
        );
    }

    #[test]
    fn two_implementations_are_ambiguous() {
        let diags = diags_of(&format!(
            "{SHOW}fun String show(Nat n)\n\t\"a\"\nfun String show(Nat m)\n\t\"b\"\nfun String main()\n\tdescribe(as<Nat>(1))\n"
        ));
        assert_eq!(
            diags,
            vec![Diag::SpecImplAmbiguous {
                spec: "Show".to_string(),
                signature: "show".to_string()
            }]
        );
    }

    #[test]
    fn generic_caller_forwards_its_own_spec() {
        let program = check_clean(&format!(
            "{SHOW}fun<T> String twice(T item) with Show<T>\n\tdescribe(item)\n"
        ));
        let Some(Expression::Call(call)) = fun(&program, "twice").expression() else {
            panic!("expected a call");
        };
        assert_eq!(
            call.called.spec_impls,
            vec![vec![CalledDeclaration::Spec {
                spec_use: 0,
                signature: 0
            }]]
        );
    }
}
