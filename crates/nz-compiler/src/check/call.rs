//! Call and overload resolution.
//!
//! Candidates are never ranked. Every filtering step removes candidates
//! that cannot match, and a call succeeds only if exactly one is left.

use nz_core::{Diag, Effect, Span};
use nz_parser::ast::{Expr, TypeExpr};

use super::expected::{Expected, Typed};
use super::expr::ExprChecker;
use crate::matching::{Inferring, Position, try_match_types, types_exactly_equal};
use crate::model::{
    Call, Called, CalledDeclaration, Declarations, Expression, FunSignature, GenericOwner, Type,
};

/// One overload still in the running, with its private inference slots.
#[derive(Debug, Clone)]
struct Candidate<'a> {
    declaration: CalledDeclaration,
    signature: &'a FunSignature,
    inferring: Inferring<'a>,
}

impl<'a> ExprChecker<'a, '_> {
    /// Resolve `name(args)` to exactly one function or spec signature.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(super) fn check_call(
        &mut self,
        name: &str,
        args: &[Expr<'_>],
        type_args: &[TypeExpr<'_>],
        span: Span,
        expected: Expected,
    ) -> Typed {
        // A unary call may be a field access. It is only tried when some
        // struct in the program has a field by that name, since the argument
        // has to be inferred without any expectation to find out.
        let mut first_checked = None;
        if args.len() == 1 && type_args.is_empty() && self.field_names.contains(name) {
            let target = self.check(&args[0], Expected::Infer);
            match self.try_field_access(name, target) {
                Ok((expr, ty)) => return self.confirm(&expected, expr, ty, span),
                Err(target) => first_checked = Some(target),
            }
        }

        let explicit: Vec<Type> = type_args.iter().map(|arg| self.convert_type(arg)).collect();

        let mut candidates = self.initial_candidates(name, args.len(), &explicit);
        log::trace!("call to {name}: {} initial candidate(s)", candidates.len());
        if candidates.is_empty() {
            self.report(
                span,
                Diag::NoOverloadWithArity {
                    name: name.to_string(),
                    arity: args.len(),
                },
            );
            return Typed::bogus();
        }

        if let Some(expected_ty) = expected.as_type() {
            candidates.retain_mut(|candidate| {
                try_match_types(
                    &candidate.signature.return_type,
                    expected_ty,
                    Position::Return,
                    &mut candidate.inferring,
                )
            });
            if candidates.is_empty() {
                let diag = Diag::NoOverloadReturnsExpected {
                    name: name.to_string(),
                    expected: self.describe(expected_ty),
                };
                self.report(span, diag);
                return Typed::bogus();
            }
        }

        let mut arguments = Vec::with_capacity(args.len());
        let mut saw_bogus = false;
        for (index, arg) in args.iter().enumerate() {
            let typed = match first_checked.take() {
                Some(typed) => typed,
                None => {
                    let arg_expected = common_expected(&candidates, index);
                    self.check(arg, arg_expected)
                }
            };
            saw_bogus |= typed.ty.is_bogus();

            candidates.retain_mut(|candidate| {
                try_match_types(
                    &candidate.signature.parameters[index].ty,
                    &typed.ty,
                    Position::Parameter,
                    &mut candidate.inferring,
                )
            });
            log::trace!(
                "call to {name}: {} candidate(s) after argument {index}",
                candidates.len()
            );
            if candidates.is_empty() {
                if !saw_bogus {
                    let diag = Diag::NoOverloadMatchesArgument {
                        name: name.to_string(),
                        index,
                        actual: self.describe(&typed.ty),
                    };
                    self.report(arg.span(), diag);
                }
                return Typed::bogus();
            }
            arguments.push(typed.expr);
        }

        let candidate = match candidates.as_slice() {
            [only] => only.clone(),
            _ => {
                if !saw_bogus {
                    self.report(
                        span,
                        Diag::AmbiguousCall {
                            name: name.to_string(),
                            count: candidates.len(),
                        },
                    );
                }
                return Typed::bogus();
            }
        };

        let Some(type_arguments) = candidate.inferring.arguments() else {
            self.report(
                span,
                Diag::CantInferTypeArguments {
                    name: name.to_string(),
                },
            );
            return Typed::bogus();
        };
        let return_type = candidate
            .inferring
            .resolve(&candidate.signature.return_type)
            .unwrap_or(Type::Bogus);

        let spec_impls = if candidate.signature.specs.is_empty() {
            Vec::new()
        } else {
            match candidate.declaration {
                CalledDeclaration::Fun(_) => {
                    match self.check_specs(candidate.signature, &type_arguments, span) {
                        Some(impls) => impls,
                        None => return Typed::bogus(),
                    }
                }
                CalledDeclaration::Spec { .. } => {
                    self.report(
                        span,
                        Diag::UnsupportedFeature {
                            feature: format!("spec signature '{name}' with its own spec requirements"),
                        },
                    );
                    return Typed::bogus();
                }
            }
        };

        let call = Call {
            site: self.next_call_site(),
            called: Called {
                declaration: candidate.declaration,
                type_arguments,
                spec_impls,
            },
            arguments,
            return_type: return_type.clone(),
        };
        self.confirm(&expected, Expression::Call(call), return_type, span)
    }

    /// Spec signatures of the current function first, then the overload group.
    fn initial_candidates(&self, name: &str, arity: usize, explicit: &[Type]) -> Vec<Candidate<'a>> {
        let view = self.view;
        let signature = self.signature;
        let fits = |sig: &FunSignature| {
            sig.arity() == arity
                && (explicit.is_empty() || sig.type_parameters.len() == explicit.len())
        };

        let mut candidates = Vec::new();
        for (spec_use_index, spec_use) in signature.specs.iter().enumerate() {
            let spec = view.spec_decl(spec_use.spec);
            for (sig_index, sig) in spec.signatures.iter().enumerate() {
                if sig.name != name || !fits(sig) {
                    continue;
                }
                let mut inferring = Inferring::for_spec_signature(
                    sig.owner,
                    sig.type_parameters.len(),
                    spec_use.spec,
                    &spec_use.type_arguments,
                );
                inferring.seed(explicit);
                candidates.push(Candidate {
                    declaration: CalledDeclaration::Spec {
                        spec_use: spec_use_index,
                        signature: sig_index,
                    },
                    signature: sig,
                    inferring,
                });
            }
        }

        for fun in view.names.funs_named(name) {
            let sig = view.fun_signature(fun);
            if !fits(sig) {
                continue;
            }
            let mut inferring = Inferring::new(sig.owner, sig.type_parameters.len());
            inferring.seed(explicit);
            candidates.push(Candidate {
                declaration: CalledDeclaration::Fun(fun),
                signature: sig,
                inferring,
            });
        }

        candidates
    }

    /// Treat `name target` as a field read if `target` is a struct with a
    /// field `name`. Gives the target back otherwise.
    fn try_field_access(&self, name: &str, target: Typed) -> Result<(Expression, Type), Typed> {
        let Some(inst) = target.ty.as_struct() else {
            return Err(target);
        };
        let decl = self.view.struct_decl(inst.strukt);
        let Some((field_index, field)) = decl.field(name) else {
            return Err(target);
        };

        let owner = GenericOwner::Struct(inst.strukt);
        let field_ty = field.ty.substitute(&|param| {
            if param.owner == owner {
                inst.type_arguments.get(param.slot()).cloned()
            } else {
                None
            }
        });
        let ty = capped_effect(field_ty, inst.effect);
        let strukt = inst.strukt;

        let expr = Expression::StructFieldAccess {
            target: Box::new(target.expr),
            strukt,
            field_index,
            ty: ty.clone(),
        };
        Ok((expr, ty))
    }
}

/// A field read through a container is no stronger than the container.
fn capped_effect(ty: Type, cap: Effect) -> Type {
    match ty {
        Type::Struct(mut inst) => {
            inst.effect = inst.effect.min(cap);
            Type::Struct(inst)
        }
        other => other,
    }
}

/// The type every remaining candidate wants at `index`, if they agree and
/// all of them already know it.
fn common_expected(candidates: &[Candidate<'_>], index: usize) -> Expected {
    let mut common: Option<Type> = None;
    for candidate in candidates {
        let Some(ty) = candidate
            .inferring
            .resolve(&candidate.signature.parameters[index].ty)
        else {
            return Expected::Infer;
        };
        if ty.is_bogus() {
            return Expected::Infer;
        }
        match &common {
            None => common = Some(ty),
            Some(prev) if types_exactly_equal(prev, &ty) => {}
            Some(_) => return Expected::Infer,
        }
    }
    common.map_or(Expected::Infer, Expected::Check)
}
