//! Second pass: struct fields, spec signatures and function signatures.

use nz_core::{Diag, Effect};
use nz_parser::ast::{File, SignatureAst, StructBodyAst, TypeExpr};

use super::headers::{Headers, declare_type_parameters};
use super::scope::{DiagSink, Found, ModuleView, NameScope};
use crate::model::{
    Declarations, FunId, FunSignature, GenericOwner, InstStruct, ModuleId, Parameter, Program,
    SpecDeclaration, SpecId, SpecUse, StructBody, StructDeclaration, StructField, StructId, Tables,
    Type, TypeParameter,
};

/// Output of [`fill_bodies`]: every declaration of the module with its
/// types resolved, function bodies still unchecked.
#[derive(Debug, Clone)]
pub struct ModuleDecls {
    pub tables: Tables,
    pub structs: Vec<StructDeclaration>,
    pub specs: Vec<SpecDeclaration>,
    /// One per function, in source order.
    pub signatures: Vec<FunSignature>,
}

/// What type conversion needs to know about declarations.
pub(crate) trait TypeEnv {
    fn names(&self) -> &NameScope<'_>;
    fn struct_arity(&self, id: StructId) -> usize;
    fn spec_arity(&self, id: SpecId) -> usize;
}

struct HeaderEnv<'a> {
    names: NameScope<'a>,
    headers: &'a Headers,
}

impl TypeEnv for HeaderEnv<'_> {
    fn names(&self) -> &NameScope<'_> {
        &self.names
    }

    fn struct_arity(&self, id: StructId) -> usize {
        if id.module == self.names.module {
            self.headers.structs[id.slot()].type_parameters.len()
        } else {
            self.names.program.struct_decl(id).type_parameters.len()
        }
    }

    fn spec_arity(&self, id: SpecId) -> usize {
        if id.module == self.names.module {
            self.headers.specs[id.slot()].type_parameters.len()
        } else {
            self.names.program.spec_decl(id).type_parameters.len()
        }
    }
}

impl TypeEnv for ModuleView<'_> {
    fn names(&self) -> &NameScope<'_> {
        &self.names
    }

    fn struct_arity(&self, id: StructId) -> usize {
        self.struct_decl(id).type_parameters.len()
    }

    fn spec_arity(&self, id: SpecId) -> usize {
        self.spec_decl(id).type_parameters.len()
    }
}

/// Resolve every type written in the module's declarations.
pub fn fill_bodies(
    file: &File<'_>,
    headers: Headers,
    program: &Program,
    module: ModuleId,
    imports: &[ModuleId],
    sink: &mut DiagSink<'_>,
) -> ModuleDecls {
    let (structs, specs, signatures) = {
        let env = HeaderEnv {
            names: NameScope {
                program,
                module,
                tables: &headers.tables,
                imports,
            },
            headers: &headers,
        };

        let structs = headers
            .structs
            .iter()
            .zip(file.structs())
            .map(|(header, decl)| {
                let body = match decl.body {
                    StructBodyAst::Fields(fields) => StructBody::Fields(
                        fields
                            .iter()
                            .map(|field| StructField {
                                name: field.name.to_string(),
                                span: field.span,
                                ty: convert_type(&env, &field.ty, &[&header.type_parameters], sink),
                            })
                            .collect(),
                    ),
                    StructBodyAst::Passthrough(text) => StructBody::Passthrough(text.to_string()),
                };
                StructDeclaration {
                    id: header.id,
                    name: header.name.clone(),
                    span: header.span,
                    is_public: header.is_public,
                    type_parameters: header.type_parameters.clone(),
                    body,
                }
            })
            .collect::<Vec<_>>();

        let specs = headers
            .specs
            .iter()
            .zip(file.specs())
            .map(|(header, decl)| SpecDeclaration {
                id: header.id,
                name: header.name.clone(),
                span: header.span,
                is_public: header.is_public,
                type_parameters: header.type_parameters.clone(),
                signatures: decl
                    .signatures
                    .iter()
                    .enumerate()
                    .map(|(index, sig)| {
                        convert_signature(
                            &env,
                            sig,
                            GenericOwner::SpecSignature(header.id, index as u32),
                            &[&header.type_parameters],
                            sink,
                        )
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();

        let signatures = file
            .funs()
            .enumerate()
            .map(|(index, decl)| {
                let owner = GenericOwner::Fun(FunId::new(module, index));
                let signature = convert_signature(&env, &decl.signature, owner, &[], sink);
                for param in &signature.parameters {
                    if env.names.has_fun_named(&param.name) {
                        sink.report(
                            param.span,
                            Diag::LocalShadowsFun {
                                name: param.name.clone(),
                            },
                        );
                    }
                }
                signature
            })
            .collect::<Vec<_>>();

        (structs, specs, signatures)
    };

    ModuleDecls {
        tables: headers.tables,
        structs,
        specs,
        signatures,
    }
}

fn convert_signature(
    env: &impl TypeEnv,
    sig: &SignatureAst<'_>,
    owner: GenericOwner,
    outer: &[&[TypeParameter]],
    sink: &mut DiagSink<'_>,
) -> FunSignature {
    let type_parameters = declare_type_parameters(sig.type_params, owner, outer, env.names(), sink);

    let (return_type, parameters, specs) = {
        let mut scopes: Vec<&[TypeParameter]> = outer.to_vec();
        scopes.push(&type_parameters);

        let return_type = convert_type(env, &sig.return_type, &scopes, sink);

        let mut parameters: Vec<Parameter> = Vec::with_capacity(sig.params.len());
        for param in sig.params {
            if parameters.iter().any(|p| p.name == param.name) {
                sink.report(
                    param.span,
                    Diag::DuplicateParameter {
                        name: param.name.to_string(),
                    },
                );
            }
            parameters.push(Parameter {
                name: param.name.to_string(),
                span: param.span,
                ty: convert_type(env, &param.ty, &scopes, sink),
            });
        }

        let mut specs = Vec::with_capacity(sig.specs.len());
        for spec_use in sig.specs {
            let id = match env.names().find_spec(spec_use.name) {
                Found::One(id) => id,
                Found::Missing => {
                    sink.report(
                        spec_use.span,
                        Diag::SpecNameNotFound {
                            name: spec_use.name.to_string(),
                        },
                    );
                    continue;
                }
                Found::Ambiguous => {
                    sink.report(
                        spec_use.span,
                        Diag::AmbiguousName {
                            name: spec_use.name.to_string(),
                        },
                    );
                    continue;
                }
            };
            let arity = env.spec_arity(id);
            if spec_use.args.len() != arity {
                sink.report(
                    spec_use.span,
                    Diag::WrongNumberTypeArguments {
                        expected: arity,
                        actual: spec_use.args.len(),
                    },
                );
                continue;
            }
            specs.push(SpecUse {
                spec: id,
                type_arguments: spec_use
                    .args
                    .iter()
                    .map(|arg| convert_type(env, arg, &scopes, sink))
                    .collect(),
                span: spec_use.span,
            });
        }

        (return_type, parameters, specs)
    };

    FunSignature {
        owner,
        name: sig.name.to_string(),
        span: sig.span,
        type_parameters,
        return_type,
        parameters,
        specs,
    }
}

/// Resolve a written type. Type parameters in `scopes` shadow structs,
/// innermost list last.
pub(crate) fn convert_type(
    env: &impl TypeEnv,
    ast: &TypeExpr<'_>,
    scopes: &[&[TypeParameter]],
    sink: &mut DiagSink<'_>,
) -> Type {
    let param = scopes
        .iter()
        .rev()
        .find_map(|list| list.iter().find(|p| p.name == ast.name));
    if let Some(param) = param {
        if !ast.args.is_empty() {
            sink.report(
                ast.span,
                Diag::WrongNumberTypeArguments {
                    expected: 0,
                    actual: ast.args.len(),
                },
            );
            return Type::Bogus;
        }
        if ast.effect.is_some() {
            sink.report(
                ast.span,
                Diag::UnsupportedFeature {
                    feature: format!("effect on type parameter '{}'", ast.name),
                },
            );
        }
        return Type::Param(param.id);
    }

    match env.names().find_struct(ast.name) {
        Found::One(id) => {
            let arity = env.struct_arity(id);
            if ast.args.len() != arity {
                sink.report(
                    ast.span,
                    Diag::WrongNumberTypeArguments {
                        expected: arity,
                        actual: ast.args.len(),
                    },
                );
                return Type::Bogus;
            }
            Type::Struct(InstStruct {
                strukt: id,
                type_arguments: ast
                    .args
                    .iter()
                    .map(|arg| convert_type(env, arg, scopes, sink))
                    .collect(),
                effect: ast.effect.unwrap_or(Effect::Io),
            })
        }
        Found::Missing => {
            sink.report(
                ast.span,
                Diag::StructNameNotFound {
                    name: ast.name.to_string(),
                },
            );
            Type::Bogus
        }
        Found::Ambiguous => {
            sink.report(
                ast.span,
                Diag::AmbiguousName {
                    name: ast.name.to_string(),
                },
            );
            Type::Bogus
        }
    }
}

#[cfg(test)]
mod tests {
    use nz_core::{Diag, Effect};

    use crate::model::{GenericOwner, Type};
    use crate::test_support::{check_clean, diags_of, fun, module};

    #[test]
    fn resolves_fields_and_signatures() {
        let program = check_clean(
            "struct Box<T>\n\tT value\n\tget Nat size\nfun<T> T open(set Box<T> b)\n\tb.value\n",
        );
        let boxed = module(&program).struct_named("Box").unwrap();
        let fields = boxed.fields().unwrap();
        assert!(matches!(fields[0].ty, Type::Param(p) if p.owner == GenericOwner::Struct(boxed.id)));
        assert!(matches!(&fields[1].ty, Type::Struct(inst) if inst.effect == Effect::Get));

        let open = fun(&program, "open");
        let Type::Struct(param) = &open.signature.parameters[0].ty else {
            panic!("expected a struct parameter");
        };
        assert_eq!(param.effect, Effect::Set);
        assert!(matches!(param.type_arguments[0], Type::Param(p) if p.owner == open.signature.owner));
    }

    #[test]
    fn unknown_struct() {
        assert_eq!(
            diags_of("fun Nat f(Missing m)\n\t0\n"),
            vec![Diag::StructNameNotFound {
                name: "Missing".to_string()
            }]
        );
    }

    #[test]
    fn wrong_type_argument_count() {
        assert_eq!(
            diags_of("fun Nat f(Nat<Nat> m)\n\t0\n"),
            vec![Diag::WrongNumberTypeArguments {
                expected: 0,
                actual: 1
            }]
        );
    }

    #[test]
    fn duplicate_parameter() {
        assert_eq!(
            diags_of("fun Nat f(Nat m, Nat m)\n\t0\n"),
            vec![Diag::DuplicateParameter {
                name: "m".to_string()
            }]
        );
    }

    #[test]
    fn parameter_shadowing_a_function() {
        assert_eq!(
            diags_of("fun Nat f(Nat eq)\n\t0\n"),
            vec![Diag::LocalShadowsFun {
                name: "eq".to_string()
            }]
        );
    }

    #[test]
    fn effect_on_type_parameter_is_unsupported() {
        let diags = diags_of("fun<T> Nat f(get T m)\n\t0\n");
        assert!(matches!(diags.as_slice(), [Diag::UnsupportedFeature { .. }]));
    }

    #[test]
    fn unknown_spec_is_dropped() {
        let program_diags = diags_of("fun<T> Nat f(T m) with Missing<T>\n\t0\n");
        assert_eq!(
            program_diags,
            vec![Diag::SpecNameNotFound {
                name: "Missing".to_string()
            }]
        );
    }
}
