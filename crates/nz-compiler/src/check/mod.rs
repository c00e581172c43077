//! Semantic checking of one module.
//!
//! A module goes through three passes, each consuming the previous one's
//! output:
//! 1. [`declare_headers`]: name tables and type parameters.
//! 2. [`fill_bodies`]: struct fields, spec signatures and function
//!    signatures with every written type resolved.
//! 3. [`check_bodies`]: function bodies checked into typed expressions.
//!
//! Problems are reported to the [`Diagnostics`] collector and replaced by
//! [`Type::Bogus`] so checking can go on.

mod bodies;
mod call;
mod expected;
mod expr;
mod headers;
mod scope;
mod specs;

pub use bodies::{ModuleDecls, fill_bodies};
pub use expected::{Expected, Typed};
pub use headers::{Header, Headers, declare_headers};
pub use scope::{DiagSink, Found, ModuleView, NameScope};

use nz_core::{Diag, Diagnostics, Effect, ModulePath};
use nz_parser::ast::{File, FunBodyAst};

use crate::model::{
    BuiltinTypes, Declarations, FunBody, FunDeclaration, FunId, Module, ModuleId, Program, Type,
};
use expr::ExprChecker;

/// Names of the structs the checker treats specially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub bool_name: String,
    pub string_name: String,
    pub void_name: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            bool_name: "Bool".to_string(),
            string_name: "String".to_string(),
            void_name: "Void".to_string(),
        }
    }
}

/// Run all three passes over a parsed file.
///
/// The returned module gets the id `program.next_module_id()`; the caller
/// pushes it into the program afterwards.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn check_module(
    file: &File<'_>,
    path: ModulePath,
    imports: Vec<ModuleId>,
    program: &Program,
    options: &CheckOptions,
    diags: &mut Diagnostics,
) -> Module {
    let module = program.next_module_id();
    log::debug!("checking module {path} as {}", module.0);

    let mut sink = DiagSink::new(path.clone(), diags);
    let headers = declare_headers(file, module, program, &imports, &mut sink);
    let decls = fill_bodies(file, headers, program, module, &imports, &mut sink);
    check_bodies(file, decls, program, module, path, imports, options, &mut sink)
}

/// Check every function body and assemble the finished module.
#[allow(clippy::too_many_arguments)]
pub fn check_bodies(
    file: &File<'_>,
    decls: ModuleDecls,
    program: &Program,
    module: ModuleId,
    path: ModulePath,
    imports: Vec<ModuleId>,
    options: &CheckOptions,
    sink: &mut DiagSink<'_>,
) -> Module {
    let (builtins, funs) = {
        let view = ModuleView {
            names: NameScope {
                program,
                module,
                tables: &decls.tables,
                imports: &imports,
            },
            decls: &decls,
        };
        let builtins = find_builtins(&view, options, sink);
        let field_names = view.known_field_names();

        let funs = file
            .funs()
            .zip(&decls.signatures)
            .enumerate()
            .map(|(index, (decl, signature))| {
                let body = match decl.body {
                    FunBodyAst::Expr(body) => {
                        log::trace!("checking body of {}", signature.name);
                        let mut checker =
                            ExprChecker::new(&view, &builtins, signature, &field_names, sink.reborrow());
                        let typed = checker.check(body, Expected::Check(signature.return_type.clone()));
                        FunBody::Expression(typed.expr)
                    }
                    FunBodyAst::Passthrough(text) => FunBody::Passthrough(text.to_string()),
                };
                FunDeclaration {
                    id: FunId::new(module, index),
                    is_public: decl.is_public,
                    signature: signature.clone(),
                    body,
                }
            })
            .collect::<Vec<_>>();
        (builtins, funs)
    };

    let ModuleDecls {
        tables,
        structs,
        specs,
        ..
    } = decls;

    Module {
        id: module,
        path,
        imports,
        structs,
        specs,
        funs,
        tables,
        builtins,
    }
}

fn find_builtins(view: &ModuleView<'_>, options: &CheckOptions, sink: &mut DiagSink<'_>) -> BuiltinTypes {
    let mut find = |name: &str| -> Option<Type> {
        let Found::One(id) = view.names.find_struct(name) else {
            return None;
        };
        let decl = view.struct_decl(id);
        if decl.type_parameters.is_empty() {
            Some(Type::plain(id, Effect::Io))
        } else {
            if id.module == view.names.module {
                sink.report(
                    decl.span,
                    Diag::SpecialTypeShouldNotHaveTypeParameters {
                        name: name.to_string(),
                    },
                );
            }
            None
        }
    };

    BuiltinTypes {
        bool: find(&options.bool_name),
        string: find(&options.string_name),
        void: find(&options.void_name),
    }
}
