//! First pass: register every declaration name in the module's tables.

use nz_core::{Diag, Identifier, Span};
use nz_parser::ast::{File, TypeParamDecl};

use super::scope::{DiagSink, Found, NameScope};
use crate::model::{
    FunId, GenericOwner, ModuleId, Program, SpecId, StructId, Tables, TypeParameter,
    type_parameters_for,
};

/// A struct or spec known by name and type parameters, body still unchecked.
#[derive(Debug, Clone)]
pub struct Header<Id> {
    pub id: Id,
    pub name: Identifier,
    pub span: Span,
    pub is_public: bool,
    pub type_parameters: Vec<TypeParameter>,
}

/// Output of [`declare_headers`].
#[derive(Debug, Clone)]
pub struct Headers {
    pub tables: Tables,
    pub structs: Vec<Header<StructId>>,
    pub specs: Vec<Header<SpecId>>,
}

/// Build the struct, spec and function tables for `file`.
///
/// Ids follow source order within each kind, so later passes can walk the
/// file again and line up with the headers.
pub fn declare_headers(
    file: &File<'_>,
    module: ModuleId,
    program: &Program,
    imports: &[ModuleId],
    sink: &mut DiagSink<'_>,
) -> Headers {
    let mut tables = Tables::default();

    for (index, decl) in file.structs().enumerate() {
        let id = StructId::new(module, index);
        if tables.structs.contains_key(decl.name) {
            sink.report(decl.span, duplicate(decl.name));
        } else {
            tables.structs.insert(decl.name.to_string(), id);
        }
    }

    for (index, decl) in file.specs().enumerate() {
        let id = SpecId::new(module, index);
        if tables.specs.contains_key(decl.name) {
            sink.report(decl.span, duplicate(decl.name));
        } else {
            tables.specs.insert(decl.name.to_string(), id);
        }
    }

    for (index, decl) in file.funs().enumerate() {
        tables
            .funs
            .entry(decl.signature.name.to_string())
            .or_default()
            .push(FunId::new(module, index));
    }

    let names = NameScope {
        program,
        module,
        tables: &tables,
        imports,
    };

    let structs = file
        .structs()
        .enumerate()
        .map(|(index, decl)| {
            let id = StructId::new(module, index);
            Header {
                id,
                name: decl.name.to_string(),
                span: decl.span,
                is_public: decl.is_public,
                type_parameters: declare_type_parameters(
                    decl.type_params,
                    GenericOwner::Struct(id),
                    &[],
                    &names,
                    sink,
                ),
            }
        })
        .collect();

    let specs = file
        .specs()
        .enumerate()
        .map(|(index, decl)| {
            let id = SpecId::new(module, index);
            Header {
                id,
                name: decl.name.to_string(),
                span: decl.span,
                is_public: decl.is_public,
                type_parameters: declare_type_parameters(
                    decl.type_params,
                    GenericOwner::Spec(id),
                    &[],
                    &names,
                    sink,
                ),
            }
        })
        .collect();

    Headers {
        tables,
        structs,
        specs,
    }
}

fn duplicate(name: &str) -> Diag {
    Diag::DuplicateDeclaration {
        name: name.to_string(),
    }
}

/// Create the type parameters of one declaration.
///
/// `outer` holds the lists already in scope, which for a spec signature is
/// the spec's own list.
pub(crate) fn declare_type_parameters(
    params: &[TypeParamDecl<'_>],
    owner: GenericOwner,
    outer: &[&[TypeParameter]],
    names: &NameScope<'_>,
    sink: &mut DiagSink<'_>,
) -> Vec<TypeParameter> {
    for (index, param) in params.iter().enumerate() {
        let name = param.name.to_string();
        if params[..index].iter().any(|p| p.name == param.name) {
            sink.report(param.span, Diag::TypeParameterShadowsPrevious { name });
        } else if outer.iter().any(|list| list.iter().any(|p| p.name == param.name)) {
            sink.report(param.span, Diag::TypeParameterShadowsSpecTypeParameter { name });
        } else if !matches!(names.find_struct(param.name), Found::Missing) {
            sink.report(param.span, Diag::TypeParameterShadowsStruct { name });
        }
    }
    type_parameters_for(owner, params.iter().map(|p| (p.name.to_string(), p.span)))
}
