//! Modules, the whole-program store, and read access to declarations.

use nz_core::{Identifier, ModulePath};
use rustc_hash::FxHashMap;

use super::{
    FunDeclaration, FunId, FunSignature, GenericOwner, ModuleId, SpecDeclaration, SpecId,
    StructDeclaration, StructId, Type, TypeParamId,
};

/// Per-module name indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
    pub structs: FxHashMap<Identifier, StructId>,
    pub specs: FxHashMap<Identifier, SpecId>,
    /// Every function sharing a name forms one overload group.
    pub funs: FxHashMap<Identifier, Vec<FunId>>,
}

/// The structs the checker gives special meaning to.
///
/// Each is absent when no visible struct has the configured name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltinTypes {
    pub bool: Option<Type>,
    pub string: Option<Type>,
    pub void: Option<Type>,
}

/// A checked module.
#[derive(Debug, Clone)]
pub struct Module {
    pub id: ModuleId,
    pub path: ModulePath,
    /// Directly imported modules, whose public declarations are visible.
    pub imports: Vec<ModuleId>,
    pub structs: Vec<StructDeclaration>,
    pub specs: Vec<SpecDeclaration>,
    pub funs: Vec<FunDeclaration>,
    pub tables: Tables,
    pub builtins: BuiltinTypes,
}

impl Module {
    /// The functions named `name`, in declaration order.
    pub fn funs_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FunDeclaration> {
        self.funs.iter().filter(move |f| f.signature.name == name)
    }

    pub fn struct_named(&self, name: &str) -> Option<&StructDeclaration> {
        self.tables
            .structs
            .get(name)
            .map(|id| &self.structs[id.slot()])
    }
}

/// Every checked module, in dependency order.
#[derive(Debug, Clone, Default)]
pub struct Program {
    modules: Vec<Module>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next pushed module will get.
    pub fn next_module_id(&self) -> ModuleId {
        ModuleId(self.modules.len() as u32)
    }

    pub fn push(&mut self, module: Module) {
        debug_assert_eq!(module.id, self.next_module_id());
        self.modules.push(module);
    }

    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module_by_path(&self, path: &ModulePath) -> Option<&Module> {
        self.modules.iter().find(|m| &m.path == path)
    }

    pub fn fun(&self, id: FunId) -> &FunDeclaration {
        &self.module(id.module).funs[id.slot()]
    }

    pub fn funs(&self) -> impl Iterator<Item = &FunDeclaration> {
        self.modules.iter().flat_map(|m| m.funs.iter())
    }
}

/// Read access to declarations by id.
///
/// Implemented by [`Program`] for finished modules, and by the checker's
/// module view, which also sees the module being checked.
pub trait Declarations {
    fn struct_decl(&self, id: StructId) -> &StructDeclaration;
    fn spec_decl(&self, id: SpecId) -> &SpecDeclaration;
    fn fun_signature(&self, id: FunId) -> &FunSignature;

    fn type_parameter_name(&self, id: TypeParamId) -> &str {
        let list = match id.owner {
            GenericOwner::Struct(s) => &self.struct_decl(s).type_parameters,
            GenericOwner::Spec(s) => &self.spec_decl(s).type_parameters,
            GenericOwner::SpecSignature(s, index) => {
                &self.spec_decl(s).signatures[index as usize].type_parameters
            }
            GenericOwner::Fun(f) => &self.fun_signature(f).type_parameters,
        };
        list.get(id.slot()).map(|p| p.name.as_str()).unwrap_or("?")
    }

    /// Render a type the way it would be written in source.
    fn describe_type(&self, ty: &Type) -> String {
        match ty {
            Type::Bogus => "<bogus>".to_string(),
            Type::Param(param) => self.type_parameter_name(*param).to_string(),
            Type::Struct(inst) => {
                let mut out = format!("{} {}", inst.effect, self.struct_decl(inst.strukt).name);
                if !inst.type_arguments.is_empty() {
                    let args: Vec<_> = inst
                        .type_arguments
                        .iter()
                        .map(|arg| self.describe_type(arg))
                        .collect();
                    out.push('<');
                    out.push_str(&args.join(", "));
                    out.push('>');
                }
                out
            }
        }
    }
}

impl Declarations for Program {
    fn struct_decl(&self, id: StructId) -> &StructDeclaration {
        &self.module(id.module).structs[id.slot()]
    }

    fn spec_decl(&self, id: SpecId) -> &SpecDeclaration {
        &self.module(id.module).specs[id.slot()]
    }

    fn fun_signature(&self, id: FunId) -> &FunSignature {
        &self.fun(id).signature
    }
}
