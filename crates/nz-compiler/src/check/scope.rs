//! Name lookup across the module being checked and its imports.

use nz_core::{Identifier, ModulePath, Span};
use nz_core::{Diag, Diagnostics};
use rustc_hash::FxHashSet;

use crate::model::{
    Declarations, FunId, FunSignature, Module, ModuleId, Program, SpecDeclaration, SpecId,
    StructDeclaration, StructId, Tables,
};

use super::ModuleDecls;

/// Outcome of looking up a name that must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found<T> {
    One(T),
    Missing,
    /// More than one imported module exports the name.
    Ambiguous,
}

/// Resolves names to ids. The current module's own tables win over
/// imports; imported declarations are visible only when public.
#[derive(Clone, Copy)]
pub struct NameScope<'a> {
    pub program: &'a Program,
    pub module: ModuleId,
    pub tables: &'a Tables,
    pub imports: &'a [ModuleId],
}

impl<'a> NameScope<'a> {
    pub fn find_struct(&self, name: &str) -> Found<StructId> {
        if let Some(id) = self.tables.structs.get(name) {
            return Found::One(*id);
        }
        self.find_imported(|m| {
            m.tables
                .structs
                .get(name)
                .copied()
                .filter(|id| m.structs[id.slot()].is_public)
        })
    }

    pub fn find_spec(&self, name: &str) -> Found<SpecId> {
        if let Some(id) = self.tables.specs.get(name) {
            return Found::One(*id);
        }
        self.find_imported(|m| {
            m.tables
                .specs
                .get(name)
                .copied()
                .filter(|id| m.specs[id.slot()].is_public)
        })
    }

    fn find_imported<T: Copy + PartialEq>(&self, lookup: impl Fn(&Module) -> Option<T>) -> Found<T> {
        let mut found = None;
        for &import in self.imports {
            if let Some(id) = lookup(self.program.module(import)) {
                if found.is_some_and(|prev| prev != id) {
                    return Found::Ambiguous;
                }
                found = Some(id);
            }
        }
        found.map_or(Found::Missing, Found::One)
    }

    /// The overload group for `name`: local functions, then public imported ones.
    pub fn funs_named(&self, name: &str) -> Vec<FunId> {
        let mut funs = self.tables.funs.get(name).cloned().unwrap_or_default();
        for &import in self.imports {
            let module = self.program.module(import);
            if let Some(group) = module.tables.funs.get(name) {
                funs.extend(group.iter().filter(|id| module.funs[id.slot()].is_public));
            }
        }
        funs
    }

    pub fn has_fun_named(&self, name: &str) -> bool {
        !self.funs_named(name).is_empty()
    }
}

/// Everything visible while checking function bodies: finished modules plus
/// the declarations of the module being checked.
pub struct ModuleView<'a> {
    pub names: NameScope<'a>,
    pub decls: &'a ModuleDecls,
}

impl<'a> ModuleView<'a> {
    /// Field names of every struct in the program so far, for the field
    /// access fast path. A value can reach this module through a function
    /// whose struct it cannot name, so visibility does not matter here.
    pub fn known_field_names(&self) -> FxHashSet<Identifier> {
        let checked = self
            .names
            .program
            .modules()
            .iter()
            .flat_map(|m| m.structs.iter());
        checked
            .chain(self.decls.structs.iter())
            .flat_map(|strukt| strukt.fields().unwrap_or_default())
            .map(|field| field.name.clone())
            .collect()
    }
}

impl Declarations for ModuleView<'_> {
    fn struct_decl(&self, id: StructId) -> &StructDeclaration {
        if id.module == self.names.module {
            &self.decls.structs[id.slot()]
        } else {
            self.names.program.struct_decl(id)
        }
    }

    fn spec_decl(&self, id: SpecId) -> &SpecDeclaration {
        if id.module == self.names.module {
            &self.decls.specs[id.slot()]
        } else {
            self.names.program.spec_decl(id)
        }
    }

    fn fun_signature(&self, id: FunId) -> &FunSignature {
        if id.module == self.names.module {
            &self.decls.signatures[id.slot()]
        } else {
            self.names.program.fun_signature(id)
        }
    }
}

/// Appends diagnostics for one module.
pub struct DiagSink<'d> {
    path: ModulePath,
    diags: &'d mut Diagnostics,
}

impl<'d> DiagSink<'d> {
    pub fn new(path: ModulePath, diags: &'d mut Diagnostics) -> Self {
        Self { path, diags }
    }

    pub fn report(&mut self, span: Span, diag: Diag) {
        log::debug!("{}:{}: {}", self.path, span, diag);
        self.diags.push(&self.path, span, diag);
    }

    pub fn reborrow(&mut self) -> DiagSink<'_> {
        DiagSink {
            path: self.path.clone(),
            diags: &mut *self.diags,
        }
    }

    pub fn path(&self) -> &ModulePath {
        &self.path
    }
}
