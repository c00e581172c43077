//! Multi-module compilation.
//!
//! [`compile`] loads the root document and everything it imports, checks the
//! modules so that every import is checked before its importer, and, when
//! no diagnostics were reported, computes every concrete instantiation.
//!
//! # Example
//!
//! ```
//! use nz::{CompileOptions, MemoryDocumentProvider, ModulePath, compile};
//!
//! let provider = MemoryDocumentProvider::new()
//!     .with("main.nz", "import lib\n\nfun Void main()\n\tpass\n")
//!     .with("lib.nz", "extern struct Void \"void\"\n");
//!
//! let output = compile(&provider, &ModulePath::parse("main"), &CompileOptions::default()).unwrap();
//! assert!(output.is_clean());
//! assert_eq!(output.program.modules().len(), 2);
//! ```

use std::collections::VecDeque;

use bumpalo::Bump;
use indexmap::IndexMap;
use nz_compiler::model::ModuleId;
use nz_compiler::{EveryConcreteFun, Module, Program, check_module, monomorphize};
use nz_core::{Diag, Diagnostics, ModulePath, Span};
use nz_parser::Parser;
use nz_parser::ast::File;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};

use crate::error::CompileError;
use crate::host::DocumentProvider;
use crate::options::CompileOptions;

/// Everything produced by one [`compile`] call.
#[derive(Debug)]
pub struct CompileOutput {
    /// Checked modules, imports before importers.
    pub program: Program,
    pub diagnostics: Diagnostics,
    /// Present when monomorphization ran, which requires a clean check.
    pub every_concrete_fun: Option<EveryConcreteFun>,
}

impl CompileOutput {
    /// No diagnostics were reported.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn module(&self, path: &ModulePath) -> Option<&Module> {
        self.program.module_by_path(path)
    }
}

/// A parsed document and the modules it imports.
struct LoadedModule<'ast> {
    file: File<'ast>,
    imports: Vec<(ModulePath, Span)>,
}

type LoadOrder<'ast> = IndexMap<ModulePath, LoadedModule<'ast>, FxBuildHasher>;

/// Compile the module at `root` and its imports.
///
/// Problems in the source end up in [`CompileOutput::diagnostics`]. An
/// error is returned only when monomorphization finds the checked program
/// inconsistent.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(
    provider: &dyn DocumentProvider,
    root: &ModulePath,
    options: &CompileOptions,
) -> Result<CompileOutput, CompileError> {
    log::debug!("compiling {root}");

    // Source text and syntax trees for the whole compile live here.
    let arena = Bump::new();
    let mut diagnostics = Diagnostics::new();

    let loaded = load_modules(provider, root, options, &arena, &mut diagnostics);
    let order = dependency_order(root, &loaded, &mut diagnostics);
    let program = check_in_order(&loaded, &order, options, &mut diagnostics);

    let every_concrete_fun = if options.monomorphize && diagnostics.is_empty() {
        let every = monomorphize(&program)?;
        log::debug!("{} concrete function(s)", every.len());
        Some(every)
    } else {
        None
    };

    log::debug!(
        "compiled {} module(s) with {} diagnostic(s)",
        program.modules().len(),
        diagnostics.len()
    );

    Ok(CompileOutput {
        program,
        diagnostics,
        every_concrete_fun,
    })
}

/// Read and parse every module reachable from `root`, breadth first.
///
/// Each document is parsed at most once. A document that fails to parse is
/// reported and left out.
fn load_modules<'ast>(
    provider: &dyn DocumentProvider,
    root: &ModulePath,
    options: &CompileOptions,
    arena: &'ast Bump,
    diagnostics: &mut Diagnostics,
) -> LoadOrder<'ast> {
    let mut loaded = LoadOrder::default();
    let mut queued = FxHashSet::default();
    queued.insert(root.clone());

    // Each entry remembers the import that asked for it.
    let mut queue: VecDeque<(ModulePath, Option<(ModulePath, Span)>)> =
        VecDeque::from([(root.clone(), None)]);

    while let Some((path, requested_by)) = queue.pop_front() {
        let Some(text) = provider.try_get_document(&path, &options.extension) else {
            let (at, span) = requested_by.unwrap_or_else(|| (path.clone(), Span::default()));
            diagnostics.push(
                &at,
                span,
                Diag::ImportNotFound {
                    path: path.to_string(),
                },
            );
            continue;
        };

        let text = arena.alloc_str(&text);
        let file = match Parser::parse_file(text, arena) {
            Ok(file) => file,
            Err(err) => {
                log::debug!("{path} failed to parse: {err}");
                diagnostics.push(&path, err.span, Diag::Parse(err.to_string()));
                continue;
            }
        };

        let mut imports = Vec::with_capacity(file.imports.len());
        for import in file.imports {
            let segments: Vec<String> = import.segments.iter().map(|s| s.to_string()).collect();
            match path.resolve_import(import.parents, &segments) {
                Some(target) => {
                    if queued.insert(target.clone()) {
                        queue.push_back((target.clone(), Some((path.clone(), import.span))));
                    }
                    imports.push((target, import.span));
                }
                None => diagnostics.push(
                    &path,
                    import.span,
                    Diag::ImportNotFound {
                        path: format!("{}{}", ".".repeat(import.parents as usize), segments.join(".")),
                    },
                ),
            }
        }

        log::trace!("loaded {path} with {} import(s)", imports.len());
        loaded.insert(path, LoadedModule { file, imports });
    }

    loaded
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Order loaded modules so that imports come before importers.
///
/// An import that leads back to a module still being visited is reported
/// as circular at the import site.
fn dependency_order(
    root: &ModulePath,
    loaded: &LoadOrder<'_>,
    diagnostics: &mut Diagnostics,
) -> Vec<ModulePath> {
    let mut marks = FxHashMap::default();
    let mut order = Vec::with_capacity(loaded.len());
    visit(root, loaded, &mut marks, &mut order, diagnostics);
    order
}

fn visit(
    path: &ModulePath,
    loaded: &LoadOrder<'_>,
    marks: &mut FxHashMap<ModulePath, Mark>,
    order: &mut Vec<ModulePath>,
    diagnostics: &mut Diagnostics,
) {
    let Some(module) = loaded.get(path) else {
        return;
    };
    marks.insert(path.clone(), Mark::Visiting);

    for (import, span) in &module.imports {
        match marks.get(import) {
            Some(Mark::Visiting) => diagnostics.push(
                path,
                *span,
                Diag::CircularImport {
                    path: import.to_string(),
                },
            ),
            Some(Mark::Done) => {}
            None => visit(import, loaded, marks, order, diagnostics),
        }
    }

    marks.insert(path.clone(), Mark::Done);
    order.push(path.clone());
}

/// Check modules in dependency order.
///
/// A module whose imports did not all get checked is skipped; whatever
/// kept the import out has already been reported.
fn check_in_order(
    loaded: &LoadOrder<'_>,
    order: &[ModulePath],
    options: &CompileOptions,
    diagnostics: &mut Diagnostics,
) -> Program {
    let mut program = Program::new();
    let mut checked: FxHashMap<&ModulePath, ModuleId> = FxHashMap::default();

    for path in order {
        let Some(module) = loaded.get(path) else {
            continue;
        };

        let imports: Option<Vec<ModuleId>> = module
            .imports
            .iter()
            .map(|(import, _)| checked.get(import).copied())
            .collect();
        let Some(mut imports) = imports else {
            log::debug!("skipping {path}, an import was not checked");
            continue;
        };
        // A module imported twice is still one import.
        let mut seen = FxHashSet::default();
        imports.retain(|id| seen.insert(*id));

        let module = check_module(
            &module.file,
            path.clone(),
            imports,
            &program,
            &options.check,
            diagnostics,
        );
        checked.insert(path, module.id);
        program.push(module);
    }

    program
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryDocumentProvider;

    const VOID: &str = "extern struct Void \"void\"\n";

    fn run(provider: &MemoryDocumentProvider) -> CompileOutput {
        compile(provider, &ModulePath::parse("main"), &CompileOptions::default())
            .expect("monomorphize should succeed")
    }

    #[test]
    fn imports_checked_first() {
        let provider = MemoryDocumentProvider::new()
            .with("main.nz", "import a\nimport b\n")
            .with("a.nz", "import b\n")
            .with("b.nz", VOID);
        let output = run(&provider);
        assert!(output.is_clean(), "{}", output.diagnostics);

        let paths: Vec<String> = output
            .program
            .modules()
            .iter()
            .map(|m| m.path.to_string())
            .collect();
        assert_eq!(paths, ["b", "a", "main"]);
    }

    #[test]
    fn missing_root() {
        let output = run(&MemoryDocumentProvider::new());
        let diags: Vec<_> = output.diagnostics.iter().map(|d| &d.diag).collect();
        assert_eq!(
            diags,
            [&Diag::ImportNotFound {
                path: "main".to_string()
            }]
        );
        assert!(output.program.modules().is_empty());
    }

    #[test]
    fn import_above_root() {
        let provider = MemoryDocumentProvider::new().with("main.nz", "import ..up\n");
        let output = run(&provider);
        assert!(output.diagnostics.any(|d| matches!(d, Diag::ImportNotFound { .. })));
    }

    #[test]
    fn cycle_reported_once() {
        let provider = MemoryDocumentProvider::new()
            .with("main.nz", "import a\n")
            .with("a.nz", "import main\n");
        let output = run(&provider);
        let cycles: Vec<_> = output
            .diagnostics
            .iter()
            .filter(|d| matches!(d.diag, Diag::CircularImport { .. }))
            .collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].module, ModulePath::parse("a"));
        assert!(output.every_concrete_fun.is_none());
    }

    #[test]
    fn no_monomorphize_when_disabled() {
        let provider = MemoryDocumentProvider::new().with("main.nz", VOID);
        let output = compile(
            &provider,
            &ModulePath::parse("main"),
            &CompileOptions::default().with_monomorphize(false),
        )
        .unwrap();
        assert!(output.is_clean());
        assert!(output.every_concrete_fun.is_none());
    }
}
