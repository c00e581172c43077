//! Integration tests for the multi-module compile pipeline.
//!
//! Sources are served from memory unless a test reads the `test_scripts`
//! directory on purpose.

use nz::model::{CalledDeclaration, Expression, FunDeclaration, Type};
use nz::{
    CompileOptions, CompileOutput, Diag, Effect, FileSystemDocumentProvider,
    MemoryDocumentProvider, ModulePath, SpecImpl, compile,
};
use std::path::PathBuf;

const PRELUDE: &str = "\
extern struct Bool \"bool\"
extern struct String \"const char*\"
extern struct Void \"void\"
extern struct Nat \"uint64_t\"

extern fun Nat literal(String s)
\t\"return strtoull(s, NULL, 10);\"

extern fun Bool eq(Nat a, Nat b)
\t\"return a == b;\"
";

/// A provider holding the prelude plus the given `(file, text)` pairs.
fn documents(files: &[(&str, &str)]) -> MemoryDocumentProvider {
    files
        .iter()
        .fold(MemoryDocumentProvider::new().with("prelude.nz", PRELUDE), |p, (name, text)| {
            p.with(*name, *text)
        })
}

fn build(provider: &MemoryDocumentProvider) -> CompileOutput {
    compile(provider, &ModulePath::parse("main"), &CompileOptions::default())
        .expect("monomorphization should not fail")
}

/// Compile `main.nz` importing the prelude and require a clean result.
fn build_main(source: &str) -> CompileOutput {
    let main = format!("import prelude\n\n{source}");
    let output = build(&documents(&[("main.nz", &main)]));
    assert!(output.is_clean(), "unexpected diagnostics:\n{}", output.diagnostics);
    output
}

fn diags(output: &CompileOutput) -> Vec<Diag> {
    output.diagnostics.iter().map(|d| d.diag.clone()).collect()
}

fn main_diags(source: &str) -> Vec<Diag> {
    let main = format!("import prelude\n\n{source}");
    diags(&build(&documents(&[("main.nz", &main)])))
}

fn fun<'o>(output: &'o CompileOutput, module: &str, name: &'o str) -> &'o FunDeclaration {
    output
        .module(&ModulePath::parse(module))
        .and_then(|m| m.funs_named(name).next())
        .unwrap_or_else(|| panic!("no function {module}::{name}"))
}

fn body_call<'o>(output: &'o CompileOutput, module: &str, name: &'o str) -> &'o nz::model::Call {
    match fun(output, module, name).expression() {
        Some(Expression::Call(call)) => call,
        other => panic!("expected a call in {name}, got {other:?}"),
    }
}

fn nat(output: &CompileOutput) -> Type {
    let prelude = output.module(&ModulePath::parse("prelude")).unwrap();
    Type::plain(prelude.struct_named("Nat").unwrap().id, Effect::Io)
}

// =============================================================================
// Overload resolution
// =============================================================================

#[test]
fn overload_selected_by_arity() {
    let output = build_main(
        "fun Nat add(Nat a, Nat b)\n\ta\n\nfun Nat add(Nat a, Nat b, Nat c)\n\tc\n\nfun Nat main()\n\tadd(1, 2)\n",
    );
    let call = body_call(&output, "main", "main");
    let CalledDeclaration::Fun(target) = call.called.declaration else {
        panic!("expected a function");
    };
    assert_eq!(output.program.fun(target).signature.arity(), 2);
}

#[test]
fn type_argument_inferred_from_expected_return() {
    let output = build_main("fun<T> T id(T x)\n\tx\n\nfun Nat main()\n\tid(5)\n");
    let call = body_call(&output, "main", "main");
    assert_eq!(call.called.type_arguments, vec![nat(&output)]);
}

#[test]
fn field_access_preferred_over_function() {
    let output = build_main(
        "struct Point\n\tNat x\n\tNat y\n\nfun Nat x()\n\t0\n\nfun Nat dot(Point p)\n\tp.x\n\nfun Nat unary(Point p)\n\tx(p)\n",
    );
    for name in ["dot", "unary"] {
        assert!(matches!(
            fun(&output, "main", name).expression(),
            Some(Expression::StructFieldAccess { field_index: 0, .. })
        ));
    }
}

#[test]
fn overloads_differing_only_in_names_are_ambiguous() {
    let diags = main_diags(
        "fun Nat pick(Nat first)\n\tfirst\n\nfun Nat pick(Nat second)\n\tsecond\n\nfun Nat main()\n\tpick(1)\n",
    );
    assert_eq!(
        diags,
        vec![Diag::AmbiguousCall {
            name: "pick".to_string(),
            count: 2
        }]
    );
}

#[test]
fn let_shadowing_parameter_is_reported() {
    let diags = main_diags("fun Nat main(Nat a)\n\ta = as<Nat>(1)\n\ta\n");
    assert_eq!(
        diags,
        vec![Diag::LocalShadowsParameter {
            name: "a".to_string()
        }]
    );
}

// =============================================================================
// Monomorphization
// =============================================================================

#[test]
fn equal_instantiations_share_identity() {
    let output = build_main(
        "fun<T> T id(T x)\n\tx\n\nfun Nat one()\n\tid(1)\n\nfun Nat two()\n\tid(2)\n",
    );
    let every = output.every_concrete_fun.as_ref().expect("monomorphized");

    let instance_of = |name: &str| {
        let caller = fun(&output, "main", name);
        let (id, _) = every.instantiations_of(caller.id).next().unwrap();
        every
            .resolved_call(id, body_call(&output, "main", name).site)
            .unwrap()
    };
    assert_eq!(instance_of("one"), instance_of("two"));

    let id = fun(&output, "main", "id").id;
    let instances: Vec<_> = every.instantiations_of(id).collect();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].1.type_arguments, vec![nat(&output)]);
}

#[test]
fn diagnostics_skip_monomorphization() {
    let main = "import prelude\n\nfun Nat main()\n\tmissing\n";
    let output = build(&documents(&[("main.nz", main)]));
    assert_eq!(
        diags(&output),
        vec![Diag::UnrecognizedParameterOrLocal {
            name: "missing".to_string()
        }]
    );
    assert!(output.every_concrete_fun.is_none());
}

/// A spec signature with its own type parameter is implemented by a generic
/// function that the spec's user never sees.
#[test]
fn generic_spec_implementation_instantiated_at_use() {
    let provider = documents(&[
        (
            "main.nz",
            "import prelude, lib, runner\n\nfun Nat main()\n\trun(as<Nat>(1))\n",
        ),
        (
            "runner.nz",
            "import prelude\n\nspec Ident<T>\n\t<U> U same(T t, U u)\n\nfun<T> T run(T x) with Ident<T>\n\tsame(x, x)\n",
        ),
        ("lib.nz", "import prelude\n\nfun<U> U same(Nat t, U u)\n\tu\n"),
    ]);
    let output = build(&provider);
    assert!(output.is_clean(), "{}", output.diagnostics);
    let every = output.every_concrete_fun.as_ref().unwrap();

    let same = fun(&output, "lib", "same").id;
    let run = fun(&output, "runner", "run").id;
    let (run_id, run_instance) = every.instantiations_of(run).next().unwrap();
    assert_eq!(run_instance.spec_impls, vec![vec![SpecImpl::Generic(same)]]);

    let target = every
        .resolved_call(run_id, body_call(&output, "runner", "run").site)
        .unwrap();
    assert_eq!(target.fun, same);
    assert_eq!(every.get(target).unwrap().type_arguments, vec![nat(&output)]);
}

// =============================================================================
// Modules and visibility
// =============================================================================

#[test]
fn imported_public_declarations_are_visible() {
    let provider = documents(&[
        ("main.nz", "import prelude, geometry\n\nfun Nat main()\n\tlength(Segment(1, 2))\n"),
        (
            "geometry.nz",
            "import prelude\n\nstruct Segment\n\tNat from\n\tNat to\n\nfun Nat length(Segment s)\n\ts.to\n",
        ),
    ]);
    let output = build(&provider);
    assert!(output.is_clean(), "{}", output.diagnostics);
    assert_eq!(output.program.modules().len(), 3);
}

#[test]
fn private_declarations_stay_in_their_module() {
    let provider = documents(&[
        ("main.nz", "import prelude, secrets\n\nfun Nat main(Hidden h)\n\t0\n"),
        ("secrets.nz", "import prelude\n\nprivate\nstruct Hidden\n\tNat n\n"),
    ]);
    let output = build(&provider);
    assert_eq!(
        diags(&output),
        vec![Diag::StructNameNotFound {
            name: "Hidden".to_string()
        }]
    );
}

#[test]
fn field_of_struct_from_unimported_module() {
    let provider = documents(&[
        (
            "main.nz",
            "import prelude, shapes\n\nfun Nat dot()\n\torigin.x\n\nfun Nat unary()\n\tx(origin())\n",
        ),
        ("shapes.nz", "import prelude, points\n\nfun Point origin()\n\tPoint(0)\n"),
        ("points.nz", "import prelude\n\nstruct Point\n\tNat x\n"),
    ]);
    let output = build(&provider);
    assert!(output.is_clean(), "{}", output.diagnostics);
    for name in ["dot", "unary"] {
        assert!(matches!(
            fun(&output, "main", name).expression(),
            Some(Expression::StructFieldAccess { field_index: 0, .. })
        ));
    }
}

#[test]
fn imports_are_not_transitive() {
    let provider = documents(&[
        ("main.nz", "import wrapper\n\nfun Nat main()\n\t0\n"),
        ("wrapper.nz", "import prelude\n"),
    ]);
    let output = build(&provider);
    assert!(
        output
            .diagnostics
            .any(|d| matches!(d, Diag::StructNameNotFound { name } if name == "Nat"))
    );
}

#[test]
fn same_struct_from_two_imports_is_ambiguous() {
    let provider = documents(&[
        ("main.nz", "import prelude, left, right\n\nfun Nat main(Pair p)\n\t0\n"),
        ("left.nz", "import prelude\n\nstruct Pair\n\tNat a\n"),
        ("right.nz", "import prelude\n\nstruct Pair\n\tNat b\n"),
    ]);
    let output = build(&provider);
    assert_eq!(
        diags(&output),
        vec![Diag::AmbiguousName {
            name: "Pair".to_string()
        }]
    );
}

#[test]
fn relative_import_resolves_from_directory() {
    let provider = documents(&[
        ("main.nz", "import prelude, app.start\n\nfun Nat main()\n\tbegin()\n"),
        ("app/start.nz", "import prelude, .helpers\n\nfun Nat begin()\n\thelp()\n"),
        ("app/helpers.nz", "import prelude\n\nfun Nat help()\n\t0\n"),
    ]);
    let output = build(&provider);
    assert!(output.is_clean(), "{}", output.diagnostics);
    assert!(output.module(&ModulePath::parse("app/helpers")).is_some());
}

#[test]
fn missing_import_reported_at_import() {
    let provider = documents(&[("main.nz", "import prelude, nowhere\n\nfun Nat main()\n\t0\n")]);
    let output = build(&provider);
    let found: Vec<_> = output.diagnostics.iter().collect();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].module, ModulePath::parse("main"));
    assert_eq!(
        found[0].diag,
        Diag::ImportNotFound {
            path: "nowhere".to_string()
        }
    );
}

#[test]
fn circular_imports_are_reported() {
    let provider = documents(&[
        ("main.nz", "import prelude, a\n"),
        ("a.nz", "import b\n"),
        ("b.nz", "import a\n"),
    ]);
    let output = build(&provider);
    assert_eq!(
        diags(&output),
        vec![Diag::CircularImport {
            path: "a".to_string()
        }]
    );
}

#[test]
fn parse_error_aborts_only_that_module() {
    let provider = documents(&[
        ("main.nz", "import prelude, bad\n\nfun Nat main()\n\t0\n"),
        ("bad.nz", "fun Nat oops(\n"),
    ]);
    let output = build(&provider);
    let parse_errors: Vec<_> = output
        .diagnostics
        .iter()
        .filter(|d| matches!(d.diag, Diag::Parse(_)))
        .collect();
    assert_eq!(parse_errors.len(), 1);
    assert_eq!(parse_errors[0].module, ModulePath::parse("bad"));
    assert!(output.module(&ModulePath::parse("prelude")).is_some());
    assert!(output.module(&ModulePath::parse("main")).is_none());
}

#[test]
fn custom_builtin_names() {
    let provider = MemoryDocumentProvider::new().with(
        "main.src",
        "extern struct Truth \"bool\"\nextern struct Unit \"void\"\n\nfun Unit main(Truth t)\n\tassert t\n",
    );
    let options = CompileOptions::new()
        .with_extension("src")
        .with_builtin_names("Truth", "Text", "Unit");
    let output = compile(&provider, &ModulePath::parse("main"), &options).unwrap();
    assert!(output.is_clean(), "{}", output.diagnostics);
}

// =============================================================================
// Documents on disk
// =============================================================================

fn scripts() -> FileSystemDocumentProvider {
    FileSystemDocumentProvider::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_scripts"))
}

#[test]
fn compiles_script_tree() {
    let output = compile(&scripts(), &ModulePath::parse("main"), &CompileOptions::default()).unwrap();
    assert!(output.is_clean(), "{}", output.diagnostics);

    let paths: Vec<String> = output
        .program
        .modules()
        .iter()
        .map(|m| m.path.to_string())
        .collect();
    assert_eq!(paths, ["prelude", "shapes/point", "shapes/show", "main"]);

    let every = output.every_concrete_fun.as_ref().unwrap();
    let describe = fun(&output, "shapes/show", "describe").id;
    assert_eq!(every.instantiations_of(describe).count(), 1);
}

#[test]
fn script_parse_error() {
    let output = compile(&scripts(), &ModulePath::parse("broken"), &CompileOptions::default()).unwrap();
    assert!(matches!(diags(&output).as_slice(), [Diag::Parse(_)]));
    assert!(output.program.modules().is_empty());
}
