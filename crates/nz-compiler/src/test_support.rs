//! Helpers for checking nz source in unit tests.

use bumpalo::Bump;
use nz_core::{Diag, Diagnostics, ModulePath};
use nz_parser::Parser;

use crate::check::{CheckOptions, check_module};
use crate::model::{FunDeclaration, Module, Program};

/// Structs and functions most tests rely on.
pub const PRELUDE: &str = "\
extern struct Bool \"bool\"
extern struct String \"const char*\"
extern struct Void \"void\"
extern struct Nat \"uint64_t\"

extern fun Nat literal(String s)
\t\"return atoll(s);\"

extern fun Bool eq(Nat a, Nat b)
\t\"return a == b;\"
";

/// Check `source` after [`PRELUDE`] as a single module.
pub fn check_source(source: &str) -> (Program, Diagnostics) {
    check_text(&format!("{PRELUDE}\n{source}"))
}

/// Check `text` as a single module, without the prelude.
pub fn check_text(text: &str) -> (Program, Diagnostics) {
    let arena = Bump::new();
    let file = Parser::parse_file(text, &arena).expect("test source should parse");

    let mut program = Program::new();
    let mut diags = Diagnostics::new();
    let module = check_module(
        &file,
        ModulePath::parse("main"),
        Vec::new(),
        &program,
        &CheckOptions::default(),
        &mut diags,
    );
    program.push(module);
    (program, diags)
}

/// Check and require no diagnostics.
pub fn check_clean(source: &str) -> Program {
    let (program, diags) = check_source(source);
    assert!(diags.is_empty(), "unexpected diagnostics:\n{diags}");
    program
}

/// The diagnostics of `source`, without location.
pub fn diags_of(source: &str) -> Vec<Diag> {
    let (_, diags) = check_source(source);
    diags.into_vec().into_iter().map(|d| d.diag).collect()
}

pub fn module(program: &Program) -> &Module {
    &program.modules()[0]
}

/// The only function named `name`.
pub fn fun<'p>(program: &'p Program, name: &'p str) -> &'p FunDeclaration {
    let mut found = module(program).funs_named(name);
    let fun = found.next().expect("function should exist");
    assert!(found.next().is_none(), "more than one '{name}'");
    fun
}
