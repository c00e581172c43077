//! # nz
//!
//! A compiler front end for nz, a small language with generic structs,
//! overloaded functions, specs (constraints on type parameters satisfied by
//! functions in scope) and effect-qualified types.
//!
//! The crates in this workspace split the work:
//! - `nz-core`: spans, effects, module paths and diagnostics
//! - `nz-parser`: the lexer and parser
//! - `nz-compiler`: checking and monomorphization
//!
//! This crate ties them together: it reads documents through a
//! [`DocumentProvider`], follows imports and runs every pass.
//!
//! ```
//! use nz::{CompileOptions, MemoryDocumentProvider, ModulePath, compile};
//!
//! let provider = MemoryDocumentProvider::new().with(
//!     "main.nz",
//!     "extern struct Void \"void\"\n\nfun Void main()\n\tpass\n",
//! );
//! let output = compile(&provider, &ModulePath::parse("main"), &CompileOptions::default()).unwrap();
//! assert!(output.is_clean());
//! assert_eq!(output.every_concrete_fun.map(|every| every.len()), Some(1));
//! ```

pub mod error;
pub mod host;
pub mod options;
pub mod unit;

pub use error::CompileError;
pub use host::{DocumentProvider, FileSystemDocumentProvider, MemoryDocumentProvider};
pub use options::CompileOptions;
pub use unit::{CompileOutput, compile};

pub use nz_compiler::model;
pub use nz_compiler::{
    CheckOptions, ConcreteFun, ConcreteFunId, EveryConcreteFun, Module, MonomorphizeError, Program,
    SpecImpl,
};
pub use nz_core::{Diag, Diagnostic, Diagnostics, Effect, ModulePath, Span};
pub use nz_parser::{ParseError, ParseErrorKind};
