//! Core types shared by the nz parser and compiler.
//!
//! This crate contains the vocabulary every later stage speaks:
//! - [`Span`] for source locations
//! - [`Effect`] for the capability tier attached to struct types
//! - [`ModulePath`] for naming documents
//! - [`Diag`], [`Diagnostic`] and [`Diagnostics`] for reporting problems

pub mod diagnostic;
pub mod effect;
pub mod module_path;
pub mod span;

pub use diagnostic::{Diag, Diagnostic, Diagnostics};
pub use effect::Effect;
pub use module_path::ModulePath;
pub use span::Span;

/// A name in nz source. Equality is string equality.
pub type Identifier = String;
