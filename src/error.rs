//! Errors from the compile driver.

use nz_compiler::MonomorphizeError;
use thiserror::Error;

/// A failure that is not a problem in the source text.
///
/// Source problems are reported as diagnostics instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("monomorphization failed: {0}")]
    Monomorphize(#[from] MonomorphizeError),
}
