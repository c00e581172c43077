//! nz compiler
//!
//! Semantic checking and monomorphization for nz.
//!
//! ## Architecture
//!
//! - **Headers**: register struct, spec and function names per module
//! - **Bodies**: resolve every written type in declarations
//! - **Check**: type check function bodies, resolving overloads and spec calls
//! - **Monomorphize**: collect every concrete instantiation reachable from
//!   non-generic functions
//!
//! ## Modules
//!
//! - [`model`]: Declarations, types and the typed expression tree
//! - [`matching`]: Type equality, matching and inference
//! - [`check`]: The three module passes
//! - [`monomorphize`]: Whole-program instantiation

pub mod check;
pub mod matching;
pub mod model;
pub mod monomorphize;

#[cfg(test)]
mod test_support;

pub use check::{CheckOptions, Expected, Typed, check_module};
pub use model::{Module, Program};
pub use monomorphize::{
    ConcreteFun, ConcreteFunId, EveryConcreteFun, MonomorphizeError, SpecImpl, monomorphize,
};
