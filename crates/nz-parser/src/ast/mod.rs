//! Abstract syntax tree for nz source.
//!
//! All nodes are allocated in a [`bumpalo::Bump`] arena and borrow from it
//! through the `'ast` lifetime. Nodes are `Copy`: they only hold arena
//! references, so nothing in the tree needs dropping.

mod decl;
mod expr;
mod types;

pub use decl::*;
pub use expr::*;
pub use types::*;
