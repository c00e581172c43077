//! Type and declaration model.
//!
//! Pure data: declarations, the [`Type`] sum type, and the checked
//! [`Expression`] tree. Declarations refer to each other through typed ids
//! rather than references, so a module can be built in stages and stored
//! in a [`Program`] without lifetimes.

mod decls;
mod expr;
mod ids;
mod program;
mod types;

pub use decls::*;
pub use expr::*;
pub use ids::*;
pub use program::*;
pub use types::*;
