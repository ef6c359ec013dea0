//! The editor tree the compiler reads from.
//!
//! The block editor itself lives outside this crate. It hands over a tree of
//! blocks, which is flattened into a [`Workspace`] arena; the compiler only
//! ever reads from it.

pub mod conversion;
pub mod node;

pub use conversion::*;
pub use node::*;
