//! The block schema produced by the compiler and consumed by the preview.

pub mod descriptor;
pub mod number;

pub use descriptor::*;
