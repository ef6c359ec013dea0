//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the katachi crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use katachi::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let tree = EditorTree::from_json(&std::fs::read_to_string("path/to/block.json")?)?;
//! let workspace = tree.into_workspace()?;
//!
//! let descriptor = Compiler::default().compile(&workspace)?;
//! let instance = BlockInstance::from_descriptor(&descriptor)?;
//! let stub = StubGenerator::new(TargetLanguage::JavaScript).generate(&instance);
//!
//! println!("{}\n\n{}", descriptor.to_json()?, stub);
//! # Ok(())
//! # }
//! ```

// Pipeline
pub use crate::compiler::{Compiler, TypeExpression, block_type_name};
pub use crate::factory::{Factory, FactoryOutput};
pub use crate::generator::{StubGenerator, TargetLanguage};
pub use crate::preview::{Preview, PreviewFormat, render_preview};
pub use crate::render::{BlockInstance, BlockRegistry, FieldKind};

// Data structures
pub use crate::config::FactoryConfig;
pub use crate::schema::{
    Align, Arg, BlockDescriptor, Connections, Constraint, FieldArg, InputArg, InputKind,
};
pub use crate::workspace::{
    EditorTree, IntoWorkspace, Node, NodeId, NodeKind, TreeConverter, Workspace,
};

// Error types
pub use crate::error::{GenerationError, WorkspaceConversionError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
