//! # Katachi - Block Definition Compiler
//!
//! **Katachi** turns a block definition built in a visual block editor into
//! the two artifacts a block library needs: a declarative block schema (JSON)
//! and a stub of the code generator function for that block.
//!
//! ## Core Workflow
//!
//! 1.  **Load the editor tree**: Deserialize the editor's block tree into an
//!     [`workspace::EditorTree`], or implement [`workspace::IntoWorkspace`]
//!     for your own editor format.
//! 2.  **Compile**: The [`compiler::Compiler`] walks the definition's inputs
//!     and fields, resolves type constraints, and assembles a
//!     [`schema::BlockDescriptor`].
//! 3.  **Render**: The schema is interpolated into a
//!     [`render::BlockInstance`], the structural view of the block.
//! 4.  **Generate**: The [`generator::StubGenerator`] emits one accessor per
//!     field and input plus a function skeleton for the target language.
//!
//! [`factory::Factory`] runs all of this as one pass per editor change.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use katachi::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let tree = EditorTree::from_json(&std::fs::read_to_string("block.json")?)?;
//!     let workspace = tree.into_workspace()?;
//!
//!     let mut factory = Factory::new(FactoryConfig {
//!         language: TargetLanguage::Python,
//!         ..Default::default()
//!     });
//!
//!     if let Some(output) = factory.update(&workspace)? {
//!         println!("{}", output.schema);
//!         if let Some(stub) = &output.stub {
//!             println!("{}", stub);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod factory;
pub mod generator;
pub mod prelude;
pub mod preview;
pub mod render;
pub mod schema;
pub mod workspace;

#[cfg(feature = "python-bindings")]
mod python;
