//! View definition registry
//!
//! Holds the named SQL bodies a [`ViewCreator`](crate::lifecycle::ViewCreator)
//! applies to or removes from the database.

mod definitions;
mod loader;

pub use definitions::{normalize_definition, DefinitionState, ViewRegistry};
pub use loader::DefinitionLoader;
