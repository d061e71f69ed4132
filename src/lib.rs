//! View Creator Library
//!
//! Keeps a registry of named SQL view definitions and applies or removes
//! them against PostgreSQL in concurrent setup and clean passes.

pub mod config;
pub mod error;
pub mod executor;
pub mod lifecycle;
pub mod registry;

pub use config::ConnectionParams;
pub use error::{ExecutorError, Result, ViewError};
pub use executor::{PostgresExecutor, QueryExecutor};
pub use lifecycle::{Operation, ViewCreator};
pub use registry::{DefinitionLoader, DefinitionState, ViewRegistry};
