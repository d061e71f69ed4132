//! View lifecycle
//!
//! Applies or removes every registered view through a [`QueryExecutor`](crate::executor::QueryExecutor).

mod creator;
mod statements;

pub use creator::ViewCreator;
pub use statements::{create_view_statement, drop_view_statement};

use std::fmt;

/// Kind of lifecycle pass a statement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Setup,
    Clean,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Setup => f.write_str("setting up"),
            Operation::Clean => f.write_str("cleaning up"),
        }
    }
}
