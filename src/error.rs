use crate::lifecycle::Operation;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Duplicate registration of view {name}.")]
    DuplicateDefinition { name: String },

    #[error("Invalid definition for view {name}: {definition}.")]
    InvalidDefinition { name: String, definition: String },

    #[error("Invalid view name: {name:?}")]
    InvalidName { name: String },

    #[error("Error {operation} '{name}': {source}")]
    QueryExecution {
        operation: Operation,
        name: String,
        #[source]
        source: ExecutorError,
    },

    #[error("Task for view '{name}' did not complete: {cause}")]
    TaskFailed { name: String, cause: String },

    #[error("Connection failed: {source}")]
    ConnectionFailed {
        #[source]
        source: ExecutorError,
    },

    #[error("Failed to load definitions from {path:?}: {cause}")]
    LoadFailed { path: PathBuf, cause: String },
}

impl ViewError {
    /// Name of the view this error refers to, if any.
    pub fn view_name(&self) -> Option<&str> {
        match self {
            ViewError::DuplicateDefinition { name }
            | ViewError::InvalidDefinition { name, .. }
            | ViewError::InvalidName { name }
            | ViewError::QueryExecution { name, .. }
            | ViewError::TaskFailed { name, .. } => Some(name),
            ViewError::ConnectionFailed { .. } | ViewError::LoadFailed { .. } => None,
        }
    }

    /// The executor error behind a `QueryExecution` failure.
    pub fn cause(&self) -> Option<&ExecutorError> {
        match self {
            ViewError::QueryExecution { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Unwraps the executor error, handing back `self` for any other variant.
    pub fn into_cause(self) -> std::result::Result<ExecutorError, ViewError> {
        match self {
            ViewError::QueryExecution { source, .. } => Ok(source),
            other => Err(other),
        }
    }
}

/// Failure reported by a [`QueryExecutor`](crate::executor::QueryExecutor).
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("{}", postgres_message(.0))]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("{0}")]
    Message(String),
}

impl ExecutorError {
    pub fn message(msg: impl Into<String>) -> Self {
        ExecutorError::Message(msg.into())
    }
}

/// The server's own message for database errors, the client's description otherwise
fn postgres_message(err: &tokio_postgres::Error) -> String {
    match err.as_db_error() {
        Some(db_err) => db_err.message().to_string(),
        None => err.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_query_execution_message() {
        let err = ViewError::QueryExecution {
            operation: Operation::Setup,
            name: "b".to_string(),
            source: ExecutorError::message("syntax error"),
        };

        assert_eq!(err.to_string(), "Error setting up 'b': syntax error");
        assert_eq!(err.view_name(), Some("b"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("syntax error".to_string()));

        let cause = err.into_cause().unwrap();
        assert!(matches!(cause, ExecutorError::Message(ref m) if m == "syntax error"));
    }

    #[test]
    fn test_registration_messages() {
        let dup = ViewError::DuplicateDefinition {
            name: "active_users".to_string(),
        };
        assert_eq!(dup.to_string(), "Duplicate registration of view active_users.");
        assert!(dup.cause().is_none());

        let invalid = ViewError::InvalidDefinition {
            name: "active_users".to_string(),
            definition: "123".to_string(),
        };
        assert_eq!(invalid.to_string(), "Invalid definition for view active_users: 123.");
    }
}
