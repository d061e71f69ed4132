//! Query executor seam
//!
//! The orchestrator only needs a way to send one SQL statement to the
//! database and learn whether it succeeded.

mod postgres;

pub use postgres::PostgresExecutor;

use crate::error::ExecutorError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait QueryExecutor: Send + Sync + 'static {
    /// Run `sql` as a plain query. The text may hold several statements.
    async fn execute(&self, sql: &str) -> Result<(), ExecutorError>;
}

#[async_trait]
impl<E: QueryExecutor> QueryExecutor for Arc<E> {
    async fn execute(&self, sql: &str) -> Result<(), ExecutorError> {
        (**self).execute(sql).await
    }
}
