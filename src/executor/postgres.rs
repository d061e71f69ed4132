use crate::config::ConnectionParams;
use crate::error::ExecutorError;
use crate::executor::QueryExecutor;
use async_trait::async_trait;
use deadpool_postgres::{Config as PoolConfig, Pool, Runtime};
use tokio_postgres::NoTls;
use tracing::{debug, info};

/// Executor backed by a pooled PostgreSQL connection.
///
/// Each statement checks out its own client, so statements issued
/// concurrently run on separate connections up to the pool size.
/// Further statements wait for a client to be returned rather than failing.
#[derive(Clone)]
pub struct PostgresExecutor {
    pool: Pool,
}

impl PostgresExecutor {
    pub async fn connect(params: &ConnectionParams) -> Result<Self, ExecutorError> {
        let pool = create_pool(params)?;

        // Simple ping query
        let client = pool.get().await?;
        client.execute("SELECT 1", &[]).await?;

        info!("Connected to PostgreSQL (max {} connections)", params.max_connections);

        Ok(Self { pool })
    }

    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }
}

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    async fn execute(&self, sql: &str) -> Result<(), ExecutorError> {
        let client = self.pool.get().await?;
        debug!("Executing: {}", sql);

        // Simple query protocol, so override SQL may carry several statements
        client.batch_execute(sql).await?;
        Ok(())
    }
}

fn create_pool(params: &ConnectionParams) -> Result<Pool, ExecutorError> {
    let mut cfg = PoolConfig::new();
    cfg.url = Some(params.database_url.clone());

    cfg.pool = Some(deadpool_postgres::PoolConfig {
        max_size: params.max_connections as usize,
        timeouts: deadpool_postgres::Timeouts {
            // Statements beyond the pool size queue for a free client
            wait: None,
            create: Some(params.connect_timeout),
            recycle: Some(params.connect_timeout),
        },
        ..Default::default()
    });

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| ExecutorError::message(format!("Failed to create pool: {}", e)))
}
