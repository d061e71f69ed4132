//! View Creator
//!
//! Owns a [`ViewRegistry`] and fans its definitions out to the database.
//! Every per-view statement runs in its own task; the first failure decides
//! the outcome of the pass but never cancels statements already sent.

use crate::config::ConnectionParams;
use crate::error::{Result, ViewError};
use crate::executor::{PostgresExecutor, QueryExecutor};
use crate::lifecycle::{create_view_statement, drop_view_statement, Operation};
use crate::registry::{DefinitionState, ViewRegistry};
use futures_util::future::try_join_all;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct ViewCreator<E: QueryExecutor> {
    registry: ViewRegistry,
    executor: Arc<E>,
}

impl ViewCreator<PostgresExecutor> {
    /// Connect to PostgreSQL with `params` and start with an empty registry
    pub async fn connect(params: &ConnectionParams) -> Result<Self> {
        let executor = PostgresExecutor::connect(params)
            .await
            .map_err(|source| ViewError::ConnectionFailed { source })?;

        Ok(Self::new(executor))
    }
}

impl<E: QueryExecutor> ViewCreator<E> {
    pub fn new(executor: E) -> Self {
        Self::with_executor(Arc::new(executor))
    }

    pub fn with_executor(executor: Arc<E>) -> Self {
        Self {
            registry: ViewRegistry::new(),
            executor,
        }
    }

    pub fn executor(&self) -> &Arc<E> {
        &self.executor
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ViewRegistry {
        &mut self.registry
    }

    pub fn register(&mut self, name: &str, definition: &str) -> Result<String> {
        self.registry.register(name, definition)
    }

    pub fn register_value(&mut self, name: &str, definition: &Value) -> Result<String> {
        self.registry.register_value(name, definition)
    }

    pub fn unregister(&mut self, name: &str) {
        self.registry.unregister(name)
    }

    pub fn get_definition(&self, name: &str) -> Option<&str> {
        self.registry.get_definition(name)
    }

    pub fn state(&self, name: &str) -> DefinitionState<'_> {
        self.registry.state(name)
    }

    /// Create or replace every live view
    pub async fn setup(&self) -> Result<Vec<String>> {
        let statements = self
            .registry
            .live_definitions()
            .into_iter()
            .map(|(name, body)| {
                let sql = create_view_statement(&name, &body);
                (name, sql)
            })
            .collect();

        self.run_all(Operation::Setup, statements).await
    }

    pub async fn setup_one(&self, name: &str, body: &str) -> Result<String> {
        run_statement(
            Arc::clone(&self.executor),
            Operation::Setup,
            name.to_string(),
            create_view_statement(name, body),
        )
        .await
    }

    /// Drop every live view
    pub async fn clean(&self) -> Result<Vec<String>> {
        self.clean_with_overrides(&HashMap::new()).await
    }

    /// Drop every live view, running `overrides[name]` verbatim in place of
    /// the default drop statement where present
    pub async fn clean_with_overrides(
        &self,
        overrides: &HashMap<String, String>,
    ) -> Result<Vec<String>> {
        let statements = self
            .registry
            .names()
            .into_iter()
            .map(|name| {
                let sql = overrides
                    .get(&name)
                    .cloned()
                    .unwrap_or_else(|| drop_view_statement(&name));
                (name, sql)
            })
            .collect();

        self.run_all(Operation::Clean, statements).await
    }

    pub async fn clean_one(&self, name: &str, sql: Option<&str>) -> Result<String> {
        let sql = sql
            .map(str::to_string)
            .unwrap_or_else(|| drop_view_statement(name));

        run_statement(Arc::clone(&self.executor), Operation::Clean, name.to_string(), sql).await
    }

    /// Clean, then set up only if cleaning succeeded
    pub async fn clean_setup(&self) -> Result<Vec<String>> {
        self.clean().await?;
        self.setup().await
    }

    async fn run_all(
        &self,
        operation: Operation,
        statements: Vec<(String, String)>,
    ) -> Result<Vec<String>> {
        let start_time = Instant::now();
        info!("Started {} {} views", operation, statements.len());

        // Everything is spawned before anything is awaited
        let tasks: Vec<_> = statements
            .into_iter()
            .map(|(name, sql)| {
                let task = tokio::spawn(run_statement(
                    Arc::clone(&self.executor),
                    operation,
                    name.clone(),
                    sql,
                ));
                (name, task)
            })
            .collect();

        // Dropping a JoinHandle detaches its task, so siblings of the first
        // failure keep running to completion
        let names = try_join_all(tasks.into_iter().map(|(name, task)| async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(ViewError::TaskFailed {
                    name,
                    cause: e.to_string(),
                }),
            }
        }))
        .await?;

        info!(
            "Finished {} {} views in {}ms",
            operation,
            names.len(),
            start_time.elapsed().as_millis()
        );

        Ok(names)
    }
}

async fn run_statement<E: QueryExecutor>(
    executor: Arc<E>,
    operation: Operation,
    name: String,
    sql: String,
) -> Result<String> {
    debug!("{} view {}: {}", operation, name, sql);

    match executor.execute(&sql).await {
        Ok(_) => Ok(name),
        Err(source) => {
            warn!("Error {} view {}: {}", operation, name, source);
            Err(ViewError::QueryExecution {
                operation,
                name,
                source,
            })
        }
    }
}
