use std::env;
use std::time::Duration;

/// Connection parameters handed to the query executor.
///
/// The orchestrator never inspects these; only [`PostgresExecutor`](crate::executor::PostgresExecutor)
/// reads them when building its pool.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    pub database_url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl ConnectionParams {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 16,
            connect_timeout: Duration::from_secs(5),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        // Build database_url from individual fields or use DATABASE_URL if provided
        let database_url = if let Ok(url) = env::var("DATABASE_URL") {
            url
        } else {
            let db_host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
            let db_port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = env::var("DB_NAME").unwrap_or_else(|_| "postgres".to_string());
            let db_user = env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string());
            let db_password = env::var("DB_PASSWORD").unwrap_or_else(|_| "password".to_string());

            build_database_url(&db_user, &db_password, &db_host, &db_port, &db_name)
        };

        if database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL is set but empty");
        }

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "16".to_string())
            .parse()
            .unwrap_or(16);

        let connect_timeout_secs: u64 = env::var("DB_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .unwrap_or(5);

        Ok(ConnectionParams {
            database_url,
            max_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

fn build_database_url(user: &str, password: &str, host: &str, port: &str, name: &str) -> String {
    // URL-encode password to handle special characters
    let encoded_password = urlencoding::encode(password);

    format!("postgres://{}:{}@{}:{}/{}", user, encoded_password, host, port, name)
}
