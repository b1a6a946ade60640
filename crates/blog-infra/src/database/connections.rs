use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

use crate::config::DatabaseConfig;

/// Pooled connection to the blog database.
///
/// # Example
/// ```ignore
/// let db = BlogDatabase::connect(&config).await?;
/// let store = BlogStore::postgres(&db);
/// ```
#[derive(Clone)]
pub struct BlogDatabase {
    pub conn: Arc<DbConn>,
}

impl BlogDatabase {
    /// Open the connection pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .sqlx_logging(config.sql_logging)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!(
            "Database connected (pool: {}..{})",
            config.min_connections,
            config.max_connections
        );

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Check that the database answers.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.conn.ping().await
    }
}
