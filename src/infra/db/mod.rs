//! Database connection for the engine chosen at startup.

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};

use crate::config::{DatabaseConfig, DatabaseMode};
use crate::errors::{AppError, AppResult};

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
    mode: DatabaseMode,
}

impl Database {
    /// Open a connection pool for the selected database mode.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.connection_url()?);
        options.sqlx_logging(false);
        if let Some(lifetime) = config.max_lifetime() {
            options.max_lifetime(lifetime);
        }

        let connection = SeaDatabase::connect(options).await.map_err(AppError::from)?;
        tracing::info!(mode = ?config.mode(), "Database connected");

        Ok(Self {
            connection,
            mode: config.mode(),
        })
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn mode(&self) -> DatabaseMode {
        self.mode
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
