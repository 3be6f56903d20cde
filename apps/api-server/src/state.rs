//! Application state - shared across all handlers.

use std::io;
use std::sync::Arc;

use quill_core::BlogService;
use quill_infra::database::{
    DatabaseConfig, DatabaseConnections, InMemoryAuthorRepository, InMemoryPostRepository,
};

#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresAuthorRepository, PostgresPostRepository};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub db: Option<DatabaseConnections>,
}

impl AppState {
    /// State backed by process-local stores. Data is lost on restart.
    pub fn in_memory() -> Self {
        Self {
            blog: BlogService::new(
                Arc::new(InMemoryAuthorRepository::new()),
                Arc::new(InMemoryPostRepository::new()),
            ),
            db: None,
        }
    }

    /// Build the application state with appropriate implementations.
    ///
    /// A configured database that cannot be reached is a startup failure.
    #[cfg(feature = "postgres")]
    pub async fn new(db_config: Option<&DatabaseConfig>) -> io::Result<Self> {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Self::in_memory());
        };

        let connections = DatabaseConnections::init(config).await.map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            io::Error::other(e.to_string())
        })?;

        let blog = BlogService::new(
            Arc::new(PostgresAuthorRepository::new(connections.main.clone())),
            Arc::new(PostgresPostRepository::new(connections.main.clone())),
        );

        tracing::info!("Application state initialized (postgres)");
        Ok(Self {
            blog,
            db: Some(connections),
        })
    }

    #[cfg(not(feature = "postgres"))]
    pub async fn new(_db_config: Option<&DatabaseConfig>) -> io::Result<Self> {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Ok(Self::in_memory())
    }
}
