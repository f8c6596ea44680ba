//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::pagination::PageNumberPagination;
use blog_core::ports::{PostRepository, UserRepository};
use blog_infra::database::DatabaseConfig;
use blog_infra::memory::{InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use blog_infra::database::{DatabaseConnections, PostgresPostRepository, PostgresUserRepository};

/// Which store backs the repositories.
#[derive(Clone)]
pub enum Storage {
    Memory,
    #[cfg(feature = "postgres")]
    Postgres(Arc<DatabaseConnections>),
}

impl Storage {
    pub fn name(&self) -> &'static str {
        match self {
            Storage::Memory => "memory",
            #[cfg(feature = "postgres")]
            Storage::Postgres(_) => "postgres",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub pagination: PageNumberPagination,
    pub storage: Storage,
}

impl AppState {
    /// State over fresh in-memory repositories.
    pub fn in_memory(pagination: PageNumberPagination) -> Self {
        Self {
            posts: Arc::new(InMemoryPostRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            pagination,
            storage: Storage::Memory,
        }
    }

    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>, pagination: PageNumberPagination) -> Self {
        #[cfg(feature = "postgres")]
        let state = match db_config {
            Some(config) => match DatabaseConnections::init(config).await {
                Ok(connections) => {
                    let conn = Arc::new(connections);
                    Self {
                        posts: Arc::new(PostgresPostRepository::new(conn.main.clone())),
                        users: Arc::new(PostgresUserRepository::new(conn.main.clone())),
                        pagination,
                        storage: Storage::Postgres(conn),
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory(pagination)
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory(pagination)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Self::in_memory(pagination)
        };

        tracing::info!(storage = state.storage.name(), "Application state initialized");

        state
    }
}
