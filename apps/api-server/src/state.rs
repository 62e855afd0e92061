//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{Clock, PostRepository, UserRepository};
use quill_infra::SystemClock;
use quill_infra::database::{DatabaseConfig, InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresPostRepository, PostgresUserRepository, connect};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub clock: Arc<dyn Clock>,
}

fn in_memory() -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryPostRepository::new()),
    )
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        #[cfg(feature = "postgres")]
        let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) = {
            if let Some(config) = db_config {
                match connect(config).await {
                    Ok(db) => (
                        Arc::new(PostgresUserRepository::new(db.clone())),
                        Arc::new(PostgresPostRepository::new(db)),
                    ),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory repositories.",
                            e
                        );
                        in_memory()
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (users, posts): (Arc<dyn UserRepository>, Arc<dyn PostRepository>) = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory repositories");
            in_memory()
        };

        tracing::info!("Application state initialized");

        Self {
            users,
            posts,
            clock,
        }
    }
}
