//! Application state - shared across all handlers.
//!
//! The storage handle is injected at construction rather than reached for
//! as a process-wide singleton, so tests can swap in the in-memory store.

use std::sync::Arc;

use quill_core::ports::{CommentRepository, PostRepository, UserRepository};
use quill_infra::database::{
    DatabaseConfig, InMemoryCommentRepository, InMemoryPostRepository, InMemoryStore,
    InMemoryUserRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository, connect,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        match db_config {
            Some(config) => match connect(config).await {
                Ok(db) => Self {
                    users: Arc::new(PostgresUserRepository::new(db.clone())),
                    posts: Arc::new(PostgresPostRepository::new(db.clone())),
                    comments: Arc::new(PostgresCommentRepository::new(db)),
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        }
    }

    /// State backed entirely by the in-memory store.
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(InMemoryUserRepository::new(store.clone())),
            posts: Arc::new(InMemoryPostRepository::new(store.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(store)),
        }
    }
}
