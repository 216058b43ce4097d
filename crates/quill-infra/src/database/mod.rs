//! Database adapters - PostgreSQL via SeaORM plus an in-memory store.

mod connections;
pub mod entity;
mod memory;
mod postgres_base;
mod postgres_repo;

pub use connections::{DatabaseConfig, connect};
pub use memory::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryStore, InMemoryUserRepository,
};
pub use postgres_repo::{PostgresCommentRepository, PostgresPostRepository, PostgresUserRepository};
