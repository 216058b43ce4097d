//! # Quill API Server
//!
//! Route handlers, middleware, and application state for the blogging
//! backend. The binary in `main.rs` wires these into an actix-web server;
//! integration tests drive the same router against the in-memory store.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
