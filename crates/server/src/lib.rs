//! Florê catalog backend library.
//!
//! This crate provides the server as a library so the binary, the CLI and
//! the integration tests all build the same router over the same store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use routes::app;
pub use state::AppState;
