//! Florê Core - Domain types and document model.
//!
//! This crate provides the types shared by every Florê component:
//! - `server` - The HTTP backend (catalog, admin API, analytics)
//! - `cli` - Command-line tools for store bootstrap and credential rotation
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no locking,
//! no HTTP. The server owns persistence and concurrency; everything here can
//! be used and tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Ids, prices, catalog entities, orders, analytics events, settings
//! - [`document`] - The persisted aggregate and its default dataset
//! - [`dashboard`] - Order aggregation for the admin dashboard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod dashboard;
pub mod document;
pub mod types;

pub use dashboard::Dashboard;
pub use document::{DocumentError, StoreDocument};
pub use types::*;
