//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Admin password verification and JWT issue/validation
//! - `catalog` - Products, categories, settings and orders
//! - `analytics` - Event ingestion with optional retention
//! - `dashboard` - Admin dashboard aggregation
//!
//! Services borrow the [`DocumentStore`](crate::store::DocumentStore) and
//! route every write through its `mutate`.

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod dashboard;

pub use analytics::AnalyticsService;
pub use auth::{AuthError, AuthService};
pub use catalog::{CatalogError, CatalogService, Visibility};
pub use dashboard::DashboardService;
