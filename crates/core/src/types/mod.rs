//! Core types for Florê.
//!
//! This module provides type-safe wrappers for the catalog domain.

pub mod analytics;
pub mod category;
pub mod credential;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod settings;
pub mod validation;

pub use analytics::AnalyticsEvent;
pub use category::{Category, CategoryInput, CategoryPatch};
pub use credential::AdminCredential;
pub use id::*;
pub use order::Order;
pub use price::Price;
pub use product::{Product, ProductInput, ProductPatch};
pub use settings::Settings;
pub use validation::ValidationError;
