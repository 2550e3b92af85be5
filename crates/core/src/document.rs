//! The persisted aggregate: every collection of the store in one document.
//!
//! # Layout
//!
//! ```text
//! {
//!   "products":   [Product, ...],
//!   "categories": [Category, ...],
//!   "orders":     [Order, ...],
//!   "analytics":  [AnalyticsEvent, ...],
//!   "settings":   { ... },
//!   "admin":      { "passwordHash": "..." }
//! }
//! ```
//!
//! # Bootstrap rule
//!
//! [`StoreDocument::parse`] returns `Ok(None)` when the stored bytes carry no
//! data at all (empty, whitespace, `null`, or `{}`); the caller then seeds the
//! default dataset. A document that has *some* but not all top-level keys is
//! rejected rather than silently backfilled, and a document whose collections
//! are present but empty is loaded as-is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::types::{
    AdminCredential, AnalyticsEvent, Category, CategoryId, Order, Price, Product, ProductId,
    Settings,
};

/// Top-level keys every initialized document carries.
pub const TOP_LEVEL_KEYS: [&str; 6] = [
    "products",
    "categories",
    "orders",
    "analytics",
    "settings",
    "admin",
];

/// Errors decoding a stored document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The bytes are not valid JSON, or a collection has the wrong shape.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The top-level JSON value is not an object.
    #[error("document root must be a JSON object")]
    NotAnObject,

    /// Some top-level keys are missing.
    #[error("document is partially initialized; missing keys: {}", .0.join(", "))]
    MissingKeys(Vec<&'static str>),
}

/// The whole store as one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub orders: Vec<Order>,
    pub analytics: Vec<AnalyticsEvent>,
    pub settings: Settings,
    pub admin: AdminCredential,
}

impl StoreDocument {
    /// Decode stored bytes.
    ///
    /// Returns `Ok(None)` when the storage holds no data and the store must
    /// be bootstrapped.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] if the bytes are not JSON, the root is not
    /// an object, some top-level keys are missing, or a collection fails to
    /// decode.
    pub fn parse(bytes: &[u8]) -> Result<Option<Self>, DocumentError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let root: Value = serde_json::from_slice(bytes)?;
        let object = match root {
            Value::Null => return Ok(None),
            Value::Object(object) => object,
            _ => return Err(DocumentError::NotAnObject),
        };
        if object.is_empty() {
            return Ok(None);
        }

        let missing: Vec<&'static str> = TOP_LEVEL_KEYS
            .into_iter()
            .filter(|key| !object.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(DocumentError::MissingKeys(missing));
        }

        Ok(Some(serde_json::from_value(Value::Object(object))?))
    }

    /// Encode as pretty-printed JSON, the on-disk format.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if serialization fails.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// The default dataset written on first boot.
    ///
    /// The admin credential is supplied by the caller; the dataset itself
    /// never contains a password.
    #[must_use]
    pub fn with_defaults(admin: AdminCredential) -> Self {
        Self {
            products: default_products(),
            categories: default_categories(),
            orders: Vec::new(),
            analytics: Vec::new(),
            settings: default_settings(),
            admin,
        }
    }

    /// Find a product by id.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == *id)
    }

    /// Find a category by id.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == *id)
    }
}

fn default_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::parse("1").unwrap_or_else(|_| ProductId::generate()),
            name: "Buquê de Rosas Vermelhas".to_string(),
            description: "Elegante buquê com 12 rosas vermelhas frescas, perfeito para demonstrar amor e carinho.".to_string(),
            price: Price::new(Decimal::new(899, 1)).unwrap_or_default(),
            category: CategoryId::parse("buques").ok(),
            image_url: "https://images.unsplash.com/photo-1518895949257-7621c3c786d7?w=400&h=300&fit=crop".to_string(),
            featured: true,
            views: 156,
            tags: vec![
                "romântico".to_string(),
                "clássico".to_string(),
                "vermelho".to_string(),
            ],
            active: true,
        },
        Product {
            id: ProductId::parse("2").unwrap_or_else(|_| ProductId::generate()),
            name: "Arranjo de Girassóis".to_string(),
            description: "Arranjo vibrante com girassóis frescos que trazem alegria e energia positiva.".to_string(),
            price: Price::new(Decimal::new(650, 1)).unwrap_or_default(),
            category: CategoryId::parse("arranjos").ok(),
            image_url: "https://images.unsplash.com/photo-1471194402529-8e0f5a675de6?w=400&h=300&fit=crop".to_string(),
            featured: false,
            views: 189,
            tags: vec![
                "alegre".to_string(),
                "amarelo".to_string(),
                "energia".to_string(),
            ],
            active: true,
        },
    ]
}

fn default_categories() -> Vec<Category> {
    [
        ("buques", "Buquês", "Buquês elegantes para todas as ocasiões"),
        ("arranjos", "Arranjos", "Arranjos florais únicos e criativos"),
    ]
    .into_iter()
    .filter_map(|(id, name, description)| {
        Some(Category {
            id: CategoryId::parse(id).ok()?,
            name: name.to_string(),
            description: description.to_string(),
        })
    })
    .collect()
}

fn default_settings() -> Settings {
    let value = json!({
        "siteName": "Florê",
        "siteTagline": "PREMIUM COLLECTION",
        "heroTitle": "Flores que encantam, momentos que marcam.",
        "heroSubtitle": "Arranjos feitos à mão com as flores mais frescas para celebrar a vida.",
        "whatsapp": "5564999999999",
        "address": "Av. Hermógenes Coelho, 812 - Centro\nSão Luís de Montes Belos - GO",
        "hours": "Seg - Sex: 08:00 às 18:00\nSáb: 08:00 às 12:00"
    });
    match value {
        Value::Object(fields) => Settings::new(fields),
        _ => Settings::new(Map::new()),
    }
}
