//! Admin dashboard aggregation.
//!
//! The dashboard is recomputed from scratch on every request by a single
//! pass over the order collection. Nothing is cached or maintained
//! incrementally, so it is always consistent with the document it was
//! computed from.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::document::StoreDocument;
use crate::types::Order;

/// Number of orders shown in the "recent orders" panel.
pub const RECENT_ORDERS: usize = 5;

/// Summary shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Sum of `total` across all orders, saturating at the decimal range.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub total_products: usize,
    pub total_events: usize,
    /// Order count per status value. Orders without a status are skipped.
    pub orders_by_status: BTreeMap<String, usize>,
    /// The last orders appended to the store, newest first.
    pub recent_orders: Vec<Order>,
}

impl Dashboard {
    /// Compute the dashboard for a document.
    #[must_use]
    pub fn compute(doc: &StoreDocument) -> Self {
        let mut total_revenue = Decimal::ZERO;
        let mut orders_by_status = BTreeMap::new();

        for order in &doc.orders {
            total_revenue = total_revenue.saturating_add(order.total());
            if let Some(status) = order.status_label() {
                *orders_by_status.entry(status).or_insert(0) += 1;
            }
        }

        Self {
            total_revenue,
            total_orders: doc.orders.len(),
            total_products: doc.products.len(),
            total_events: doc.analytics.len(),
            orders_by_status,
            recent_orders: doc.orders.iter().rev().take(RECENT_ORDERS).cloned().collect(),
        }
    }
}
