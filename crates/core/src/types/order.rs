//! Orders.
//!
//! Orders are written by the storefront checkout flow and only read here.
//! The schema is open: the whole object is carried through verbatim, and
//! the dashboard reads `total` and `status` through lenient accessors so
//! that no single odd order can stop the store from loading.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A customer order, kept as the raw JSON object it was stored as.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order {
    pub fields: Map<String, Value>,
}

impl Order {
    /// Create an order with the given total and no other fields.
    #[must_use]
    pub fn with_total(total: Decimal) -> Self {
        let mut fields = Map::new();
        if let Ok(number) = total.to_string().parse::<Number>() {
            fields.insert("total".to_string(), Value::Number(number));
        }
        Self { fields }
    }

    /// Set the status.
    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.fields
            .insert("status".to_string(), Value::String(status.into()));
        self
    }

    /// The order total.
    ///
    /// Missing, `null` and non-numeric totals count as zero. Numbers beyond
    /// the decimal range saturate at `Decimal::MAX` / `Decimal::MIN`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        match self.fields.get("total") {
            Some(Value::Number(n)) => decimal_from_number(n),
            _ => Decimal::ZERO,
        }
    }

    /// The status label used for grouping.
    ///
    /// Strings are used as-is and numbers by their JSON text; anything else
    /// (missing, `null`, objects, booleans) has no label.
    #[must_use]
    pub fn status_label(&self) -> Option<String> {
        match self.fields.get("status")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

fn decimal_from_number(n: &Number) -> Decimal {
    let repr = n.to_string();
    repr.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&repr))
        .unwrap_or_else(|_| {
            if n.as_f64().is_some_and(f64::is_sign_negative) {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        })
}
