//! Client analytics events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::EventId;
use super::validation::ValidationError;

/// Keys the server owns. Client values for these are discarded.
const RESERVED_KEYS: [&str; 2] = ["id", "timestamp"];

/// A recorded analytics event: an arbitrary client payload stamped with a
/// server-generated id and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Server-generated id.
    pub id: EventId,
    /// Server time at ingestion.
    pub timestamp: DateTime<Utc>,
    /// Client payload, minus the reserved keys.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl AnalyticsEvent {
    /// Build an event from a client payload.
    ///
    /// Any `id` or `timestamp` in the payload is dropped; the event gets a
    /// fresh id and the given time.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotAnObject` if the payload is not a JSON object.
    pub fn record(payload: Value, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let Value::Object(mut payload) = payload else {
            return Err(ValidationError::NotAnObject {
                what: "analytics event",
            });
        };
        for key in RESERVED_KEYS {
            payload.remove(key);
        }
        Ok(Self {
            id: EventId::generate(),
            timestamp: now,
            payload,
        })
    }
}
