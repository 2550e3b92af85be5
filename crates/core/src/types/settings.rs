//! Site settings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::validation::ValidationError;

/// Schemaless site settings (`siteName`, `whatsapp`, `hours`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(Map<String, Value>);

impl Settings {
    /// Wrap an existing map.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Shallow-merge `patch` into the settings.
    ///
    /// Keys present in the patch overwrite existing values (an explicit
    /// `null` is stored as `null`). Keys absent from the patch keep their
    /// previous values; nothing is ever removed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotAnObject` if the patch is not a JSON object.
    pub fn merge(&mut self, patch: Value) -> Result<(), ValidationError> {
        let Value::Object(patch) = patch else {
            return Err(ValidationError::NotAnObject {
                what: "settings patch",
            });
        };
        self.0.extend(patch);
        Ok(())
    }

    /// Look up a single setting.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}
