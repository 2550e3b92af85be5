//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Catalog ids are
//! strings chosen by the admin (e.g. `"buques"`) or generated UUIDs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a catalog id.
pub const MAX_ID_LENGTH: usize = 64;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - `parse()` which validates length and characters
/// - `generate()` which creates a fresh UUID v4 id
///
/// # Example
///
/// ```rust
/// # use flore_core::define_id;
/// define_id!(ProductId);
/// define_id!(CategoryId);
///
/// let product = ProductId::parse("rosas-12").unwrap();
/// let category = CategoryId::parse("buques").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = category;
/// # let _ = (product, category);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse and validate an id.
            ///
            /// # Errors
            ///
            /// Returns `ValidationError::InvalidId` if the id is empty, longer
            /// than [`MAX_ID_LENGTH`](crate::types::id::MAX_ID_LENGTH), or
            /// contains `/` or whitespace.
            pub fn parse(id: &str) -> ::core::result::Result<Self, $crate::ValidationError> {
                $crate::types::id::check_id(id)?;
                Ok(Self(id.to_owned()))
            }

            /// Generate a fresh random id.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::types::id::random_id())
            }

            /// Get the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);

#[doc(hidden)]
#[must_use]
pub fn random_id() -> String {
    Uuid::new_v4().to_string()
}

#[doc(hidden)]
pub fn check_id(id: &str) -> Result<(), crate::ValidationError> {
    let reason = if id.is_empty() {
        Some("must not be empty")
    } else if id.len() > MAX_ID_LENGTH {
        Some("must be at most 64 characters")
    } else if id.chars().any(|c| c == '/' || c.is_whitespace()) {
        Some("must not contain '/' or whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(crate::ValidationError::InvalidId {
            id: id.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Analytics event id. Always generated by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Generate a fresh event id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
