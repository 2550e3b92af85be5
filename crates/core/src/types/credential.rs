//! Admin credential as stored in the document.

use serde::{Deserialize, Serialize};

/// The single admin credential.
///
/// Only the Argon2 PHC hash string is persisted; the plaintext password
/// never reaches the document.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCredential {
    /// PHC-format password hash (`$argon2id$v=19$...`).
    pub password_hash: String,
}

impl AdminCredential {
    /// Wrap an already-computed password hash.
    #[must_use]
    pub const fn new(password_hash: String) -> Self {
        Self { password_hash }
    }
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredential")
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}
