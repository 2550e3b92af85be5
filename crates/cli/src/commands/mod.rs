//! CLI command implementations.

pub mod admin;
pub mod store;

use std::io::{self, BufRead};

use secrecy::SecretString;
use thiserror::Error;

use flore_server::services::AuthError;
use flore_server::store::StoreError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading, bootstrapping or committing the store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Hashing the password failed or the password was rejected.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Reading the password from stdin failed.
    #[error("failed to read password: {0}")]
    Io(#[from] io::Error),

    /// No password was supplied.
    #[error("no password given; set {0} or pipe it on stdin")]
    MissingPassword(&'static str),
}

/// Read a password from `env_var`, or else the first line of `input`.
///
/// # Errors
///
/// Returns `CliError::MissingPassword` if neither source has a non-empty
/// value.
pub fn read_password(
    env_var: &'static str,
    input: impl BufRead,
) -> Result<SecretString, CliError> {
    if let Ok(value) = std::env::var(env_var) {
        if !value.is_empty() {
            return Ok(SecretString::from(value));
        }
    }

    let line = input.lines().next().transpose()?.unwrap_or_default();
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(CliError::MissingPassword(env_var));
    }
    Ok(SecretString::from(password.to_string()))
}
