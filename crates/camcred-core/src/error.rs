// ── Core error types ──
//
// Update-time failures (bad MAC tokens, unknown groups) never surface
// here -- the mapper logs and skips them. These types cover the
// resolve-time failures that abort a single call.

use thiserror::Error;

/// A string that could not be parsed as a 48- or 64-bit hardware address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacParseError {
    #[error("invalid MAC address '{input}': {reason}")]
    InvalidFormat { input: String, reason: &'static str },
}

impl MacParseError {
    pub(crate) fn invalid(input: &str, reason: &'static str) -> Self {
        Self::InvalidFormat {
            input: input.to_owned(),
            reason,
        }
    }
}

/// Failure reported by a [`SecretStore`](crate::SecretStore) backend.
#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("secret '{name}' does not exist in the secret store")]
    NotFound { name: String },

    #[error("secret '{name}' is missing key(s): {}", .keys.join(", "))]
    MissingKeys { name: String, keys: Vec<String> },

    #[error("secret store backend error: {message}")]
    Backend { message: String },
}

/// Unified error type for credential resolution.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unable to retrieve credentials for secret '{name}'")]
    SecretStore {
        name: String,
        #[source]
        source: SecretStoreError,
    },

    #[error("device '{device}' has no MAC address in its {protocol} protocol properties")]
    MissingMacAddress { device: String, protocol: String },
}
