//! CLI error types with miette diagnostics.
//!
//! Maps core and config errors into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use camcred_config::ConfigError;
use camcred_core::{CoreError, MacParseError, SecretStoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CREDENTIALS: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────

    #[error("Invalid MAC address '{input}': {reason}")]
    #[diagnostic(
        code(camcred::invalid_mac),
        help(
            "Use six or eight hex octets, for example:\n\
             aa:bb:cc:dd:ee:ff, AA-BB-CC-DD-EE-FF, aabb.ccdd.eeff or aabbccddeeff"
        )
    )]
    InvalidMac { input: String, reason: String },

    // ── Credentials ──────────────────────────────────────────────────

    #[error("Unable to retrieve credentials for secret '{name}'")]
    #[diagnostic(
        code(camcred::secret_unavailable),
        help(
            "Store username, password and mode in the system keyring\n\
             (service 'camcred', entries '{name}/username', '{name}/password', '{name}/mode')\n\
             or add a [secrets.{name}] table to the config file."
        )
    )]
    SecretUnavailable {
        name: String,
        #[source]
        source: SecretStoreError,
    },

    #[error("Device '{device}' has no MAC address")]
    #[diagnostic(
        code(camcred::missing_mac),
        help("Set {protocol}.MACAddress for this device in [devices.{device}.protocols.{protocol}].")
    )]
    MissingMacAddress { device: String, protocol: String },

    // ── Lookups ──────────────────────────────────────────────────────

    #[error("Device '{name}' not found")]
    #[diagnostic(
        code(camcred::device_not_found),
        help("Configured devices: {available}\nRun: camcred devices")
    )]
    DeviceNotFound { name: String, available: String },

    #[error("No known MAC address found in '{text}'")]
    #[diagnostic(
        code(camcred::no_match),
        help("Only MAC addresses listed in credentials_map are searched.\nRun: camcred mappings")
    )]
    NoMatch { text: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(camcred::config),
        help("Check the config file. Run: camcred config path")
    )]
    Config(#[from] ConfigError),

    // ── IO ────────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidMac { .. } => exit_code::USAGE,
            Self::SecretUnavailable { .. } | Self::MissingMacAddress { .. } => {
                exit_code::CREDENTIALS
            }
            Self::DeviceNotFound { .. } | Self::NoMatch { .. } => exit_code::NOT_FOUND,
            Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── Core → CliError mapping ──────────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SecretStore { name, source } => CliError::SecretUnavailable { name, source },
            CoreError::MissingMacAddress { device, protocol } => {
                CliError::MissingMacAddress { device, protocol }
            }
        }
    }
}

impl From<MacParseError> for CliError {
    fn from(err: MacParseError) -> Self {
        match err {
            MacParseError::InvalidFormat { input, reason } => CliError::InvalidMac {
                input,
                reason: reason.to_owned(),
            },
        }
    }
}
