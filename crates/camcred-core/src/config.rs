// ── Runtime driver configuration ──
//
// The credential-related slice of the driver's custom configuration.
// Core never reads config files -- `camcred-config` builds this and
// hands it in, and may hand in a new one at runtime.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Secret name used when no other default is configured.
pub const DEFAULT_SECRET_NAME: &str = "credentials001";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Credential group for devices without a MAC mapping.
    #[serde(default = "default_secret_name")]
    pub default_secret_name: String,

    /// Secret name -> comma-separated list of MAC addresses.
    #[serde(default)]
    pub credentials_map: HashMap<String, String>,
}

fn default_secret_name() -> String {
    DEFAULT_SECRET_NAME.into()
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            default_secret_name: default_secret_name(),
            credentials_map: HashMap::new(),
        }
    }
}
