//! Command handlers and the shared resolution context.

pub mod config_cmd;
pub mod devices;
pub mod lookup;
pub mod mac;
pub mod mappings;
pub mod resolve;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use camcred_config::{Config, ConfigSecretStore};
use camcred_core::{CredentialResolver, MacAddressMapper, SecretStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file path selected by `--config` / `CAMCRED_CONFIG`, or the
/// platform default.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(camcred_config::config_path)
}

/// Loaded configuration plus a resolver wired to its mappings and secrets.
pub struct Context {
    pub config: Config,
    pub resolver: CredentialResolver,
}

impl Context {
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let path = config_file(global);
        let config = camcred_config::load_config_from(&path)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: Config) -> Self {
        let secrets: Arc<dyn SecretStore> = Arc::new(ConfigSecretStore::from_config(&config));
        let resolver = CredentialResolver::new(
            Arc::clone(&secrets),
            Arc::new(MacAddressMapper::new(secrets)),
            config.default_secret_name.clone(),
        );
        let report = resolver.apply_config(&config.driver_config());

        if !report.invalid.is_empty() || !report.conflicts.is_empty() {
            warn!(
                invalid = report.invalid.len(),
                conflicts = report.conflicts.len(),
                unknown_groups = report.unknown_groups.len(),
                "some credential mappings were skipped"
            );
        }
        info!(installed = report.installed, "credential mappings installed");

        Self { config, resolver }
    }
}
