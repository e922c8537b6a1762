//! Configuration for camcred.
//!
//! TOML file + `CAMCRED_` environment overrides, translated into
//! `camcred_core::DriverConfig`, plus a [`ConfigSecretStore`] that reads
//! credential groups from the system keyring with a plaintext fallback.

mod secret_store;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use camcred_core::{DEFAULT_SECRET_NAME, Device, DriverConfig, ProtocolProperties};

pub use secret_store::{ConfigSecretStore, KEYRING_SERVICE};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Plaintext fields of one credential group (`username`, `password`, `mode`).
pub type SecretFields = HashMap<String, String>;

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Credential group for devices without a MAC mapping.
    #[serde(default = "default_secret_name")]
    pub default_secret_name: String,

    /// Consult the system keyring before plaintext secrets.
    #[serde(default = "default_use_keyring")]
    pub use_keyring: bool,

    /// Secret name -> comma-separated MAC addresses.
    #[serde(default)]
    pub credentials_map: HashMap<String, String>,

    /// Known devices, keyed by device name.
    #[serde(default)]
    pub devices: HashMap<String, DeviceEntry>,

    /// Plaintext credential groups (prefer the keyring).
    #[serde(default)]
    pub secrets: HashMap<String, SecretFields>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_secret_name: default_secret_name(),
            use_keyring: default_use_keyring(),
            credentials_map: HashMap::new(),
            devices: HashMap::new(),
            secrets: HashMap::new(),
        }
    }
}

fn default_secret_name() -> String {
    DEFAULT_SECRET_NAME.into()
}
fn default_use_keyring() -> bool {
    true
}

/// A device as written in the config file.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DeviceEntry {
    /// Protocol name (e.g. `Onvif`) -> properties.
    #[serde(default)]
    pub protocols: HashMap<String, ProtocolProperties>,
}

impl Config {
    /// The credential-related slice handed to the core resolver.
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            default_secret_name: self.default_secret_name.clone(),
            credentials_map: self.credentials_map.clone(),
        }
    }

    /// Look up a configured device by name.
    pub fn device(&self, name: &str) -> Option<Device> {
        self.devices.get(name).map(|entry| Device {
            name: name.to_owned(),
            protocols: entry.protocols.clone(),
        })
    }

    /// All configured devices, sorted by name.
    pub fn devices(&self) -> Vec<Device> {
        let mut names: Vec<&String> = self.devices.keys().collect();
        names.sort();
        names.into_iter().filter_map(|n| self.device(n)).collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_secret_name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "default_secret_name".into(),
                reason: "must not be empty".into(),
            });
        }
        if let Some(name) = self.credentials_map.keys().find(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation {
                field: "credentials_map".into(),
                reason: format!("secret name '{name}' must not be blank"),
            });
        }
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "camcred", "camcred").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("camcred");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error: defaults and environment still apply.
/// Nested keys are reached with a double underscore, e.g.
/// `CAMCRED_CREDENTIALS_MAP__LOBBY=aa:bb:cc:dd:ee:ff`. Secret names and
/// MAC lists are taken verbatim, so `001122334455` stays a string.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(env_provider().filter(|key| !is_verbatim_key(key.as_str())))
        .merge(Serialized::defaults(VerbatimOverrides::from_env()));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

fn env_provider() -> Env {
    Env::prefixed("CAMCRED_").split("__")
}

/// Keys whose environment values must not be parsed as numbers or booleans.
fn is_verbatim_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key == "default_secret_name" || key.starts_with("credentials_map.")
}

/// String-typed environment overrides, read without value inference.
#[derive(Debug, Default, Serialize)]
struct VerbatimOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    default_secret_name: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    credentials_map: HashMap<String, String>,
}

impl VerbatimOverrides {
    fn from_env() -> Self {
        let mut overrides = Self::default();
        for (key, value) in env_provider().iter() {
            let key = key.as_str().to_ascii_lowercase();
            if key == "default_secret_name" {
                overrides.default_secret_name = Some(value);
            } else if let Some(name) = key.strip_prefix("credentials_map.") {
                overrides.credentials_map.insert(name.to_owned(), value);
            }
        }
        overrides
    }
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.default_secret_name, DEFAULT_SECRET_NAME);
        assert!(cfg.use_keyring);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn blank_default_secret_name_is_rejected() {
        let cfg = Config {
            default_secret_name: "  ".into(),
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Validation { field, .. }) if field == "default_secret_name"
        ));
    }

    #[test]
    fn devices_are_sorted_and_named() {
        let mut cfg = Config::default();
        cfg.devices.insert("b-cam".into(), DeviceEntry::default());
        cfg.devices.insert("a-cam".into(), DeviceEntry::default());
        let names: Vec<String> = cfg.devices().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["a-cam".to_owned(), "b-cam".to_owned()]);
    }
}
