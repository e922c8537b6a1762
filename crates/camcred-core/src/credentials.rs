// ── Credential resolution ──
//
// Secret name -> validated `Credentials`, and device -> secret name via
// the MAC mapper. The secret store is consulted on every call so that
// rotated credentials take effect without a restart.

use std::sync::Arc;

use arc_swap::ArcSwap;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{debug, warn};

use crate::config::DriverConfig;
use crate::error::CoreError;
use crate::mapper::{MacAddressMapper, MappingReport};
use crate::model::{Device, ONVIF_PROTOCOL};
use crate::secret::{
    AUTH_MODE_KEY, CREDENTIAL_KEYS, PASSWORD_KEY, SecretData, SecretStore, USERNAME_KEY,
    is_no_auth,
};

// ── AuthMode ────────────────────────────────────────────────────────

/// ONVIF authentication scheme.
///
/// String forms are the ONVIF client's tokens: `none`, `digest`,
/// `usernametoken`, `both`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthMode {
    None,
    Digest,
    UsernameToken,
    Both,
}

impl AuthMode {
    /// Whether `raw` is one of the four recognized tokens (exact match).
    pub fn is_valid_token(raw: &str) -> bool {
        raw.parse::<Self>().is_ok()
    }

    /// Map a raw token to an auth mode.
    ///
    /// Unrecognized tokens (including an empty one) fall back to
    /// `UsernameToken`, never `None`.
    pub fn resolve(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            warn!(
                auth_mode = raw,
                fallback = %Self::UsernameToken,
                "invalid auth mode, falling back"
            );
            Self::UsernameToken
        })
    }
}

// ── Credentials ─────────────────────────────────────────────────────

/// Credentials for one camera connection. Built per call, never cached.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub auth_mode: AuthMode,
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    /// Credentials that connect without authentication.
    pub fn no_auth() -> Self {
        Self {
            auth_mode: AuthMode::None,
            username: String::new(),
            password: SecretString::from(String::new()),
        }
    }

    fn from_secret_data(data: &SecretData) -> Self {
        use secrecy::ExposeSecret;

        let field = |key: &str| {
            data.get(key)
                .map(|v| v.expose_secret().to_owned())
                .unwrap_or_default()
        };

        Self {
            auth_mode: AuthMode::resolve(&field(AUTH_MODE_KEY)),
            username: field(USERNAME_KEY),
            password: data
                .get(PASSWORD_KEY)
                .cloned()
                .unwrap_or_else(|| SecretString::from(String::new())),
        }
    }
}

// ── CredentialResolver ──────────────────────────────────────────────

/// Resolves credentials for secret names and devices.
pub struct CredentialResolver {
    secrets: Arc<dyn SecretStore>,
    mapper: Arc<MacAddressMapper>,
    default_secret_name: ArcSwap<String>,
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("mapper", &self.mapper)
            .field("default_secret_name", &self.default_secret_name.load().as_str())
            .finish_non_exhaustive()
    }
}

impl CredentialResolver {
    pub fn new(
        secrets: Arc<dyn SecretStore>,
        mapper: Arc<MacAddressMapper>,
        default_secret_name: impl Into<String>,
    ) -> Self {
        Self {
            secrets,
            mapper,
            default_secret_name: ArcSwap::from_pointee(default_secret_name.into()),
        }
    }

    /// Build a resolver with its own mapper, primed from `config`.
    pub fn from_config(secrets: Arc<dyn SecretStore>, config: &DriverConfig) -> Self {
        let mapper = Arc::new(MacAddressMapper::new(Arc::clone(&secrets)));
        let resolver = Self::new(secrets, mapper, config.default_secret_name.clone());
        resolver.mapper.update_mappings(&config.credentials_map);
        resolver
    }

    /// Apply a changed driver configuration: swap in the new default
    /// secret name, then rebuild the MAC mappings.
    pub fn apply_config(&self, config: &DriverConfig) -> MappingReport {
        self.default_secret_name
            .store(Arc::new(config.default_secret_name.clone()));
        self.mapper.update_mappings(&config.credentials_map)
    }

    pub fn mapper(&self) -> &Arc<MacAddressMapper> {
        &self.mapper
    }

    pub fn default_secret_name(&self) -> Arc<String> {
        self.default_secret_name.load_full()
    }

    /// Fetch and validate the credentials stored under `secret_name`.
    ///
    /// The no-auth name short-circuits without touching the store.
    pub fn resolve_credentials_for_group(&self, secret_name: &str) -> Result<Credentials, CoreError> {
        if is_no_auth(secret_name) {
            return Ok(Credentials::no_auth());
        }

        let data = self
            .secrets
            .get_secret(secret_name, &CREDENTIAL_KEYS)
            .map_err(|source| CoreError::SecretStore {
                name: secret_name.to_owned(),
                source,
            })?;

        Ok(Credentials::from_secret_data(&data))
    }

    /// Secret name for `device`, via its ONVIF MAC address.
    ///
    /// A device without a MAC address fails with `MissingMacAddress`; it
    /// never falls back to the default secret name.
    pub fn resolve_secret_name_for_device(&self, device: &Device) -> Result<String, CoreError> {
        let mac = device
            .mac_address()
            .ok_or_else(|| CoreError::MissingMacAddress {
                device: device.name.clone(),
                protocol: ONVIF_PROTOCOL.to_owned(),
            })?;

        let default_secret_name = self.default_secret_name.load();
        let secret_name = self.mapper.resolve_group_for_mac(mac, &default_secret_name);
        debug!(device = %device.name, secret_name = %secret_name, "resolved secret name for device");
        Ok(secret_name)
    }

    /// Credentials for `device`, resolved through its MAC mapping.
    pub fn resolve_credentials_for_device(&self, device: &Device) -> Result<Credentials, CoreError> {
        let secret_name = self.resolve_secret_name_for_device(device)?;
        self.resolve_credentials_for_group(&secret_name)
    }
}
