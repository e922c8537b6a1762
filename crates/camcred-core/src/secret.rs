// ── Secret store seam ──
//
// The credential resolver and the mapper only ever talk to secrets
// through `SecretStore`. Backends live elsewhere (keyring, config
// file); `InMemorySecretStore` is the reference implementation.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use secrecy::SecretString;

use crate::error::SecretStoreError;

/// Secret field holding the camera username.
pub const USERNAME_KEY: &str = "username";
/// Secret field holding the camera password.
pub const PASSWORD_KEY: &str = "password";
/// Secret field holding the ONVIF auth-mode token.
pub const AUTH_MODE_KEY: &str = "mode";

/// The three fields every credential group must carry.
pub const CREDENTIAL_KEYS: [&str; 3] = [USERNAME_KEY, PASSWORD_KEY, AUTH_MODE_KEY];

/// Reserved secret name meaning "connect without authentication".
pub const NO_AUTH_SECRET_NAME: &str = "noauth";

/// Whether `name` is the reserved no-auth secret name (case-insensitive).
pub fn is_no_auth(name: &str) -> bool {
    name.eq_ignore_ascii_case(NO_AUTH_SECRET_NAME)
}

/// Field name -> secret value.
pub type SecretData = HashMap<String, SecretString>;

/// Read access to named groups of secrets.
///
/// Implementations must fail when the group does not exist or when any
/// of the requested `keys` is missing from it. An empty `keys` slice
/// returns every field of the group.
pub trait SecretStore: Send + Sync {
    fn get_secret(&self, name: &str, keys: &[&str]) -> Result<SecretData, SecretStoreError>;
}

/// Thread-safe in-memory secret store.
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    secrets: RwLock<HashMap<String, SecretData>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a secret group.
    pub fn insert<K, V>(&self, name: impl Into<String>, fields: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        let data: SecretData = fields
            .into_iter()
            .map(|(k, v)| (k.into(), SecretString::from(v.into())))
            .collect();
        self.secrets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), data);
    }

    /// Remove a secret group. Returns `true` if it existed.
    pub fn remove(&self, name: &str) -> bool {
        self.secrets
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.secrets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }
}

impl SecretStore for InMemorySecretStore {
    fn get_secret(&self, name: &str, keys: &[&str]) -> Result<SecretData, SecretStoreError> {
        let secrets = self.secrets.read().unwrap_or_else(PoisonError::into_inner);
        let group = secrets.get(name).ok_or_else(|| SecretStoreError::NotFound {
            name: name.to_owned(),
        })?;

        if keys.is_empty() {
            return Ok(group.clone());
        }
        select_keys(name, group, keys)
    }
}

/// Pick `keys` out of `group`, failing with every missing key listed.
pub fn select_keys(
    name: &str,
    group: &SecretData,
    keys: &[&str],
) -> Result<SecretData, SecretStoreError> {
    let missing: Vec<String> = keys
        .iter()
        .filter(|k| !group.contains_key(**k))
        .map(|k| (*k).to_owned())
        .collect();
    if !missing.is_empty() {
        return Err(SecretStoreError::MissingKeys {
            name: name.to_owned(),
            keys: missing,
        });
    }

    Ok(keys
        .iter()
        .filter_map(|k| group.get(*k).map(|v| ((*k).to_owned(), v.clone())))
        .collect())
}
