// ── Config-backed secret store ──
//
// Lookup order per field: system keyring entry `camcred` /
// `<secret name>/<field>`, then the plaintext `[secrets.<name>]` table.

use std::collections::HashMap;
use std::hash::BuildHasher;

use secrecy::SecretString;

use camcred_core::secret::{CREDENTIAL_KEYS, select_keys};
use camcred_core::{SecretData, SecretStore, SecretStoreError};

use crate::{Config, SecretFields};

/// Keyring service name under which camera secrets are stored.
pub const KEYRING_SERVICE: &str = "camcred";

/// Secret store fed by the system keyring and the config file.
#[derive(Debug, Default)]
pub struct ConfigSecretStore {
    plaintext: HashMap<String, SecretFields>,
    use_keyring: bool,
}

impl ConfigSecretStore {
    pub fn new<S: BuildHasher>(
        plaintext: HashMap<String, SecretFields, S>,
        use_keyring: bool,
    ) -> Self {
        Self {
            plaintext: plaintext.into_iter().collect(),
            use_keyring,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.secrets.clone(), cfg.use_keyring)
    }

    fn keyring_value(
        &self,
        name: &str,
        key: &str,
    ) -> Result<Option<SecretString>, SecretStoreError> {
        if !self.use_keyring {
            return Ok(None);
        }
        let result = keyring::Entry::new(KEYRING_SERVICE, &format!("{name}/{key}"))
            .and_then(|entry| entry.get_password());
        keyring_lookup(result)
    }

    fn plaintext_value(&self, name: &str, key: &str) -> Option<SecretString> {
        self.plaintext
            .get(name)
            .and_then(|fields| fields.get(key))
            .map(|v| SecretString::from(v.clone()))
    }
}

/// A missing keyring entry is `None`; any other keyring failure is a
/// backend error rather than a missing secret.
fn keyring_lookup(
    result: keyring::Result<String>,
) -> Result<Option<SecretString>, SecretStoreError> {
    match result {
        Ok(value) => Ok(Some(SecretString::from(value))),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(SecretStoreError::Backend {
            message: err.to_string(),
        }),
    }
}

impl SecretStore for ConfigSecretStore {
    fn get_secret(&self, name: &str, keys: &[&str]) -> Result<SecretData, SecretStoreError> {
        let plaintext = self.plaintext.get(name);

        let mut wanted: Vec<&str> = if keys.is_empty() {
            CREDENTIAL_KEYS.to_vec()
        } else {
            keys.to_vec()
        };
        if keys.is_empty() {
            if let Some(fields) = plaintext {
                wanted.extend(fields.keys().map(String::as_str));
            }
            wanted.sort_unstable();
            wanted.dedup();
        }

        let mut data = SecretData::new();
        for key in wanted {
            let value = self
                .keyring_value(name, key)?
                .or_else(|| self.plaintext_value(name, key));
            if let Some(value) = value {
                data.insert(key.to_owned(), value);
            }
        }

        if data.is_empty() && plaintext.is_none() {
            return Err(SecretStoreError::NotFound {
                name: name.to_owned(),
            });
        }
        if keys.is_empty() {
            return Ok(data);
        }
        select_keys(name, &data, keys)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn store() -> ConfigSecretStore {
        let fields = SecretFields::from([
            ("username".to_owned(), "admin".to_owned()),
            ("password".to_owned(), "hunter2".to_owned()),
            ("mode".to_owned(), "digest".to_owned()),
        ]);
        ConfigSecretStore::new(HashMap::from([("lobby".to_owned(), fields)]), false)
    }

    #[test]
    fn reads_plaintext_group() {
        let data = store().get_secret("lobby", &CREDENTIAL_KEYS).unwrap();
        assert_eq!(data["username"].expose_secret(), "admin");
        assert_eq!(data["password"].expose_secret(), "hunter2");
    }

    #[test]
    fn unknown_group_is_not_found() {
        let err = store().get_secret("garage", &CREDENTIAL_KEYS).unwrap_err();
        assert!(matches!(err, SecretStoreError::NotFound { .. }));
    }

    #[test]
    fn missing_field_is_reported() {
        let store = ConfigSecretStore::new(
            HashMap::from([(
                "partial".to_owned(),
                SecretFields::from([("username".to_owned(), "admin".to_owned())]),
            )]),
            false,
        );
        let err = store.get_secret("partial", &CREDENTIAL_KEYS).unwrap_err();
        assert!(matches!(err, SecretStoreError::MissingKeys { keys, .. } if keys.len() == 2));
    }

    #[test]
    fn missing_keyring_entry_falls_through() {
        assert!(keyring_lookup(Err(keyring::Error::NoEntry)).unwrap().is_none());
        let found = keyring_lookup(Ok("hunter2".into())).unwrap().unwrap();
        assert_eq!(found.expose_secret(), "hunter2");
    }

    #[test]
    fn keyring_failure_is_a_backend_error() {
        let locked = keyring::Error::PlatformFailure("store is locked".into());
        let err = keyring_lookup(Err(locked)).unwrap_err();
        assert!(matches!(
            err,
            SecretStoreError::Backend { ref message } if message.contains("store is locked")
        ));
    }

    #[test]
    fn empty_key_list_returns_all_fields() {
        let data = store().get_secret("lobby", &[]).unwrap();
        assert_eq!(data.len(), 3);
    }
}
