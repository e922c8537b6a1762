// ── MAC address -> credential group mapping ──
//
// Readers load an `Arc` snapshot and never block. Updates rebuild a
// fresh map under `update_lock` and publish it with a single store, so
// a reader sees either the previous map or the new one in full.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::BuildHasher;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use tracing::{debug, warn};

use crate::mac::MacAddress;
use crate::model::Device;
use crate::secret::{CREDENTIAL_KEYS, NO_AUTH_SECRET_NAME, SecretStore, is_no_auth};

/// Canonical MAC address -> secret name.
pub type MacMappings = HashMap<MacAddress, String>;

/// A MAC address claimed by more than one credential group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingConflict {
    pub mac: MacAddress,
    /// Group that kept the address.
    pub kept: String,
    /// Group whose claim was rejected.
    pub rejected: String,
}

/// What happened during a single `update_mappings` call.
///
/// Every entry here has already been logged; the report exists so
/// callers can surface the same information elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingReport {
    /// Number of MAC addresses installed.
    pub installed: usize,
    /// Tokens that failed to parse as MAC addresses.
    pub invalid: Vec<String>,
    /// Empty tokens dropped from the lists (`",,"`, trailing commas).
    pub blank: usize,
    /// Claims rejected because another group got there first.
    pub conflicts: Vec<MappingConflict>,
    /// Groups that could not be found in the secret store.
    pub unknown_groups: Vec<String>,
}

/// Concurrent lookup table from MAC address to credential group.
pub struct MacAddressMapper {
    mappings: ArcSwap<MacMappings>,
    update_lock: Mutex<()>,
    secrets: Arc<dyn SecretStore>,
}

impl fmt::Debug for MacAddressMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacAddressMapper")
            .field("mappings", &self.mappings.load().len())
            .finish_non_exhaustive()
    }
}

impl MacAddressMapper {
    pub fn new(secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            mappings: ArcSwap::from_pointee(MacMappings::new()),
            update_lock: Mutex::new(()),
            secrets,
        }
    }

    /// Invert `raw` (secret name -> comma-separated MAC list) into a
    /// fresh lookup table and install it atomically.
    ///
    /// Unknown secret names and invalid MAC tokens are logged and never
    /// abort the rebuild. When two groups claim the same address the
    /// first one seen keeps it; `HashMap` iteration order decides which
    /// one that is.
    pub fn update_mappings<S: BuildHasher>(
        &self,
        raw: &HashMap<String, String, S>,
    ) -> MappingReport {
        let _guard = self
            .update_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut mappings = MacMappings::new();
        let mut report = MappingReport::default();

        for (secret_name, macs) in raw {
            if !is_no_auth(secret_name) {
                if let Err(err) = self.secrets.get_secret(secret_name, &CREDENTIAL_KEYS) {
                    warn!(
                        secret_name = %secret_name,
                        error = %err,
                        "MAC address mappings exist for a secret name that is not in the secret store"
                    );
                    report.unknown_groups.push(secret_name.clone());
                }
            }

            for token in macs.split(',').map(str::trim) {
                if token.is_empty() {
                    debug!(secret_name = %secret_name, "skipping blank MAC address token");
                    report.blank += 1;
                    continue;
                }
                let mac = match MacAddress::parse(token) {
                    Ok(mac) => mac,
                    Err(err) => {
                        warn!(mac = token, error = %err, "skipping invalid MAC address");
                        report.invalid.push(token.to_owned());
                        continue;
                    }
                };

                match mappings.entry(mac) {
                    Entry::Occupied(existing) => {
                        if existing.get() != secret_name {
                            warn!(
                                mac = %existing.key(),
                                kept = %existing.get(),
                                rejected = %secret_name,
                                "MAC address already belongs to another credential group"
                            );
                            report.conflicts.push(MappingConflict {
                                mac: existing.key().clone(),
                                kept: existing.get().clone(),
                                rejected: secret_name.clone(),
                            });
                        }
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(secret_name.clone());
                    }
                }
            }
        }

        report.installed = mappings.len();
        self.mappings.store(Arc::new(mappings));
        debug!(installed = report.installed, "MAC address mappings updated");
        report
    }

    /// Secret name for `mac`, `default_secret_name` when unmapped, or
    /// the no-auth name when `mac` cannot be parsed.
    pub fn resolve_group_for_mac(&self, mac: &str, default_secret_name: &str) -> String {
        let mac = match MacAddress::parse(mac) {
            Ok(mac) => mac,
            Err(err) => {
                warn!(error = %err, "unable to sanitize MAC address, using no authentication");
                return NO_AUTH_SECRET_NAME.to_owned();
            }
        };

        if let Some(secret_name) = self.mappings.load().get(&mac) {
            return secret_name.clone();
        }
        debug!(%mac, "no credential mapping for MAC address, using default secret name");
        default_secret_name.to_owned()
    }

    /// Look for any known MAC address inside an opaque string such as an
    /// ONVIF endpoint reference, in forward or byte-reversed order.
    ///
    /// The text is lower-cased and hyphens are removed before matching
    /// against the colon-free hex digits of each known address. If more
    /// than one address matches, which one is returned is unspecified.
    pub fn find_mac_in_opaque_string(&self, text: &str) -> Option<MacAddress> {
        let haystack = text.to_lowercase().replace('-', "");
        let mappings = self.mappings.load();

        mappings
            .keys()
            .find(|mac| {
                haystack.contains(&mac.hex_digits())
                    || haystack.contains(&mac.reversed().hex_digits())
            })
            .cloned()
    }

    /// Best-effort identity for `device`: its own MAC address when that
    /// parses, otherwise a known MAC found in its endpoint reference.
    pub fn infer_device_mac(&self, device: &Device) -> Option<MacAddress> {
        if let Some(mac) = device.mac_address().and_then(|m| MacAddress::parse(m).ok()) {
            return Some(mac);
        }
        let found = self.find_mac_in_opaque_string(device.endpoint_ref_address()?);
        if let Some(ref mac) = found {
            debug!(device = %device.name, %mac, "matched endpoint reference to known MAC address");
        }
        found
    }

    /// The current mapping table.
    pub fn snapshot(&self) -> Arc<MacMappings> {
        self.mappings.load_full()
    }

    pub fn len(&self) -> usize {
        self.mappings.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.load().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ENDPOINT_REF_ADDRESS_KEY, MAC_ADDRESS_KEY};
    use crate::secret::InMemorySecretStore;
    use pretty_assertions::assert_eq;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn mapper_with_groups(groups: &[&str]) -> MacAddressMapper {
        let store = InMemorySecretStore::new();
        for group in groups {
            store.insert(
                *group,
                [("username", "u"), ("password", "p"), ("mode", "digest")],
            );
        }
        MacAddressMapper::new(Arc::new(store))
    }

    #[test]
    fn resolves_mapped_mac_in_any_format() {
        let mapper = mapper_with_groups(&["g1"]);
        mapper.update_mappings(&raw(&[("g1", "aa:bb:cc:dd:ee:ff")]));
        assert_eq!(mapper.resolve_group_for_mac("AA-BB-CC-DD-EE-FF", "default"), "g1");
        assert_eq!(mapper.resolve_group_for_mac("aabb.ccdd.eeff", "default"), "g1");
    }

    #[test]
    fn unmapped_mac_uses_default() {
        let mapper = mapper_with_groups(&["g1"]);
        mapper.update_mappings(&raw(&[("g1", "aa:bb:cc:dd:ee:ff")]));
        assert_eq!(
            mapper.resolve_group_for_mac("11:22:33:44:55:66", "default"),
            "default"
        );
    }

    #[test]
    fn invalid_mac_fails_safe_to_no_auth() {
        let mapper = mapper_with_groups(&[]);
        assert_eq!(
            mapper.resolve_group_for_mac("not-a-mac", "default"),
            NO_AUTH_SECRET_NAME
        );
    }

    #[test]
    fn conflicting_claims_keep_first_and_report_loser() {
        let mapper = mapper_with_groups(&["g1", "g2"]);
        let report = mapper.update_mappings(&raw(&[
            ("g1", "aa:bb:cc:dd:ee:ff"),
            ("g2", "AA-BB-CC-DD-EE-FF"),
        ]));

        let winner = mapper.resolve_group_for_mac("aa:bb:cc:dd:ee:ff", "default");
        assert!(winner == "g1" || winner == "g2", "unexpected winner {winner}");
        assert_eq!(report.installed, 1);
        assert_eq!(report.conflicts.len(), 1);

        let conflict = &report.conflicts[0];
        assert_eq!(conflict.kept, winner);
        assert_ne!(conflict.rejected, winner);
        assert_eq!(conflict.mac.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn repeated_mac_within_one_group_is_not_a_conflict() {
        let mapper = mapper_with_groups(&["g1"]);
        let report = mapper.update_mappings(&raw(&[("g1", "aa:bb:cc:dd:ee:ff,AABBCCDDEEFF")]));
        assert_eq!(report.installed, 1);
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn invalid_tokens_are_skipped() {
        let mapper = mapper_with_groups(&["g1"]);
        let report = mapper.update_mappings(&raw(&[(
            "g1",
            "aa:bb:cc:dd:ee:ff, bogus ,11-22-33-44-55-66,",
        )]));
        assert_eq!(report.installed, 2);
        assert_eq!(report.invalid, vec!["bogus".to_owned()]);
        assert_eq!(mapper.resolve_group_for_mac("11:22:33:44:55:66", "d"), "g1");
    }

    #[test]
    fn blank_tokens_are_counted_not_invalid() {
        let mapper = mapper_with_groups(&["g1"]);
        let report = mapper.update_mappings(&raw(&[("g1", ",, 02:00:5e:10:00:00:00:01 ,")]));
        assert_eq!(report.installed, 1);
        assert_eq!(report.blank, 3);
        assert!(report.invalid.is_empty());
        assert_eq!(
            mapper.resolve_group_for_mac("02-00-5E-10-00-00-00-01", "d"),
            "g1"
        );
    }

    #[test]
    fn unknown_group_is_reported_but_still_installed() {
        let mapper = mapper_with_groups(&[]);
        let report = mapper.update_mappings(&raw(&[
            ("missing", "aa:bb:cc:dd:ee:ff"),
            ("NoAuth", "11:22:33:44:55:66"),
        ]));
        assert_eq!(report.unknown_groups, vec!["missing".to_owned()]);
        assert_eq!(mapper.resolve_group_for_mac("aa:bb:cc:dd:ee:ff", "d"), "missing");
        assert_eq!(mapper.resolve_group_for_mac("11:22:33:44:55:66", "d"), "NoAuth");
    }

    #[test]
    fn update_replaces_previous_map() {
        let mapper = mapper_with_groups(&["g1", "g2"]);
        mapper.update_mappings(&raw(&[("g1", "aa:bb:cc:dd:ee:ff")]));
        mapper.update_mappings(&raw(&[("g2", "11:22:33:44:55:66")]));

        assert_eq!(mapper.len(), 1);
        assert_eq!(mapper.resolve_group_for_mac("aa:bb:cc:dd:ee:ff", "d"), "d");
        assert_eq!(mapper.resolve_group_for_mac("11:22:33:44:55:66", "d"), "g2");
    }

    #[test]
    fn finds_forward_and_reversed_mac_in_endpoint_ref() {
        let mapper = mapper_with_groups(&["g1"]);
        mapper.update_mappings(&raw(&[("g1", "aa:bb:cc:dd:ee:ff")]));
        let expected = MacAddress::parse("aa:bb:cc:dd:ee:ff").unwrap();

        assert_eq!(
            mapper.find_mac_in_opaque_string("urn:uuid:ffeeddcc-bbaa-0000-0000-000000000000"),
            Some(expected.clone())
        );
        assert_eq!(
            mapper.find_mac_in_opaque_string("urn:uuid:5f5a69c2-e0ae-504f-829b-AABBCCDDEEFF"),
            Some(expected)
        );
        assert_eq!(
            mapper.find_mac_in_opaque_string("urn:uuid:5f5a69c2-e0ae-504f-829b-001122334455"),
            None
        );
    }

    #[test]
    fn find_on_empty_map_is_none() {
        let mapper = mapper_with_groups(&[]);
        assert!(mapper.is_empty());
        assert_eq!(mapper.find_mac_in_opaque_string("aabbccddeeff"), None);
    }

    #[test]
    fn infer_device_mac_prefers_own_address() {
        let mapper = mapper_with_groups(&["g1"]);
        mapper.update_mappings(&raw(&[("g1", "aa:bb:cc:dd:ee:ff")]));

        let direct = Device::new("cam").with_onvif_property(MAC_ADDRESS_KEY, "11-22-33-44-55-66");
        assert_eq!(
            mapper.infer_device_mac(&direct).unwrap().to_string(),
            "11:22:33:44:55:66"
        );

        let inferred = Device::new("cam").with_onvif_property(
            ENDPOINT_REF_ADDRESS_KEY,
            "urn:uuid:00000000-0000-0000-0000-ffeeddccbbaa",
        );
        assert_eq!(
            mapper.infer_device_mac(&inferred).unwrap().to_string(),
            "aa:bb:cc:dd:ee:ff"
        );

        assert_eq!(mapper.infer_device_mac(&Device::new("cam")), None);
    }
}
