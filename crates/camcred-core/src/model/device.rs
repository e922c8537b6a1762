// ── Device domain types ──
//
// Read-only view of a device as the device registry hands it over:
// a name plus named protocol-property bags. Only the ONVIF bag matters
// for credential mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Name of the protocol-property bag carrying ONVIF identity.
pub const ONVIF_PROTOCOL: &str = "Onvif";

/// Key of the MAC address inside the ONVIF bag.
pub const MAC_ADDRESS_KEY: &str = "MACAddress";

/// Key of the endpoint reference address inside the ONVIF bag.
pub const ENDPOINT_REF_ADDRESS_KEY: &str = "EndpointRefAddress";

/// Free-form key/value properties for one protocol.
pub type ProtocolProperties = HashMap<String, String>;

/// A registered device and its protocol properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    #[serde(default)]
    pub protocols: HashMap<String, ProtocolProperties>,
}

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            protocols: HashMap::new(),
        }
    }

    /// Set a single ONVIF protocol property, creating the bag if needed.
    pub fn with_onvif_property(mut self, key: &str, value: impl Into<String>) -> Self {
        self.protocols
            .entry(ONVIF_PROTOCOL.to_owned())
            .or_default()
            .insert(key.to_owned(), value.into());
        self
    }

    fn onvif_property(&self, key: &str) -> Option<&str> {
        self.protocols
            .get(ONVIF_PROTOCOL)
            .and_then(|props| props.get(key))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// The raw (unsanitized) MAC address, if present and non-empty.
    pub fn mac_address(&self) -> Option<&str> {
        self.onvif_property(MAC_ADDRESS_KEY)
    }

    /// The raw endpoint reference address, if present and non-empty.
    pub fn endpoint_ref_address(&self) -> Option<&str> {
        self.onvif_property(ENDPOINT_REF_ADDRESS_KEY)
    }
}
