// ── Domain model ──

pub mod device;

pub use device::{
    Device, ENDPOINT_REF_ADDRESS_KEY, MAC_ADDRESS_KEY, ONVIF_PROTOCOL, ProtocolProperties,
};
