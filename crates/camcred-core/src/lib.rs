//! Credential resolution and MAC identity correlation for ONVIF cameras.
//!
//! Cameras authenticate with per-device or per-group credentials kept in
//! a secret store. This crate decides *which* group a camera belongs to
//! and turns that group into ready-to-use [`Credentials`]:
//!
//! - **[`MacAddress`]** -- canonical hardware address. [`mac::sanitize`]
//!   and [`mac::bytewise_reverse`] expose the same normalization on plain
//!   strings.
//!
//! - **[`MacAddressMapper`]** -- MAC address -> secret name table, rebuilt
//!   from a `secret name -> MAC list` map and swapped in atomically.
//!   Also finds known addresses embedded (possibly byte-reversed) in
//!   ONVIF endpoint reference strings.
//!
//! - **[`CredentialResolver`]** -- secret name or [`Device`] ->
//!   [`Credentials`], with auth-mode validation and a configurable
//!   default secret name.
//!
//! - **[`SecretStore`]** -- the only way secrets are read. Backends are
//!   supplied by the caller; [`InMemorySecretStore`] is included.

pub mod config;
pub mod credentials;
pub mod error;
pub mod mac;
pub mod mapper;
pub mod model;
pub mod secret;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_SECRET_NAME, DriverConfig};
pub use credentials::{AuthMode, CredentialResolver, Credentials};
pub use error::{CoreError, MacParseError, SecretStoreError};
pub use mac::MacAddress;
pub use mapper::{MacAddressMapper, MacMappings, MappingConflict, MappingReport};
pub use model::{Device, ProtocolProperties};
pub use secret::{InMemorySecretStore, NO_AUTH_SECRET_NAME, SecretData, SecretStore};
