// ── MAC address canonicalization ──
//
// Every MAC that enters the crate goes through `MacAddress::parse`.
// The canonical form is lower-case hex octets joined by colons, and
// it is the only form used for comparisons and map keys.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MacParseError;

const EUI48_OCTETS: usize = 6;
const EUI64_OCTETS: usize = 8;

/// Hardware address normalized to lower-case colon-separated octets
/// (`aa:bb:cc:dd:ee:ff`).
///
/// Accepts IEEE 802 MAC-48, EUI-48 and EUI-64 addresses written as
/// colon-separated, hyphen-separated, dot-grouped (`aabb.ccdd.eeff`)
/// or bare hex. Anything else is rejected rather than coerced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(Vec<u8>);

impl MacAddress {
    /// Parse and normalize a MAC address from any supported format.
    pub fn parse(raw: &str) -> Result<Self, MacParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MacParseError::invalid(raw, "empty input"));
        }

        let octets = if trimmed.contains(':') {
            parse_separated(raw, trimmed, ':')?
        } else if trimmed.contains('-') {
            parse_separated(raw, trimmed, '-')?
        } else if trimmed.contains('.') {
            parse_dotted(raw, trimmed)?
        } else {
            parse_bare(raw, trimmed)?
        };

        match octets.len() {
            EUI48_OCTETS | EUI64_OCTETS => Ok(Self(octets)),
            _ => Err(MacParseError::invalid(raw, "expected 6 or 8 octets")),
        }
    }

    pub fn octets(&self) -> &[u8] {
        &self.0
    }

    /// The same address with its octet order reversed.
    ///
    /// Hex digits inside an octet keep their order:
    /// `12:34:56:78:9a:bc` becomes `bc:9a:78:56:34:12`.
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    /// Canonical form with the colons stripped (`aabbccddeeff`).
    pub fn hex_digits(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * 2);
        for b in &self.0 {
            let _ = write!(out, "{b:02x}");
        }
        out
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for MacAddress {
    type Err = MacParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for MacAddress {
    type Error = MacParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MacAddress {
    type Error = MacParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

// ── String-level helpers ────────────────────────────────────────────

/// Return `mac` in canonical form, or `InvalidFormat` if it is not a
/// 48- or 64-bit hardware address.
pub fn sanitize(mac: &str) -> Result<String, MacParseError> {
    MacAddress::parse(mac).map(|m| m.to_string())
}

/// Sanitize `mac`, then reverse the order of its octets.
///
/// Endpoint reference strings sometimes carry the address this way.
pub fn bytewise_reverse(mac: &str) -> Result<String, MacParseError> {
    MacAddress::parse(mac).map(|m| m.reversed().to_string())
}

// ── Parsers ─────────────────────────────────────────────────────────

fn parse_separated(raw: &str, s: &str, sep: char) -> Result<Vec<u8>, MacParseError> {
    s.split(sep)
        .map(|group| {
            if group.len() == 2 {
                parse_hex_group(raw, group)
            } else {
                Err(MacParseError::invalid(
                    raw,
                    "each group must be exactly two hex digits",
                ))
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|groups| groups.into_iter().flatten().collect())
}

fn parse_dotted(raw: &str, s: &str) -> Result<Vec<u8>, MacParseError> {
    s.split('.')
        .map(|group| {
            if group.len() == 4 {
                parse_hex_group(raw, group)
            } else {
                Err(MacParseError::invalid(
                    raw,
                    "each dot-separated group must be exactly four hex digits",
                ))
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|groups| groups.into_iter().flatten().collect())
}

fn parse_bare(raw: &str, s: &str) -> Result<Vec<u8>, MacParseError> {
    if s.len() % 2 != 0 {
        return Err(MacParseError::invalid(raw, "odd number of hex digits"));
    }
    parse_hex_group(raw, s)
}

/// Decode an even-length run of hex digits into bytes.
fn parse_hex_group(raw: &str, group: &str) -> Result<Vec<u8>, MacParseError> {
    if !group.bytes().all(|c| c.is_ascii_hexdigit()) {
        return Err(MacParseError::invalid(raw, "non-hex character"));
    }
    group
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|p| u8::from_str_radix(p, 16).ok())
                .ok_or_else(|| MacParseError::invalid(raw, "non-hex character"))
        })
        .collect()
}
