use std::fmt;
use std::str::FromStr;

use alloy_primitives::hex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,

    #[error("address must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("address contains non-hex characters")]
    InvalidHex,

    #[error("address checksum does not match")]
    BadChecksum,
}

/// A 20-byte account or contract address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(alloy_primitives::Address);

impl Address {
    pub const ZERO: Self = Self(alloy_primitives::Address::ZERO);

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(alloy_primitives::Address::new(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0.0.0
    }

    #[must_use]
    pub const fn inner(&self) -> alloy_primitives::Address {
        self.0
    }

    /// Lowercase `0x`-prefixed hex.
    #[must_use]
    pub fn to_lower_hex(&self) -> String {
        hex::encode_prefixed(self.0)
    }

    /// Mixed-case checksummed form.
    #[must_use]
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }

    /// Abbreviated form for display, e.g. `0xfbc5...72c8`.
    #[must_use]
    pub fn short(&self) -> String {
        let full = self.to_lower_hex();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }
}

impl From<alloy_primitives::Address> for Address {
    fn from(inner: alloy_primitives::Address) -> Self {
        Self(inner)
    }
}

impl From<Address> for alloy_primitives::Address {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// All-lowercase and all-uppercase input skips the checksum; mixed case must match it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;
        if digits.len() != 40 {
            return Err(AddressError::InvalidLength(digits.len()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError::InvalidHex);
        }

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        let inner = if has_lower && has_upper {
            alloy_primitives::Address::parse_checksummed(format!("0x{digits}"), None)
                .map_err(|_| AddressError::BadChecksum)?
        } else {
            digits
                .parse::<alloy_primitives::Address>()
                .map_err(|_| AddressError::InvalidHex)?
        };
        Ok(Self(inner))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_lower_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_lower_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
