//! # Addresses
//!
//! An [`Address`] is the ledger's notion of identity: 20 opaque bytes,
//! compared bytewise, written as `0x` followed by 40 lowercase hex digits.
//!
//! [`Address::ZERO`] is the sentinel for "no account". The ledger rejects it
//! as a sender, receiver, spender, or owner, and uses it as the `from` side
//! of mint events.
//!
//! Where addresses come from (public-key hashing, a wallet, a registry) is
//! the host's business. For tooling and tests, [`Address::derive`] turns a
//! human label into a stable address.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::config::{ADDRESS_DERIVATION_CONTEXT, ADDRESS_LENGTH, ADDRESS_PREFIX};
use crate::crypto::hash::domain_separated_hash;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while parsing an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The string is not valid hex.
    #[error("invalid hex in address: {0}")]
    InvalidHex(String),

    /// The decoded bytes have the wrong width.
    #[error("invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A fixed-width account identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The "no account" sentinel.
    pub const ZERO: Address = Address([0u8; ADDRESS_LENGTH]);

    /// Wraps raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// `true` for the zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Derives a deterministic address from a label.
    ///
    /// Computed as the first 20 bytes of a domain-separated BLAKE3 hash of
    /// the label. The same label always yields the same address, and no label
    /// yields [`Address::ZERO`] in practice.
    ///
    /// ```
    /// use ledger_protocol::identity::Address;
    ///
    /// let alice = Address::derive("alice");
    /// assert_eq!(alice, Address::derive("alice"));
    /// assert_ne!(alice, Address::derive("bob"));
    /// assert!(!alice.is_zero());
    /// ```
    pub fn derive(label: &str) -> Self {
        let digest = domain_separated_hash(ADDRESS_DERIVATION_CONTEXT, label.as_bytes());
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&digest[..ADDRESS_LENGTH]);
        Self(bytes)
    }

    /// Returns the `0x`-prefixed lowercase hex form.
    pub fn to_hex(&self) -> String {
        format!("{}{}", ADDRESS_PREFIX, hex::encode(self.0))
    }

    /// Parses a hex address, with or without the `0x` prefix, in either case.
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix(ADDRESS_PREFIX)
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        if bytes.len() != ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_LENGTH,
                got: bytes.len(),
            });
        }

        let mut arr = [0u8; ADDRESS_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Address({}..{})", &hex[..8], &hex[hex.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

// Serialized as the hex string so addresses work as JSON object keys.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert_eq!(
            Address::ZERO.to_hex(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn hex_forms_are_accepted() {
        let addr = Address::derive("carol");
        let hex = addr.to_hex();
        assert_eq!(hex.len(), 42);
        assert_eq!(Address::from_hex(&hex).unwrap(), addr);
        assert_eq!(Address::from_hex(&hex[2..]).unwrap(), addr);
        assert_eq!(Address::from_hex(&hex.to_uppercase().replacen("0X", "0x", 1)).unwrap(), addr);
        assert_eq!(hex.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn bad_hex_rejected() {
        assert!(matches!(
            Address::from_hex("0xzz"),
            Err(AddressError::InvalidHex(_))
        ));
        assert_eq!(
            Address::from_hex("0xdeadbeef"),
            Err(AddressError::InvalidLength {
                expected: 20,
                got: 4
            })
        );
    }

    #[test]
    fn ordering_is_bytewise() {
        let low = Address::from_bytes([0u8; 20]);
        let mut high_bytes = [0u8; 20];
        high_bytes[0] = 1;
        assert!(low < Address::from_bytes(high_bytes));
    }

    #[test]
    fn serde_uses_hex_string() {
        let addr = Address::derive("dave");
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_hex()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn address_works_as_json_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(Address::derive("erin"), 5u32);
        let json = serde_json::to_string(&map).unwrap();
        let back: std::collections::BTreeMap<Address, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn debug_is_abbreviated() {
        let dbg = format!("{:?}", Address::ZERO);
        assert_eq!(dbg, "Address(0x000000..0000)");
    }
}
