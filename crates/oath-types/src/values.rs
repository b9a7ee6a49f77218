//! # Value Objects
//!
//! Immutable primitives defined by their value: addresses, transaction
//! hashes, chain identifiers, and role labels. All hex-carrying types
//! serialize as `0x`-prefixed strings so persisted sessions and logs stay
//! human-readable.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Re-export U256 from primitive-types for 256-bit on-chain integers
pub use primitive_types::U256;

/// Failure to parse a hex-encoded value object.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HexParseError {
    /// Input did not start with the mandatory `0x` prefix.
    #[error("missing 0x prefix: {0:?}")]
    MissingPrefix(String),

    /// Input had the wrong number of hex digits.
    #[error("expected {expected} hex bytes, got {actual}")]
    WrongLength {
        /// Expected byte width.
        expected: usize,
        /// Actual byte width after decoding.
        actual: usize,
    },

    /// Input contained non-hex characters.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], HexParseError> {
    let stripped = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| HexParseError::MissingPrefix(s.to_string()))?;
    let raw = hex::decode(stripped).map_err(|e| HexParseError::InvalidHex(e.to_string()))?;
    if raw.len() != N {
        return Err(HexParseError::WrongLength {
            expected: N,
            actual: raw.len(),
        });
    }
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&raw);
    Ok(bytes)
}

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte Ethereum-style account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns `None` if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 20 {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Full `0x`-prefixed lowercase hex rendering (42 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Abbreviated rendering for UI display: `0x1234...abcd`.
    #[must_use]
    pub fn to_short_hex(&self) -> String {
        let full = hex::encode(self.0);
        format!("0x{}...{}", &full[..4], &full[36..])
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_short_hex())
    }
}

impl FromStr for Address {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<20>(s).map(Self)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// TRANSACTION HASH (32 bytes)
// =============================================================================

/// A 32-byte transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TxHash(pub [u8; 32]);

impl TxHash {
    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a hash from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates a hash from a slice. Returns `None` if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 32 {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Full `0x`-prefixed lowercase hex rendering (66 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for TxHash {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<32>(s).map(Self)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// CHAIN ID
// =============================================================================

/// A chain identifier, rendered in the wallet protocol's hex form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Sepolia testnet (11155111 / `0xaa36a7`), the fixed target network.
    pub const SEPOLIA: Self = Self(11_155_111);

    /// Ethereum mainnet.
    pub const MAINNET: Self = Self(1);

    /// Decimal value of the chain id.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Wallet-protocol hex form, e.g. `0xaa36a7`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.0)
    }

    /// Parses the wallet-protocol hex form (`0x`-prefixed, no leading zeros
    /// required).
    pub fn from_hex(s: &str) -> Result<Self, HexParseError> {
        let stripped = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| HexParseError::MissingPrefix(s.to_string()))?;
        u64::from_str_radix(stripped, 16)
            .map(Self)
            .map_err(|e| HexParseError::InvalidHex(e.to_string()))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ROLE
// =============================================================================

/// A portal role label.
///
/// The first three are backed by on-chain membership predicates; `Patient`
/// is the default when none match. `Insurer` is a locally-assigned label
/// with no contract predicate: it can round-trip through the persisted
/// session store but is never produced by role resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Mints batches.
    Manufacturer,
    /// Verifies and dispenses drugs.
    Pharmacy,
    /// Issues prescriptions.
    Doctor,
    /// Default role; views own prescriptions.
    Patient,
    /// Locally-assigned label, not contract-backed.
    Insurer,
}

impl Role {
    /// Human-readable label used by the portals and the session store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manufacturer => "Manufacturer",
            Self::Pharmacy => "Pharmacy",
            Self::Doctor => "Doctor",
            Self::Patient => "Patient",
            Self::Insurer => "Insurer",
        }
    }

    /// True for the roles backed by an on-chain membership predicate.
    #[must_use]
    pub const fn is_contract_backed(&self) -> bool {
        matches!(self, Self::Manufacturer | Self::Pharmacy | Self::Doctor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to parse a persisted role label.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role label: {0:?}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Manufacturer" => Ok(Self::Manufacturer),
            "Pharmacy" => Ok(Self::Pharmacy),
            "Doctor" => Ok(Self::Doctor),
            "Patient" => Ok(Self::Patient),
            "Insurer" => Ok(Self::Insurer),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
