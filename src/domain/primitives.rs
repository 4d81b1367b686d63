//! Domain primitives: Address, TxHash, TimeMs, Side, Direction.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An EVM address, lowercased at construction.
///
/// On-chain data mixes checksummed and lowercase hex freely; normalizing
/// here makes every wallet-topology comparison case-insensitive by type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Address(String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The zero address used by token contracts for mints and burns.
    pub fn zero() -> Self {
        Address("0x0000000000000000000000000000000000000000".to_string())
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Address::new(s)
    }
}

/// Transaction hash, lowercased at construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        TxHash(hash.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TxHash {
    fn from(s: &str) -> Self {
        TxHash::new(s)
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        TxHash::new(s)
    }
}

/// Time in milliseconds since Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeMs(pub i64);

impl TimeMs {
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    pub fn as_ms(&self) -> i64 {
        self.0
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        TimeMs(dt.timestamp_millis())
    }

    /// Convert to a UTC datetime. Out-of-range values clamp to the epoch.
    pub fn to_datetime(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.0)
            .single()
            .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Economic classification of a leg: Buy or Sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Signed multiplier: +1 for Buy, -1 for Sell.
    pub fn sign(&self) -> i32 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Best-effort flow hint from the upstream decoder. Not authoritative:
/// the direction-correction stage recomputes the truth from topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    In,
    Out,
}
