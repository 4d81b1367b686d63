//! Raw transaction and receipt shapes consumed by the spam classifier.
//!
//! These arrive from the upstream fetch layer as loosely-shaped JSON.
//! Every field defaults, so one malformed transaction can never abort a
//! batch: a missing value is zero, a missing log list is empty.

use crate::domain::TxHash;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimal view of a raw transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub hash: Option<TxHash>,
    /// Native-asset value. Upstream sources emit this as a hex string, a
    /// decimal string, or a bare number depending on provider.
    #[serde(default)]
    pub value: Value,
}

impl Transaction {
    /// Native value in wei. Malformed or absent values read as zero.
    pub fn native_value(&self) -> u128 {
        match &self.value {
            Value::Number(n) => n.as_u64().map(u128::from).unwrap_or(0),
            Value::String(s) => {
                let s = s.trim();
                if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                    u128::from_str_radix(hex_digits, 16).unwrap_or(0)
                } else {
                    s.parse::<u128>().unwrap_or(0)
                }
            }
            _ => 0,
        }
    }
}

/// A single receipt log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogEntry {
    /// Emitting contract address.
    #[serde(default)]
    pub address: String,
    /// Indexed topics, `topics[0]` being the event signature.
    #[serde(default)]
    pub topics: Vec<String>,
    /// ABI-encoded payload, unused by classification.
    #[serde(default)]
    pub data: String,
}

impl LogEntry {
    /// Emitting address, lowercased. Empty when absent.
    pub fn address_lower(&self) -> String {
        self.address.to_lowercase()
    }
}

/// Transaction receipt: the log set emitted by execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_value_accepts_hex_string() {
        let tx: Transaction = serde_json::from_str(r#"{"value": "0x1a"}"#).unwrap();
        assert_eq!(tx.native_value(), 26);
    }

    #[test]
    fn native_value_accepts_decimal_string_and_number() {
        let tx: Transaction = serde_json::from_str(r#"{"value": "1000"}"#).unwrap();
        assert_eq!(tx.native_value(), 1000);
        let tx: Transaction = serde_json::from_str(r#"{"value": 42}"#).unwrap();
        assert_eq!(tx.native_value(), 42);
    }

    #[test]
    fn malformed_or_missing_value_reads_zero() {
        let tx: Transaction = serde_json::from_str("{}").unwrap();
        assert_eq!(tx.native_value(), 0);
        let tx: Transaction = serde_json::from_str(r#"{"value": "garbage"}"#).unwrap();
        assert_eq!(tx.native_value(), 0);
        let tx: Transaction = serde_json::from_str(r#"{"value": null}"#).unwrap();
        assert_eq!(tx.native_value(), 0);
    }

    #[test]
    fn receipt_defaults_to_empty_logs() {
        let receipt: Receipt = serde_json::from_str("{}").unwrap();
        assert!(receipt.logs.is_empty());
    }

    #[test]
    fn log_entry_tolerates_missing_fields() {
        let log: LogEntry = serde_json::from_str(r#"{"address": "0xAB"}"#).unwrap();
        assert_eq!(log.address_lower(), "0xab");
        assert!(log.topics.is_empty());
        assert!(log.data.is_empty());
    }
}
