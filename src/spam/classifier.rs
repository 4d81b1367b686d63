//! Heuristic spam/phishing classifier.
//!
//! Scores a transaction plus its receipt against six independent checks and
//! merges them by max confidence. Pure with respect to its inputs: missing
//! or malformed fields read as their zero/empty defaults, so one garbage
//! transaction cannot abort batch processing.

use crate::domain::{Receipt, Transaction};
use crate::spam::{SpamReason, SpamVerdict};
use serde_json::{json, Map, Value};
use std::collections::{BTreeSet, HashSet};
use std::sync::RwLock;

/// Event signature for ERC-20 `Transfer(address,address,uint256)`.
const TRANSFER_TOPIC: &str = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// Normal transactions rarely emit more than this many logs.
const MAX_EVENTS_NORMAL: usize = 50;
/// Beyond this, a transaction is almost certainly spam.
const MAX_EVENTS_SUSPICIOUS: usize = 100;
/// Airdrop pattern needs at least this many distinct recipients.
const MIN_AIRDROP_RECIPIENTS: usize = 10;
/// Airdrop pattern tolerates at most this many distinct senders.
const MAX_AIRDROP_SENDERS: usize = 3;
/// More ERC-20 transfers than this in one transaction reads as dusting.
const DUST_TRANSFER_LIMIT: usize = 20;
/// Verdicts below this confidence are not treated as spam.
const SPAM_CONFIDENCE_FLOOR: f64 = 0.60;

/// Token contracts trusted unconditionally.
const DEFAULT_VERIFIED_TOKENS: &[&str] = &[
    "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2", // WETH
    "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", // USDC
    "0xdac17f958d2ee523a2206206994597c13d831ec7", // USDT
    "0x6b175474e89094c44da98b954eedeac495271d0f", // DAI
    "0x0000000000a39bb272e79075ade125fd351887ac", // Blur Pool
    "0x5283d291dbcf85356a21ba090e6db59121208b44", // BLUR
    "0x7f39c581f595b53c5cb19bd0b3f8da6c935e2ca0", // wstETH
    "0xae7ab96520de3a18e5e111b5eaab095312d7fe84", // stETH
    "0xbe9895146f7af43049ca1c1ae358b0541ea49704", // cbETH
    "0xae78736cd615f374d3085123a210448e74fc6393", // rETH
    "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599", // WBTC
    "0x514910771af9ca656af840dff83e8264ecf986ca", // LINK
    "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984", // UNI
    "0x7fc66500c84a76ad7e9c93437bfc5ac33e2ddae9", // AAVE
];

/// Phishing/airdrop/dust classifier.
///
/// The two address lists may grow at runtime while other threads are
/// classifying; both sit behind a reader/writer lock so a reader never
/// observes a half-applied update. Construct one instance per calling
/// context rather than sharing a global.
pub struct SpamClassifier {
    verified_tokens: RwLock<HashSet<String>>,
    phishing_contracts: RwLock<HashSet<String>>,
}

impl SpamClassifier {
    /// Classifier with the default verified-token allow-list and an empty
    /// phishing deny-list.
    pub fn new() -> Self {
        Self::with_verified_tokens(
            DEFAULT_VERIFIED_TOKENS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    /// Classifier with a caller-supplied verified-token set.
    pub fn with_verified_tokens(verified_tokens: HashSet<String>) -> Self {
        SpamClassifier {
            verified_tokens: RwLock::new(
                verified_tokens.into_iter().map(|s| s.to_lowercase()).collect(),
            ),
            phishing_contracts: RwLock::new(HashSet::new()),
        }
    }

    /// Score one transaction. Never fails.
    pub fn classify(&self, tx: &Transaction, receipt: &Receipt) -> SpamVerdict {
        let mut reasons = BTreeSet::new();
        let mut details = Map::new();
        let mut confidence: f64 = 0.0;

        let logs = &receipt.logs;
        let num_events = logs.len();
        details.insert("num_events".to_string(), json!(num_events));

        // Check 1: too many events.
        if num_events > MAX_EVENTS_SUSPICIOUS {
            reasons.insert(SpamReason::TooManyEvents);
            confidence = confidence.max(0.95);
            details.insert("event_threshold_exceeded".to_string(), json!(true));
        } else if num_events > MAX_EVENTS_NORMAL {
            reasons.insert(SpamReason::TooManyEvents);
            confidence = confidence.max(0.70);
            details.insert("event_threshold_exceeded".to_string(), json!(true));
        }

        // Check 2: airdrop pattern (few senders, many recipients).
        let airdrop = check_airdrop_pattern(logs);
        if airdrop.is_airdrop {
            reasons.insert(SpamReason::AirdropPattern);
            confidence = confidence.max(0.85);
            details.insert("airdrop".to_string(), airdrop.to_json());
        }

        // Check 3: known phishing contracts.
        let phishing = self.find_phishing_contracts(logs);
        if !phishing.is_empty() {
            reasons.insert(SpamReason::KnownPhishingContract);
            confidence = confidence.max(0.99);
            details.insert("phishing_contracts".to_string(), json!(phishing));
        }

        // Check 4: unverified tokens, significant only on busy transactions.
        let unverified = self.find_unverified_tokens(logs);
        if !unverified.is_empty() {
            details.insert("unverified_tokens".to_string(), json!(unverified));
            if num_events > MAX_EVENTS_NORMAL {
                reasons.insert(SpamReason::UnverifiedToken);
                confidence = confidence.max(0.60);
            }
        }

        // Check 5: zero native value with many token events.
        if tx.native_value() == 0 && num_events > MAX_EVENTS_NORMAL {
            reasons.insert(SpamReason::FakeTransfer);
            confidence = confidence.max(0.80);
            details.insert("zero_value_many_events".to_string(), json!(true));
        }

        // Check 6: dust attack (many tiny transfers; count is the proxy).
        let transfer_count = count_transfer_logs(logs);
        if transfer_count > DUST_TRANSFER_LIMIT {
            reasons.insert(SpamReason::DustAttack);
            confidence = confidence.max(0.75);
            details.insert(
                "dust_attack".to_string(),
                json!({ "is_dust_attack": true, "transfer_count": transfer_count }),
            );
        }

        let is_spam = !reasons.is_empty() && confidence >= SPAM_CONFIDENCE_FLOOR;

        if is_spam {
            tracing::warn!(
                tx = tx.hash.as_ref().map(|h| h.as_str()).unwrap_or("<unknown>"),
                confidence,
                ?reasons,
                "transaction flagged as spam"
            );
        }

        SpamVerdict {
            is_spam,
            confidence,
            reasons,
            details,
        }
    }

    /// Add a contract to the phishing deny-list.
    pub fn add_phishing_contract(&self, address: &str) {
        let mut list = self
            .phishing_contracts
            .write()
            .unwrap_or_else(|e| e.into_inner());
        list.insert(address.to_lowercase());
        tracing::info!(address, "added contract to phishing deny-list");
    }

    /// Add a token to the verified allow-list.
    pub fn add_verified_token(&self, address: &str) {
        let mut list = self
            .verified_tokens
            .write()
            .unwrap_or_else(|e| e.into_inner());
        list.insert(address.to_lowercase());
        tracing::info!(address, "added token to verified allow-list");
    }

    fn find_phishing_contracts(&self, logs: &[crate::domain::LogEntry]) -> Vec<String> {
        let deny = self
            .phishing_contracts
            .read()
            .unwrap_or_else(|e| e.into_inner());
        let found: BTreeSet<String> = logs
            .iter()
            .map(|log| log.address_lower())
            .filter(|addr| deny.contains(addr))
            .collect();
        found.into_iter().collect()
    }

    fn find_unverified_tokens(&self, logs: &[crate::domain::LogEntry]) -> Vec<String> {
        let allow = self
            .verified_tokens
            .read()
            .unwrap_or_else(|e| e.into_inner());
        let found: BTreeSet<String> = logs
            .iter()
            .map(|log| log.address_lower())
            .filter(|addr| !addr.is_empty() && !allow.contains(addr))
            .collect();
        found.into_iter().collect()
    }
}

impl Default for SpamClassifier {
    fn default() -> Self {
        Self::new()
    }
}

struct AirdropCheck {
    is_airdrop: bool,
    num_senders: usize,
    num_recipients: usize,
    transfer_count: usize,
}

impl AirdropCheck {
    fn to_json(&self) -> Value {
        json!({
            "is_airdrop": self.is_airdrop,
            "num_senders": self.num_senders,
            "num_recipients": self.num_recipients,
            "transfer_count": self.transfer_count,
        })
    }
}

/// Distinct sender/recipient fan-out across ERC-20 Transfer logs.
///
/// Sender and recipient are the 2nd/3rd indexed topics; the address is the
/// last 40 hex chars of the padded topic. Logs without the Transfer topic
/// signature are ignored.
fn check_airdrop_pattern(logs: &[crate::domain::LogEntry]) -> AirdropCheck {
    let mut senders: HashSet<String> = HashSet::new();
    let mut recipients: HashSet<String> = HashSet::new();
    let mut transfer_count = 0usize;

    for log in logs {
        if !is_transfer_log(log) || log.topics.len() < 3 {
            continue;
        }
        transfer_count += 1;
        senders.insert(topic_address(&log.topics[1]));
        recipients.insert(topic_address(&log.topics[2]));
    }

    let is_airdrop = senders.len() <= MAX_AIRDROP_SENDERS
        && recipients.len() >= MIN_AIRDROP_RECIPIENTS
        && transfer_count > MAX_EVENTS_NORMAL;

    AirdropCheck {
        is_airdrop,
        num_senders: senders.len(),
        num_recipients: recipients.len(),
        transfer_count,
    }
}

fn count_transfer_logs(logs: &[crate::domain::LogEntry]) -> usize {
    logs.iter().filter(|log| is_transfer_log(log)).count()
}

fn is_transfer_log(log: &crate::domain::LogEntry) -> bool {
    log.topics
        .first()
        .map(|t| t.eq_ignore_ascii_case(TRANSFER_TOPIC))
        .unwrap_or(false)
}

/// Last 40 hex chars of a padded topic, lowercased and 0x-prefixed.
/// Short or non-hex topics fall back to whatever is there; the counting
/// checks only need distinctness, not validity.
fn topic_address(topic: &str) -> String {
    let lower = topic.to_lowercase();
    let tail = lower
        .get(lower.len().saturating_sub(40)..)
        .unwrap_or(&lower);
    format!("0x{tail}")
}
