//! Spam verdict and reason codes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Why a transaction was flagged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SpamReason {
    TooManyEvents,
    AirdropPattern,
    KnownPhishingContract,
    UnverifiedToken,
    DustAttack,
    FakeTransfer,
}

/// Confidence-weighted spam verdict for one transaction.
///
/// `confidence` is the max over triggered heuristics; `details` carries
/// per-heuristic counts and sub-results for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamVerdict {
    pub is_spam: bool,
    pub confidence: f64,
    pub reasons: BTreeSet<SpamReason>,
    pub details: Map<String, Value>,
}

impl SpamVerdict {
    pub fn has_reason(&self, reason: SpamReason) -> bool {
        self.reasons.contains(&reason)
    }
}
