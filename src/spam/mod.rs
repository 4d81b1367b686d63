//! Spam/phishing transaction filtering.
//!
//! Detects phishing transactions, fake airdrops and dust attacks before
//! they pollute the accounting ledger. The classifier is a leaf: it knows
//! nothing about the rule engine, and the dispatcher uses its verdict to
//! decide whether journal-entry generation is suppressed.

pub mod classifier;
pub mod verdict;

pub use classifier::SpamClassifier;
pub use verdict::{SpamReason, SpamVerdict};
