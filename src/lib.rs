pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod spam;

pub use config::{ConfigError, EngineConfig};
pub use domain::{
    Address, Decimal, Direction, EventKind, LogEntry, Receipt, Side, TimeMs, Transaction,
    TransferLeg, TxHash, WalletSet,
};
pub use engine::{Batch, RuleEngine, RuleStats, StageId};
pub use error::EngineError;
pub use spam::{SpamClassifier, SpamReason, SpamVerdict};
