use crate::domain::{Decimal, Side, TxHash};
use thiserror::Error;

/// Faults that abort a pipeline run.
///
/// Intentional exclusions (wallet filter, scam purge) are counters, not
/// errors; this type is reserved for batches that must not be handed to
/// lot matching.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rule stage left a record whose qty sign contradicts its side.
    /// Indicates a rule bug, so the whole batch is withheld.
    #[error(
        "sign invariant violated after stage {stage}: tx {tx_hash} has side {side} with qty {qty}"
    )]
    SignInvariant {
        stage: &'static str,
        tx_hash: TxHash,
        side: Side,
        qty: Decimal,
    },
}
