//! The ordered rule engine that rewrites decoded transfer legs into
//! economically correct buy/sell records.
//!
//! Stages are data-dependent: later stages observe the output of earlier
//! ones, so the ordering is fixed by [`StageId::ORDERED`] and executed by
//! the pipeline, never by convention.

use crate::domain::TransferLeg;
use serde::Serialize;

pub mod correction;
pub mod filters;
pub mod mint_burn;
pub mod pipeline;
pub mod wrap;

pub use pipeline::RuleEngine;

/// A batch of legs flowing through the pipeline.
pub type Batch = Vec<TransferLeg>;

/// The eight pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Rule 0: drop rows not touching a fund wallet.
    WalletFilter,
    /// Rule 1: decompose WETH deposits, drop the paired native transfer.
    WethWrap,
    /// Rule 2: decompose WETH withdrawals.
    WethUnwrap,
    /// Rule 3: canonicalize aliased token symbols.
    SymbolNormalize,
    /// Rule 4: drop rows for deny-listed token contracts.
    ScamPurge,
    /// Rule 5: decompose priced mints from the zero address.
    MintSplit,
    /// Rule 6: decompose priced burns to the zero address.
    BurnSplit,
    /// Rule 7: recompute side/qty from wallet topology.
    DirectionCorrect,
}

impl StageId {
    /// Execution order. Reordering changes results and is not permitted.
    pub const ORDERED: [StageId; 8] = [
        StageId::WalletFilter,
        StageId::WethWrap,
        StageId::WethUnwrap,
        StageId::SymbolNormalize,
        StageId::ScamPurge,
        StageId::MintSplit,
        StageId::BurnSplit,
        StageId::DirectionCorrect,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StageId::WalletFilter => "wallet_filter",
            StageId::WethWrap => "weth_wrap",
            StageId::WethUnwrap => "weth_unwrap",
            StageId::SymbolNormalize => "symbol_normalize",
            StageId::ScamPurge => "scam_purge",
            StageId::MintSplit => "mint_split",
            StageId::BurnSplit => "burn_split",
            StageId::DirectionCorrect => "direction_correct",
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-run counters, one group per stage. Reset at the start of each
/// `apply` call; all state is on the engine instance, so independent
/// batches can run in parallel on separate instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleStats {
    pub total_processed: usize,
    /// Rows dropped for not touching a fund wallet.
    pub wallet_filter_dropped: usize,
    /// Paired native transfers into the WETH contract, dropped.
    pub wrap_native_dropped: usize,
    /// WETH deposits decomposed into sell/buy leg pairs.
    pub wrap_split: usize,
    /// WETH withdrawals decomposed into sell/buy leg pairs.
    pub unwrap_split: usize,
    /// Symbols rewritten to their canonical alias.
    pub symbols_normalized: usize,
    /// Rows dropped for deny-listed token contracts.
    pub scam_dropped: usize,
    /// Priced mints given a synthesized payment leg.
    pub mint_split: usize,
    /// Priced burns given a synthesized proceeds leg.
    pub burn_split: usize,
    /// Rows whose side/qty disagreed with wallet topology.
    pub direction_corrected: usize,
}

impl RuleStats {
    pub fn reset(&mut self) {
        *self = RuleStats::default();
    }

    /// One-line-per-stage run summary.
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total_processed,
            wallet_filter_dropped = self.wallet_filter_dropped,
            wrap_native_dropped = self.wrap_native_dropped,
            wrap_split = self.wrap_split,
            unwrap_split = self.unwrap_split,
            symbols_normalized = self.symbols_normalized,
            scam_dropped = self.scam_dropped,
            mint_split = self.mint_split,
            burn_split = self.burn_split,
            direction_corrected = self.direction_corrected,
            "rule engine run complete"
        );
    }
}
