//! Pipeline executor: runs the eight stages in their fixed order and
//! audits the batch before releasing it downstream.

use crate::config::EngineConfig;
use crate::domain::{EventKind, WalletSet};
use crate::engine::{correction, filters, mint_burn, wrap, Batch, RuleStats, StageId};
use crate::error::EngineError;

/// The transaction rule engine.
///
/// One instance per batch context; counters live on the instance, so
/// independent batches can be transformed in parallel on separate engines.
pub struct RuleEngine {
    config: EngineConfig,
    stats: RuleStats,
}

impl RuleEngine {
    pub fn new(config: EngineConfig) -> Self {
        RuleEngine {
            config,
            stats: RuleStats::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline over one batch.
    ///
    /// The output length may differ from the input: the wallet filter and
    /// scam purge drop rows, the decomposition stages add them. Value is
    /// conserved per transaction across decompositions; row count is not.
    ///
    /// # Errors
    /// Returns [`EngineError::SignInvariant`] if the final batch contains a
    /// leg the pipeline is responsible for whose qty sign contradicts its
    /// side. That means a rule bug, and a miscorrected batch must not
    /// reach lot matching.
    pub fn apply(&mut self, batch: Batch, wallets: &WalletSet) -> Result<Batch, EngineError> {
        self.stats.reset();
        self.stats.total_processed = batch.len();
        tracing::info!(
            rows = batch.len(),
            wallets = wallets.len(),
            "rule engine starting"
        );

        let mut batch = batch;
        for stage in StageId::ORDERED {
            batch = self.run_stage(stage, batch, wallets);
            self.trace_watched(stage, &batch);
        }

        audit_signs(&batch, wallets)?;
        self.stats.log_summary();
        Ok(batch)
    }

    /// Counters from the most recent run.
    pub fn stats(&self) -> RuleStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    fn run_stage(&mut self, stage: StageId, batch: Batch, wallets: &WalletSet) -> Batch {
        match stage {
            StageId::WalletFilter => filters::wallet_filter(wallets, batch, &mut self.stats),
            StageId::WethWrap => wrap::weth_wrap(&self.config, batch, &mut self.stats),
            StageId::WethUnwrap => wrap::weth_unwrap(&self.config, batch, &mut self.stats),
            StageId::SymbolNormalize => {
                filters::symbol_normalize(&self.config, batch, &mut self.stats)
            }
            StageId::ScamPurge => filters::scam_purge(&self.config, batch, &mut self.stats),
            StageId::MintSplit => mint_burn::mint_split(&self.config, batch, &mut self.stats),
            StageId::BurnSplit => mint_burn::burn_split(&self.config, batch, &mut self.stats),
            StageId::DirectionCorrect => correction::direction_correct(wallets, batch, &mut self.stats),
        }
    }

    /// Trace watched transactions after each stage. Replaces the ad hoc
    /// single-hash debug logging this engine's predecessors grew.
    fn trace_watched(&self, stage: StageId, batch: &Batch) {
        if self.config.watch_txids.is_empty() {
            return;
        }
        for leg in batch {
            if self.config.is_watched(&leg.tx_hash) {
                tracing::info!(
                    stage = %stage,
                    tx = %leg.tx_hash,
                    leg = %leg.leg_key(),
                    side = %leg.side,
                    qty = %leg.qty,
                    asset = %leg.asset,
                    "watched transaction after stage"
                );
            }
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Post-run audit of the side/qty sign invariant.
///
/// Scope: `Transfer` legs attributed to a known wallet that is one of the
/// endpoints, exactly the rows the direction-correction stage owns (and
/// every synthesized decomposition leg lands in this shape). Rows outside
/// this scope keep whatever the decoder guessed, which is a data gap,
/// not a fault.
fn audit_signs(batch: &Batch, wallets: &WalletSet) -> Result<(), EngineError> {
    for leg in batch {
        let owned = leg.kind == EventKind::Transfer
            && wallets.contains(&leg.wallet)
            && (leg.from_addr.as_ref() == Some(&leg.wallet)
                || leg.to_addr.as_ref() == Some(&leg.wallet));
        if owned && !leg.sign_consistent() {
            return Err(EngineError::SignInvariant {
                stage: StageId::DirectionCorrect.name(),
                tx_hash: leg.tx_hash.clone(),
                side: leg.side,
                qty: leg.qty,
            });
        }
    }
    Ok(())
}
