//! Row-level filters and rewrites: wallet filtering (Rule 0), symbol
//! normalization (Rule 3), scam purge (Rule 4).

use crate::config::EngineConfig;
use crate::domain::WalletSet;
use crate::engine::{Batch, RuleStats};

/// Rule 0: keep only rows where at least one of {from, to, wallet} is a
/// known fund wallet. Relative order of survivors is preserved.
pub(crate) fn wallet_filter(wallets: &WalletSet, batch: Batch, stats: &mut RuleStats) -> Batch {
    let before = batch.len();
    let kept: Batch = batch
        .into_iter()
        .filter(|leg| {
            wallets.contains(&leg.wallet)
                || wallets.contains_opt(leg.from_addr.as_ref())
                || wallets.contains_opt(leg.to_addr.as_ref())
        })
        .collect();
    let dropped = before - kept.len();
    stats.wallet_filter_dropped += dropped;
    if dropped > 0 {
        tracing::info!(dropped, "wallet filter dropped rows not touching fund wallets");
    }
    kept
}

/// Rule 3: rewrite aliased symbols to their canonical form so downstream
/// lot-tracking keys are consistent. Both symbol and asset are rewritten.
pub(crate) fn symbol_normalize(
    config: &EngineConfig,
    mut batch: Batch,
    stats: &mut RuleStats,
) -> Batch {
    let mut normalized = 0usize;
    for leg in &mut batch {
        if let Some(canonical) = config.symbol_aliases.get(&leg.symbol.to_uppercase()) {
            if &leg.symbol != canonical || &leg.asset != canonical {
                leg.symbol = canonical.clone();
                leg.asset = canonical.clone();
                normalized += 1;
            }
        }
    }
    stats.symbols_normalized += normalized;
    if normalized > 0 {
        tracing::info!(normalized, "normalized aliased token symbols");
    }
    batch
}

/// Rule 4: drop rows whose token contract is on the scam deny-list.
/// Address comparison is case-insensitive by construction.
pub(crate) fn scam_purge(config: &EngineConfig, batch: Batch, stats: &mut RuleStats) -> Batch {
    let before = batch.len();
    let kept: Batch = batch
        .into_iter()
        .filter(|leg| {
            leg.token
                .as_ref()
                .map(|token| !config.scam_tokens.contains(token))
                .unwrap_or(true)
        })
        .collect();
    let dropped = before - kept.len();
    stats.scam_dropped += dropped;
    if dropped > 0 {
        tracing::info!(dropped, "scam purge dropped rows with deny-listed tokens");
    }
    kept
}
