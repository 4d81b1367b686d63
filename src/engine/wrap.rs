//! WETH wrap/unwrap decomposition (Rules 1 and 2).
//!
//! Wrapping emits both a native transfer into the WETH contract and a
//! `Deposit` event for the same value. Counting both would double the
//! economic movement, so the native transfer is dropped and the deposit is
//! decomposed into an explicit native sell leg plus a WETH buy leg.
//! Unwrapping is the mirror image.

use crate::config::EngineConfig;
use crate::domain::{EventKind, Side, TransferLeg};
use crate::engine::{Batch, RuleStats};

const NATIVE_ASSET: &str = "ETH";
const WRAPPED_ASSET: &str = "WETH";

/// Rule 1: drop native transfers destined for the WETH contract, then
/// replace each destination-less WETH `Deposit` with a native sell leg
/// (wallet -> WETH) and a WETH buy leg (WETH -> wallet).
pub(crate) fn weth_wrap(config: &EngineConfig, batch: Batch, stats: &mut RuleStats) -> Batch {
    let mut kept: Batch = Vec::with_capacity(batch.len());
    let mut synthesized: Batch = Vec::new();

    for leg in batch {
        if is_paired_native_transfer(config, &leg) {
            stats.wrap_native_dropped += 1;
            continue;
        }
        if is_weth_event(config, &leg, EventKind::Deposit) {
            let wallet_side = leg.from_addr.clone();

            let mut native_sell = leg.clone();
            native_sell.kind = EventKind::Transfer;
            native_sell.asset = NATIVE_ASSET.to_string();
            native_sell.symbol = NATIVE_ASSET.to_string();
            native_sell.token = None;
            native_sell.to_addr = Some(config.weth_contract.clone());
            native_sell.side = Side::Sell;
            native_sell.qty = -leg.amount.abs();

            let mut weth_buy = leg.clone();
            weth_buy.kind = EventKind::Transfer;
            weth_buy.asset = WRAPPED_ASSET.to_string();
            weth_buy.symbol = WRAPPED_ASSET.to_string();
            weth_buy.from_addr = Some(config.weth_contract.clone());
            weth_buy.to_addr = wallet_side;
            weth_buy.side = Side::Buy;
            weth_buy.qty = leg.amount.abs();

            synthesized.push(native_sell);
            synthesized.push(weth_buy);
            stats.wrap_split += 1;
            continue;
        }
        kept.push(leg);
    }

    if stats.wrap_split > 0 || stats.wrap_native_dropped > 0 {
        tracing::info!(
            split = stats.wrap_split,
            dropped = stats.wrap_native_dropped,
            "decomposed WETH deposits"
        );
    }

    kept.extend(synthesized);
    kept
}

/// Rule 2: replace each destination-less WETH `Withdraw` with a WETH sell
/// leg (wallet -> WETH) and a native buy leg (WETH -> wallet).
pub(crate) fn weth_unwrap(config: &EngineConfig, batch: Batch, stats: &mut RuleStats) -> Batch {
    let mut kept: Batch = Vec::with_capacity(batch.len());
    let mut synthesized: Batch = Vec::new();

    for leg in batch {
        if is_weth_event(config, &leg, EventKind::Withdraw) {
            let wallet_side = leg.from_addr.clone();

            let mut weth_sell = leg.clone();
            weth_sell.kind = EventKind::Transfer;
            weth_sell.asset = WRAPPED_ASSET.to_string();
            weth_sell.symbol = WRAPPED_ASSET.to_string();
            weth_sell.to_addr = Some(config.weth_contract.clone());
            weth_sell.side = Side::Sell;
            weth_sell.qty = -leg.amount.abs();

            let mut native_buy = leg.clone();
            native_buy.kind = EventKind::Transfer;
            native_buy.asset = NATIVE_ASSET.to_string();
            native_buy.symbol = NATIVE_ASSET.to_string();
            native_buy.token = None;
            native_buy.from_addr = Some(config.weth_contract.clone());
            native_buy.to_addr = wallet_side;
            native_buy.side = Side::Buy;
            native_buy.qty = leg.amount.abs();

            synthesized.push(weth_sell);
            synthesized.push(native_buy);
            stats.unwrap_split += 1;
            continue;
        }
        kept.push(leg);
    }

    if stats.unwrap_split > 0 {
        tracing::info!(split = stats.unwrap_split, "decomposed WETH withdrawals");
    }

    kept.extend(synthesized);
    kept
}

/// The native transfer that accompanies a WETH deposit; dropping it avoids
/// double counting against the decomposed deposit.
fn is_paired_native_transfer(config: &EngineConfig, leg: &TransferLeg) -> bool {
    leg.kind == EventKind::Transfer
        && leg.is_native()
        && leg.to_addr.as_ref() == Some(&config.weth_contract)
}

/// A WETH Deposit/Withdraw with no explicit destination. Decoders emit the
/// destination as absent or empty for these events.
fn is_weth_event(config: &EngineConfig, leg: &TransferLeg, kind: EventKind) -> bool {
    let no_dest = leg
        .to_addr
        .as_ref()
        .map(|a| a.as_str().is_empty())
        .unwrap_or(true);
    leg.kind == kind && no_dest && leg.token.as_ref() == Some(&config.weth_contract)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Decimal, TimeMs, TxHash};

    fn wallet() -> Address {
        Address::new("0x1111111111111111111111111111111111111111")
    }

    fn deposit_leg(config: &EngineConfig, amount: &str) -> TransferLeg {
        TransferLeg::new(
            TxHash::new("0xd1"),
            TimeMs::new(1_000),
            wallet(),
            "WETH",
            EventKind::Deposit,
            Side::Buy,
            amount.parse().unwrap(),
            amount.parse().unwrap(),
        )
        .with_from(wallet())
        .with_token(config.weth_contract.clone())
    }

    #[test]
    fn deposit_splits_into_native_sell_and_weth_buy() {
        let config = EngineConfig::default();
        let mut stats = RuleStats::default();
        let out = weth_wrap(&config, vec![deposit_leg(&config, "2.5")], &mut stats);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|leg| leg.kind != EventKind::Deposit));

        let sell = &out[0];
        assert_eq!(sell.asset, "ETH");
        assert!(sell.is_native());
        assert_eq!(sell.side, Side::Sell);
        assert_eq!(sell.qty, "-2.5".parse::<Decimal>().unwrap());
        assert_eq!(sell.to_addr, Some(config.weth_contract.clone()));

        let buy = &out[1];
        assert_eq!(buy.asset, "WETH");
        assert_eq!(buy.side, Side::Buy);
        assert_eq!(buy.qty, "2.5".parse::<Decimal>().unwrap());
        assert_eq!(buy.from_addr, Some(config.weth_contract.clone()));
        assert_eq!(buy.to_addr, Some(wallet()));

        assert_eq!(stats.wrap_split, 1);
    }

    #[test]
    fn paired_native_transfer_into_weth_is_dropped() {
        let config = EngineConfig::default();
        let mut stats = RuleStats::default();
        let paired = TransferLeg::new(
            TxHash::new("0xd1"),
            TimeMs::new(1_000),
            wallet(),
            "ETH",
            EventKind::Transfer,
            Side::Sell,
            "-2.5".parse().unwrap(),
            "2.5".parse().unwrap(),
        )
        .with_from(wallet())
        .with_to(config.weth_contract.clone());

        let out = weth_wrap(&config, vec![paired], &mut stats);
        assert!(out.is_empty());
        assert_eq!(stats.wrap_native_dropped, 1);
    }

    #[test]
    fn deposit_with_explicit_destination_is_untouched() {
        let config = EngineConfig::default();
        let mut stats = RuleStats::default();
        let leg = deposit_leg(&config, "1").with_to(Address::new("0x2222"));
        let out = weth_wrap(&config, vec![leg.clone()], &mut stats);
        assert_eq!(out, vec![leg]);
        assert_eq!(stats.wrap_split, 0);
    }

    #[test]
    fn withdraw_splits_into_weth_sell_and_native_buy() {
        let config = EngineConfig::default();
        let mut stats = RuleStats::default();
        let withdraw = TransferLeg::new(
            TxHash::new("0xw1"),
            TimeMs::new(2_000),
            wallet(),
            "WETH",
            EventKind::Withdraw,
            Side::Sell,
            "3".parse().unwrap(),
            "3".parse().unwrap(),
        )
        .with_from(wallet())
        .with_token(config.weth_contract.clone());

        let out = weth_unwrap(&config, vec![withdraw], &mut stats);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|leg| leg.kind != EventKind::Withdraw));

        let sell = &out[0];
        assert_eq!(sell.asset, "WETH");
        assert_eq!(sell.side, Side::Sell);
        assert_eq!(sell.qty, "-3".parse::<Decimal>().unwrap());

        let buy = &out[1];
        assert_eq!(buy.asset, "ETH");
        assert!(buy.is_native());
        assert_eq!(buy.side, Side::Buy);
        assert_eq!(buy.qty, "3".parse::<Decimal>().unwrap());
        assert_eq!(buy.to_addr, Some(wallet()));

        assert_eq!(stats.unwrap_split, 1);
    }

    #[test]
    fn non_weth_deposit_passes_through() {
        let config = EngineConfig::default();
        let mut stats = RuleStats::default();
        let mut leg = deposit_leg(&config, "1");
        leg.token = Some(Address::new("0x9999"));
        let out = weth_wrap(&config, vec![leg.clone()], &mut stats);
        assert_eq!(out, vec![leg]);
    }
}
