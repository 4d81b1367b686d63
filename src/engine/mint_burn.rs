//! Priced mint/burn decomposition (Rules 5 and 6).
//!
//! Transfers to or from the zero address are one-sided on chain: the token
//! moves, but the native-asset payment happens inside the contract. For
//! the tracked pool contract these events are real purchases/sales, so
//! each gets a synthesized mirror leg carrying the native-asset side.

use crate::config::EngineConfig;
use crate::domain::{EventKind, Side, TransferLeg};
use crate::engine::{Batch, RuleStats};

const NATIVE_ASSET: &str = "ETH";

/// Rule 5: a tracked-pool token minted from the zero address into a wallet
/// is a purchase. Force side=buy, qty positive, and synthesize the native
/// payment leg (wallet -> mint address).
pub(crate) fn mint_split(config: &EngineConfig, mut batch: Batch, stats: &mut RuleStats) -> Batch {
    let mut synthesized: Batch = Vec::new();

    for leg in &mut batch {
        if !is_tracked_mint(config, leg) {
            continue;
        }

        let mut payment = leg.clone();
        payment.kind = EventKind::Transfer;
        payment.asset = NATIVE_ASSET.to_string();
        payment.symbol = NATIVE_ASSET.to_string();
        payment.token = None;
        payment.from_addr = leg.to_addr.clone();
        payment.to_addr = Some(config.mint_address.clone());
        payment.side = Side::Sell;
        payment.qty = -leg.amount.abs();

        leg.side = Side::Buy;
        leg.qty = leg.amount.abs();

        synthesized.push(payment);
        stats.mint_split += 1;
    }

    if stats.mint_split > 0 {
        tracing::info!(split = stats.mint_split, "synthesized payments for token mints");
    }

    batch.extend(synthesized);
    batch
}

/// Rule 6: a tracked-pool token sent to the burn address under the burn
/// function marker is a sale. Force side=sell, qty negative, and
/// synthesize the native proceeds leg (burn address -> wallet).
pub(crate) fn burn_split(config: &EngineConfig, mut batch: Batch, stats: &mut RuleStats) -> Batch {
    let mut synthesized: Batch = Vec::new();

    for leg in &mut batch {
        if !is_tracked_burn(config, leg) {
            continue;
        }

        let mut proceeds = leg.clone();
        proceeds.kind = EventKind::Transfer;
        proceeds.asset = NATIVE_ASSET.to_string();
        proceeds.symbol = NATIVE_ASSET.to_string();
        proceeds.token = None;
        proceeds.from_addr = leg.to_addr.clone();
        proceeds.to_addr = leg.from_addr.clone();
        proceeds.side = Side::Buy;
        proceeds.qty = leg.amount.abs();

        leg.side = Side::Sell;
        leg.qty = -leg.amount.abs();

        synthesized.push(proceeds);
        stats.burn_split += 1;
    }

    if stats.burn_split > 0 {
        tracing::info!(split = stats.burn_split, "synthesized proceeds for token burns");
    }

    batch.extend(synthesized);
    batch
}

fn is_tracked_mint(config: &EngineConfig, leg: &TransferLeg) -> bool {
    leg.from_addr.as_ref() == Some(&config.mint_address)
        && leg.token.as_ref() == Some(&config.tracked_pool)
}

fn is_tracked_burn(config: &EngineConfig, leg: &TransferLeg) -> bool {
    leg.to_addr.as_ref() == Some(&config.mint_address)
        && leg.token.as_ref() == Some(&config.tracked_pool)
        && leg
            .function_sig
            .as_deref()
            .map(|sig| sig.contains(&config.burn_function_marker))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, Decimal, TimeMs, TxHash};

    fn wallet() -> Address {
        Address::new("0x1111111111111111111111111111111111111111")
    }

    fn mint_leg(config: &EngineConfig, amount: &str) -> TransferLeg {
        TransferLeg::new(
            TxHash::new("0xm1"),
            TimeMs::new(1_000),
            wallet(),
            "BLUR POOL",
            EventKind::Transfer,
            Side::Buy,
            amount.parse().unwrap(),
            amount.parse().unwrap(),
        )
        .with_from(config.mint_address.clone())
        .with_to(wallet())
        .with_token(config.tracked_pool.clone())
    }

    fn burn_leg(config: &EngineConfig, amount: &str) -> TransferLeg {
        TransferLeg::new(
            TxHash::new("0xb1"),
            TimeMs::new(2_000),
            wallet(),
            "BLUR POOL",
            EventKind::Transfer,
            Side::Buy, // decoder guess; rule forces sell
            amount.parse().unwrap(),
            amount.parse().unwrap(),
        )
        .with_from(wallet())
        .with_to(config.mint_address.clone())
        .with_token(config.tracked_pool.clone())
        .with_function_sig("OwnerTransferV7b711143(...)")
    }

    #[test]
    fn mint_gets_buy_side_and_payment_leg() {
        let config = EngineConfig::default();
        let mut stats = RuleStats::default();
        let out = mint_split(&config, vec![mint_leg(&config, "5")], &mut stats);

        assert_eq!(out.len(), 2);
        let token = &out[0];
        assert_eq!(token.side, Side::Buy);
        assert_eq!(token.qty, "5".parse::<Decimal>().unwrap());

        let payment = &out[1];
        assert_eq!(payment.asset, "ETH");
        assert!(payment.is_native());
        assert_eq!(payment.side, Side::Sell);
        assert_eq!(payment.qty, "-5".parse::<Decimal>().unwrap());
        assert_eq!(payment.from_addr, Some(wallet()));
        assert_eq!(payment.to_addr, Some(config.mint_address.clone()));
        assert_eq!(stats.mint_split, 1);
    }

    #[test]
    fn mint_of_untracked_contract_is_untouched() {
        let config = EngineConfig::default();
        let mut stats = RuleStats::default();
        let mut leg = mint_leg(&config, "5");
        leg.token = Some(Address::new("0x9999"));
        let out = mint_split(&config, vec![leg.clone()], &mut stats);
        assert_eq!(out, vec![leg]);
        assert_eq!(stats.mint_split, 0);
    }

    #[test]
    fn burn_gets_sell_side_and_proceeds_leg() {
        let config = EngineConfig::default();
        let mut stats = RuleStats::default();
        let out = burn_split(&config, vec![burn_leg(&config, "4")], &mut stats);

        assert_eq!(out.len(), 2);
        let token = &out[0];
        assert_eq!(token.side, Side::Sell);
        assert_eq!(token.qty, "-4".parse::<Decimal>().unwrap());

        let proceeds = &out[1];
        assert_eq!(proceeds.asset, "ETH");
        assert!(proceeds.is_native());
        assert_eq!(proceeds.side, Side::Buy);
        assert_eq!(proceeds.qty, "4".parse::<Decimal>().unwrap());
        assert_eq!(proceeds.from_addr, Some(config.mint_address.clone()));
        assert_eq!(proceeds.to_addr, Some(wallet()));
        assert_eq!(stats.burn_split, 1);
    }

    #[test]
    fn burn_without_function_marker_is_untouched() {
        let config = EngineConfig::default();
        let mut stats = RuleStats::default();
        let mut leg = burn_leg(&config, "4");
        leg.function_sig = Some("transfer(address,uint256)".to_string());
        let out = burn_split(&config, vec![leg.clone()], &mut stats);
        assert_eq!(out, vec![leg]);
        assert_eq!(stats.burn_split, 0);
    }

    #[test]
    fn burn_without_function_sig_is_untouched() {
        let config = EngineConfig::default();
        let mut stats = RuleStats::default();
        let mut leg = burn_leg(&config, "4");
        leg.function_sig = None;
        let out = burn_split(&config, vec![leg.clone()], &mut stats);
        assert_eq!(out, vec![leg]);
    }
}
