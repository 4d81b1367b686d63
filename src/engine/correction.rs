//! Direction-based side/qty correction (Rule 7).
//!
//! The upstream decoder's side/direction guess is best-effort; wallet-pair
//! topology is the ground truth. Three cases for a `Transfer` attributed
//! to a known fund wallet:
//!
//! - external -> wallet:   buy, positive qty
//! - wallet -> external:   sell, negative qty
//! - wallet -> wallet:     the FROM-attributed row sells, the TO-attributed
//!   row buys (an intercompany transfer is not a market event, but each
//!   wallet's ledger still needs a signed leg)
//!
//! Already-correct rows are untouched, which makes the stage idempotent.

use crate::domain::{Decimal, EventKind, Side, TransferLeg, WalletSet};
use crate::engine::{Batch, RuleStats};

/// Rule 7: recompute the expected classification from topology and
/// overwrite only on disagreement.
pub(crate) fn direction_correct(
    wallets: &WalletSet,
    mut batch: Batch,
    stats: &mut RuleStats,
) -> Batch {
    let mut corrected = 0usize;

    for leg in &mut batch {
        if leg.kind != EventKind::Transfer || !wallets.contains(&leg.wallet) {
            continue;
        }

        let Some((expected_side, expected_qty)) = expected_classification(wallets, leg) else {
            continue;
        };

        let wrong_side = leg.side != expected_side;
        let wrong_sign = match expected_side {
            Side::Buy => leg.qty.is_negative(),
            Side::Sell => leg.qty.is_positive(),
        };

        if wrong_side || wrong_sign {
            tracing::info!(
                tx = %leg.tx_hash,
                leg = %leg.leg_key(),
                from = %leg.side,
                to = %expected_side,
                "corrected leg classification from wallet topology"
            );
            leg.side = expected_side;
            leg.qty = expected_qty;
            corrected += 1;
        }
    }

    stats.direction_corrected += corrected;
    if corrected > 0 {
        tracing::info!(corrected, "applied direction-based corrections");
    }
    batch
}

/// Expected (side, qty) for a leg, or `None` when topology says nothing:
/// the attributed wallet is neither endpoint, or both endpoints are
/// outside the fund without the wallet being one of them.
fn expected_classification(wallets: &WalletSet, leg: &TransferLeg) -> Option<(Side, Decimal)> {
    let from_known = wallets.contains_opt(leg.from_addr.as_ref());
    let to_known = wallets.contains_opt(leg.to_addr.as_ref());
    let wallet_is_from = leg.from_addr.as_ref() == Some(&leg.wallet);
    let wallet_is_to = leg.to_addr.as_ref() == Some(&leg.wallet);

    if wallet_is_to && !from_known {
        // External counterparty sent value in.
        Some((Side::Buy, leg.qty.abs()))
    } else if wallet_is_from && !to_known {
        // Value left the fund for an external counterparty.
        Some((Side::Sell, -leg.qty.abs()))
    } else if from_known && to_known {
        // Intercompany: the sender's ledger sells, the receiver's buys.
        if wallet_is_from {
            Some((Side::Sell, -leg.qty.abs()))
        } else if wallet_is_to {
            Some((Side::Buy, leg.qty.abs()))
        } else {
            None
        }
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, TimeMs, TxHash};

    const W1: &str = "0x1111111111111111111111111111111111111111";
    const W2: &str = "0x2222222222222222222222222222222222222222";
    const EXT: &str = "0x9999999999999999999999999999999999999999";

    fn fund() -> WalletSet {
        WalletSet::from_addresses([W1, W2])
    }

    fn transfer(wallet: &str, from: &str, to: &str, side: Side, qty: &str) -> TransferLeg {
        TransferLeg::new(
            TxHash::new("0xt1"),
            TimeMs::new(1_000),
            Address::new(wallet),
            "USDC",
            EventKind::Transfer,
            side,
            qty.parse().unwrap(),
            qty.trim_start_matches('-').parse().unwrap(),
        )
        .with_from(Address::new(from))
        .with_to(Address::new(to))
    }

    #[test]
    fn inbound_from_external_becomes_buy() {
        let mut stats = RuleStats::default();
        let batch = vec![transfer(W1, EXT, W1, Side::Sell, "-100")];
        let out = direction_correct(&fund(), batch, &mut stats);
        assert_eq!(out[0].side, Side::Buy);
        assert_eq!(out[0].qty, "100".parse::<Decimal>().unwrap());
        assert_eq!(stats.direction_corrected, 1);
    }

    #[test]
    fn outbound_to_external_becomes_sell() {
        let mut stats = RuleStats::default();
        let batch = vec![transfer(W1, W1, EXT, Side::Buy, "25")];
        let out = direction_correct(&fund(), batch, &mut stats);
        assert_eq!(out[0].side, Side::Sell);
        assert_eq!(out[0].qty, "-25".parse::<Decimal>().unwrap());
    }

    #[test]
    fn intercompany_rows_split_by_attribution() {
        let mut stats = RuleStats::default();
        let batch = vec![
            transfer(W1, W1, W2, Side::Buy, "10"), // FROM wallet's row
            transfer(W2, W1, W2, Side::Sell, "-10"), // TO wallet's row
        ];
        let out = direction_correct(&fund(), batch, &mut stats);
        assert_eq!(out[0].side, Side::Sell);
        assert_eq!(out[0].qty, "-10".parse::<Decimal>().unwrap());
        assert_eq!(out[1].side, Side::Buy);
        assert_eq!(out[1].qty, "10".parse::<Decimal>().unwrap());
        assert_eq!(stats.direction_corrected, 2);
    }

    #[test]
    fn already_correct_rows_are_untouched() {
        let mut stats = RuleStats::default();
        let batch = vec![transfer(W1, EXT, W1, Side::Buy, "50")];
        let out = direction_correct(&fund(), batch.clone(), &mut stats);
        assert_eq!(out, batch);
        assert_eq!(stats.direction_corrected, 0);
    }

    #[test]
    fn idempotent_over_repeated_application() {
        let mut stats = RuleStats::default();
        let batch = vec![
            transfer(W1, EXT, W1, Side::Sell, "-100"),
            transfer(W1, W1, EXT, Side::Buy, "3"),
            transfer(W1, W1, W2, Side::Buy, "7"),
        ];
        let once = direction_correct(&fund(), batch, &mut stats);
        let corrections_after_first = stats.direction_corrected;
        let twice = direction_correct(&fund(), once.clone(), &mut stats);
        assert_eq!(once, twice);
        assert_eq!(stats.direction_corrected, corrections_after_first);
    }

    #[test]
    fn non_transfer_kinds_are_left_alone() {
        let mut stats = RuleStats::default();
        let mut leg = transfer(W1, EXT, W1, Side::Sell, "-5");
        leg.kind = EventKind::Other("Approval".to_string());
        let out = direction_correct(&fund(), vec![leg.clone()], &mut stats);
        assert_eq!(out, vec![leg]);
    }

    #[test]
    fn unknown_wallet_rows_are_left_alone() {
        let mut stats = RuleStats::default();
        let leg = transfer(EXT, EXT, W1, Side::Sell, "-5");
        let out = direction_correct(&fund(), vec![leg.clone()], &mut stats);
        assert_eq!(out, vec![leg]);
    }

    #[test]
    fn wallet_not_an_endpoint_is_left_alone() {
        let mut stats = RuleStats::default();
        // Attributed to W1 but the movement is EXT -> EXT.
        let leg = transfer(W1, EXT, "0x8888888888888888888888888888888888888888", Side::Buy, "5");
        let out = direction_correct(&fund(), vec![leg.clone()], &mut stats);
        assert_eq!(out, vec![leg]);
    }

    #[test]
    fn wrong_sign_with_right_side_is_fixed() {
        let mut stats = RuleStats::default();
        let batch = vec![transfer(W1, EXT, W1, Side::Buy, "-40")];
        let out = direction_correct(&fund(), batch, &mut stats);
        assert_eq!(out[0].side, Side::Buy);
        assert_eq!(out[0].qty, "40".parse::<Decimal>().unwrap());
        assert_eq!(stats.direction_corrected, 1);
    }
}
