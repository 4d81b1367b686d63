//! Domain types for the classification and normalization pipeline.
//!
//! This module provides:
//! - Lossless quantity handling via the Decimal wrapper
//! - Primitives: Address, TxHash, TimeMs, Side, Direction
//! - TransferLeg records with a stable identity key
//! - WalletSet (fund topology) and raw Transaction/Receipt shapes

pub mod decimal;
pub mod leg;
pub mod primitives;
pub mod receipt;
pub mod wallets;

pub use decimal::Decimal;
pub use leg::{EventKind, TransferLeg};
pub use primitives::{Address, Direction, Side, TimeMs, TxHash};
pub use receipt::{LogEntry, Receipt, Transaction};
pub use wallets::WalletSet;
