//! TransferLeg: one economic movement of value attributable to a transaction.

use crate::domain::{Address, Decimal, Direction, Side, TimeMs, TxHash};
use serde::{Deserialize, Serialize};

/// Protocol event kind, as a closed variant instead of a free-form string.
///
/// The decoder emits kinds the engine does not rewrite (approvals, protocol
/// events); those ride through as `Other` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EventKind {
    Transfer,
    Deposit,
    Withdraw,
    Other(String),
}

impl From<String> for EventKind {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "transfer" => EventKind::Transfer,
            "deposit" => EventKind::Deposit,
            "withdraw" => EventKind::Withdraw,
            _ => EventKind::Other(s),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Transfer => "Transfer".to_string(),
            EventKind::Deposit => "Deposit".to_string(),
            EventKind::Withdraw => "Withdraw".to_string(),
            EventKind::Other(s) => s,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Transfer => write!(f, "Transfer"),
            EventKind::Deposit => write!(f, "Deposit"),
            EventKind::Withdraw => write!(f, "Withdraw"),
            EventKind::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One buy/sell leg of a decoded transaction, attributed to a fund wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferLeg {
    /// Transaction this leg belongs to.
    pub tx_hash: TxHash,
    /// Block timestamp.
    pub time_ms: TimeMs,
    /// The fund-controlled party of interest for this leg.
    pub wallet: Address,
    /// Sending counterparty, when the decoder knows it.
    pub from_addr: Option<Address>,
    /// Receiving counterparty. Absent for WETH Deposit/Withdraw events.
    pub to_addr: Option<Address>,
    /// Token contract. `None` means the chain's native asset.
    pub token: Option<Address>,
    /// Token symbol as decoded.
    pub symbol: String,
    /// Asset label used as the lot-tracking key downstream.
    pub asset: String,
    /// Protocol event kind.
    pub kind: EventKind,
    /// Calling-function signature, when decoded.
    pub function_sig: Option<String>,
    /// Buy or sell classification.
    pub side: Side,
    /// Signed quantity: positive for buy, negative for sell.
    pub qty: Decimal,
    /// Unsigned token amount as decoded.
    pub amount: Decimal,
    /// Decoder's flow hint, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl TransferLeg {
    /// Create a leg with the required fields; counterparties, token and
    /// direction hint attach via the `with_*` builders.
    pub fn new(
        tx_hash: TxHash,
        time_ms: TimeMs,
        wallet: Address,
        asset: impl Into<String>,
        kind: EventKind,
        side: Side,
        qty: Decimal,
        amount: Decimal,
    ) -> Self {
        let asset = asset.into();
        TransferLeg {
            tx_hash,
            time_ms,
            wallet,
            from_addr: None,
            to_addr: None,
            token: None,
            symbol: asset.clone(),
            asset,
            kind,
            function_sig: None,
            side,
            qty,
            amount,
            direction: None,
        }
    }

    pub fn with_from(mut self, from: Address) -> Self {
        self.from_addr = Some(from);
        self
    }

    pub fn with_to(mut self, to: Address) -> Self {
        self.to_addr = Some(to);
        self
    }

    pub fn with_token(mut self, token: Address) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_function_sig(mut self, sig: impl Into<String>) -> Self {
        self.function_sig = Some(sig.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// True when this leg moves the chain's native asset.
    pub fn is_native(&self) -> bool {
        self.token.is_none()
    }

    /// True once `qty`'s sign agrees with `side`. Zero quantities pass:
    /// they carry no economic value either way.
    pub fn sign_consistent(&self) -> bool {
        match self.side {
            Side::Buy => !self.qty.is_negative(),
            Side::Sell => !self.qty.is_positive(),
        }
    }

    /// Stable identity for this leg, for audit logs and downstream dedup.
    ///
    /// Sha256 over the deterministic fields; two legs of the same
    /// transaction (e.g. both halves of a decomposed wrap) hash apart
    /// because asset, side and qty differ.
    pub fn leg_key(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(self.tx_hash.as_str());
        hasher.update(self.wallet.as_str());
        hasher.update(&self.asset);
        hasher.update(String::from(self.kind.clone()));
        hasher.update(if self.side == Side::Buy { b"B" } else { b"S" });
        hasher.update(self.qty.to_canonical_string());
        hasher.update(self.time_ms.as_ms().to_le_bytes());
        let hash = hasher.finalize();
        format!("leg:{}", hex::encode(&hash[..16]))
    }
}
