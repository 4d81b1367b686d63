//! The fund's known controlled wallet addresses.

use crate::domain::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fund-controlled addresses with optional fund-id metadata.
///
/// Read-only during a pipeline run; membership is what distinguishes
/// intercompany transfers from external economic events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSet {
    wallets: BTreeMap<Address, Option<String>>,
}

impl WalletSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from bare addresses. Duplicates collapse; `Address` lowercases.
    pub fn from_addresses<I, A>(addrs: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        WalletSet {
            wallets: addrs.into_iter().map(|a| (a.into(), None)).collect(),
        }
    }

    /// Build from (address, fund id) pairs.
    pub fn from_mapping<I, A, F>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, F)>,
        A: Into<Address>,
        F: Into<String>,
    {
        WalletSet {
            wallets: pairs
                .into_iter()
                .map(|(a, f)| (a.into(), Some(f.into())))
                .collect(),
        }
    }

    pub fn insert(&mut self, addr: Address, fund_id: Option<String>) {
        self.wallets.insert(addr, fund_id);
    }

    pub fn contains(&self, addr: &Address) -> bool {
        self.wallets.contains_key(addr)
    }

    /// Membership check for an optional counterparty; `None` is never known.
    pub fn contains_opt(&self, addr: Option<&Address>) -> bool {
        addr.map(|a| self.contains(a)).unwrap_or(false)
    }

    pub fn fund_id(&self, addr: &Address) -> Option<&str> {
        self.wallets.get(addr).and_then(|f| f.as_deref())
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.wallets.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_and_case_fold() {
        let set = WalletSet::from_addresses(["0xAAAA", "0xaaaa", "0xBBBB"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Address::new("0xAaAa")));
    }

    #[test]
    fn fund_id_metadata() {
        let set = WalletSet::from_mapping([("0x1234", "fund_i_class_B_ETH")]);
        assert_eq!(
            set.fund_id(&Address::new("0x1234")),
            Some("fund_i_class_B_ETH")
        );
        assert_eq!(set.fund_id(&Address::new("0x9999")), None);
    }

    #[test]
    fn contains_opt_treats_none_as_unknown() {
        let set = WalletSet::from_addresses(["0x1234"]);
        let known = Address::new("0x1234");
        assert!(set.contains_opt(Some(&known)));
        assert!(!set.contains_opt(None));
    }
}
