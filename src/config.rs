//! Rule engine configuration: protocol contract addresses, symbol aliases,
//! the scam-token deny list, and the trace watch list.

use crate::domain::{Address, TxHash};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// WETH contract on Ethereum mainnet.
const WETH_CONTRACT: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";

/// Blur Pool, the one contract whose mints/burns carry a native-asset price.
const BLUR_POOL_CONTRACT: &str = "0x0000000000a39bb272e79075ade125fd351887ac";

/// Function-signature marker on Blur Pool burns that represent sales.
const BLUR_BURN_MARKER: &str = "OwnerTransferV7b711143";

/// Token contracts observed emitting fake transfer events at fund wallets.
const DEFAULT_SCAM_TOKENS: &[&str] = &[
    "0x2a120e7f2f1d8ffd173ed17aa5089f11206b5177",
    "0xcb4b7a5114e02c144a915c05c59192a6c6f33d5a",
    "0xa8f41d54fd002aa0d027d010cdc3fcf3fd8f40c7",
    "0x8421f2ae7f7d6ec64698e6a142515609932cfabc",
    "0x5d72fcee79efe6a493078b57b310f8a854bcc71b",
    "0x729f7430e3e715c84bca27821a5e554cad056a35",
    "0xb6b15d694b07411823fe04ecd27399f18c521574",
    "0x4fbb350052bca5417566f188eb2ebce5b19bc964",
    "0xd08fd4141932f47a644b77a7ef968f552fa4daa0",
    "0x47c639efbabb3af26f95efb571293479e6c1d9cd",
    "0x1b3e77a721b2714fe7f80874e499e7825da29d0d",
    "0x3e3e8c461e4024757d0f81a30e9bcad8b3520671",
    "0xab3e1e638b19a8dbecc47d6d6433dbea67a76cb2",
    "0x91554a9f1b6582c6743f9d876c822816fd9639b8",
    "0xbf3314734852ecd952fd862da853d68d0a83e530",
    "0xe56333c2aedfeb4fbd5b7a4dbedc1b0f99e15abd",
    "0xcb2757d719f43ceb84d53915f4fa114be2fa3792",
    "0x69d706cfa647f989ad7e3f2cf151fd9c41e4ddb3",
    "0xa423e0855176835633c0d38b7c3cdda939903c02",
    "0xc04327b22e2160d1746d9b664d434e831dc06591",
    "0xf70b6c73e6ce7b82436b6e2f1c02dd50487b7362",
    "0x679488415fd76b482acda5328d90290d387835aa",
    "0x94b1afdd235b0daad3f56cc5507df2a6272c8013",
    "0x3b2ad323e2218de2eb57228e64f0073b3529713f",
    "0xa7504f4258e238b957c20b34427642700020ebd9",
    "0xde9e976c9c53c22a2a0c74f50d5d5c70b35ffa8f",
    "0x0842661e4d34364c9d9023de581146ddecf1d2d9",
    "0xe12933c0413ca50f149c0379c797e515a96935da",
    "0xac52ed1e812d968bd5af7edb33b73a3559d7daa0",
    "0x2b496312bd67ab4f3a8519cda865f9728e50d209",
    "0x1bcc835e7a0e7f0672012e775967d4269f0c6dbc",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid address for {0}: {1}")]
    InvalidAddress(String, String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Configuration for one rule engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// WETH contract; wrap/unwrap decomposition keys off it.
    pub weth_contract: Address,
    /// Contract whose zero-address mints/burns are priced economic events.
    pub tracked_pool: Address,
    /// Zero address: mint source and burn destination.
    pub mint_address: Address,
    /// Substring of `function_sig` that marks a priced burn.
    pub burn_function_marker: String,
    /// Symbol canonicalization map, keyed by upper-cased decoded symbol.
    pub symbol_aliases: BTreeMap<String, String>,
    /// Token contracts dropped outright by the scam purge stage.
    pub scam_tokens: HashSet<Address>,
    /// Transaction hashes to trace through every stage.
    pub watch_txids: HashSet<TxHash>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let mut symbol_aliases = BTreeMap::new();
        symbol_aliases.insert("BLUR".to_string(), "BLUR POOL".to_string());

        EngineConfig {
            weth_contract: Address::new(WETH_CONTRACT),
            tracked_pool: Address::new(BLUR_POOL_CONTRACT),
            mint_address: Address::zero(),
            burn_function_marker: BLUR_BURN_MARKER.to_string(),
            symbol_aliases,
            scam_tokens: DEFAULT_SCAM_TOKENS.iter().copied().map(Address::new).collect(),
            watch_txids: HashSet::new(),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    /// Defaults overridden from an explicit env map (testable without
    /// touching process state).
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = EngineConfig::default();

        if let Some(raw) = env_map.get("CHAINLEDGER_WETH_CONTRACT") {
            config.weth_contract = parse_contract("CHAINLEDGER_WETH_CONTRACT", raw)?;
        }
        if let Some(raw) = env_map.get("CHAINLEDGER_TRACKED_POOL") {
            config.tracked_pool = parse_contract("CHAINLEDGER_TRACKED_POOL", raw)?;
        }
        if let Some(raw) = env_map.get("CHAINLEDGER_WATCH_TXIDS") {
            config.watch_txids = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    if s.starts_with("0x") {
                        Ok(TxHash::new(s))
                    } else {
                        Err(ConfigError::InvalidValue(
                            "CHAINLEDGER_WATCH_TXIDS".to_string(),
                            format!("transaction hash must be 0x-prefixed, got {s}"),
                        ))
                    }
                })
                .collect::<Result<_, _>>()?;
        }

        Ok(config)
    }

    /// Whether this transaction is on the trace watch list.
    pub fn is_watched(&self, tx_hash: &TxHash) -> bool {
        self.watch_txids.contains(tx_hash)
    }
}

fn parse_contract(key: &str, raw: &str) -> Result<Address, ConfigError> {
    let trimmed = raw.trim();
    let ok = trimmed
        .strip_prefix("0x")
        .map(|hex_digits| {
            hex_digits.len() == 40 && hex_digits.chars().all(|c| c.is_ascii_hexdigit())
        })
        .unwrap_or(false);
    if ok {
        Ok(Address::new(trimmed))
    } else {
        Err(ConfigError::InvalidAddress(
            key.to_string(),
            trimmed.to_string(),
        ))
    }
}
