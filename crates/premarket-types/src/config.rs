//! Configuration types for supported chains and the reconciler.

use serde::{Deserialize, Serialize};

use crate::ChainId;

/// The family of chain a network belongs to, which determines how the
/// escrow capability reads transactions from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainType {
    Evm,
    Solana,
}

impl std::fmt::Display for ChainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Evm => write!(f, "EVM"),
            Self::Solana => write!(f, "SOLANA"),
        }
    }
}

/// Configuration for a single supported chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Numeric chain identifier.
    pub chain_id: ChainId,
    /// RPC endpoint used to read confirmed transactions.
    pub rpc_url: String,
    /// Chain family.
    pub chain_type: ChainType,
    /// Deployed escrow contract address, if the escrow has been deployed
    /// on this chain yet.
    pub escrow_address: Option<String>,
}

impl ChainConfig {
    /// Create a default Base mainnet config.
    #[must_use]
    pub fn base_mainnet() -> Self {
        Self {
            chain_id: ChainId(8453),
            rpc_url: "https://mainnet.base.org".to_string(),
            chain_type: ChainType::Evm,
            escrow_address: Some("0x0000000000000000000000000000000000000e5c".to_string()),
        }
    }

    /// Create a default Base Sepolia (testnet) config.
    #[must_use]
    pub fn base_sepolia() -> Self {
        Self {
            chain_id: ChainId(84_532),
            rpc_url: "https://sepolia.base.org".to_string(),
            chain_type: ChainType::Evm,
            escrow_address: None,
        }
    }
}

/// Configuration for the deposit reconciler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Chains the reconciler accepts deposit confirmations from.
    pub chains: Vec<ChainConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_mainnet_config() {
        let cfg = ChainConfig::base_mainnet();
        assert_eq!(cfg.chain_id, ChainId(8453));
        assert_eq!(cfg.chain_type, ChainType::Evm);
        assert!(cfg.escrow_address.is_some());
    }

    #[test]
    fn chain_type_display() {
        assert_eq!(format!("{}", ChainType::Evm), "EVM");
        assert_eq!(format!("{}", ChainType::Solana), "SOLANA");
    }

    #[test]
    fn chain_config_serde_roundtrip() {
        let cfg = ChainConfig::base_sepolia();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ChainConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.chain_id, back.chain_id);
        assert_eq!(cfg.rpc_url, back.rpc_url);
        assert_eq!(cfg.escrow_address, back.escrow_address);
    }
}
