//! Lookup registries consulted during deposit reconciliation: supported
//! networks, escrow deployments, registered wallets, and settlement
//! tokens.
//!
//! Address keys are stored lowercase so that resolution is
//! case-insensitive regardless of the casing a chain client emits.

use std::collections::HashMap;

use premarket_types::{
    ChainConfig, ChainId, PremarketError, Result, TokenId, Wallet, WalletAddress,
};

/// Supported chains, keyed by chain ID.
pub struct NetworkRegistry {
    chains: HashMap<ChainId, ChainConfig>,
}

impl NetworkRegistry {
    /// Build from chain configs.
    #[must_use]
    pub fn from_configs(configs: Vec<ChainConfig>) -> Self {
        Self {
            chains: configs.into_iter().map(|c| (c.chain_id, c)).collect(),
        }
    }

    /// Resolve the configuration for a chain.
    ///
    /// # Errors
    /// Returns `NetworkNotFound` for an unsupported chain.
    pub fn resolve(&self, chain_id: ChainId) -> Result<&ChainConfig> {
        self.chains
            .get(&chain_id)
            .ok_or(PremarketError::NetworkNotFound(chain_id))
    }
}

/// Escrow contract deployments, keyed by chain ID.
pub struct ContractRegistry {
    escrows: HashMap<ChainId, String>,
}

impl ContractRegistry {
    /// Build from chain configs, keeping only chains where the escrow
    /// has actually been deployed.
    #[must_use]
    pub fn from_configs(configs: &[ChainConfig]) -> Self {
        Self {
            escrows: configs
                .iter()
                .filter_map(|c| {
                    c.escrow_address
                        .as_ref()
                        .map(|addr| (c.chain_id, addr.to_lowercase()))
                })
                .collect(),
        }
    }

    /// Resolve the escrow contract address deployed on a chain.
    ///
    /// # Errors
    /// Returns `EscrowNotFound` when no deployment exists there.
    pub fn resolve(&self, chain_id: ChainId) -> Result<&str> {
        self.escrows
            .get(&chain_id)
            .map(String::as_str)
            .ok_or(PremarketError::EscrowNotFound(chain_id))
    }
}

/// Registered wallet accounts, indexed by on-chain address.
pub struct WalletRegistry {
    by_address: HashMap<WalletAddress, Wallet>,
}

impl WalletRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_address: HashMap::new(),
        }
    }

    /// Register a wallet account.
    pub fn register(&mut self, wallet: Wallet) {
        self.by_address.insert(wallet.address.clone(), wallet);
    }

    /// Resolve the wallet registered for a depositing address.
    ///
    /// # Errors
    /// Returns `WalletNotFound` when no wallet is registered for it.
    pub fn resolve(&self, address: &WalletAddress) -> Result<&Wallet> {
        self.by_address
            .get(address)
            .ok_or_else(|| PremarketError::WalletNotFound {
                address: address.to_string(),
            })
    }
}

impl Default for WalletRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Settlement tokens, indexed by on-chain contract address.
pub struct TokenRegistry {
    by_address: HashMap<String, TokenId>,
}

impl TokenRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_address: HashMap::new(),
        }
    }

    /// Register a settlement token under its contract address.
    pub fn register(&mut self, token_address: &str, token_id: TokenId) {
        self.by_address
            .insert(token_address.to_lowercase(), token_id);
    }

    /// Resolve a token contract address to its internal identity.
    ///
    /// # Errors
    /// Returns `TokenNotFound` for an unregistered token.
    pub fn resolve(&self, token_address: &str) -> Result<TokenId> {
        self.by_address
            .get(&token_address.to_lowercase())
            .copied()
            .ok_or_else(|| PremarketError::TokenNotFound {
                address: token_address.to_string(),
            })
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::new()
    }
}
