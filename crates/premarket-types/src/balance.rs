//! Balance tracking types for the Premarket collateral ledger.
//!
//! One [`BalanceEntry`] exists per (wallet, settlement token) pair. The
//! balance never goes negative: every mutation is a conditional delta
//! applied by the ledger, never a blind overwrite.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{WalletAddress, WalletId};

/// The ledger row for one (wallet, settlement token) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceEntry {
    /// Available settlement-token balance. Invariant: `balance >= 0`.
    pub balance: Decimal,
}

impl BalanceEntry {
    /// Create a zero balance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balance: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.balance.is_zero()
    }
}

impl Default for BalanceEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered wallet account: the internal identity plus the on-chain
/// address deposits arrive from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Wallet {
    pub id: WalletId,
    pub address: WalletAddress,
}

impl Wallet {
    #[must_use]
    pub fn new(address: WalletAddress) -> Self {
        Self {
            id: WalletId::new(),
            address,
        }
    }
}
