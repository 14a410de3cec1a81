//! Balance management for the collateral ledger.
//!
//! Tracks per-(wallet, settlement token) balances. All mutations are
//! atomic: either the full operation succeeds or the balance is unchanged.
//! The non-negativity check happens in the same call that commits the
//! debit, so no interleaving of concurrent claimants can drive a balance
//! negative.

use std::collections::HashMap;

use premarket_types::{BalanceEntry, PremarketError, Result, TokenId, WalletId};
use rust_decimal::Decimal;

use crate::supply_conservation::SupplyConservation;

/// The source of truth for all balance state.
///
/// The order engine debits charges from it and the deposit reconciler
/// credits confirmed deposits into it.
pub struct BalanceLedger {
    /// Per-(wallet, token) balance rows.
    balances: HashMap<(WalletId, TokenId), BalanceEntry>,
    /// Running totals for the conservation invariant.
    supply: SupplyConservation,
}

impl BalanceLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            supply: SupplyConservation::new(),
        }
    }

    /// Credit a balance (unconditional increment). Creates the row on
    /// first use. Returns the resulting balance.
    ///
    /// A fresh row and an existing row are credited identically: the
    /// formatted (decimal-scaled) amount is the ledger's denomination.
    pub fn credit(&mut self, wallet_id: WalletId, token_id: TokenId, amount: Decimal) -> Decimal {
        let entry = self.balances.entry((wallet_id, token_id)).or_default();
        entry.balance += amount;
        self.supply.record_credit(token_id, amount);
        entry.balance
    }

    /// Debit a balance if and only if it is sufficient. The check and the
    /// decrement commit in the same call; on failure the balance is
    /// untouched. Returns the resulting balance.
    ///
    /// # Errors
    /// Returns `InsufficientBalance` if the row is missing or too small.
    pub fn debit(
        &mut self,
        wallet_id: WalletId,
        token_id: TokenId,
        amount: Decimal,
    ) -> Result<Decimal> {
        let entry = self.balances.get_mut(&(wallet_id, token_id)).ok_or(
            PremarketError::InsufficientBalance {
                needed: amount,
                available: Decimal::ZERO,
            },
        )?;

        if entry.balance < amount {
            return Err(PremarketError::InsufficientBalance {
                needed: amount,
                available: entry.balance,
            });
        }

        entry.balance -= amount;
        self.supply.record_debit(token_id, amount);
        Ok(entry.balance)
    }

    /// Get the balance for a (wallet, token) pair. Missing rows read as zero.
    #[must_use]
    pub fn balance(&self, wallet_id: WalletId, token_id: TokenId) -> Decimal {
        self.balances
            .get(&(wallet_id, token_id))
            .map_or(Decimal::ZERO, |entry| entry.balance)
    }

    /// Total supply of a settlement token across all wallets.
    #[must_use]
    pub fn total_supply(&self, token_id: TokenId) -> Decimal {
        self.balances
            .iter()
            .filter(|((_, t), _)| *t == token_id)
            .map(|(_, entry)| entry.balance)
            .sum()
    }

    /// Verify the conservation invariant for a token:
    /// actual supply == credits - debits.
    ///
    /// # Errors
    /// Returns `SupplyInvariantViolation` if the books do not balance.
    pub fn verify_supply(&self, token_id: TokenId) -> Result<()> {
        self.supply.verify(token_id, self.total_supply(token_id))
    }
}

impl Default for BalanceLedger {
    fn default() -> Self {
        Self::new()
    }
}
