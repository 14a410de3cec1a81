//! Supply conservation invariant checker.
//!
//! Mathematical invariant enforced after settlement activity:
//! ```text
//! for each token: sum(balances) == sum(credits) - sum(debits)
//! ```
//!
//! Credits are confirmed deposits (and compensating refunds); debits are
//! order charges and collateral top-ups. If this invariant ever breaks,
//! something has gone catastrophically wrong with the ledger's atomicity
//! and an operator must be alerted.

use std::collections::HashMap;

use premarket_types::{PremarketError, Result, TokenId};
use rust_decimal::Decimal;

/// Tracks per-token totals and validates conservation on demand.
pub struct SupplyConservation {
    /// Total credits per token since genesis.
    credits: HashMap<TokenId, Decimal>,
    /// Total debits per token since genesis.
    debits: HashMap<TokenId, Decimal>,
}

impl SupplyConservation {
    /// Create a new tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            credits: HashMap::new(),
            debits: HashMap::new(),
        }
    }

    /// Record a credit (deposit or compensating refund).
    pub fn record_credit(&mut self, token_id: TokenId, amount: Decimal) {
        *self.credits.entry(token_id).or_insert(Decimal::ZERO) += amount;
    }

    /// Record a debit (order charge or top-up).
    pub fn record_debit(&mut self, token_id: TokenId, amount: Decimal) {
        *self.debits.entry(token_id).or_insert(Decimal::ZERO) += amount;
    }

    /// Expected total supply for a token: credits - debits.
    #[must_use]
    pub fn expected_supply(&self, token_id: TokenId) -> Decimal {
        let credited = self.credits.get(&token_id).copied().unwrap_or(Decimal::ZERO);
        let debited = self.debits.get(&token_id).copied().unwrap_or(Decimal::ZERO);
        credited - debited
    }

    /// Verify that the actual supply (sum of all balance rows) matches
    /// the expected supply for a token.
    ///
    /// # Errors
    /// Returns [`PremarketError::SupplyInvariantViolation`] on mismatch.
    pub fn verify(&self, token_id: TokenId, actual_supply: Decimal) -> Result<()> {
        let expected = self.expected_supply(token_id);
        if actual_supply != expected {
            return Err(PremarketError::SupplyInvariantViolation {
                reason: format!(
                    "{token_id}: actual supply {actual_supply} != expected {expected} \
                     (credits={}, debits={})",
                    self.credits.get(&token_id).copied().unwrap_or(Decimal::ZERO),
                    self.debits.get(&token_id).copied().unwrap_or(Decimal::ZERO),
                ),
            });
        }
        Ok(())
    }
}

impl Default for SupplyConservation {
    fn default() -> Self {
        Self::new()
    }
}
