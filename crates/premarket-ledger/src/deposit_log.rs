//! The append-only deposit log, keyed by transaction hash.
//!
//! Each on-chain deposit can be applied to the balance ledger exactly
//! once. The log is the record of having applied it: a hash that is
//! already present means the credit happened, and the stored record is
//! what every replay returns.
//!
//! Unlike a bounded replay cache, entries are never evicted. An evicted
//! hash would let an old deposit credit twice, so the log grows with the
//! deposit history it guards.

use std::collections::HashMap;

use premarket_types::{DepositRecord, PremarketError, Result, TxHash};

/// Append-only store of applied deposits.
pub struct DepositLog {
    entries: HashMap<TxHash, DepositRecord>,
}

impl DepositLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Append the record of an applied deposit.
    ///
    /// # Errors
    /// Returns [`PremarketError::DuplicateDeposit`] if an entry already
    /// exists for this hash. Callers are expected to have checked
    /// [`get`](Self::get) first; hitting this error means the
    /// check-then-append pair was broken.
    pub fn record(&mut self, record: DepositRecord) -> Result<()> {
        if self.entries.contains_key(&record.tx_hash) {
            return Err(PremarketError::DuplicateDeposit(record.tx_hash));
        }
        self.entries.insert(record.tx_hash.clone(), record);
        Ok(())
    }

    /// Look up the record for a transaction hash.
    #[must_use]
    pub fn get(&self, tx_hash: &TxHash) -> Option<&DepositRecord> {
        self.entries.get(tx_hash)
    }

    /// Whether a deposit with this hash has been applied.
    #[must_use]
    pub fn contains(&self, tx_hash: &TxHash) -> bool {
        self.entries.contains_key(tx_hash)
    }

    /// Number of applied deposits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no deposits have been applied yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DepositLog {
    fn default() -> Self {
        Self::new()
    }
}
