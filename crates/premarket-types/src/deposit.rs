//! Deposit types: the escrow capability's parse result, the immutable
//! ledger entry recording an applied deposit, and unsigned transaction
//! payloads produced by the escrow builders.
//!
//! A [`DepositRecord`]'s `tx_hash` is the idempotency key: re-submission
//! of the same hash returns the recorded result and credits nothing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ChainId, TokenId, TxHash, WalletAddress, WalletId};

/// A deposit event extracted from a confirmed on-chain transaction by the
/// escrow capability. Amounts arrive twice: raw (on-chain integer units)
/// and formatted (scaled by the token's decimals). The ledger is
/// denominated in formatted amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDeposit {
    pub user_address: WalletAddress,
    pub token_address: String,
    pub raw_amount: Decimal,
    pub formatted_amount: Decimal,
    pub log_index: u64,
}

/// The immutable record of one on-chain deposit having been applied to
/// the balance ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub tx_hash: TxHash,
    pub chain_id: ChainId,
    pub log_index: u64,
    pub wallet_id: WalletId,
    pub token_id: TokenId,
    pub raw_amount: Decimal,
    pub formatted_amount: Decimal,
    /// Balance of the (wallet, token) row after this deposit applied.
    pub new_balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl DepositRecord {
    /// The result a caller receives, whether this reconcile applied the
    /// credit or replayed an already-applied one.
    #[must_use]
    pub fn outcome(&self) -> ReconcileOutcome {
        ReconcileOutcome {
            wallet_id: self.wallet_id,
            token_id: self.token_id,
            new_balance: self.new_balance,
        }
    }
}

/// Result of a successful deposit reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub wallet_id: WalletId,
    pub token_id: TokenId,
    pub new_balance: Decimal,
}

/// An unsigned transaction payload for the caller's wallet to sign.
/// Produced by the escrow builders; never executed by this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPayload {
    /// Contract the transaction targets.
    pub to: String,
    /// ABI-encoded calldata, hex.
    pub data: String,
    /// Native value attached to the call.
    pub value: Decimal,
}
