//! The escrow capability: reads deposit events out of confirmed
//! transactions and builds unsigned deposit/approve payloads.
//!
//! The chain-facing implementation lives with the chain tooling; this
//! crate only consumes the seam. Reads are fallible (RPC may be down);
//! builders are pure and never mutate anything.

use premarket_types::{ParsedDeposit, Result, TxHash, TxPayload};
use rust_decimal::Decimal;

/// Capability for reading and preparing escrow-contract transactions.
pub trait EscrowClient {
    /// Read a confirmed transaction and extract its deposit event.
    ///
    /// Returns `Ok(None)` when the transaction exists but carries no
    /// deposit event this system recognises.
    ///
    /// # Errors
    /// Returns `RpcUnreachable` when the chain cannot be read. Callers
    /// may retry freely: nothing has been applied.
    fn parse_transaction(&self, tx_hash: &TxHash) -> Result<Option<ParsedDeposit>>;

    /// Build an unsigned deposit transaction for the caller to sign.
    fn build_deposit(&self, token_address: &str, amount: Decimal) -> TxPayload;

    /// Build an unsigned approval transaction for the caller to sign.
    fn build_approve(&self, spender: &str, amount: Decimal) -> TxPayload;
}
