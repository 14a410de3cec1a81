//! # premarket-ledger
//!
//! The collateral ledger: per-(wallet, settlement token) balances, the
//! append-only deposit log, and the supply conservation invariant.
//!
//! ## Architecture
//!
//! 1. **BalanceLedger**: the source of truth for balance state. Every
//!    mutation is a conditional delta applied inside a single call:
//!    debit-if-sufficient or unconditional credit, never a stale
//!    read-then-write pair.
//! 2. **DepositLog**: tx-hash-keyed ledger of applied on-chain deposits.
//!    One entry per hash, ever; the reconciler's replay guarantee rests
//!    on it.
//! 3. **SupplyConservation**: after any settlement activity,
//!    `sum(balances) == sum(deposits) - sum(charges)` per token. A
//!    violation is an alertable defect, not a business condition.

pub mod balance_ledger;
pub mod deposit_log;
pub mod supply_conservation;

pub use balance_ledger::BalanceLedger;
pub use deposit_log::DepositLog;
pub use supply_conservation::SupplyConservation;
