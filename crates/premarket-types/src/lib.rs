//! # premarket-types
//!
//! Shared types, errors, and configuration for the **Premarket** settlement
//! and collateral-ledger engine.
//!
//! This crate is the leaf dependency of the workspace - every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`OfferId`], [`OrderId`], [`WalletId`], [`TokenId`],
//!   [`PromotionId`], [`ChainId`], [`TxHash`], [`WalletAddress`]
//! - **Offer model**: [`Offer`], [`OfferStatus`]
//! - **Order model**: [`Order`], [`OrderStatus`]
//! - **Balance model**: [`BalanceEntry`], [`Wallet`]
//! - **Promotion model**: [`Promotion`], [`PromotionCheckType`], [`PromotionOutcome`]
//! - **Deposit model**: [`ParsedDeposit`], [`DepositRecord`], [`ReconcileOutcome`], [`TxPayload`]
//! - **Configuration**: [`ChainConfig`], [`ChainType`], [`ReconcilerConfig`]
//! - **Errors**: [`PremarketError`] with `PM_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod balance;
pub mod config;
pub mod constants;
pub mod deposit;
pub mod error;
pub mod ids;
pub mod offer;
pub mod order;
pub mod promotion;

// Re-export all primary types at crate root for ergonomic imports:
//   use premarket_types::{Offer, Order, BalanceEntry, DepositRecord, ...};

pub use balance::*;
pub use config::*;
pub use deposit::*;
pub use error::*;
pub use ids::*;
pub use offer::*;
pub use order::*;
pub use promotion::*;

// Constants are accessed via `premarket_types::constants::FOO`
// (not re-exported to avoid name collisions).
