//! # premarket-reconciler
//!
//! Exactly-once ingestion of on-chain deposit confirmations into the
//! balance ledger.
//!
//! ## Architecture
//!
//! A deposit confirmation arrives as a bare transaction hash plus chain
//! ID (users re-submit freely; the chain is an append-only source that
//! can be re-read at any time). The reconciler:
//! 1. Resolves the chain's network configuration and escrow deployment
//! 2. Asks the [`EscrowClient`] capability to parse the transaction
//! 3. Replays the recorded result if the hash was already applied
//! 4. Resolves the depositing address to a registered wallet
//!    (case-insensitive) and the token to a settlement-token identity
//! 5. Credits the balance and appends the deposit record together
//!
//! Every failure before the credit is side-effect free and safe to
//! retry. The credit and the record commit in one exclusive step; if the
//! record were ever refused after the credit, that surfaces as an
//! alertable consistency hazard rather than being swallowed.

pub mod escrow_client;
pub mod reconcile;
pub mod registry;

pub use escrow_client::EscrowClient;
pub use reconcile::DepositReconciler;
pub use registry::{ContractRegistry, NetworkRegistry, TokenRegistry, WalletRegistry};
