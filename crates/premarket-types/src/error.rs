//! Error types for the Premarket settlement engine.
//!
//! All errors use the `PM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Order / validation errors
//! - 2xx: Balance errors
//! - 3xx: Offer errors
//! - 4xx: Reconciliation errors
//! - 5xx: External dependency errors
//! - 9xx: Internal / consistency errors
//!
//! Validation (1xx) and resource-state (2xx/3xx) errors are expected
//! business conditions: they are rejected synchronously with no side effect.
//! 5xx errors carry a "retry later" signal. 9xx errors indicate a broken
//! atomicity assumption and must reach an operator.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{ChainId, OfferId, OrderId, OrderStatus, TxHash};

/// Central error enum for all Premarket operations.
#[derive(Debug, Error)]
pub enum PremarketError {
    // =================================================================
    // Order / Validation Errors (1xx)
    // =================================================================
    /// The requested order was not found.
    #[error("PM_ERR_100: Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Order quantity must be strictly positive.
    #[error("PM_ERR_101: Invalid quantity: {0}")]
    InvalidQuantity(Decimal),

    /// Requested collateral percent is below the system-wide floor.
    #[error("PM_ERR_102: Collateral {requested}% below minimum {minimum}%")]
    CollateralBelowMinimum { requested: u32, minimum: u32 },

    /// Requested collateral percent is below the seller's floor for this offer.
    #[error("PM_ERR_103: Collateral {requested}% below seller floor {floor}%")]
    CollateralBelowSellerFloor { requested: u32, floor: u32 },

    /// Buyer and seller are the same wallet.
    #[error("PM_ERR_104: Self-trade blocked: buyer and seller are the same wallet")]
    SelfTradeBlocked,

    /// The order exists but belongs to a different wallet.
    #[error("PM_ERR_105: Order {0} is not owned by the caller")]
    OrderNotOwned(OrderId),

    /// The order already carries 100% collateral.
    #[error("PM_ERR_106: Order {0} is already fully collateralized")]
    AlreadyFullyCollateralized(OrderId),

    /// The order is no longer pending (settled or cancelled).
    #[error("PM_ERR_107: Order {order_id} is {status}, not PENDING")]
    OrderNotPending {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// Settlement requires 100% collateral first.
    #[error("PM_ERR_108: Order {0} cannot settle below 100% collateral")]
    SettleBeforeFullCollateral(OrderId),

    // =================================================================
    // Balance Errors (2xx)
    // =================================================================
    /// Not enough balance to perform the operation.
    #[error("PM_ERR_200: Insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    /// A balance operation would produce a negative value.
    #[error("PM_ERR_201: Balance underflow")]
    BalanceUnderflow,

    // =================================================================
    // Offer Errors (3xx)
    // =================================================================
    /// The requested offer was not found.
    #[error("PM_ERR_300: Offer not found: {0}")]
    OfferNotFound(OfferId),

    /// The offer is closed and accepts no further orders.
    #[error("PM_ERR_301: Offer {0} is not open")]
    OfferNotOpen(OfferId),

    /// Not enough unfilled quantity left on the offer.
    #[error("PM_ERR_302: Insufficient quantity: requested {requested}, remaining {remaining}")]
    InsufficientQuantity {
        requested: Decimal,
        remaining: Decimal,
    },

    // =================================================================
    // Reconciliation Errors (4xx)
    // =================================================================
    /// No network configuration for this chain.
    #[error("PM_ERR_400: Network not found: {0}")]
    NetworkNotFound(ChainId),

    /// No escrow contract deployed on this chain.
    #[error("PM_ERR_401: Escrow contract not found for {0}")]
    EscrowNotFound(ChainId),

    /// The transaction exists but carries no recognised deposit event.
    #[error("PM_ERR_402: No deposit event found in transaction {0}")]
    DepositEventNotFound(TxHash),

    /// No wallet is registered for the depositing address.
    #[error("PM_ERR_403: Wallet not found for address {address}")]
    WalletNotFound { address: String },

    /// The deposited token is not a registered settlement token.
    #[error("PM_ERR_404: Token not found for address {address}")]
    TokenNotFound { address: String },

    /// A ledger entry already exists for this transaction hash.
    #[error("PM_ERR_405: Duplicate deposit: {0}")]
    DuplicateDeposit(TxHash),

    // =================================================================
    // External Dependency Errors (5xx)
    // =================================================================
    /// The chain RPC could not be reached. Safe to retry: no balance
    /// mutation occurred.
    #[error("PM_ERR_500: Chain RPC unreachable: {reason}")]
    RpcUnreachable { reason: String },

    /// The promotion eligibility checker failed. Callers treat this as
    /// not eligible (fail closed), never as a granted discount.
    #[error("PM_ERR_501: Eligibility check failed: {reason}")]
    EligibilityCheckFailed { reason: String },

    // =================================================================
    // Internal / Consistency (9xx)
    // =================================================================
    /// Two mutations that must commit together did not. Alertable.
    #[error("PM_ERR_900: Consistency hazard: {reason}")]
    ConsistencyHazard { reason: String },

    /// Supply conservation invariant violated. Alertable.
    #[error("PM_ERR_901: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// Unrecoverable internal error.
    #[error("PM_ERR_902: Internal error: {0}")]
    Internal(String),

    /// Configuration error (missing URL, malformed chain config, etc.).
    #[error("PM_ERR_903: Configuration error: {0}")]
    Configuration(String),
}

impl PremarketError {
    /// Whether the caller may safely retry the operation: the failure
    /// occurred before any side effect.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RpcUnreachable { .. })
    }

    /// Whether this error must escalate to an operator-visible alarm
    /// rather than being returned as a normal business condition.
    #[must_use]
    pub fn is_alertable(&self) -> bool {
        matches!(
            self,
            Self::ConsistencyHazard { .. } | Self::SupplyInvariantViolation { .. }
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PremarketError>;
