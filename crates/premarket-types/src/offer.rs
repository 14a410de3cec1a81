//! Offer types for the Premarket settlement engine.
//!
//! An offer is a seller's standing sale of a fixed token quantity at a
//! fixed unit price, denominated in a settlement token. Its fill level is
//! mutated only by the order engine's quantity reservation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{OfferId, TokenId, WalletId};

/// Lifecycle status of an offer.
///
/// An offer becomes `Closed` exactly when its filled quantity reaches its
/// total quantity, and never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OfferStatus {
    Open,
    Closed,
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
        }
    }
}

/// A seller's standing sale of `total_quantity` tokens at `unit_price`
/// per token, payable in the settlement token `ex_token_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub seller_wallet_id: WalletId,
    /// Settlement token the offer is denominated in.
    pub ex_token_id: TokenId,
    pub unit_price: Decimal,
    pub total_quantity: Decimal,
    /// Invariant: `0 <= filled_quantity <= total_quantity`.
    pub filled_quantity: Decimal,
    /// Collateral floor the seller requires of every buyer (percent).
    pub min_collateral_percent: u32,
    /// Settle window after the underlying token's generation event.
    pub settle_duration_hours: u32,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

impl Offer {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == OfferStatus::Open
    }

    /// Quantity still available for new orders.
    #[must_use]
    pub fn remaining_quantity(&self) -> Decimal {
        self.total_quantity - self.filled_quantity
    }

    /// Whether `quantity` more can be reserved without overshooting.
    #[must_use]
    pub fn can_fill(&self, quantity: Decimal) -> bool {
        self.filled_quantity + quantity <= self.total_quantity
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Offer {
    pub fn dummy(unit_price: Decimal, total_quantity: Decimal, min_collateral_percent: u32) -> Self {
        Self {
            id: OfferId::new(),
            seller_wallet_id: WalletId::new(),
            ex_token_id: TokenId::new(),
            unit_price,
            total_quantity,
            filled_quantity: Decimal::ZERO,
            min_collateral_percent,
            settle_duration_hours: crate::constants::DEFAULT_SETTLE_DURATION_HOURS,
            status: OfferStatus::Open,
            created_at: Utc::now(),
        }
    }
}
