//! Order types for the Premarket settlement engine.
//!
//! An order is a buyer's claim on a quantity of an offer, partially or
//! fully collateralized. `collateral_percent` only ever moves upward and
//! must reach 100 before the order can settle; `quantity` is immutable
//! after creation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, OfferId, OrderId, PromotionId, WalletId};

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Settled,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Settled => write!(f, "SETTLED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A buyer's collateral-backed claim on a quantity of an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub offer_id: OfferId,
    pub buyer_wallet_id: WalletId,
    pub quantity: Decimal,
    /// Percent of the full price currently held as collateral (25-100).
    /// Monotonically non-decreasing over the order's life.
    pub collateral_percent: u32,
    /// Discount applied at creation, snapshotted so later promotion edits
    /// never change what this buyer was charged.
    pub discount_percent: u32,
    pub promotion_id: Option<PromotionId>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    #[must_use]
    pub fn is_fully_collateralized(&self) -> bool {
        self.collateral_percent >= constants::FULL_COLLATERAL_PERCENT
    }

    /// Percent still owed before the order reaches full collateral.
    #[must_use]
    pub fn remaining_collateral_percent(&self) -> u32 {
        constants::FULL_COLLATERAL_PERCENT.saturating_sub(self.collateral_percent)
    }
}
