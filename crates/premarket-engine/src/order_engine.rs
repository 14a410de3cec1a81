//! The order engine: validates purchase requests, computes the
//! collateral-adjusted charge, and commits the debit, the offer
//! reservation, and the order row as one logical transaction.
//!
//! ## Charge rules
//!
//! - `base = unit_price * quantity`
//! - below 100% collateral: `charge = base * percent / 100`, never
//!   discounted (partial and discounted are mutually exclusive)
//! - at 100% with an eligible promotion: `charge = base * (100 - discount) / 100`
//! - otherwise: `charge = base`
//!
//! ## Commit discipline
//!
//! The debit is conditional (insufficient balance fails before any
//! mutation). If the offer reservation fails after the debit, the charge
//! is refunded with a compensating credit before the error propagates:
//! the wallet and the offer never disagree about whether a purchase
//! happened.

use std::collections::HashMap;

use chrono::Utc;
use premarket_ledger::BalanceLedger;
use premarket_types::{
    constants, OfferId, Order, OrderId, OrderStatus, PremarketError, Result, Wallet, WalletId,
};
use rust_decimal::Decimal;

use crate::offer_book::OfferBook;
use crate::promotion::PromotionEvaluator;

/// Creates and mutates orders against the offer book and the ledger.
pub struct OrderEngine {
    orders: HashMap<OrderId, Order>,
}

impl OrderEngine {
    /// Create an engine with no orders.
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
        }
    }

    /// Create a collateral-backed order for `quantity` of an offer.
    ///
    /// Validation is fail-fast and side-effect free; the debit and the
    /// reservation commit together or not at all.
    ///
    /// # Errors
    /// - `InvalidQuantity` for a non-positive quantity
    /// - `CollateralBelowMinimum` below the system floor
    /// - `OfferNotFound` / `OfferNotOpen` for a missing or closed offer
    /// - `InsufficientQuantity` if the offer cannot absorb `quantity`
    /// - `SelfTradeBlocked` if the buyer is the seller
    /// - `CollateralBelowSellerFloor` below the seller's required floor
    /// - `InsufficientBalance` if the buyer cannot cover the charge
    #[allow(clippy::too_many_arguments)]
    pub fn create_order(
        &mut self,
        book: &mut OfferBook,
        ledger: &mut BalanceLedger,
        promotions: &PromotionEvaluator,
        offer_id: OfferId,
        buyer: &Wallet,
        quantity: Decimal,
        requested_collateral_percent: u32,
    ) -> Result<Order> {
        if quantity <= Decimal::ZERO {
            return Err(PremarketError::InvalidQuantity(quantity));
        }
        if requested_collateral_percent < constants::MIN_COLLATERAL_PERCENT {
            return Err(PremarketError::CollateralBelowMinimum {
                requested: requested_collateral_percent,
                minimum: constants::MIN_COLLATERAL_PERCENT,
            });
        }

        let offer = book
            .get(offer_id)
            .ok_or(PremarketError::OfferNotFound(offer_id))?;
        if !offer.is_open() {
            return Err(PremarketError::OfferNotOpen(offer_id));
        }
        if !offer.can_fill(quantity) {
            return Err(PremarketError::InsufficientQuantity {
                requested: quantity,
                remaining: offer.remaining_quantity(),
            });
        }
        if buyer.id == offer.seller_wallet_id {
            return Err(PremarketError::SelfTradeBlocked);
        }
        if requested_collateral_percent < offer.min_collateral_percent {
            return Err(PremarketError::CollateralBelowSellerFloor {
                requested: requested_collateral_percent,
                floor: offer.min_collateral_percent,
            });
        }

        let unit_price = offer.unit_price;
        let ex_token_id = offer.ex_token_id;

        let base_amount = unit_price * quantity;
        let outcome = promotions.evaluate(offer_id, &buyer.address, requested_collateral_percent);
        let charge_amount = if requested_collateral_percent < constants::FULL_COLLATERAL_PERCENT {
            base_amount * Decimal::from(requested_collateral_percent) / Decimal::ONE_HUNDRED
        } else if outcome.eligible {
            base_amount * (Decimal::ONE_HUNDRED - Decimal::from(outcome.discount_percent))
                / Decimal::ONE_HUNDRED
        } else {
            base_amount
        };

        ledger.debit(buyer.id, ex_token_id, charge_amount)?;

        if let Err(err) = book.reserve_quantity(offer_id, quantity) {
            // Compensating credit: the debit must not outlive a failed
            // reservation.
            ledger.credit(buyer.id, ex_token_id, charge_amount);
            tracing::warn!(
                offer_id = %offer_id,
                buyer = %buyer.id,
                charge = %charge_amount,
                error = %err,
                "reservation failed after debit, charge refunded"
            );
            return Err(err);
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            offer_id,
            buyer_wallet_id: buyer.id,
            quantity,
            collateral_percent: requested_collateral_percent,
            discount_percent: outcome.discount_percent,
            promotion_id: outcome.promotion_id,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tracing::info!(
            order_id = %order.id,
            offer_id = %offer_id,
            charge = %charge_amount,
            collateral_percent = requested_collateral_percent,
            discount_percent = outcome.discount_percent,
            "order created"
        );
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    /// Raise a pending order's collateral to 100% in one step, debiting
    /// the remaining percentage of the full price. No intermediate
    /// percentages are supported. Returns the amount debited.
    ///
    /// # Errors
    /// - `OrderNotFound` / `OrderNotOwned` for a missing or foreign order
    /// - `OrderNotPending` if the order was settled or cancelled
    /// - `AlreadyFullyCollateralized` at 100% already
    /// - `InsufficientBalance` if the buyer cannot cover the top-up
    pub fn top_up_collateral(
        &mut self,
        ledger: &mut BalanceLedger,
        book: &OfferBook,
        order_id: OrderId,
        buyer_wallet_id: WalletId,
    ) -> Result<Decimal> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(PremarketError::OrderNotFound(order_id))?;
        if order.buyer_wallet_id != buyer_wallet_id {
            return Err(PremarketError::OrderNotOwned(order_id));
        }
        if order.status != OrderStatus::Pending {
            return Err(PremarketError::OrderNotPending {
                order_id,
                status: order.status,
            });
        }
        if order.is_fully_collateralized() {
            return Err(PremarketError::AlreadyFullyCollateralized(order_id));
        }

        let offer = book
            .get(order.offer_id)
            .ok_or(PremarketError::OfferNotFound(order.offer_id))?;

        let remaining_percent = order.remaining_collateral_percent();
        let full_amount = offer.unit_price * order.quantity;
        let top_up_amount =
            full_amount * Decimal::from(remaining_percent) / Decimal::ONE_HUNDRED;

        ledger.debit(buyer_wallet_id, offer.ex_token_id, top_up_amount)?;

        order.collateral_percent = constants::FULL_COLLATERAL_PERCENT;
        order.updated_at = Utc::now();
        tracing::info!(
            order_id = %order_id,
            top_up = %top_up_amount,
            "collateral topped up to 100%"
        );
        Ok(top_up_amount)
    }

    /// Transition a fully collateralized pending order to SETTLED.
    /// Invoked by the settlement process once the underlying token's
    /// generation event and settle window complete.
    ///
    /// # Errors
    /// - `OrderNotFound` for a missing order
    /// - `OrderNotPending` if already terminal
    /// - `SettleBeforeFullCollateral` below 100%
    pub fn mark_settled(&mut self, order_id: OrderId) -> Result<()> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(PremarketError::OrderNotFound(order_id))?;
        if order.status != OrderStatus::Pending {
            return Err(PremarketError::OrderNotPending {
                order_id,
                status: order.status,
            });
        }
        if !order.is_fully_collateralized() {
            return Err(PremarketError::SettleBeforeFullCollateral(order_id));
        }
        order.status = OrderStatus::Settled;
        order.updated_at = Utc::now();
        Ok(())
    }

    /// Transition a pending order to CANCELLED. A cancelled order can no
    /// longer be topped up: the status check in
    /// [`top_up_collateral`](Self::top_up_collateral) and this transition
    /// go through the same exclusive access, so the two can never
    /// interleave.
    ///
    /// # Errors
    /// - `OrderNotFound` for a missing order
    /// - `OrderNotPending` if already terminal
    pub fn mark_cancelled(&mut self, order_id: OrderId) -> Result<()> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(PremarketError::OrderNotFound(order_id))?;
        if order.status != OrderStatus::Pending {
            return Err(PremarketError::OrderNotPending {
                order_id,
                status: order.status,
            });
        }
        order.status = OrderStatus::Cancelled;
        order.updated_at = Utc::now();
        Ok(())
    }

    /// Look up an order by ID.
    #[must_use]
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// All orders belonging to a buyer, for listing.
    #[must_use]
    pub fn orders_for_buyer(&self, buyer_wallet_id: WalletId) -> Vec<&Order> {
        self.orders
            .values()
            .filter(|o| o.buyer_wallet_id == buyer_wallet_id)
            .collect()
    }

    /// Number of orders tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no orders exist yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderEngine {
    fn default() -> Self {
        Self::new()
    }
}
