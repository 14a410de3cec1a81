//! The offer book: per-offer fill tracking and lifecycle.
//!
//! Reservation is the book's only mutation. The availability check, the
//! fill increment, and the close transition all execute inside one call,
//! so two buyers racing for the last quantity can never both pass the
//! check and overshoot the total.

use std::collections::HashMap;

use premarket_types::{Offer, OfferId, OfferStatus, PremarketError, Result};
use rust_decimal::Decimal;

/// Container of offers, keyed by ID.
pub struct OfferBook {
    offers: HashMap<OfferId, Offer>,
}

impl OfferBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offers: HashMap::new(),
        }
    }

    /// Add an offer to the book (seller listing, performed upstream).
    pub fn insert(&mut self, offer: Offer) -> OfferId {
        let id = offer.id;
        self.offers.insert(id, offer);
        id
    }

    /// Look up an offer by ID.
    #[must_use]
    pub fn get(&self, offer_id: OfferId) -> Option<&Offer> {
        self.offers.get(&offer_id)
    }

    /// Reserve `quantity` on an open offer: increment the fill level and,
    /// when the offer becomes exactly full, close it in the same step.
    ///
    /// # Errors
    /// - `OfferNotFound` if no such offer exists
    /// - `OfferNotOpen` if the offer is closed
    /// - `InsufficientQuantity` if the reservation would overshoot
    pub fn reserve_quantity(&mut self, offer_id: OfferId, quantity: Decimal) -> Result<()> {
        let offer = self
            .offers
            .get_mut(&offer_id)
            .ok_or(PremarketError::OfferNotFound(offer_id))?;

        if offer.status != OfferStatus::Open {
            return Err(PremarketError::OfferNotOpen(offer_id));
        }

        if offer.filled_quantity + quantity > offer.total_quantity {
            return Err(PremarketError::InsufficientQuantity {
                requested: quantity,
                remaining: offer.remaining_quantity(),
            });
        }

        offer.filled_quantity += quantity;
        if offer.filled_quantity == offer.total_quantity {
            offer.status = OfferStatus::Closed;
            tracing::info!(offer_id = %offer_id, "offer fully filled, closing");
        }
        Ok(())
    }

    /// Number of offers in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Whether the book holds no offers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// All open offers, for listing.
    #[must_use]
    pub fn open_offers(&self) -> Vec<&Offer> {
        self.offers.values().filter(|o| o.is_open()).collect()
    }
}

impl Default for OfferBook {
    fn default() -> Self {
        Self::new()
    }
}
