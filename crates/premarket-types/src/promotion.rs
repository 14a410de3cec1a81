//! Promotion types: offer-scoped discount campaigns.
//!
//! At most one active promotion counts per offer; when several are active
//! the most recently created one is authoritative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{OfferId, PromotionId};

/// How eligibility for a promotion is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromotionCheckType {
    /// Eligibility is decided by an external HTTP endpoint.
    Url,
    /// Unconditionally eligible. Used for internal test campaigns.
    Test,
}

impl std::fmt::Display for PromotionCheckType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url => write!(f, "URL"),
            Self::Test => write!(f, "TEST"),
        }
    }
}

/// An offer-scoped discount campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub id: PromotionId,
    pub offer_id: OfferId,
    pub is_active: bool,
    pub discount_percent: u32,
    pub check_type: PromotionCheckType,
    /// Endpoint consulted when `check_type` is [`PromotionCheckType::Url`].
    pub check_eligible_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Promotion {
    pub fn dummy_test(offer_id: OfferId, discount_percent: u32) -> Self {
        Self {
            id: PromotionId::new(),
            offer_id,
            is_active: true,
            discount_percent,
            check_type: PromotionCheckType::Test,
            check_eligible_url: None,
            created_at: Utc::now(),
        }
    }

    pub fn dummy_url(offer_id: OfferId, discount_percent: u32, url: &str) -> Self {
        Self {
            id: PromotionId::new(),
            offer_id,
            is_active: true,
            discount_percent,
            check_type: PromotionCheckType::Url,
            check_eligible_url: Some(url.to_string()),
            created_at: Utc::now(),
        }
    }
}

/// The promotion evaluator's decision for one (offer, buyer) pair at
/// order-creation time. Snapshotted onto the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionOutcome {
    pub eligible: bool,
    pub discount_percent: u32,
    pub promotion_id: Option<PromotionId>,
}

impl PromotionOutcome {
    /// The no-discount outcome.
    #[must_use]
    pub fn ineligible() -> Self {
        Self {
            eligible: false,
            discount_percent: 0,
            promotion_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_type_display() {
        assert_eq!(format!("{}", PromotionCheckType::Url), "URL");
        assert_eq!(format!("{}", PromotionCheckType::Test), "TEST");
    }

    #[test]
    fn ineligible_outcome_is_zeroed() {
        let outcome = PromotionOutcome::ineligible();
        assert!(!outcome.eligible);
        assert_eq!(outcome.discount_percent, 0);
        assert!(outcome.promotion_id.is_none());
    }

    #[test]
    fn promotion_serde_roundtrip() {
        let promo = Promotion::dummy_url(OfferId::new(), 20, "https://example.com/check");
        let json = serde_json::to_string(&promo).unwrap();
        let back: Promotion = serde_json::from_str(&json).unwrap();
        assert_eq!(promo.id, back.id);
        assert_eq!(promo.check_type, back.check_type);
        assert_eq!(promo.check_eligible_url, back.check_eligible_url);
    }
}
