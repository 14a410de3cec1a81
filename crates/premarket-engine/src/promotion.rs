//! Promotion evaluation: decides whether a buyer gets a discount on a
//! given offer at order-creation time.
//!
//! ## Design Principles
//!
//! - **Fail-closed**: an unreachable or misbehaving eligibility endpoint
//!   means no discount, never a granted one
//! - **Full payment only**: partial collateral defers cost already, so a
//!   partially collateralized order is never discounted
//! - **Most recent wins**: when several promotions are active for one
//!   offer, the most recently created one is authoritative; this is an
//!   explicit ordered scan, not a property of some query engine

use std::time::Duration;

use premarket_types::{
    constants, OfferId, PremarketError, Promotion, PromotionCheckType, PromotionOutcome, Result,
    WalletAddress,
};
use serde::{Deserialize, Serialize};

/// External eligibility capability for URL-checked promotions.
pub trait EligibilityChecker {
    /// Ask the external endpoint whether `wallet_address` qualifies.
    ///
    /// # Errors
    /// Any transport, status, or parse failure. The evaluator converts
    /// every error into "not eligible".
    fn check(&self, url: &str, wallet_address: &WalletAddress) -> Result<bool>;
}

#[derive(Serialize)]
struct EligibilityRequest<'a> {
    address: &'a str,
}

#[derive(Deserialize)]
struct EligibilityResponse {
    eligible: bool,
}

/// Production checker: POSTs the buyer's address to the promotion's
/// eligibility endpoint with a bounded timeout.
pub struct HttpEligibilityChecker {
    client: reqwest::blocking::Client,
}

impl HttpEligibilityChecker {
    /// Build a checker with the default request timeout.
    ///
    /// # Errors
    /// Returns `Configuration` if the underlying HTTP client cannot be
    /// constructed.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(constants::ELIGIBILITY_CHECK_TIMEOUT_MS))
            .build()
            .map_err(|e| PremarketError::Configuration(e.to_string()))?;
        Ok(Self { client })
    }
}

impl EligibilityChecker for HttpEligibilityChecker {
    fn check(&self, url: &str, wallet_address: &WalletAddress) -> Result<bool> {
        let response = self
            .client
            .post(url)
            .json(&EligibilityRequest {
                address: wallet_address.as_str(),
            })
            .send()
            .map_err(|e| PremarketError::EligibilityCheckFailed {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PremarketError::EligibilityCheckFailed {
                reason: format!("status {}", response.status()),
            });
        }

        let body: EligibilityResponse =
            response
                .json()
                .map_err(|e| PremarketError::EligibilityCheckFailed {
                    reason: e.to_string(),
                })?;
        Ok(body.eligible)
    }
}

/// Evaluates promotion eligibility for (offer, buyer) pairs.
pub struct PromotionEvaluator {
    promotions: Vec<Promotion>,
    checker: Box<dyn EligibilityChecker>,
}

impl PromotionEvaluator {
    /// Create an evaluator backed by the given eligibility capability.
    #[must_use]
    pub fn new(checker: Box<dyn EligibilityChecker>) -> Self {
        Self {
            promotions: Vec::new(),
            checker,
        }
    }

    /// Register a promotion campaign.
    pub fn add_promotion(&mut self, promotion: Promotion) {
        self.promotions.push(promotion);
    }

    /// The authoritative promotion for an offer: the most recently
    /// created active one. Later insertion wins a created_at tie.
    #[must_use]
    pub fn active_promotion(&self, offer_id: OfferId) -> Option<&Promotion> {
        let mut best: Option<&Promotion> = None;
        for promo in &self.promotions {
            if promo.offer_id != offer_id || !promo.is_active {
                continue;
            }
            match best {
                Some(current) if current.created_at > promo.created_at => {}
                _ => best = Some(promo),
            }
        }
        best
    }

    /// Decide eligibility and discount for a purchase request.
    ///
    /// Rules, in order: no active promotion means no discount; a buyer
    /// collateralizing below 100% gets no discount regardless; a `Test`
    /// campaign is unconditionally eligible; a `Url` campaign asks the
    /// external checker and treats any failure as not eligible.
    #[must_use]
    pub fn evaluate(
        &self,
        offer_id: OfferId,
        buyer_address: &WalletAddress,
        requested_collateral_percent: u32,
    ) -> PromotionOutcome {
        let Some(promotion) = self.active_promotion(offer_id) else {
            return PromotionOutcome::ineligible();
        };

        if requested_collateral_percent < constants::FULL_COLLATERAL_PERCENT {
            return PromotionOutcome::ineligible();
        }

        let eligible = match promotion.check_type {
            PromotionCheckType::Test => true,
            PromotionCheckType::Url => match &promotion.check_eligible_url {
                Some(url) => match self.checker.check(url, buyer_address) {
                    Ok(eligible) => eligible,
                    Err(err) => {
                        tracing::warn!(
                            promotion_id = %promotion.id,
                            error = %err,
                            "eligibility check failed, treating as not eligible"
                        );
                        false
                    }
                },
                None => {
                    tracing::warn!(
                        promotion_id = %promotion.id,
                        "URL promotion has no eligibility endpoint configured"
                    );
                    false
                }
            },
        };

        if eligible {
            PromotionOutcome {
                eligible: true,
                discount_percent: promotion.discount_percent,
                promotion_id: Some(promotion.id),
            }
        } else {
            PromotionOutcome::ineligible()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};

    use super::*;

    /// Checker with a fixed answer, or a fixed failure.
    struct FixedChecker {
        answer: Result<bool>,
    }

    impl FixedChecker {
        fn eligible() -> Box<Self> {
            Box::new(Self { answer: Ok(true) })
        }

        fn ineligible() -> Box<Self> {
            Box::new(Self { answer: Ok(false) })
        }

        fn unreachable() -> Box<Self> {
            Box::new(Self {
                answer: Err(PremarketError::EligibilityCheckFailed {
                    reason: "connection refused".into(),
                }),
            })
        }
    }

    impl EligibilityChecker for FixedChecker {
        fn check(&self, _url: &str, _wallet_address: &WalletAddress) -> Result<bool> {
            match &self.answer {
                Ok(v) => Ok(*v),
                Err(_) => Err(PremarketError::EligibilityCheckFailed {
                    reason: "connection refused".into(),
                }),
            }
        }
    }

    fn buyer() -> WalletAddress {
        WalletAddress::new("0xbuyer")
    }

    #[test]
    fn no_promotion_is_ineligible() {
        let evaluator = PromotionEvaluator::new(FixedChecker::eligible());
        let outcome = evaluator.evaluate(OfferId::new(), &buyer(), 100);
        assert_eq!(outcome, PromotionOutcome::ineligible());
    }

    #[test]
    fn partial_collateral_is_ineligible_even_with_active_promotion() {
        let offer_id = OfferId::new();
        let mut evaluator = PromotionEvaluator::new(FixedChecker::eligible());
        evaluator.add_promotion(Promotion::dummy_test(offer_id, 20));

        let outcome = evaluator.evaluate(offer_id, &buyer(), 40);
        assert_eq!(outcome, PromotionOutcome::ineligible());
    }

    #[test]
    fn test_check_is_unconditionally_eligible() {
        let offer_id = OfferId::new();
        let mut evaluator = PromotionEvaluator::new(FixedChecker::ineligible());
        let promo = Promotion::dummy_test(offer_id, 20);
        let promo_id = promo.id;
        evaluator.add_promotion(promo);

        let outcome = evaluator.evaluate(offer_id, &buyer(), 100);
        assert!(outcome.eligible);
        assert_eq!(outcome.discount_percent, 20);
        assert_eq!(outcome.promotion_id, Some(promo_id));
    }

    #[test]
    fn url_check_respects_checker_answer() {
        let offer_id = OfferId::new();
        let mut evaluator = PromotionEvaluator::new(FixedChecker::ineligible());
        evaluator.add_promotion(Promotion::dummy_url(offer_id, 15, "https://x.test/check"));

        let outcome = evaluator.evaluate(offer_id, &buyer(), 100);
        assert!(!outcome.eligible);
        assert_eq!(outcome.discount_percent, 0);
    }

    #[test]
    fn unreachable_checker_fails_closed() {
        let offer_id = OfferId::new();
        let mut evaluator = PromotionEvaluator::new(FixedChecker::unreachable());
        evaluator.add_promotion(Promotion::dummy_url(offer_id, 15, "https://x.test/check"));

        let outcome = evaluator.evaluate(offer_id, &buyer(), 100);
        assert_eq!(outcome, PromotionOutcome::ineligible());
    }

    #[test]
    fn url_promotion_without_endpoint_fails_closed() {
        let offer_id = OfferId::new();
        let mut evaluator = PromotionEvaluator::new(FixedChecker::eligible());
        let mut promo = Promotion::dummy_url(offer_id, 15, "https://x.test/check");
        promo.check_eligible_url = None;
        evaluator.add_promotion(promo);

        let outcome = evaluator.evaluate(offer_id, &buyer(), 100);
        assert_eq!(outcome, PromotionOutcome::ineligible());
    }

    #[test]
    fn inactive_promotion_ignored() {
        let offer_id = OfferId::new();
        let mut evaluator = PromotionEvaluator::new(FixedChecker::eligible());
        let mut promo = Promotion::dummy_test(offer_id, 20);
        promo.is_active = false;
        evaluator.add_promotion(promo);

        assert!(evaluator.active_promotion(offer_id).is_none());
    }

    #[test]
    fn most_recent_active_promotion_wins() {
        let offer_id = OfferId::new();
        let mut evaluator = PromotionEvaluator::new(FixedChecker::eligible());

        let mut old = Promotion::dummy_test(offer_id, 10);
        old.created_at = Utc::now() - ChronoDuration::hours(2);
        let newer = Promotion::dummy_test(offer_id, 30);
        let newer_id = newer.id;

        evaluator.add_promotion(newer);
        evaluator.add_promotion(old);

        let selected = evaluator.active_promotion(offer_id).unwrap();
        assert_eq!(selected.id, newer_id);
        assert_eq!(selected.discount_percent, 30);
    }

    #[test]
    fn promotions_are_offer_scoped() {
        let offer_a = OfferId::new();
        let offer_b = OfferId::new();
        let mut evaluator = PromotionEvaluator::new(FixedChecker::eligible());
        evaluator.add_promotion(Promotion::dummy_test(offer_a, 20));

        assert!(evaluator.active_promotion(offer_b).is_none());
        let outcome = evaluator.evaluate(offer_b, &buyer(), 100);
        assert!(!outcome.eligible);
    }
}
