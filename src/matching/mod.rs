//! Preference matching: hard-pass verdicts plus a soft fit score.

mod rules;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, EngineConfig};
use crate::domain::{Listing, UserPreferences};

/// Non-negotiable criteria, named for explainability output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HardCriterion {
    Bedrooms,
    Bathrooms,
    PriceRange,
    PostalCode,
}

impl HardCriterion {
    pub const fn label(self) -> &'static str {
        match self {
            HardCriterion::Bedrooms => "bedrooms",
            HardCriterion::Bathrooms => "bathrooms",
            HardCriterion::PriceRange => "price_range",
            HardCriterion::PostalCode => "postal_code",
        }
    }
}

/// Outcome of matching one listing against one preference set.
///
/// Holds a non-owning reference; the caller keeps the listings alive for the
/// duration of the ranking pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub listing: &'a Listing,
    pub hard_pass: bool,
    /// In [0.0, 1.0]; always 0.0 when `hard_pass` is false.
    pub fit_score: f64,
    /// Failed hard criteria in fixed order: bedrooms, bathrooms,
    /// price range, postal code.
    pub unmet: Vec<HardCriterion>,
}

/// Stateless evaluator applying one immutable configuration to listings.
pub struct MatchEngine {
    config: EngineConfig,
}

impl MatchEngine {
    /// Build an engine, rejecting configurations whose weights or thresholds
    /// would make `evaluate` produce scores outside [0.0, 1.0].
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate a listing against the preferences. Pure; no side effects.
    pub fn evaluate<'a>(
        &self,
        listing: &'a Listing,
        preferences: &UserPreferences,
    ) -> MatchResult<'a> {
        let unmet = rules::unmet_hard_criteria(listing, preferences);
        let hard_pass = unmet.is_empty();

        let fit_score = if hard_pass {
            let area = rules::area_fit(
                listing.area,
                preferences.min_area,
                preferences.max_area,
                self.config.area_fit_decay,
            );
            let landmark =
                rules::landmark_fit(&listing.address, &preferences.preferred_landmarks);

            let weights = &self.config.weights;
            (weights.area * area + weights.landmark * landmark) / weights.sum()
        } else {
            0.0
        };

        MatchResult {
            listing,
            hard_pass,
            fit_score,
            unmet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListingId, ListingStatus, PropertyType};
    use std::collections::BTreeSet;

    fn listing() -> Listing {
        Listing {
            id: ListingId::from("mls-12345678"),
            address: "123 Main St near Waneka Lake Park, Lafayette, CO 80026".to_string(),
            price: 750_000,
            bedrooms: 3,
            bathrooms: 2.0,
            area: 2_100,
            lot_size: 0.25,
            year_built: Some(2015),
            property_type: PropertyType::SingleFamily,
            status: ListingStatus::Active,
            days_on_market: 15,
            postal_code: "80026".to_string(),
        }
    }

    fn preferences() -> UserPreferences {
        UserPreferences {
            name: "Test User".to_string(),
            min_bedrooms: 3,
            min_bathrooms: 2.0,
            min_area: Some(1_800),
            max_area: Some(2_500),
            min_price: Some(600_000),
            max_price: Some(1_000_000),
            postal_codes: ["80026", "80027", "80301"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            preferred_landmarks: vec!["park".to_string(), "lake".to_string()],
        }
    }

    fn engine() -> MatchEngine {
        MatchEngine::new(EngineConfig::default()).expect("valid config")
    }

    #[test]
    fn in_range_listing_hard_passes_with_full_score() {
        let listing = listing();
        let result = engine().evaluate(&listing, &preferences());
        assert!(result.hard_pass);
        assert!(result.unmet.is_empty());
        // Area in range and both landmarks hit: 0.6 * 1.0 + 0.4 * 1.0.
        assert_eq!(result.fit_score, 1.0);
    }

    #[test]
    fn bedroom_shortfall_fails_hard_and_zeroes_score() {
        let mut short = listing();
        short.bedrooms = 2;
        let result = engine().evaluate(&short, &preferences());
        assert!(!result.hard_pass);
        assert_eq!(result.fit_score, 0.0);
        assert_eq!(result.unmet, vec![HardCriterion::Bedrooms]);
        assert_eq!(result.unmet[0].label(), "bedrooms");
    }

    #[test]
    fn unmet_criteria_keep_their_fixed_order() {
        let mut off = listing();
        off.bedrooms = 1;
        off.bathrooms = 1.0;
        off.price = 1_500_000;
        off.postal_code = "99999".to_string();
        let result = engine().evaluate(&off, &preferences());
        assert_eq!(
            result.unmet,
            vec![
                HardCriterion::Bedrooms,
                HardCriterion::Bathrooms,
                HardCriterion::PriceRange,
                HardCriterion::PostalCode,
            ]
        );
    }

    #[test]
    fn empty_postal_set_places_no_restriction() {
        let mut anywhere = preferences();
        anywhere.postal_codes = BTreeSet::new();
        let mut elsewhere = listing();
        elsewhere.postal_code = "99999".to_string();
        let result = engine().evaluate(&elsewhere, &anywhere);
        assert!(result.hard_pass);
    }

    #[test]
    fn absent_price_bounds_are_unconstrained() {
        let mut open = preferences();
        open.min_price = None;
        open.max_price = None;
        let mut pricey = listing();
        pricey.price = 5_000_000;
        assert!(engine().evaluate(&pricey, &open).hard_pass);
    }

    #[test]
    fn area_fit_decays_linearly_below_the_minimum() {
        // min 1800, decay 0.5 => fit hits zero at 900 square units.
        let mut small = listing();
        small.area = 1_350;
        let mut prefs = preferences();
        prefs.preferred_landmarks.clear();
        let result = engine().evaluate(&small, &prefs);
        // Halfway into the decay window: area fit 0.5, landmark fit 1.0.
        let expected = 0.6 * 0.5 + 0.4 * 1.0;
        assert!((result.fit_score - expected).abs() < 1e-9);

        small.area = 900;
        let floored = engine().evaluate(&small, &prefs);
        assert!((floored.fit_score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn landmark_fit_counts_case_insensitive_hits() {
        let mut prefs = preferences();
        prefs.preferred_landmarks = vec![
            "PARK".to_string(),
            "lake".to_string(),
            "trailhead".to_string(),
            "school".to_string(),
        ];
        let listing = listing();
        let result = engine().evaluate(&listing, &prefs);
        // Two of four keywords hit; area is in range.
        let expected = 0.6 * 1.0 + 0.4 * 0.5;
        assert!((result.fit_score - expected).abs() < 1e-9);
    }

    #[test]
    fn no_landmarks_means_no_penalty() {
        let mut prefs = preferences();
        prefs.preferred_landmarks.clear();
        let mut plain = listing();
        plain.address = "1 Nowhere Rd, Lafayette, CO 80026".to_string();
        let result = engine().evaluate(&plain, &prefs);
        assert_eq!(result.fit_score, 1.0);
    }

    #[test]
    fn zero_sum_weights_are_rejected_at_construction() {
        let mut config = EngineConfig::default();
        config.weights.area = 0.0;
        config.weights.landmark = 0.0;
        assert!(matches!(
            MatchEngine::new(config),
            Err(ConfigError::ZeroWeightSum)
        ));
    }

    #[test]
    fn custom_weights_are_normalized_into_unit_range() {
        let mut config = EngineConfig::default();
        config.weights.area = 3.0;
        config.weights.landmark = 1.0;
        let engine = MatchEngine::new(config).expect("valid config");
        let mut prefs = preferences();
        prefs.preferred_landmarks = vec!["nonexistent".to_string()];
        let listing = listing();
        let result = engine.evaluate(&listing, &prefs);
        // 3/4 area weight at full fit, landmark missed entirely.
        assert!((result.fit_score - 0.75).abs() < 1e-9);
        assert!(result.fit_score <= 1.0);
    }
}
