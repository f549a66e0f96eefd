use super::HardCriterion;
use crate::domain::{Listing, UserPreferences};

/// Check the non-negotiable criteria in their fixed reporting order:
/// bedrooms, bathrooms, price range, postal code.
pub(crate) fn unmet_hard_criteria(
    listing: &Listing,
    preferences: &UserPreferences,
) -> Vec<HardCriterion> {
    let mut unmet = Vec::new();

    if listing.bedrooms < preferences.min_bedrooms {
        unmet.push(HardCriterion::Bedrooms);
    }

    if listing.bathrooms < preferences.min_bathrooms {
        unmet.push(HardCriterion::Bathrooms);
    }

    let above_floor = preferences
        .min_price
        .map(|min| listing.price >= min)
        .unwrap_or(true);
    let below_ceiling = preferences
        .max_price
        .map(|max| listing.price <= max)
        .unwrap_or(true);
    if !(above_floor && below_ceiling) {
        unmet.push(HardCriterion::PriceRange);
    }

    if !preferences.postal_codes.is_empty()
        && !preferences.postal_codes.contains(&listing.postal_code)
    {
        unmet.push(HardCriterion::PostalCode);
    }

    unmet
}

/// Area sub-score: 1.0 inside the preferred range, linearly decayed to 0.0
/// at `decay` of the nearer bound beyond it. A fully open range scores 1.0.
pub(crate) fn area_fit(area: u32, min: Option<u32>, max: Option<u32>, decay: f64) -> f64 {
    let area = f64::from(area);

    let (bound, distance) = match (min, max) {
        (Some(min), _) if area < f64::from(min) => (f64::from(min), f64::from(min) - area),
        (_, Some(max)) if area > f64::from(max) => (f64::from(max), area - f64::from(max)),
        _ => return 1.0,
    };

    let span = bound * decay;
    if span <= 0.0 {
        return 0.0;
    }

    (1.0 - distance / span).clamp(0.0, 1.0)
}

/// Landmark sub-score: the fraction of preferred keywords appearing in the
/// address, case-insensitively. No keywords means nothing to miss, so 1.0.
pub(crate) fn landmark_fit(address: &str, keywords: &[String]) -> f64 {
    if keywords.is_empty() {
        return 1.0;
    }

    let haystack = address.to_lowercase();
    let hits = keywords
        .iter()
        .filter(|keyword| haystack.contains(&keyword.to_lowercase()))
        .count();

    hits as f64 / keywords.len() as f64
}
