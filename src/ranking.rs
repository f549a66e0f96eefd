//! Ranking aggregator: deterministic total order over scored listings.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::debug;

use crate::config::EngineConfig;
use crate::domain::ListingId;
use crate::matching::MatchResult;
use crate::metrics::{self, MarketMetrics, MetricError};

/// Order match results by fit score descending, breaking ties by ascending
/// price-per-area and then by listing id, so output is reproducible across
/// runs with identical input.
///
/// Hard-pass failures are filtered out unless `include_non_matches` is set.
pub fn rank<'a>(
    matches: Vec<MatchResult<'a>>,
    config: &EngineConfig,
) -> Result<Vec<MatchResult<'a>>, MetricError> {
    let ordered = rank_with_metrics(matches, config)?;
    Ok(ordered.into_iter().map(|(result, _)| result).collect())
}

/// As [`rank`], but keep each result paired with the market metrics the sort
/// used, so callers do not recompute them.
///
/// Metrics are cached per listing id for this pass only; listings change over
/// time, so the next pass recomputes.
pub fn rank_with_metrics<'a>(
    matches: Vec<MatchResult<'a>>,
    config: &EngineConfig,
) -> Result<Vec<(MatchResult<'a>, MarketMetrics)>, MetricError> {
    let total = matches.len();
    let kept: Vec<MatchResult<'a>> = matches
        .into_iter()
        .filter(|result| config.include_non_matches || result.hard_pass)
        .collect();

    let mut cache: BTreeMap<ListingId, MarketMetrics> = BTreeMap::new();
    for result in &kept {
        if !cache.contains_key(&result.listing.id) {
            let computed = metrics::compute(result.listing, &config.thresholds)?;
            cache.insert(result.listing.id.clone(), computed);
        }
    }

    let mut paired: Vec<(MatchResult<'a>, MarketMetrics)> = kept
        .into_iter()
        .map(|result| {
            let metrics = cache[&result.listing.id];
            (result, metrics)
        })
        .collect();

    paired.sort_by(|(a, metrics_a), (b, metrics_b)| compare(a, metrics_a, b, metrics_b));

    debug!(total, ranked = paired.len(), "ranking pass complete");
    Ok(paired)
}

/// Comparator backing `rank`, exposed for callers that already hold metrics.
pub fn compare(
    a: &MatchResult<'_>,
    metrics_a: &MarketMetrics,
    b: &MatchResult<'_>,
    metrics_b: &MarketMetrics,
) -> Ordering {
    b.fit_score
        .total_cmp(&a.fit_score)
        .then_with(|| metrics_a.price_per_area.total_cmp(&metrics_b.price_per_area))
        .then_with(|| a.listing.id.cmp(&b.listing.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Listing, ListingId, ListingStatus, PropertyType};
    use crate::matching::MatchResult;

    fn listing(id: &str, price: u64, area: u32) -> Listing {
        Listing {
            id: ListingId::from(id),
            address: format!("{id} Example Ave, Lafayette, CO 80026"),
            price,
            bedrooms: 3,
            bathrooms: 2.0,
            area,
            lot_size: 0.2,
            year_built: Some(2010),
            property_type: PropertyType::SingleFamily,
            status: ListingStatus::Active,
            days_on_market: 10,
            postal_code: "80026".to_string(),
        }
    }

    fn matched(listing: &Listing, fit_score: f64) -> MatchResult<'_> {
        MatchResult {
            listing,
            hard_pass: true,
            fit_score,
            unmet: Vec::new(),
        }
    }

    fn failed(listing: &Listing) -> MatchResult<'_> {
        MatchResult {
            listing,
            hard_pass: false,
            fit_score: 0.0,
            unmet: vec![crate::matching::HardCriterion::Bedrooms],
        }
    }

    #[test]
    fn orders_by_score_descending() {
        let a = listing("a", 700_000, 2_000);
        let b = listing("b", 700_000, 2_000);
        let ranked = rank(
            vec![matched(&a, 0.3), matched(&b, 0.9)],
            &EngineConfig::default(),
        )
        .expect("rank");
        let ids: Vec<&str> = ranked.iter().map(|r| r.listing.id.0.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn score_ties_break_on_cheaper_price_per_area() {
        let cheap = listing("pricier-id", 600_000, 2_000); // 300.00 per unit
        let dear = listing("a-cheaper-id", 800_000, 2_000); // 400.00 per unit
        let ranked = rank(
            vec![matched(&dear, 0.8), matched(&cheap, 0.8)],
            &EngineConfig::default(),
        )
        .expect("rank");
        let ids: Vec<&str> = ranked.iter().map(|r| r.listing.id.0.as_str()).collect();
        assert_eq!(ids, vec!["pricier-id", "a-cheaper-id"]);
    }

    #[test]
    fn full_ties_break_on_lexicographic_id() {
        // Identical score 0.8 and identical 350.00 price-per-area.
        let b = listing("B", 700_000, 2_000);
        let a = listing("A", 700_000, 2_000);
        let ranked = rank(
            vec![matched(&b, 0.8), matched(&a, 0.8)],
            &EngineConfig::default(),
        )
        .expect("rank");
        let ids: Vec<&str> = ranked.iter().map(|r| r.listing.id.0.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn non_matches_are_filtered_by_default() {
        let a = listing("a", 700_000, 2_000);
        let b = listing("b", 700_000, 2_000);
        let ranked = rank(
            vec![matched(&a, 0.5), failed(&b)],
            &EngineConfig::default(),
        )
        .expect("rank");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].listing.id.0, "a");
    }

    #[test]
    fn non_matches_sink_to_the_bottom_when_included() {
        let a = listing("a", 700_000, 2_000);
        let b = listing("b", 700_000, 2_000);
        let config = EngineConfig {
            include_non_matches: true,
            ..EngineConfig::default()
        };
        let ranked = rank(vec![failed(&b), matched(&a, 0.5)], &config).expect("rank");
        let ids: Vec<&str> = ranked.iter().map(|r| r.listing.id.0.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(!ranked[1].hard_pass);
    }

    #[test]
    fn paired_metrics_match_a_fresh_computation() {
        let config = EngineConfig::default();
        let a = listing("a", 750_000, 2_100);
        let b = listing("b", 600_000, 2_000);
        let ordered = rank_with_metrics(vec![matched(&a, 0.7), matched(&b, 0.9)], &config)
            .expect("rank with metrics");

        let ids: Vec<&str> = ordered.iter().map(|(r, _)| r.listing.id.0.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        for (result, attached) in &ordered {
            let fresh =
                metrics::compute(result.listing, &config.thresholds).expect("compute metrics");
            assert_eq!(attached.price_per_area, fresh.price_per_area);
            assert_eq!(attached.market_speed, fresh.market_speed);
            assert_eq!(attached.is_new_listing, fresh.is_new_listing);
        }
    }

    #[test]
    fn ranking_twice_is_idempotent() {
        let listings: Vec<Listing> = (0u64..6)
            .map(|n| listing(&format!("mls-{n}"), 500_000 + n * 37_000, 1_900 + n as u32 * 83))
            .collect();
        let config = EngineConfig::default();

        let build = || {
            listings
                .iter()
                .enumerate()
                .map(|(n, l)| matched(l, [0.8, 0.8, 0.4, 0.9, 0.4, 0.8][n]))
                .collect::<Vec<_>>()
        };

        let first = rank(build(), &config).expect("first pass");
        let second = rank(build(), &config).expect("second pass");
        let order = |results: &[MatchResult<'_>]| {
            results
                .iter()
                .map(|r| r.listing.id.0.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(order(&first), order(&second));
    }

    #[test]
    fn zero_area_listing_surfaces_metric_error() {
        let broken = listing("broken", 500_000, 0);
        let error = rank(vec![matched(&broken, 0.5)], &EngineConfig::default())
            .expect_err("zero area must fail the pass");
        assert!(matches!(error, MetricError::ZeroArea { .. }));
    }
}
