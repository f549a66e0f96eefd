use serde::{Deserialize, Serialize};

use crate::config::MarketThresholds;
use crate::domain::Listing;

/// Coarse bucket derived from days-on-market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketSpeed {
    Fast,
    Normal,
    Slow,
}

impl MarketSpeed {
    pub const fn label(self) -> &'static str {
        match self {
            MarketSpeed::Fast => "fast",
            MarketSpeed::Normal => "normal",
            MarketSpeed::Slow => "slow",
        }
    }
}

/// Per-listing analytics derived on demand from a `Listing`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketMetrics {
    /// Price divided by area, rounded to two decimals half-to-even.
    pub price_per_area: f64,
    pub market_speed: MarketSpeed,
    pub is_new_listing: bool,
}

/// Defensive failure signal; unreachable for listings that passed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    #[error("listing '{id}': cannot derive price-per-area for zero area")]
    ZeroArea { id: String },
}

/// Derive the market metrics for one listing. Pure and deterministic.
pub fn compute(listing: &Listing, thresholds: &MarketThresholds) -> Result<MarketMetrics, MetricError> {
    if listing.area == 0 {
        return Err(MetricError::ZeroArea {
            id: listing.id.0.clone(),
        });
    }

    let price_per_area = round_half_even(listing.price as f64 / listing.area as f64);

    Ok(MarketMetrics {
        price_per_area,
        market_speed: market_speed(listing.days_on_market, thresholds),
        is_new_listing: listing.days_on_market <= thresholds.new_listing_threshold,
    })
}

pub fn market_speed(days_on_market: u32, thresholds: &MarketThresholds) -> MarketSpeed {
    if days_on_market < thresholds.fast_threshold {
        MarketSpeed::Fast
    } else if days_on_market < thresholds.slow_threshold {
        MarketSpeed::Normal
    } else {
        MarketSpeed::Slow
    }
}

fn round_half_even(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
