use serde::{Deserialize, Serialize};

const DEFAULT_FAST_THRESHOLD: u32 = 7;
const DEFAULT_SLOW_THRESHOLD: u32 = 30;
const DEFAULT_NEW_LISTING_THRESHOLD: u32 = 7;
const DEFAULT_AREA_WEIGHT: f64 = 0.6;
const DEFAULT_LANDMARK_WEIGHT: f64 = 0.4;
const DEFAULT_AREA_FIT_DECAY: f64 = 0.5;

/// Days-on-market thresholds backing the market-speed classification.
///
/// Callers may tune these per region; they are plain data, never globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketThresholds {
    pub fast_threshold: u32,
    pub slow_threshold: u32,
    pub new_listing_threshold: u32,
}

impl Default for MarketThresholds {
    fn default() -> Self {
        Self {
            fast_threshold: DEFAULT_FAST_THRESHOLD,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
            new_listing_threshold: DEFAULT_NEW_LISTING_THRESHOLD,
        }
    }
}

/// Relative weights combining the soft-criterion sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub area: f64,
    pub landmark: f64,
}

impl ScoreWeights {
    pub(crate) fn sum(&self) -> f64 {
        self.area + self.landmark
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            area: DEFAULT_AREA_WEIGHT,
            landmark: DEFAULT_LANDMARK_WEIGHT,
        }
    }
}

/// Immutable configuration shared by the matcher and the ranking aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub thresholds: MarketThresholds,
    pub weights: ScoreWeights,
    /// How far beyond the nearer area bound the fit decays to zero,
    /// as a fraction of that bound.
    pub area_fit_decay: f64,
    /// Keep hard-pass failures in ranking output instead of filtering them.
    pub include_non_matches: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            thresholds: MarketThresholds::default(),
            weights: ScoreWeights::default(),
            area_fit_decay: DEFAULT_AREA_FIT_DECAY,
            include_non_matches: false,
        }
    }
}

impl EngineConfig {
    /// Reject unusable settings up front. Fails fast, never clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thresholds.fast_threshold >= self.thresholds.slow_threshold {
            return Err(ConfigError::ThresholdOrder {
                fast: self.thresholds.fast_threshold,
                slow: self.thresholds.slow_threshold,
            });
        }

        for (name, value) in [
            ("area", self.weights.area),
            ("landmark", self.weights.landmark),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, found: value });
            }
        }

        if self.weights.sum() <= 0.0 {
            return Err(ConfigError::ZeroWeightSum);
        }

        if !self.area_fit_decay.is_finite() || self.area_fit_decay <= 0.0 {
            return Err(ConfigError::InvalidDecay {
                found: self.area_fit_decay,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("fast_threshold {fast} must be below slow_threshold {slow}")]
    ThresholdOrder { fast: u32, slow: u32 },
    #[error("score weight '{name}' must be finite and non-negative, found {found}")]
    InvalidWeight { name: &'static str, found: f64 },
    #[error("score weights must not sum to zero")]
    ZeroWeightSum,
    #[error("area_fit_decay must be a positive finite fraction, found {found}")]
    InvalidDecay { found: f64 },
}
