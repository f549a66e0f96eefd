//! End-to-end facade: source records in, ranked matches out.

use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{ConfigError, EngineConfig};
use crate::domain::{Listing, UserPreferences};
use crate::error::EngineError;
use crate::ingest::{self, NormalizationError, SchemaMapping, SourceRecord};
use crate::matching::{HardCriterion, MatchEngine, MatchResult};
use crate::metrics::MarketMetrics;
use crate::ranking;

/// One ranked row of pipeline output, owned so the presentation collaborator
/// can serialize it after the source listings are gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedMatch {
    pub listing: Listing,
    pub hard_pass: bool,
    pub fit_score: f64,
    pub unmet: Vec<HardCriterion>,
    pub metrics: MarketMetrics,
}

/// A source record dropped during a pass, reported for explainability.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub index: usize,
    pub error: NormalizationError,
}

/// Outcome of one full pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub ranked: Vec<RankedMatch>,
    pub skipped: Vec<SkippedRecord>,
}

/// Composes the normalizer, matcher, metric calculator, and ranking
/// aggregator behind one call per ingestion batch.
///
/// Holds only immutable configuration, so one pipeline may serve concurrent
/// passes without coordination.
pub struct MatchPipeline {
    engine: MatchEngine,
}

impl MatchPipeline {
    /// Build a pipeline; the engine validates the configuration up front.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: MatchEngine::new(config)?,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        self.engine.config()
    }

    /// Run a full pass over raw records. Records that fail normalization are
    /// dropped from the ranking and reported back; the caller decides whether
    /// to fix the mapping table or discard them for good.
    pub fn run(
        &self,
        records: &[SourceRecord],
        mapping: &SchemaMapping,
        preferences: &UserPreferences,
        as_of: NaiveDate,
    ) -> Result<PipelineReport, EngineError> {
        preferences.validate()?;

        let mut listings = Vec::with_capacity(records.len());
        let mut skipped = Vec::new();
        for (index, record) in records.iter().enumerate() {
            match ingest::normalize(record, mapping, as_of) {
                Ok(listing) => listings.push(listing),
                Err(error) => {
                    warn!(
                        index,
                        schema = mapping.schema_id(),
                        %error,
                        "dropping source record"
                    );
                    skipped.push(SkippedRecord { index, error });
                }
            }
        }

        let ranked = self.rank_listings(&listings, preferences)?;
        Ok(PipelineReport { ranked, skipped })
    }

    /// As [`run`](Self::run), but fail the whole pass on the first record
    /// that does not normalize, for callers that treat a bad mapping table
    /// as fatal.
    pub fn run_strict(
        &self,
        records: &[SourceRecord],
        mapping: &SchemaMapping,
        preferences: &UserPreferences,
        as_of: NaiveDate,
    ) -> Result<Vec<RankedMatch>, EngineError> {
        preferences.validate()?;

        let mut listings = Vec::with_capacity(records.len());
        for record in records {
            listings.push(ingest::normalize(record, mapping, as_of)?);
        }

        self.rank_listings(&listings, preferences)
    }

    /// Convenience entry point for CSV exports: read, then run a normal pass.
    pub fn run_csv<R: Read>(
        &self,
        reader: R,
        mapping: &SchemaMapping,
        preferences: &UserPreferences,
        as_of: NaiveDate,
    ) -> Result<PipelineReport, EngineError> {
        let records = ingest::records_from_csv(reader)?;
        self.run(&records, mapping, preferences, as_of)
    }

    /// Convenience entry point for JSON provider payloads.
    pub fn run_json(
        &self,
        payload: &str,
        mapping: &SchemaMapping,
        preferences: &UserPreferences,
        as_of: NaiveDate,
    ) -> Result<PipelineReport, EngineError> {
        let records = ingest::records_from_json(payload)?;
        self.run(&records, mapping, preferences, as_of)
    }

    /// Match and rank listings that are already normalized.
    pub fn rank_listings(
        &self,
        listings: &[Listing],
        preferences: &UserPreferences,
    ) -> Result<Vec<RankedMatch>, EngineError> {
        for listing in listings {
            listing.validate()?;
        }

        let matches: Vec<MatchResult<'_>> = listings
            .iter()
            .map(|listing| self.engine.evaluate(listing, preferences))
            .collect();

        let config = self.engine.config();
        let ordered = ranking::rank_with_metrics(matches, config)?;

        let mut rows = Vec::with_capacity(ordered.len());
        for (result, metrics) in ordered {
            debug!(
                listing = %result.listing.id,
                fit_score = result.fit_score,
                price_per_area = metrics.price_per_area,
                "ranked listing"
            );
            rows.push(RankedMatch {
                listing: result.listing.clone(),
                hard_pass: result.hard_pass,
                fit_score: result.fit_score,
                unmet: result.unmet,
                metrics,
            });
        }

        Ok(rows)
    }
}
