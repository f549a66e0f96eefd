//! Property-matching and market-analysis core for a real-estate listing
//! tracker.
//!
//! The crate takes loosely-typed provider records through four pure stages:
//! normalization into canonical [`domain::Listing`]s, per-listing market
//! metrics, preference matching with an explainable verdict, and a
//! deterministic ranking pass. All stages operate on immutable inputs and
//! explicit configuration, so concurrent callers need no coordination.
//!
//! Ingestion I/O, persistence, and serving layers live outside this crate;
//! they hand records in and consume [`pipeline::RankedMatch`] rows.

pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod matching;
pub mod metrics;
pub mod pipeline;
pub mod ranking;
pub mod telemetry;

pub use config::{ConfigError, EngineConfig, MarketThresholds, ScoreWeights};
pub use domain::{
    Listing, ListingId, ListingStatus, PropertyType, UserPreferences, ValidationError,
};
pub use error::EngineError;
pub use ingest::{
    normalize, CanonicalField, Conversion, FieldRule, NormalizationError, SchemaMapping,
    SourceRecord,
};
pub use matching::{HardCriterion, MatchEngine, MatchResult};
pub use metrics::{compute, MarketMetrics, MarketSpeed, MetricError};
pub use pipeline::{MatchPipeline, PipelineReport, RankedMatch, SkippedRecord};
pub use ranking::{rank, rank_with_metrics};
