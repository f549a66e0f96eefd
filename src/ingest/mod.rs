//! Listing normalization: loosely-typed provider records in, validated
//! `Listing` entities out.
//!
//! The normalizer is a pure function of the record, the caller-supplied
//! [`SchemaMapping`], and an explicit as-of date. It never guesses: a missing
//! or malformed field fails with the canonical field name and the offending
//! value so the caller can fix the mapping table or drop the record.

pub mod mapping;
pub mod parser;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use crate::domain::{Listing, ListingId, ValidationError};

pub use mapping::{CanonicalField, Conversion, FieldRule, SchemaMapping};
pub use parser::{records_from_csv, records_from_json};

/// A raw provider record: source field names to heterogeneous values.
pub type SourceRecord = BTreeMap<String, Value>;

/// Failures raised while normalizing one source record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizationError {
    #[error("schema '{schema}' has no mapping rule for canonical field '{field}'")]
    MissingRule {
        schema: String,
        field: &'static str,
    },
    #[error("source field '{source_field}' for '{field}' is absent from the record")]
    MissingField {
        field: &'static str,
        source_field: String,
    },
    #[error("field '{field}' has invalid value {value}: expected {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("field '{field}' value '{value}' is not in the {vocabulary} vocabulary of schema '{schema}'")]
    UnknownToken {
        field: &'static str,
        value: String,
        vocabulary: &'static str,
        schema: String,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Normalize one source record into a validated [`Listing`].
///
/// `as_of` anchors date-based conversions such as deriving days-on-market
/// from a listed-on date; passing it explicitly keeps the function pure.
pub fn normalize(
    record: &SourceRecord,
    mapping: &SchemaMapping,
    as_of: NaiveDate,
) -> Result<Listing, NormalizationError> {
    let id = ListingId(required_string(record, mapping, CanonicalField::Id)?);
    let address = required_string(record, mapping, CanonicalField::Address)?;
    let postal_code = required_string(record, mapping, CanonicalField::PostalCode)?;

    let price = count_field(record, mapping, CanonicalField::Price, as_of)?;
    let bedrooms = count_u32(record, mapping, CanonicalField::Bedrooms, as_of)?;
    let area = count_u32(record, mapping, CanonicalField::Area, as_of)?;
    let days_on_market = count_u32(record, mapping, CanonicalField::DaysOnMarket, as_of)?;

    let bathrooms = bathrooms_field(record, mapping)?;
    let lot_size = optional_quantity(record, mapping, CanonicalField::LotSize)?.unwrap_or(0.0);
    let year_built = match optional_quantity(record, mapping, CanonicalField::YearBuilt)? {
        Some(year) if year >= 1.0 => Some(year as u32),
        Some(year) => {
            return Err(NormalizationError::InvalidValue {
                field: CanonicalField::YearBuilt.name(),
                value: year.to_string(),
                expected: "positive year",
            })
        }
        None => None,
    };

    let status_token = required_string(record, mapping, CanonicalField::Status)?;
    let status = mapping
        .status_for(&status_token)
        .ok_or_else(|| NormalizationError::UnknownToken {
            field: CanonicalField::Status.name(),
            value: status_token,
            vocabulary: "status",
            schema: mapping.schema_id().to_string(),
        })?;

    let type_token = required_string(record, mapping, CanonicalField::PropertyType)?;
    let property_type =
        mapping
            .type_for(&type_token)
            .ok_or_else(|| NormalizationError::UnknownToken {
                field: CanonicalField::PropertyType.name(),
                value: type_token,
                vocabulary: "property-type",
                schema: mapping.schema_id().to_string(),
            })?;

    let listing = Listing {
        id,
        address,
        price,
        bedrooms,
        bathrooms,
        area,
        lot_size,
        year_built,
        property_type,
        status,
        days_on_market,
        postal_code,
    };
    listing.validate()?;
    Ok(listing)
}

fn rule<'a>(
    mapping: &'a SchemaMapping,
    field: CanonicalField,
) -> Result<&'a FieldRule, NormalizationError> {
    mapping.rule(field).ok_or_else(|| NormalizationError::MissingRule {
        schema: mapping.schema_id().to_string(),
        field: field.name(),
    })
}

fn fetch<'a>(
    record: &'a SourceRecord,
    source_field: &str,
    field: CanonicalField,
) -> Result<&'a Value, NormalizationError> {
    record
        .get(source_field)
        .ok_or_else(|| NormalizationError::MissingField {
            field: field.name(),
            source_field: source_field.to_string(),
        })
}

fn required_string(
    record: &SourceRecord,
    mapping: &SchemaMapping,
    field: CanonicalField,
) -> Result<String, NormalizationError> {
    let rule = rule(mapping, field)?;
    let value = fetch(record, &rule.source_field, field)?;
    as_string(value, field)
}

fn as_string(value: &Value, field: CanonicalField) -> Result<String, NormalizationError> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(NormalizationError::InvalidValue {
            field: field.name(),
            value: other.to_string(),
            expected: "non-empty string",
        }),
    }
}

fn as_number(value: &Value, field: CanonicalField) -> Result<f64, NormalizationError> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(number) if number.is_finite() => Ok(number),
        _ => Err(NormalizationError::InvalidValue {
            field: field.name(),
            value: value.to_string(),
            expected: "finite number",
        }),
    }
}

/// Resolve a non-negative integer field, honoring the mapping's conversion.
fn count_field(
    record: &SourceRecord,
    mapping: &SchemaMapping,
    field: CanonicalField,
    as_of: NaiveDate,
) -> Result<u64, NormalizationError> {
    let rule = rule(mapping, field)?;
    let value = fetch(record, &rule.source_field, field)?;

    let (number, scaled) = match &rule.conversion {
        Conversion::Direct => (as_number(value, field)?, false),
        Conversion::Scale(factor) => (as_number(value, field)? * factor, true),
        Conversion::DaysSinceDate => {
            let text = as_string(value, field)?;
            let listed_on = parse_date(&text).ok_or_else(|| NormalizationError::InvalidValue {
                field: field.name(),
                value: text.clone(),
                expected: "RFC 3339 or YYYY-MM-DD date",
            })?;
            let days = (as_of - listed_on).num_days();
            if days < 0 {
                return Err(NormalizationError::InvalidValue {
                    field: field.name(),
                    value: text,
                    expected: "listed-on date at or before the as-of date",
                });
            }
            (days as f64, true)
        }
        Conversion::CombineHalfBaths { .. } => {
            return Err(NormalizationError::InvalidValue {
                field: field.name(),
                value: value.to_string(),
                expected: "a conversion applicable to an integer field",
            })
        }
    };

    if number < 0.0 {
        return Err(NormalizationError::InvalidValue {
            field: field.name(),
            value: value.to_string(),
            expected: "non-negative number",
        });
    }

    if scaled {
        return Ok(number.round() as u64);
    }

    if number.fract().abs() > 1e-6 {
        return Err(NormalizationError::InvalidValue {
            field: field.name(),
            value: value.to_string(),
            expected: "integer",
        });
    }

    Ok(number as u64)
}

/// As [`count_field`], for fields narrower than the price column.
fn count_u32(
    record: &SourceRecord,
    mapping: &SchemaMapping,
    field: CanonicalField,
    as_of: NaiveDate,
) -> Result<u32, NormalizationError> {
    let count = count_field(record, mapping, field, as_of)?;
    u32::try_from(count).map_err(|_| NormalizationError::InvalidValue {
        field: field.name(),
        value: count.to_string(),
        expected: "value within 32-bit range",
    })
}

fn bathrooms_field(
    record: &SourceRecord,
    mapping: &SchemaMapping,
) -> Result<f64, NormalizationError> {
    let field = CanonicalField::Bathrooms;
    let rule = rule(mapping, field)?;
    let value = fetch(record, &rule.source_field, field)?;

    match &rule.conversion {
        Conversion::CombineHalfBaths { half_field } => {
            let full = as_number(value, field)?;
            let half = as_number(fetch(record, half_field, field)?, field)?;
            Ok(full + 0.5 * half)
        }
        Conversion::Scale(factor) => Ok(as_number(value, field)? * factor),
        _ => as_number(value, field),
    }
}

/// Resolve an optionally-mapped quantity; unmapped or null sources yield `None`.
fn optional_quantity(
    record: &SourceRecord,
    mapping: &SchemaMapping,
    field: CanonicalField,
) -> Result<Option<f64>, NormalizationError> {
    let Some(rule) = mapping.rule(field) else {
        return Ok(None);
    };

    match record.get(&rule.source_field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(value) => {
            let number = as_number(value, field)?;
            let number = match rule.conversion {
                Conversion::Scale(factor) => number * factor,
                _ => number,
            };
            if number < 0.0 {
                return Err(NormalizationError::InvalidValue {
                    field: field.name(),
                    value: value.to_string(),
                    expected: "non-negative number",
                });
            }
            Ok(Some(number))
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
