use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ListingStatus, PropertyType};

/// Canonical listing fields a source schema must map into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    Id,
    Address,
    Price,
    Bedrooms,
    Bathrooms,
    Area,
    LotSize,
    YearBuilt,
    PropertyType,
    Status,
    DaysOnMarket,
    PostalCode,
}

impl CanonicalField {
    pub const fn name(self) -> &'static str {
        match self {
            CanonicalField::Id => "id",
            CanonicalField::Address => "address",
            CanonicalField::Price => "price",
            CanonicalField::Bedrooms => "bedrooms",
            CanonicalField::Bathrooms => "bathrooms",
            CanonicalField::Area => "area",
            CanonicalField::LotSize => "lot_size",
            CanonicalField::YearBuilt => "year_built",
            CanonicalField::PropertyType => "property_type",
            CanonicalField::Status => "status",
            CanonicalField::DaysOnMarket => "days_on_market",
            CanonicalField::PostalCode => "postal_code",
        }
    }
}

/// Unit reconciliation applied to a mapped source value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Conversion {
    /// Take the source value as-is.
    Direct,
    /// Multiply a numeric source value by a fixed factor (e.g. m² to sqft).
    Scale(f64),
    /// Bathrooms split across full and half counts; halves weigh 0.5.
    CombineHalfBaths { half_field: String },
    /// The source carries a listed-on date; days-on-market is derived
    /// against the caller-supplied as-of date.
    DaysSinceDate,
}

/// How one canonical field is sourced from a provider record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    pub source_field: String,
    pub conversion: Conversion,
}

/// Caller-supplied translation table for one provider schema.
///
/// The normalizer holds no provider knowledge of its own; field routing,
/// unit conversions, and the status/property-type vocabularies all live
/// here and are policy owned by the ingestion collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaMapping {
    schema_id: String,
    fields: BTreeMap<CanonicalField, FieldRule>,
    status_vocabulary: BTreeMap<String, ListingStatus>,
    type_vocabulary: BTreeMap<String, PropertyType>,
}

impl SchemaMapping {
    pub fn new(schema_id: impl Into<String>) -> Self {
        Self {
            schema_id: schema_id.into(),
            fields: BTreeMap::new(),
            status_vocabulary: BTreeMap::new(),
            type_vocabulary: BTreeMap::new(),
        }
    }

    /// Route a canonical field to a source field with no conversion.
    pub fn field(self, field: CanonicalField, source_field: &str) -> Self {
        self.field_with(field, source_field, Conversion::Direct)
    }

    pub fn field_with(
        mut self,
        field: CanonicalField,
        source_field: &str,
        conversion: Conversion,
    ) -> Self {
        self.fields.insert(
            field,
            FieldRule {
                source_field: source_field.to_string(),
                conversion,
            },
        );
        self
    }

    /// Register a source status token for a canonical status.
    pub fn status(mut self, token: &str, status: ListingStatus) -> Self {
        self.status_vocabulary.insert(normalize_token(token), status);
        self
    }

    /// Register a source property-type token for a canonical type.
    pub fn property_type(mut self, token: &str, property_type: PropertyType) -> Self {
        self.type_vocabulary
            .insert(normalize_token(token), property_type);
        self
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    pub(crate) fn rule(&self, field: CanonicalField) -> Option<&FieldRule> {
        self.fields.get(&field)
    }

    pub(crate) fn status_for(&self, raw: &str) -> Option<ListingStatus> {
        self.status_vocabulary.get(&normalize_token(raw)).copied()
    }

    pub(crate) fn type_for(&self, raw: &str) -> Option<PropertyType> {
        self.type_vocabulary.get(&normalize_token(raw)).copied()
    }
}

/// Collapse a vocabulary token so provider spelling variants land on one key:
/// strips BOM/zero-width characters, folds `_`/`-` into spaces, collapses
/// whitespace, and lowercases.
pub(crate) fn normalize_token(value: &str) -> String {
    let cleaned = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .replace(['_', '-'], " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_normalization_folds_case_separators_and_width() {
        assert_eq!(normalize_token("FOR_SALE"), "for sale");
        assert_eq!(normalize_token("\u{feff}Single  Family"), "single family");
        assert_eq!(normalize_token("off-market"), "off market");
    }

    #[test]
    fn vocabulary_lookups_accept_spelling_variants() {
        let mapping = SchemaMapping::new("provider-x")
            .status("FOR_SALE", ListingStatus::Active)
            .property_type("SINGLE_FAMILY", PropertyType::SingleFamily);

        assert_eq!(mapping.status_for("for sale"), Some(ListingStatus::Active));
        assert_eq!(mapping.status_for("For-Sale"), Some(ListingStatus::Active));
        assert_eq!(
            mapping.type_for("single family"),
            Some(PropertyType::SingleFamily)
        );
        assert_eq!(mapping.status_for("SOLD"), None);
    }

    #[test]
    fn later_field_rules_replace_earlier_ones() {
        let mapping = SchemaMapping::new("provider-x")
            .field(CanonicalField::Price, "price")
            .field_with(CanonicalField::Price, "list_price", Conversion::Direct);
        let rule = mapping.rule(CanonicalField::Price).expect("rule present");
        assert_eq!(rule.source_field, "list_price");
    }
}
