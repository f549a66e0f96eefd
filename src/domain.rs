use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for normalized listings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Canonical property categories every source vocabulary maps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    SingleFamily,
    Condo,
    Townhouse,
    MultiFamily,
    Land,
    Other,
}

impl PropertyType {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "single_family",
            PropertyType::Condo => "condo",
            PropertyType::Townhouse => "townhouse",
            PropertyType::MultiFamily => "multi_family",
            PropertyType::Land => "land",
            PropertyType::Other => "other",
        }
    }
}

/// Canonical market statuses every source vocabulary maps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
    Active,
    Pending,
    Sold,
    OffMarket,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Pending => "pending",
            ListingStatus::Sold => "sold",
            ListingStatus::OffMarket => "off_market",
        }
    }
}

/// A normalized real-estate record produced by the ingest normalizer.
///
/// The core never mutates a constructed listing; derived analytics are
/// attached as separate computed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub address: String,
    /// Price in whole currency units.
    pub price: u64,
    pub bedrooms: u32,
    /// Half-baths allowed, so 2.5 is a valid count.
    pub bathrooms: f64,
    /// Living area in square units. Must be positive.
    pub area: u32,
    /// Lot size in acres.
    pub lot_size: f64,
    pub year_built: Option<u32>,
    pub property_type: PropertyType,
    pub status: ListingStatus,
    pub days_on_market: u32,
    pub postal_code: String,
}

impl Listing {
    /// Check the listing invariants, failing fast instead of clamping.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.area == 0 {
            return Err(ValidationError::NonPositiveArea {
                id: self.id.0.clone(),
            });
        }

        if !self.bathrooms.is_finite() || self.bathrooms < 0.0 {
            return Err(ValidationError::InvalidQuantity {
                entity: "listing",
                field: "bathrooms",
                found: self.bathrooms,
            });
        }

        if !self.lot_size.is_finite() || self.lot_size < 0.0 {
            return Err(ValidationError::InvalidQuantity {
                entity: "listing",
                field: "lot_size",
                found: self.lot_size,
            });
        }

        if self.year_built == Some(0) {
            return Err(ValidationError::InvalidQuantity {
                entity: "listing",
                field: "year_built",
                found: 0.0,
            });
        }

        Ok(())
    }
}

/// A buyer's matching criteria. Read-only input to the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub name: String,
    pub min_bedrooms: u32,
    pub min_bathrooms: f64,
    pub min_area: Option<u32>,
    pub max_area: Option<u32>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    /// Empty set means no postal-code restriction.
    pub postal_codes: BTreeSet<String>,
    /// Empty list means no landmark preference.
    pub preferred_landmarks: Vec<String>,
}

impl UserPreferences {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.min_bathrooms.is_finite() || self.min_bathrooms < 0.0 {
            return Err(ValidationError::InvalidQuantity {
                entity: "preferences",
                field: "min_bathrooms",
                found: self.min_bathrooms,
            });
        }

        if let (Some(min), Some(max)) = (self.min_area, self.max_area) {
            if min > max {
                return Err(ValidationError::InvertedRange {
                    field: "area",
                    min: min as u64,
                    max: max as u64,
                });
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(ValidationError::InvertedRange {
                    field: "price",
                    min,
                    max,
                });
            }
        }

        Ok(())
    }
}

/// Invariant violations raised when constructing core entities.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("listing '{id}': area must be positive")]
    NonPositiveArea { id: String },
    #[error("{entity} field '{field}' must be finite and non-negative, found {found}")]
    InvalidQuantity {
        entity: &'static str,
        field: &'static str,
        found: f64,
    },
    #[error("{field} range is inverted: min {min} exceeds max {max}")]
    InvertedRange {
        field: &'static str,
        min: u64,
        max: u64,
    },
}
