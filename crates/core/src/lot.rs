//! Parking lot entity, capacity invariants, and derived fields.
//!
//! The hard invariant maintained everywhere is
//! `0 <= available_spots <= total_spots`. Derived values (occupancy
//! percentage, availability) are pure functions over the persisted fields
//! and are never stored.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::geo::GeoPoint;
use crate::types::{LotId, Timestamp, UserId};

/// Maximum length for a lot name.
pub const MAX_NAME_LENGTH: u64 = 100;

/// Maximum length for a lot description.
pub const MAX_DESCRIPTION_LENGTH: u64 = 500;

/// Default currency when the owner does not specify one.
pub const DEFAULT_CURRENCY: &str = "USD";

// ---------------------------------------------------------------------------
// Amenities
// ---------------------------------------------------------------------------

/// Closed set of amenity tags a lot can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Amenity {
    Security,
    Covered,
    ElectricCharging,
    DisabledAccess,
    Valet,
    Shuttle,
    BikeRack,
    MotorcycleSpots,
    TruckSpots,
    #[serde(rename = "24-7-access")]
    AllDayAccess,
}

impl Amenity {
    /// Every amenity, in declaration order.
    pub const ALL: [Amenity; 10] = [
        Amenity::Security,
        Amenity::Covered,
        Amenity::ElectricCharging,
        Amenity::DisabledAccess,
        Amenity::Valet,
        Amenity::Shuttle,
        Amenity::BikeRack,
        Amenity::MotorcycleSpots,
        Amenity::TruckSpots,
        Amenity::AllDayAccess,
    ];

    /// The wire name of this amenity tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Amenity::Security => "security",
            Amenity::Covered => "covered",
            Amenity::ElectricCharging => "electric-charging",
            Amenity::DisabledAccess => "disabled-access",
            Amenity::Valet => "valet",
            Amenity::Shuttle => "shuttle",
            Amenity::BikeRack => "bike-rack",
            Amenity::MotorcycleSpots => "motorcycle-spots",
            Amenity::TruckSpots => "truck-spots",
            Amenity::AllDayAccess => "24-7-access",
        }
    }

    /// Parse a comma-separated amenity list (as used in search query
    /// strings). Unknown tags are a validation error, not a silent skip.
    pub fn parse_list(raw: &str) -> Result<Vec<Amenity>, CoreError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|tag| {
                Amenity::ALL
                    .iter()
                    .copied()
                    .find(|a| a.as_str() == tag)
                    .ok_or_else(|| CoreError::Validation(format!("Unknown amenity tag '{tag}'")))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Entity structs
// ---------------------------------------------------------------------------

/// Street address of a lot. `city` and `state` feed the search filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Address {
    #[validate(length(min = 1))]
    pub street: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "United States".to_string()
}

/// Cached review aggregate. Written only by the rating aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Mean of all review ratings, rounded to one decimal place. 0 when
    /// there are no reviews.
    pub average: f64,
    /// Number of reviews backing the average.
    pub count: u32,
}

impl Default for Rating {
    fn default() -> Self {
        Self {
            average: 0.0,
            count: 0,
        }
    }
}

/// A parking facility with fixed capacity and mutable occupancy.
#[derive(Debug, Clone, Serialize)]
pub struct ParkingLot {
    pub id: LotId,
    pub name: String,
    pub description: Option<String>,
    pub address: Address,
    pub position: GeoPoint,
    pub total_spots: u32,
    pub available_spots: u32,
    pub is_open: bool,
    /// Soft-delete flag. Inactive lots are excluded from all discovery.
    pub is_active: bool,
    pub hourly_rate: f64,
    pub daily_rate: Option<f64>,
    pub currency: String,
    pub amenities: Vec<Amenity>,
    pub rating: Rating,
    /// Stamped on every availability mutation.
    pub last_updated: Timestamp,
    pub created_at: Timestamp,
    pub owner: UserId,
}

impl ParkingLot {
    /// Share of total spots currently occupied, rounded to the nearest
    /// integer percent. Always in [0, 100] while the capacity invariant
    /// holds.
    pub fn occupancy_percentage(&self) -> u8 {
        occupancy_percentage(self.total_spots, self.available_spots)
    }

    /// Whether a driver can park here right now.
    pub fn is_available(&self) -> bool {
        self.available_spots > 0 && self.is_open && self.is_active
    }
}

/// `round((total - available) / total * 100)` as a pure function.
pub fn occupancy_percentage(total_spots: u32, available_spots: u32) -> u8 {
    if total_spots == 0 {
        return 0;
    }
    let occupied = total_spots.saturating_sub(available_spots) as f64;
    (occupied / total_spots as f64 * 100.0).round() as u8
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// The lot shape returned by search and nearby queries.
///
/// Carries the derived fields the map UI needs without exposing owner or
/// audit columns, plus the distance when the query was radius-bound.
#[derive(Debug, Clone, Serialize)]
pub struct LotSummary {
    pub id: LotId,
    pub name: String,
    pub address: Address,
    pub position: GeoPoint,
    pub total_spots: u32,
    pub available_spots: u32,
    pub occupancy_percentage: u8,
    pub is_open: bool,
    pub is_available: bool,
    pub hourly_rate: f64,
    pub daily_rate: Option<f64>,
    pub currency: String,
    pub amenities: Vec<Amenity>,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl From<&ParkingLot> for LotSummary {
    fn from(lot: &ParkingLot) -> Self {
        Self {
            id: lot.id,
            name: lot.name.clone(),
            address: lot.address.clone(),
            position: lot.position,
            total_spots: lot.total_spots,
            available_spots: lot.available_spots,
            occupancy_percentage: lot.occupancy_percentage(),
            is_open: lot.is_open,
            is_available: lot.is_available(),
            hourly_rate: lot.hourly_rate,
            daily_rate: lot.daily_rate,
            currency: lot.currency.clone(),
            amenities: lot.amenities.clone(),
            rating: lot.rating,
            distance_km: None,
        }
    }
}

impl LotSummary {
    /// Attach the great-circle distance for radius-bound results.
    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }
}

/// Stats snapshot for a single lot, as served by the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LotStats {
    pub total_spots: u32,
    pub available_spots: u32,
    pub occupancy_percentage: u8,
    pub hourly_rate: f64,
    pub daily_rate: Option<f64>,
    pub rating: Rating,
    pub reviews_count: u64,
    pub is_open: bool,
    pub is_active: bool,
}

impl LotStats {
    pub fn project(lot: &ParkingLot, reviews_count: u64) -> Self {
        Self {
            total_spots: lot.total_spots,
            available_spots: lot.available_spots,
            occupancy_percentage: lot.occupancy_percentage(),
            hourly_rate: lot.hourly_rate,
            daily_rate: lot.daily_rate,
            rating: lot.rating,
            reviews_count,
            is_open: lot.is_open,
            is_active: lot.is_active,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// Payload for creating a lot. The owner comes from the acting identity,
/// never from the payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLot {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(nested)]
    pub address: Address,
    pub latitude: f64,
    pub longitude: f64,
    #[validate(range(min = 1))]
    pub total_spots: i64,
    #[validate(range(min = 0))]
    pub available_spots: i64,
    #[validate(range(min = 0.0))]
    pub hourly_rate: f64,
    #[validate(range(min = 0.0))]
    pub daily_rate: Option<f64>,
    pub currency: Option<String>,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    pub is_open: Option<bool>,
}

/// Payload for an owner/admin edit of lot metadata. All fields optional;
/// absent fields are left untouched.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLot {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(nested)]
    pub address: Option<Address>,
    #[validate(range(min = 1))]
    pub total_spots: Option<i64>,
    #[validate(range(min = 0.0))]
    pub hourly_rate: Option<f64>,
    #[validate(range(min = 0.0))]
    pub daily_rate: Option<f64>,
    pub currency: Option<String>,
    pub amenities: Option<Vec<Amenity>>,
}

/// Payload for the availability mutation. At the store layer this is the
/// only way `available_spots` and `is_open` change after creation.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAvailability {
    pub available_spots: Option<i64>,
    pub is_open: Option<bool>,
}

/// Check the capacity invariant for a prospective (total, available) pair.
///
/// Out-of-range values are rejected, never clamped.
pub fn validate_capacity(total_spots: i64, available_spots: i64) -> Result<(), CoreError> {
    if available_spots < 0 || available_spots > total_spots {
        return Err(CoreError::Validation(format!(
            "Available spots must be between 0 and total spots ({total_spots}), got {available_spots}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lot(total: u32, available: u32, is_open: bool, is_active: bool) -> ParkingLot {
        ParkingLot {
            id: uuid::Uuid::new_v4(),
            name: "Test Lot".to_string(),
            description: None,
            address: Address {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62701".to_string(),
                country: "United States".to_string(),
            },
            position: GeoPoint::new(0.0, 0.0).expect("valid point"),
            total_spots: total,
            available_spots: available,
            is_open,
            is_active,
            hourly_rate: 2.5,
            daily_rate: None,
            currency: DEFAULT_CURRENCY.to_string(),
            amenities: vec![],
            rating: Rating::default(),
            last_updated: Utc::now(),
            created_at: Utc::now(),
            owner: uuid::Uuid::new_v4(),
        }
    }

    #[test]
    fn occupancy_is_rounded_to_nearest_percent() {
        assert_eq!(occupancy_percentage(100, 100), 0);
        assert_eq!(occupancy_percentage(100, 0), 100);
        assert_eq!(occupancy_percentage(100, 25), 75);
        // 1/3 occupied rounds to 33, 2/3 rounds to 67.
        assert_eq!(occupancy_percentage(3, 2), 33);
        assert_eq!(occupancy_percentage(3, 1), 67);
    }

    #[test]
    fn occupancy_stays_in_bounds() {
        for total in 1..=50u32 {
            for available in 0..=total {
                let pct = occupancy_percentage(total, available);
                assert!(pct <= 100, "total={total} available={available} pct={pct}");
            }
        }
    }

    #[test]
    fn is_available_needs_spots_open_and_active() {
        assert!(lot(10, 5, true, true).is_available());
        assert!(!lot(10, 0, true, true).is_available());
        assert!(!lot(10, 5, false, true).is_available());
        assert!(!lot(10, 5, true, false).is_available());
    }

    #[test]
    fn capacity_validation_rejects_out_of_range() {
        assert!(validate_capacity(10, 0).is_ok());
        assert!(validate_capacity(10, 10).is_ok());
        assert!(validate_capacity(10, 11).is_err());
        assert!(validate_capacity(10, -1).is_err());
    }

    #[test]
    fn amenity_wire_names_round_trip() {
        for amenity in Amenity::ALL {
            let json = serde_json::to_string(&amenity).expect("serialize");
            let back: Amenity = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(back, amenity);
            assert_eq!(json, format!("\"{}\"", amenity.as_str()));
        }
    }

    #[test]
    fn amenity_list_parses_and_rejects_unknown_tags() {
        let parsed = Amenity::parse_list("covered, valet").expect("valid tags");
        assert_eq!(parsed, vec![Amenity::Covered, Amenity::Valet]);
        assert_eq!(
            Amenity::parse_list("24-7-access").expect("valid tag"),
            vec![Amenity::AllDayAccess]
        );
        assert!(Amenity::parse_list("covered,heliport").is_err());
    }

    #[test]
    fn create_lot_payload_validation() {
        let valid = CreateLot {
            name: "Lot".to_string(),
            description: None,
            address: Address {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62701".to_string(),
                country: "United States".to_string(),
            },
            latitude: 10.0,
            longitude: 20.0,
            total_spots: 10,
            available_spots: 5,
            hourly_rate: 3.0,
            daily_rate: None,
            currency: None,
            amenities: vec![],
            is_open: None,
        };
        validator::Validate::validate(&valid).expect("valid payload");

        let mut bad_name = valid.clone();
        bad_name.name = "x".repeat(101);
        assert!(validator::Validate::validate(&bad_name).is_err());

        let mut bad_rate = valid.clone();
        bad_rate.hourly_rate = -1.0;
        assert!(validator::Validate::validate(&bad_rate).is_err());

        let mut bad_total = valid;
        bad_total.total_spots = 0;
        assert!(validator::Validate::validate(&bad_total).is_err());
    }
}
