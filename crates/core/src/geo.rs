//! WGS84 points and great-circle distance math.
//!
//! All distances are kilometers everywhere in this codebase; callers that
//! speak other units convert at the boundary.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mean Earth radius in kilometers, as used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated WGS84 point.
///
/// Construct via [`GeoPoint::new`]; the constructor is the only place that
/// checks the coordinate ranges, so a `GeoPoint` in hand is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Validate and build a point. Latitude must be in [-90, 90], longitude
    /// in [-180, 180], and both must be finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::Validation(format!(
                "Latitude {latitude} is out of range [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::Validation(format!(
                "Longitude {longitude} is out of range [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Great-circle distance between two points in kilometers (haversine).
///
/// Spherical, not flat-plane, so it stays correct near the poles and across
/// the antimeridian.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Validate a caller-supplied search radius. Must be finite and positive.
pub fn validate_radius_km(radius_km: f64) -> Result<(), CoreError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(CoreError::Validation(format!(
            "Radius {radius_km} km must be a positive number"
        )));
    }
    Ok(())
}
