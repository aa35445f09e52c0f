//! Validated coordinates and great-circle math.
//!
//! Distances use the haversine formula on a spherical Earth, which is
//! accurate to well under 1% at city scale. Travel times assume the
//! fleet-wide average riding speed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fleet-wide average riding speed for travel time estimates.
pub const AVERAGE_SPEED_KMH: f64 = 20.0;

/// Validation failures for geographic inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),
    #[error("longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),
    #[error("speed must be positive, got {0} km/h")]
    NonPositiveSpeed(f64),
    #[error("radius must not be negative, got {0} km")]
    NegativeRadius(f64),
}

/// A validated coordinate in decimal degrees.
///
/// Construction is the only way in: a `Location` always holds a
/// latitude in [-90, 90] and a longitude in [-180, 180], including
/// values arriving through deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocation> for Location {
    type Error = GeoError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Location::new(raw.latitude, raw.longitude)
    }
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_distance(from: &Location, to: &Location) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Travel time in minutes between two points at the given speed.
pub fn travel_time(from: &Location, to: &Location, speed_kmh: f64) -> Result<f64, GeoError> {
    if speed_kmh <= 0.0 {
        return Err(GeoError::NonPositiveSpeed(speed_kmh));
    }
    Ok(haversine_distance(from, to) / speed_kmh * 60.0)
}

/// Whether `to` lies within `radius_km` of `from`.
pub fn is_within_radius(from: &Location, to: &Location, radius_km: f64) -> Result<bool, GeoError> {
    if radius_km < 0.0 {
        return Err(GeoError::NegativeRadius(radius_km));
    }
    Ok(haversine_distance(from, to) <= radius_km)
}

/// Minutes needed to cover a distance at the fleet average speed.
pub(crate) fn minutes_at_average_speed(distance_km: f64) -> f64 {
    distance_km / AVERAGE_SPEED_KMH * 60.0
}
