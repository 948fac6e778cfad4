//! Great-circle distance and geofence types.
//!
//! Distances use the haversine formula on a spherical Earth of mean radius
//! [`EARTH_RADIUS_METERS`]. The intermediate term is clamped to `[0, 1]` so
//! antipodal and coincident points never feed `asin` an out-of-range value.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Finite and within `[-90, 90]` x `[-180, 180]`.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine_meters(*self, *other)
    }
}

/// Great-circle distance between `a` and `b`, in meters.
pub fn haversine_meters(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Where a session accepts check-ins from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geofence {
    /// No location requirement.
    #[default]
    None,
    /// Check-ins must come from within `radius_meters` of `center` (inclusive).
    Circle {
        center: Coordinates,
        radius_meters: f64,
    },
}

impl Geofence {
    pub fn circle(latitude: f64, longitude: f64, radius_meters: f64) -> Self {
        Geofence::Circle {
            center: Coordinates::new(latitude, longitude),
            radius_meters,
        }
    }

    /// Rebuilds a geofence from its nullable storage columns. Anything short
    /// of a complete, positive-radius circle reads as [`Geofence::None`].
    pub fn from_columns(
        latitude: Option<f64>,
        longitude: Option<f64>,
        max_distance_meters: Option<f64>,
    ) -> Self {
        match (latitude, longitude, max_distance_meters) {
            (Some(lat), Some(lon), Some(radius)) if radius > 0.0 => {
                Geofence::circle(lat, lon, radius)
            }
            _ => Geofence::None,
        }
    }

    /// `(latitude, longitude, max_distance_meters)` for storage.
    pub fn to_columns(&self) -> (Option<f64>, Option<f64>, Option<f64>) {
        match self {
            Geofence::None => (None, None, None),
            Geofence::Circle {
                center,
                radius_meters,
            } => (
                Some(center.latitude),
                Some(center.longitude),
                Some(*radius_meters),
            ),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Geofence::None => true,
            Geofence::Circle {
                center,
                radius_meters,
            } => center.is_valid() && radius_meters.is_finite() && *radius_meters > 0.0,
        }
    }
}
