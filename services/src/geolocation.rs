//! One-shot "where is the caller right now" contract.
//!
//! Acquisition may suspend for as long as the provider likes; callers go
//! through [`acquire`], which bounds it with a timeout and folds a timeout
//! into [`LocationError::Unavailable`].

use async_trait::async_trait;
use db::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of uncertainty in meters, when the device reports one.
    pub accuracy_meters: Option<f64>,
}

impl Position {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    Denied,
    #[error("location unavailable")]
    Unavailable,
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Position, LocationError>;
}

/// Asks `provider` for a position, giving up after `timeout`.
///
/// Out-of-range or non-finite coordinates count as unavailable.
pub async fn acquire(
    provider: &dyn GeolocationProvider,
    timeout: Duration,
) -> Result<Position, LocationError> {
    let position = match tokio::time::timeout(timeout, provider.current_position()).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::debug!(timeout_ms = timeout.as_millis() as u64, "geolocation timed out");
            return Err(LocationError::Unavailable);
        }
    };

    if !position.coordinates().is_valid() {
        return Err(LocationError::Unavailable);
    }
    Ok(position)
}

/// The outcome of a position request the client already made, as sent over
/// the wire: `{"status":"ok","latitude":..,"longitude":..,"accuracy":..}`,
/// `{"status":"denied"}` or `{"status":"unavailable"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ReportedLocation {
    Ok {
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        accuracy: Option<f64>,
    },
    Denied,
    Unavailable,
}

#[async_trait]
impl GeolocationProvider for ReportedLocation {
    async fn current_position(&self) -> Result<Position, LocationError> {
        match *self {
            Self::Ok {
                latitude,
                longitude,
                accuracy,
            } => Ok(Position {
                latitude,
                longitude,
                accuracy_meters: accuracy,
            }),
            Self::Denied => Err(LocationError::Denied),
            Self::Unavailable => Err(LocationError::Unavailable),
        }
    }
}
