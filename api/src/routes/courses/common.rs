use axum::http::StatusCode;
use db::geo::Geofence;
use serde::Deserialize;

use crate::response::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateCourseReq {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub schedule: Option<String>,
}

/// Absent fields are left alone; an empty `description` or `schedule`
/// clears it.
#[derive(Debug, Deserialize)]
pub struct EditCourseReq {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollReq {
    pub enrollment_code: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionReq {
    pub name: String,
    #[serde(default)]
    pub topic: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_distance_meters: Option<f64>,
    #[serde(default)]
    pub use_dynamic_qr: bool,
}

impl CreateSessionReq {
    /// All three location fields, or none of them.
    pub fn geofence(&self) -> Result<Geofence, ApiError> {
        match (self.latitude, self.longitude, self.max_distance_meters) {
            (None, None, None) => Ok(Geofence::None),
            (Some(lat), Some(lon), Some(radius)) => Ok(Geofence::circle(lat, lon, radius)),
            _ => Err(ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "latitude, longitude and max_distance_meters must be given together",
            )),
        }
    }
}
