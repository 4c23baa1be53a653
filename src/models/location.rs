use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Geocoding cache entry. Created on the first successful geocode of an
/// address and never updated afterwards.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub id: i64,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub requested_at: DateTime<Utc>,
}

impl Location {
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
