use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    /// Free-text address, also the geocoding cache key.
    pub address: String,
    pub contact_phone: String,
}

/// A restaurant able to prepare an entire order, with its distance to the
/// delivery address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RankedRestaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub distance_km: f64,
}
