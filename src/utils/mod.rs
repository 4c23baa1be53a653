pub mod geo;
pub mod phone;

pub use geo::haversine_km;
pub use phone::{normalize_phone, validate_phone};
