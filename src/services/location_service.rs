use crate::error::{AppError, AppResult};
use crate::external::Geocoder;
use crate::models::Location;
use crate::utils::haversine_km;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Persisted geocoding cache in front of the external geocoder.
///
/// Lookups are by exact address string. A miss calls the provider and stores
/// the result; concurrent misses for the same address may both reach the
/// provider, in which case the unique constraint on `locations.address`
/// decides the winner and the loser re-reads the stored row.
#[derive(Clone)]
pub struct LocationService {
    pool: SqlitePool,
    geocoder: Arc<dyn Geocoder>,
}

impl LocationService {
    pub fn new(pool: SqlitePool, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { pool, geocoder }
    }

    pub async fn resolve(&self, address: &str) -> AppResult<Location> {
        if let Some(location) = self.find_cached(address).await? {
            return Ok(location);
        }

        let (latitude, longitude) = self
            .geocoder
            .fetch_coordinates(address)
            .await?
            .ok_or_else(|| AppError::AddressNotFound(address.to_string()))?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::GeocodingError(format!(
                "coordinates out of range for {address:?}: ({latitude}, {longitude})"
            )));
        }

        let insert = sqlx::query(
            "INSERT INTO locations (address, latitude, longitude, requested_at) VALUES (?, ?, ?, ?)",
        )
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match insert {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                // Lost the race to a concurrent resolve of the same address;
                // the stored row is authoritative.
                log::debug!("Concurrent geocode of {address:?}, reusing stored location");
            }
            Err(e) => return Err(e.into()),
        }

        self.find_cached(address).await?.ok_or_else(|| {
            AppError::InternalError(format!("location for {address:?} vanished after insert"))
        })
    }

    /// Great-circle distance in kilometers between two addresses, both
    /// resolved through the cache.
    pub async fn distance_km(&self, address_a: &str, address_b: &str) -> AppResult<f64> {
        let from = self.resolve(address_a).await?;
        let to = self.resolve(address_b).await?;
        Ok(haversine_km(from.coordinates(), to.coordinates()))
    }

    async fn find_cached(&self, address: &str) -> AppResult<Option<Location>> {
        let location = sqlx::query_as::<_, Location>(
            "SELECT id, address, latitude, longitude, requested_at FROM locations WHERE address = ?",
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::run_migrations;
    use async_trait::async_trait;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted geocoder: fixed answer per call, counts provider hits.
    struct MockGeocoder {
        result: Option<(f64, f64)>,
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl MockGeocoder {
        fn returning(lat: f64, lon: f64) -> Self {
            Self {
                result: Some((lat, lon)),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn not_found() -> Self {
            Self {
                result: None,
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Geocoder for MockGeocoder {
        async fn fetch_coordinates(&self, _address: &str) -> AppResult<Option<(f64, f64)>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.result)
        }
    }

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_second_resolve_is_a_cache_hit() {
        let pool = test_pool().await;
        let geocoder = Arc::new(MockGeocoder::returning(55.7558, 37.6173));
        let service = LocationService::new(pool, geocoder.clone());

        let first = service.resolve("Moscow, Red Square 1").await.unwrap();
        let second = service.resolve("Moscow, Red Square 1").await.unwrap();

        assert_eq!(first.latitude, second.latitude);
        assert_eq!(first.longitude, second.longitude);
        assert_eq!(geocoder.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_address_is_address_not_found() {
        let pool = test_pool().await;
        let service = LocationService::new(pool.clone(), Arc::new(MockGeocoder::not_found()));

        let err = service.resolve("Nowhere street 123").await.unwrap_err();
        assert!(matches!(err, AppError::AddressNotFound(_)));

        // A failed resolve must not leave a cache row behind.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_out_of_range_coordinates_rejected() {
        let pool = test_pool().await;
        let service = LocationService::new(pool, Arc::new(MockGeocoder::returning(91.0, 0.0)));

        let err = service.resolve("Broken provider town").await.unwrap_err();
        assert!(matches!(err, AppError::GeocodingError(_)));
    }

    #[tokio::test]
    async fn test_concurrent_misses_leave_one_row() {
        let pool = test_pool().await;
        let geocoder = Arc::new(MockGeocoder {
            result: Some((59.9343, 30.3351)),
            calls: AtomicUsize::new(0),
            // Keep both tasks in flight past each other's cache lookup.
            delay: Some(Duration::from_millis(20)),
        });
        let service = LocationService::new(pool.clone(), geocoder);

        let a = service.clone();
        let b = service.clone();
        let (first, second) = tokio::join!(
            a.resolve("SPb, Nevsky prospect 28"),
            b.resolve("SPb, Nevsky prospect 28"),
        );

        let first = first.unwrap();
        let second = second.unwrap();
        assert_eq!(first.latitude, second.latitude);
        assert_eq!(first.longitude, second.longitude);

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM locations WHERE address = ?")
                .bind("SPb, Nevsky prospect 28")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_distance_between_cached_addresses() {
        let pool = test_pool().await;
        // Pre-seed the cache so the geocoder is never consulted.
        for (address, lat, lon) in [
            ("Moscow, Red Square 1", 55.7558, 37.6173),
            ("SPb, Nevsky prospect 28", 59.9343, 30.3351),
        ] {
            sqlx::query(
                "INSERT INTO locations (address, latitude, longitude, requested_at) VALUES (?, ?, ?, ?)",
            )
            .bind(address)
            .bind(lat)
            .bind(lon)
            .bind(Utc::now())
            .execute(&pool)
            .await
            .unwrap();
        }

        let geocoder = Arc::new(MockGeocoder::not_found());
        let service = LocationService::new(pool, geocoder.clone());

        let d = service
            .distance_km("Moscow, Red Square 1", "SPb, Nevsky prospect 28")
            .await
            .unwrap();
        assert!((d - 634.0).abs() < 5.0, "unexpected distance: {d}");
        assert_eq!(geocoder.call_count(), 0);
    }
}
