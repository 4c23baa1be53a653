use crate::error::AppResult;
use crate::models::{RankedRestaurant, Restaurant};
use crate::services::{LocationService, MenuService};
use sqlx::SqlitePool;
use std::cmp::Ordering;

/// Matches orders to the restaurants able to prepare them, ranked by
/// delivery distance. Rankings are recomputed from scratch on every call;
/// menus and orders change between calls.
#[derive(Clone)]
pub struct RestaurantService {
    pool: SqlitePool,
    menu: MenuService,
    locations: LocationService,
}

impl RestaurantService {
    pub fn new(pool: SqlitePool, menu: MenuService, locations: LocationService) -> Self {
        Self {
            pool,
            menu,
            locations,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Restaurant>> {
        let restaurants = sqlx::query_as::<_, Restaurant>(
            "SELECT id, name, address, contact_phone FROM restaurants ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(restaurants)
    }

    /// Restaurants whose menu covers every product in `product_ids`, sorted
    /// ascending by distance to `delivery_address`, ties broken by id.
    ///
    /// An empty result is a valid business outcome (no restaurant can fulfill
    /// the order). A restaurant whose address cannot be resolved is excluded
    /// from the ranking rather than failing it.
    pub async fn rank_for_order(
        &self,
        delivery_address: &str,
        product_ids: &[i64],
    ) -> AppResult<Vec<RankedRestaurant>> {
        let candidates = self.menu.restaurants_fulfilling(product_ids).await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut ranked = Vec::with_capacity(candidates.len());
        for restaurant in self.list().await? {
            if !candidates.contains(&restaurant.id) {
                continue;
            }
            match self
                .locations
                .distance_km(delivery_address, &restaurant.address)
                .await
            {
                Ok(distance) => ranked.push(RankedRestaurant {
                    id: restaurant.id,
                    name: restaurant.name,
                    address: restaurant.address,
                    distance_km: (distance * 100.0).round() / 100.0,
                }),
                Err(e) => {
                    log::warn!(
                        "Excluding restaurant {} ({}) from ranking: {e}",
                        restaurant.name,
                        restaurant.address
                    );
                }
            }
        }

        ranked.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(ranked)
    }
}
