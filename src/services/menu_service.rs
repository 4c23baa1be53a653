use crate::error::AppResult;
use crate::models::{
    AvailabilityMatrix, ProductAvailabilityRow, ProductResponse, ProductRow, RestaurantRef,
};
use sqlx::SqlitePool;
use std::collections::HashSet;

/// Derived view over (restaurant, product, availability): which restaurants
/// sell which products right now.
#[derive(Clone)]
pub struct MenuService {
    pool: SqlitePool,
}

impl MenuService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Restaurants with an available menu item for the product.
    pub async fn restaurants_for(&self, product_id: i64) -> AppResult<HashSet<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT restaurant_id FROM menu_items WHERE product_id = ? AND availability = 1",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    /// Restaurants able to sell every product in `product_ids`: the
    /// intersection of the per-product sets. Empty input yields an empty set,
    /// and the loop stops as soon as the intersection empties.
    pub async fn restaurants_fulfilling(&self, product_ids: &[i64]) -> AppResult<HashSet<i64>> {
        let distinct: HashSet<i64> = product_ids.iter().copied().collect();

        let mut candidates: Option<HashSet<i64>> = None;
        for product_id in distinct {
            let sellers = self.restaurants_for(product_id).await?;
            let narrowed = match candidates {
                None => sellers,
                Some(current) => current.intersection(&sellers).copied().collect(),
            };
            if narrowed.is_empty() {
                return Ok(HashSet::new());
            }
            candidates = Some(narrowed);
        }

        Ok(candidates.unwrap_or_default())
    }

    /// Products carried by at least one restaurant, with category resolved.
    pub async fn available_products(&self) -> AppResult<Vec<ProductResponse>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                p.id, p.name, p.price, p.special_status, p.description, p.image_url,
                c.id AS category_id, c.name AS category_name
            FROM products p
            LEFT JOIN product_categories c ON c.id = p.category_id
            WHERE p.id IN (SELECT product_id FROM menu_items WHERE availability = 1)
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductResponse::from).collect())
    }

    /// Per-product availability across every restaurant, restaurants in name
    /// order. Products with no menu item at a restaurant read as unavailable.
    pub async fn availability_matrix(&self) -> AppResult<AvailabilityMatrix> {
        let restaurants = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM restaurants ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let products = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM products ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let entries = sqlx::query_as::<_, (i64, i64, bool)>(
            "SELECT product_id, restaurant_id, availability FROM menu_items",
        )
        .fetch_all(&self.pool)
        .await?;

        let available: HashSet<(i64, i64)> = entries
            .into_iter()
            .filter(|(_, _, availability)| *availability)
            .map(|(product_id, restaurant_id, _)| (product_id, restaurant_id))
            .collect();

        let product_rows = products
            .into_iter()
            .map(|(product_id, name)| ProductAvailabilityRow {
                id: product_id,
                name,
                availability: restaurants
                    .iter()
                    .map(|(restaurant_id, _)| available.contains(&(product_id, *restaurant_id)))
                    .collect(),
            })
            .collect();

        Ok(AvailabilityMatrix {
            restaurants: restaurants
                .into_iter()
                .map(|(id, name)| RestaurantRef { id, name })
                .collect(),
            products: product_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    async fn seed_product(pool: &SqlitePool, id: i64, name: &str, price: i64) {
        sqlx::query("INSERT INTO products (id, name, price) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(price)
            .execute(pool)
            .await
            .unwrap();
    }

    async fn seed_restaurant(pool: &SqlitePool, id: i64, name: &str, address: &str) {
        sqlx::query("INSERT INTO restaurants (id, name, address) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(address)
            .execute(pool)
            .await
            .unwrap();
    }

    async fn seed_menu_item(pool: &SqlitePool, restaurant_id: i64, product_id: i64, available: bool) {
        sqlx::query(
            "INSERT INTO menu_items (restaurant_id, product_id, availability) VALUES (?, ?, ?)",
        )
        .bind(restaurant_id)
        .bind(product_id)
        .bind(available)
        .execute(pool)
        .await
        .unwrap();
    }

    /// Restaurant A sells {1, 2}, restaurant B sells {1, 3}.
    async fn seed_two_restaurants(pool: &SqlitePool) {
        seed_product(pool, 1, "Burger", 10000).await;
        seed_product(pool, 2, "Fries", 5000).await;
        seed_product(pool, 3, "Cola", 3000).await;
        seed_restaurant(pool, 1, "A", "Moscow, Arbat 1").await;
        seed_restaurant(pool, 2, "B", "Moscow, Tverskaya 7").await;
        seed_menu_item(pool, 1, 1, true).await;
        seed_menu_item(pool, 1, 2, true).await;
        seed_menu_item(pool, 2, 1, true).await;
        seed_menu_item(pool, 2, 3, true).await;
    }

    #[tokio::test]
    async fn test_restaurants_for_ignores_unavailable_items() {
        let pool = test_pool().await;
        seed_two_restaurants(&pool).await;
        // B stops selling product 1.
        sqlx::query("UPDATE menu_items SET availability = 0 WHERE restaurant_id = 2 AND product_id = 1")
            .execute(&pool)
            .await
            .unwrap();

        let service = MenuService::new(pool);
        assert_eq!(service.restaurants_for(1).await.unwrap(), HashSet::from([1]));
    }

    #[tokio::test]
    async fn test_fulfilling_is_the_intersection() {
        let pool = test_pool().await;
        seed_two_restaurants(&pool).await;
        let service = MenuService::new(pool);

        assert_eq!(
            service.restaurants_fulfilling(&[1, 2]).await.unwrap(),
            HashSet::from([1])
        );
        assert_eq!(
            service.restaurants_fulfilling(&[1]).await.unwrap(),
            HashSet::from([1, 2])
        );
        assert_eq!(
            service.restaurants_fulfilling(&[2, 3]).await.unwrap(),
            HashSet::new()
        );
    }

    #[tokio::test]
    async fn test_zero_coverage_product_empties_the_result() {
        let pool = test_pool().await;
        seed_two_restaurants(&pool).await;
        seed_product(&pool, 4, "Soup nobody sells", 7000).await;
        let service = MenuService::new(pool);

        assert_eq!(
            service.restaurants_fulfilling(&[1, 4]).await.unwrap(),
            HashSet::new()
        );
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_set() {
        let pool = test_pool().await;
        seed_two_restaurants(&pool).await;
        let service = MenuService::new(pool);

        assert_eq!(service.restaurants_fulfilling(&[]).await.unwrap(), HashSet::new());
    }

    #[tokio::test]
    async fn test_available_products_requires_a_seller() {
        let pool = test_pool().await;
        seed_two_restaurants(&pool).await;
        seed_product(&pool, 4, "Soup nobody sells", 7000).await;
        let service = MenuService::new(pool);

        let products = service.available_products().await.unwrap();
        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(&4));
    }

    #[tokio::test]
    async fn test_availability_matrix_defaults_to_false() {
        let pool = test_pool().await;
        seed_two_restaurants(&pool).await;
        let service = MenuService::new(pool);

        let matrix = service.availability_matrix().await.unwrap();
        assert_eq!(matrix.restaurants.len(), 2);
        assert_eq!(matrix.products.len(), 3);

        // Restaurants come back in name order: A then B.
        let burger = matrix.products.iter().find(|p| p.name == "Burger").unwrap();
        assert_eq!(burger.availability, vec![true, true]);
        let fries = matrix.products.iter().find(|p| p.name == "Fries").unwrap();
        assert_eq!(fries.availability, vec![true, false]);
        let cola = matrix.products.iter().find(|p| p.name == "Cola").unwrap();
        assert_eq!(cola.availability, vec![false, true]);
    }
}
