use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Product row joined with its optional category.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    /// Price in cents.
    pub price: i64,
    pub special_status: bool,
    pub description: String,
    pub image_url: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub special_status: bool,
    pub description: String,
    pub category: Option<CategoryResponse>,
    pub image: String,
}

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(CategoryResponse { id, name }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            special_status: row.special_status,
            description: row.description,
            category,
            image: row.image_url,
        }
    }
}

/// One restaurant column of the availability matrix.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductAvailabilityRow {
    pub id: i64,
    pub name: String,
    /// Availability flags aligned with the `restaurants` column order.
    pub availability: Vec<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityMatrix {
    pub restaurants: Vec<RestaurantRef>,
    pub products: Vec<ProductAvailabilityRow>,
}
