use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::RankedRestaurant;

/// Order lifecycle. Transitions only move forward (see
/// `OrderService::update_status`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[repr(i32)]
pub enum OrderStatus {
    New = 0,
    Confirmed = 1,
    Cooking = 2,
    Delivery = 3,
    Finished = 4,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default,
)]
#[repr(i32)]
pub enum PaymentMethod {
    CreditCard = 0,
    #[default]
    Cash = 1,
}

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Order {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    pub comment: String,
    pub status: OrderStatus,
    pub payment: PaymentMethod,
    pub restaurant_id: Option<i64>,
    pub registered_at: DateTime<Utc>,
    pub called_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

/// Line item joined with the product name, for responses.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    /// Price snapshot in cents, frozen at order creation.
    pub static_price: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub payment: Option<PaymentMethod>,
    pub products: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product: i64,
    pub quantity: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignRestaurantRequest {
    pub restaurant_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub product: i64,
    pub name: String,
    pub quantity: i64,
    pub static_price: i64,
}

impl From<OrderItemRow> for OrderItemResponse {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product: row.product_id,
            name: row.product_name,
            quantity: row.quantity,
            static_price: row.static_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub phonenumber: String,
    pub address: String,
    pub comment: String,
    pub status: OrderStatus,
    pub payment: PaymentMethod,
    pub restaurant_id: Option<i64>,
    pub registered_at: DateTime<Utc>,
    /// Sum of line item price snapshots, in cents.
    pub total_price: i64,
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    pub fn from_parts(order: Order, items: Vec<OrderItemRow>) -> Self {
        let total_price = items.iter().map(|i| i.static_price).sum();
        Self {
            id: order.id,
            firstname: order.first_name,
            lastname: order.last_name,
            phonenumber: order.phone_number,
            address: order.address,
            comment: order.comment,
            status: order.status,
            payment: order.payment,
            restaurant_id: order.restaurant_id,
            registered_at: order.registered_at,
            total_price,
            items: items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }

    pub fn product_ids(&self) -> Vec<i64> {
        self.items.iter().map(|i| i.product).collect()
    }
}

/// Staff view of an order: the order plus, while unassigned, the ranked
/// restaurants able to prepare it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailResponse {
    pub order: OrderResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suitable_restaurants: Option<Vec<RankedRestaurant>>,
}
