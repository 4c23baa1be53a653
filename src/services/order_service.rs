use crate::error::{AppError, AppResult};
use crate::models::{CreateOrderRequest, Order, OrderItemRow, OrderResponse, OrderStatus};
use crate::utils::validate_phone;
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
}

impl OrderService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate and persist an incoming order with its line items.
    ///
    /// All validation, including the existence of every referenced product,
    /// happens before the first write; the order and its items are then
    /// inserted in one transaction so no partial order can remain.
    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<OrderResponse> {
        validate_request(&request)?;

        // Price snapshot source: every product must exist before we commit.
        let mut prices: HashMap<i64, i64> = HashMap::new();
        for item in &request.products {
            if prices.contains_key(&item.product) {
                continue;
            }
            let price: Option<i64> = sqlx::query_scalar("SELECT price FROM products WHERE id = ?")
                .bind(item.product)
                .fetch_optional(&self.pool)
                .await?;
            let price = price.ok_or(AppError::ProductNotFound(item.product))?;
            prices.insert(item.product, price);
        }

        let mut tx = self.pool.begin().await?;

        let registered_at = Utc::now();
        let payment = request.payment.unwrap_or_default();
        let order_id = sqlx::query(
            r#"
            INSERT INTO orders (first_name, last_name, phone_number, address, comment, status, payment, registered_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.firstname.trim())
        .bind(request.lastname.trim())
        .bind(&request.phonenumber)
        .bind(request.address.trim())
        .bind(request.comment.as_deref().unwrap_or(""))
        .bind(OrderStatus::New)
        .bind(payment)
        .bind(registered_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for item in &request.products {
            let static_price = prices[&item.product] * item.quantity;
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, static_price) VALUES (?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(item.product)
            .bind(item.quantity)
            .bind(static_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        log::info!(
            "Registered order {order_id} with {} line items",
            request.products.len()
        );

        self.get_order(order_id).await
    }

    pub async fn get_order(&self, order_id: i64) -> AppResult<OrderResponse> {
        let order = self
            .find_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {order_id} not found")))?;
        let items = self.order_items(order_id).await?;
        Ok(OrderResponse::from_parts(order, items))
    }

    /// All orders, unfinished first, for the staff dashboard.
    pub async fn list_orders(&self) -> AppResult<Vec<OrderResponse>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, first_name, last_name, phone_number, address, comment,
                   status, payment, restaurant_id, registered_at, called_at, delivered_at
            FROM orders
            ORDER BY status, registered_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut responses = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.order_items(order.id).await?;
            responses.push(OrderResponse::from_parts(order, items));
        }
        Ok(responses)
    }

    /// Assign the restaurant that will prepare the order.
    pub async fn assign_restaurant(&self, order_id: i64, restaurant_id: i64) -> AppResult<OrderResponse> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM restaurants WHERE id = ?")
            .bind(restaurant_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!(
                "Restaurant {restaurant_id} not found"
            )));
        }

        let updated = sqlx::query("UPDATE orders SET restaurant_id = ? WHERE id = ?")
            .bind(restaurant_id)
            .bind(order_id)
            .execute(&self.pool)
            .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Order {order_id} not found")));
        }

        log::info!("Order {order_id} assigned to restaurant {restaurant_id}");
        self.get_order(order_id).await
    }

    /// Advance the order status. Transitions only move forward; leaving New
    /// stamps `called_at` once, reaching Finished stamps `delivered_at` once.
    pub async fn update_status(&self, order_id: i64, new_status: OrderStatus) -> AppResult<OrderResponse> {
        let order = self
            .find_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {order_id} not found")))?;

        if new_status <= order.status {
            return Err(AppError::ValidationError(format!(
                "status can only move forward, order {order_id} is already at {:?}",
                order.status
            )));
        }

        let now = Utc::now();
        let called_at = order.called_at.unwrap_or(now);
        let delivered_at = match (order.delivered_at, new_status) {
            (Some(at), _) => Some(at),
            (None, OrderStatus::Finished) => Some(now),
            (None, _) => None,
        };

        sqlx::query(
            "UPDATE orders SET status = ?, called_at = ?, delivered_at = ? WHERE id = ?",
        )
        .bind(new_status)
        .bind(called_at)
        .bind(delivered_at)
        .bind(order_id)
        .execute(&self.pool)
        .await?;

        self.get_order(order_id).await
    }

    async fn find_order(&self, order_id: i64) -> AppResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, first_name, last_name, phone_number, address, comment,
                   status, payment, restaurant_id, registered_at, called_at, delivered_at
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn order_items(&self, order_id: i64) -> AppResult<Vec<OrderItemRow>> {
        let items = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT oi.product_id, p.name AS product_name, oi.quantity, oi.static_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ?
            ORDER BY oi.id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

fn validate_request(request: &CreateOrderRequest) -> AppResult<()> {
    if request.firstname.trim().is_empty() {
        return Err(AppError::ValidationError(
            "firstname must not be empty".to_string(),
        ));
    }
    if request.lastname.trim().is_empty() {
        return Err(AppError::ValidationError(
            "lastname must not be empty".to_string(),
        ));
    }
    validate_phone(&request.phonenumber)?;
    if request.address.trim().len() < 10 {
        return Err(AppError::ValidationError(
            "address must be at least 10 characters".to_string(),
        ));
    }
    if request.products.is_empty() {
        return Err(AppError::ValidationError(
            "products must not be empty".to_string(),
        ));
    }
    for item in &request.products {
        if !(1..=10).contains(&item.quantity) {
            return Err(AppError::ValidationError(format!(
                "quantity for product {} must be between 1 and 10",
                item.product
            )));
        }
    }
    Ok(())
}
