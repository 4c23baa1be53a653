use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::*;
use crate::services::{OrderService, RestaurantService};

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order registered", body = OrderResponse),
        (status = 400, description = "Validation failed or unknown product")
    )
)]
pub async fn register_order(
    order_service: web::Data<OrderService>,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    match order_service.create_order(request.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "order",
    responses(
        (status = 200, description = "All orders with ranked fulfilling restaurants")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    restaurant_service: web::Data<RestaurantService>,
) -> Result<HttpResponse> {
    let result = async {
        let orders = order_service.list_orders().await?;
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let suitable_restaurants = match order.restaurant_id {
                Some(_) => None,
                None => Some(
                    restaurant_service
                        .rank_for_order(&order.address, &order.product_ids())
                        .await?,
                ),
            };
            details.push(OrderDetailResponse {
                order,
                suitable_restaurants,
            });
        }
        Ok::<_, crate::error::AppError>(details)
    }
    .await;

    match result {
        Ok(details) => Ok(HttpResponse::Ok().json(ApiResponse::success(details))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with ranked fulfilling restaurants"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    restaurant_service: web::Data<RestaurantService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let order_id = path.into_inner();
    let result = async {
        let order = order_service.get_order(order_id).await?;
        let suitable_restaurants = match order.restaurant_id {
            Some(_) => None,
            None => Some(
                restaurant_service
                    .rank_for_order(&order.address, &order.product_ids())
                    .await?,
            ),
        };
        Ok::<_, crate::error::AppError>(OrderDetailResponse {
            order,
            suitable_restaurants,
        })
    }
    .await;

    match result {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/{id}/assign",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    request_body = AssignRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant assigned", body = OrderResponse),
        (status = 404, description = "Order or restaurant not found")
    )
)]
pub async fn assign_restaurant(
    order_service: web::Data<OrderService>,
    path: web::Path<i64>,
    request: web::Json<AssignRestaurantRequest>,
) -> Result<HttpResponse> {
    match order_service
        .assign_restaurant(path.into_inner(), request.restaurant_id)
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/orders/{id}/status",
    tag = "order",
    params(("id" = i64, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Backward transition"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_status(
    order_service: web::Data<OrderService>,
    path: web::Path<i64>,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse> {
    match order_service
        .update_status(path.into_inner(), request.status)
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(ApiResponse::success(order))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(register_order))
            .route("", web::get().to(list_orders))
            .route("/{id}", web::get().to(get_order))
            .route("/{id}/assign", web::post().to(assign_restaurant))
            .route("/{id}/status", web::post().to(update_status)),
    );
}
