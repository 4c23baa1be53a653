use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::ApiResponse;
use crate::services::RestaurantService;

#[utoipa::path(
    get,
    path = "/restaurants",
    tag = "restaurant",
    responses(
        (status = 200, description = "All restaurants")
    )
)]
pub async fn list_restaurants(
    restaurant_service: web::Data<RestaurantService>,
) -> Result<HttpResponse> {
    match restaurant_service.list().await {
        Ok(restaurants) => Ok(HttpResponse::Ok().json(ApiResponse::success(restaurants))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn restaurant_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/restaurants").route("", web::get().to(list_restaurants)));
}
