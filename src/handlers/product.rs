use actix_web::{HttpResponse, ResponseError, Result, web};

use crate::models::ApiResponse;
use crate::services::MenuService;

#[utoipa::path(
    get,
    path = "/products",
    tag = "product",
    responses(
        (status = 200, description = "Products available at one or more restaurants")
    )
)]
pub async fn list_products(menu_service: web::Data<MenuService>) -> Result<HttpResponse> {
    match menu_service.available_products().await {
        Ok(products) => Ok(HttpResponse::Ok().json(ApiResponse::success(products))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/products/availability",
    tag = "product",
    responses(
        (status = 200, description = "Per-product availability across all restaurants")
    )
)]
pub async fn availability_matrix(menu_service: web::Data<MenuService>) -> Result<HttpResponse> {
    match menu_service.availability_matrix().await {
        Ok(matrix) => Ok(HttpResponse::Ok().json(ApiResponse::success(matrix))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn product_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("/availability", web::get().to(availability_matrix)),
    );
}
