use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::order::register_order,
        handlers::order::list_orders,
        handlers::order::get_order,
        handlers::order::assign_restaurant,
        handlers::order::update_status,
        handlers::product::list_products,
        handlers::product::availability_matrix,
        handlers::restaurant::list_restaurants,
        handlers::banner::list_banners,
    ),
    components(
        schemas(
            ApiError,
            Banner,
            CategoryResponse,
            ProductResponse,
            RestaurantRef,
            ProductAvailabilityRow,
            AvailabilityMatrix,
            Restaurant,
            RankedRestaurant,
            OrderStatus,
            PaymentMethod,
            CreateOrderRequest,
            OrderItemRequest,
            AssignRestaurantRequest,
            UpdateStatusRequest,
            OrderItemResponse,
            OrderResponse,
            OrderDetailResponse,
        )
    ),
    tags(
        (name = "order", description = "Order ingestion and lifecycle"),
        (name = "product", description = "Product catalogue"),
        (name = "restaurant", description = "Restaurants"),
        (name = "banner", description = "Storefront banners")
    ),
    info(
        title = "Foodcart Backend API",
        description = "Restaurant food-ordering backend",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
