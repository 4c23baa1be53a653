use actix_web::{HttpResponse, Result, web};

use crate::models::{ApiResponse, Banner};

#[utoipa::path(
    get,
    path = "/banners",
    tag = "banner",
    responses(
        (status = 200, description = "Storefront banners")
    )
)]
pub async fn list_banners() -> Result<HttpResponse> {
    // TODO move banner data to the database once staff need to edit it.
    let banners = vec![
        Banner {
            title: "Burger".to_string(),
            src: "/media/burger.jpg".to_string(),
            text: "Tasty Burger at your door step".to_string(),
        },
        Banner {
            title: "Spices".to_string(),
            src: "/media/food.jpg".to_string(),
            text: "All Cuisines".to_string(),
        },
        Banner {
            title: "New York".to_string(),
            src: "/media/tasty.jpg".to_string(),
            text: "Food is incomplete without a tasty dessert".to_string(),
        },
    ];

    Ok(HttpResponse::Ok().json(ApiResponse::success(banners)))
}

pub fn banner_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/banners").route("", web::get().to(list_banners)));
}
