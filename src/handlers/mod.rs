pub mod banner;
pub mod order;
pub mod product;
pub mod restaurant;

pub use banner::banner_config;
pub use order::order_config;
pub use product::product_config;
pub use restaurant::restaurant_config;
