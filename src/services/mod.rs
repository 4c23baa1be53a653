pub mod location_service;
pub mod menu_service;
pub mod order_service;
pub mod restaurant_service;

pub use location_service::*;
pub use menu_service::*;
pub use order_service::*;
pub use restaurant_service::*;
