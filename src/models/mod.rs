pub mod banner;
pub mod common;
pub mod location;
pub mod order;
pub mod product;
pub mod restaurant;

pub use banner::*;
pub use common::*;
pub use location::*;
pub use order::*;
pub use product::*;
pub use restaurant::*;
