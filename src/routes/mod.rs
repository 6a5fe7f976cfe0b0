//! Route tables: common service routes and the `/api` product routes.

mod common;
mod product;

pub use common::{common_routes, common_routes_with_ready};
pub use product::product_routes;
