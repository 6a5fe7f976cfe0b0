//! ProductService: validation, slugging, and store calls behind the HTTP handlers.

mod products;
pub mod validation;
pub use products::ProductService;
pub use validation::{ProductInput, ProductValidator};
