//! HTTP handlers for product CRUD.

pub mod product;
pub use product::*;
