//! Request extractors shared by the product handlers.

mod product_id;
pub use product_id::ProductId;
