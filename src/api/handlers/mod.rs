//! HTTP request handlers.

pub mod auth_handler;
pub mod category_handler;
pub mod product_handler;

pub use product_handler::product_routes;
