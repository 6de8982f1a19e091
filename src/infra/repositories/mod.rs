//! Repository layer - Data access abstraction
//!
//! Repositories are borrowed from a `UnitOfWork` and share its transaction.

mod base;
mod category_repository;
pub(crate) mod entities;
mod product_repository;
mod user_repository;

pub use base::{fetch_page, Repository};
pub use category_repository::CategoryRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;
