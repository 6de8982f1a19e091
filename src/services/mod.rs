//! Application services layer - Use cases and business logic.
//!
//! Each operation opens a unit of work, calls repositories, maps entities
//! to DTOs and commits.

mod auth_service;
mod category_service;
pub mod container;
mod product_service;
mod token_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, RefreshResponse, TokenResponse};
pub use category_service::{CategoryManager, CategoryService};
pub use product_service::{ProductManager, ProductService};
pub use token_service::{Claims, TokenService};
