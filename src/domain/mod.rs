//! Domain layer - Core business entities and DTOs
//!
//! Independent of the persistence layer; entities in `infra` convert
//! into these types.

pub mod category;
pub mod password;
pub mod product;
pub mod user;

pub use category::CategoryDto;
pub use password::Password;
pub use product::{ProductDto, ProductUpdateRequest, ProductUpdateResponse};
pub use user::{Policy, User};
