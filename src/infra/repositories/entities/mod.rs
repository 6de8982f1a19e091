//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod category;
pub mod product;
pub mod role;
pub mod user;
pub mod user_role;
