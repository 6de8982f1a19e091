//! Shared request and response types.

mod filters;
mod pagination;
mod response;

pub use filters::{CategoriesFilterName, PriceCriterion, ProductFilterPrice};
pub use pagination::{PagedList, PaginationMeta, PaginationParams};
pub use response::{Created, NoContent, StatusResponse};
