//! OpenAPI documentation configuration.
//!
//! Served by Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, category_handler, product_handler};
use crate::domain::{CategoryDto, ProductDto, ProductUpdateRequest, ProductUpdateResponse};
use crate::services::{RefreshResponse, TokenResponse};
use crate::types::StatusResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "Products and categories with JWT authentication",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::refresh_token,
        auth_handler::revoke,
        auth_handler::create_role,
        auth_handler::add_user_to_role,
        category_handler::list_categories,
        category_handler::list_categories_paged,
        category_handler::filter_categories_by_name,
        category_handler::get_category,
        category_handler::create_category,
        category_handler::update_category,
        category_handler::delete_category,
        product_handler::list_products,
        product_handler::list_products_paged,
        product_handler::filter_products_by_price,
        product_handler::products_by_category,
        product_handler::get_product,
        product_handler::create_product,
        product_handler::update_product,
        product_handler::update_product_partial,
        product_handler::delete_product,
    ),
    components(
        schemas(
            CategoryDto,
            ProductDto,
            ProductUpdateRequest,
            ProductUpdateResponse,
            StatusResponse,
            TokenResponse,
            RefreshResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::TokenModel,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, tokens and roles"),
        (name = "Categories", description = "Category catalog"),
        (name = "Products", description = "Product catalog")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_catalog_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/products/filter/price/pagination"));
        assert!(doc.paths.paths.contains_key("/api/v1/categories/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/auth/refresh-token"));
    }
}
