//! Product handlers. Every route needs a bearer token.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, patch},
    Extension, Router,
};

use crate::api::extractors::{ApiQuery, ValidatedJson};
use crate::api::middleware::{require_policy, CurrentUser};
use crate::api::AppState;
use crate::config::API_V1_PREFIX;
use crate::domain::{Policy, ProductDto, ProductUpdateRequest, ProductUpdateResponse};
use crate::errors::AppResult;
use crate::types::{Created, PagedList, PaginationParams, ProductFilterPrice};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/pagination", get(list_products_paged))
        .route("/filter/price/pagination", get(filter_products_by_price))
        .route("/category/:id", get(products_by_category))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/update-partial", patch(update_product_partial))
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = [ProductDto]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ProductDto>>> {
    require_policy(&user, Policy::User)?;
    Ok(Json(state.product_service.list().await?))
}

/// One page of products; metadata in `X-Pagination`
#[utoipa::path(
    get,
    path = "/api/v1/products/pagination",
    tag = "Products",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of products", body = [ProductDto]),
        (status = 400, description = "Invalid pagination")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_products_paged(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> AppResult<PagedList<ProductDto>> {
    require_policy(&user, Policy::User)?;
    state.product_service.list_paged(params).await
}

/// Products priced above (`maior`), below (`menor`) or at (`igual`) `price`,
/// ordered by price
#[utoipa::path(
    get,
    path = "/api/v1/products/filter/price/pagination",
    tag = "Products",
    params(ProductFilterPrice),
    responses(
        (status = 200, description = "Page of matching products", body = [ProductDto]),
        (status = 400, description = "Invalid price or flag")
    ),
    security(("bearer_auth" = []))
)]
pub async fn filter_products_by_price(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ApiQuery(filter): ApiQuery<ProductFilterPrice>,
) -> AppResult<PagedList<ProductDto>> {
    require_policy(&user, Policy::User)?;
    state.product_service.filter_by_price(filter).await
}

#[utoipa::path(
    get,
    path = "/api/v1/products/category/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Products of the category", body = [ProductDto]),
        (status = 404, description = "No products for the category")
    ),
    security(("bearer_auth" = []))
)]
pub async fn products_by_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<ProductDto>>> {
    require_policy(&user, Policy::User)?;
    Ok(Json(state.product_service.by_category(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ProductDto),
        (status = 400, description = "Invalid id"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<ProductDto>> {
    require_policy(&user, Policy::User)?;
    Ok(Json(state.product_service.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = ProductDto,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Validation error or unknown category"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(dto): ValidatedJson<ProductDto>,
) -> AppResult<Created<ProductDto>> {
    require_policy(&user, Policy::Admin)?;

    let created = state.product_service.create(dto).await?;
    let location = format!("{}/products/{}", API_V1_PREFIX, created.id);
    Ok(Created::at(location, created))
}

#[utoipa::path(
    put,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductDto,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, description = "Id mismatch, validation error or unknown category"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<ProductDto>,
) -> AppResult<Json<ProductDto>> {
    require_policy(&user, Policy::Admin)?;
    Ok(Json(state.product_service.update(id, dto).await?))
}

/// Change stock and/or registration date
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/update-partial",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = ProductUpdateRequest,
    responses(
        (status = 200, description = "Product after the update", body = ProductUpdateResponse),
        (status = 400, description = "Stock out of range or date not in the future"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_product_partial(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    ValidatedJson(patch): ValidatedJson<ProductUpdateRequest>,
) -> AppResult<Json<ProductUpdateResponse>> {
    require_policy(&user, Policy::Admin)?;
    Ok(Json(state.product_service.update_partial(id, patch).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    tag = "Products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Deleted product", body = ProductDto),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<ProductDto>> {
    require_policy(&user, Policy::Admin)?;
    Ok(Json(state.product_service.delete(id).await?))
}
