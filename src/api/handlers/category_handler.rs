//! Category handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};

use crate::api::extractors::{ApiQuery, ValidatedJson};
use crate::api::middleware::{require_policy, CurrentUser};
use crate::api::AppState;
use crate::config::API_V1_PREFIX;
use crate::domain::{CategoryDto, Policy};
use crate::errors::AppResult;
use crate::types::{CategoriesFilterName, Created, PagedList, PaginationParams};

/// Read routes, open to anonymous callers
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/pagination", get(list_categories_paged))
        .route("/filter/name/pagination", get(filter_categories_by_name))
        .route("/:id", get(get_category))
}

/// Write routes, behind the bearer middleware
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category))
        .route("/:id", put(update_category).delete(delete_category))
}

/// List every category
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "Categories",
    responses((status = 200, description = "All categories", body = [CategoryDto]))
)]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<CategoryDto>>> {
    Ok(Json(state.category_service.list().await?))
}

/// One page of categories; metadata in `X-Pagination`
#[utoipa::path(
    get,
    path = "/api/v1/categories/pagination",
    tag = "Categories",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of categories", body = [CategoryDto]),
        (status = 400, description = "Invalid pagination")
    )
)]
pub async fn list_categories_paged(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> AppResult<PagedList<CategoryDto>> {
    state.category_service.list_paged(params).await
}

/// One page of categories whose name contains `name`
#[utoipa::path(
    get,
    path = "/api/v1/categories/filter/name/pagination",
    tag = "Categories",
    params(CategoriesFilterName),
    responses(
        (status = 200, description = "Page of matching categories", body = [CategoryDto]),
        (status = 400, description = "Invalid pagination")
    )
)]
pub async fn filter_categories_by_name(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<CategoriesFilterName>,
) -> AppResult<PagedList<CategoryDto>> {
    state.category_service.filter_by_name(filter).await
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = CategoryDto),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CategoryDto>> {
    Ok(Json(state.category_service.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "Categories",
    request_body = CategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(dto): ValidatedJson<CategoryDto>,
) -> AppResult<Created<CategoryDto>> {
    require_policy(&user, Policy::Admin)?;

    let created = state.category_service.create(dto).await?;
    let location = format!("{}/categories/{}", API_V1_PREFIX, created.id);
    Ok(Created::at(location, created))
}

#[utoipa::path(
    put,
    path = "/api/v1/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryDto),
        (status = 400, description = "Id mismatch or validation error"),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<CategoryDto>,
) -> AppResult<Json<CategoryDto>> {
    require_policy(&user, Policy::Admin)?;
    Ok(Json(state.category_service.update(id, dto).await?))
}

/// Delete a category and its products
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    tag = "Categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Deleted category", body = CategoryDto),
        (status = 404, description = "Category not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<CategoryDto>> {
    require_policy(&user, Policy::Admin)?;
    Ok(Json(state.category_service.delete(id).await?))
}
