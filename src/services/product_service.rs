//! Product use cases.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::Set;

use super::category_service::category_not_found;
use crate::domain::{ProductDto, ProductUpdateRequest, ProductUpdateResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::entities::product;
use crate::infra::{Persistence, Repository, UnitOfWork};
use crate::types::{PagedList, PaginationParams, ProductFilterPrice};

const PRODUCT_NOT_FOUND: &str = "Produto não encontrado...";

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<ProductDto>>;

    async fn list_paged(&self, params: PaginationParams) -> AppResult<PagedList<ProductDto>>;

    /// Page of products ordered by price, compared against the filter when given.
    async fn filter_by_price(&self, filter: ProductFilterPrice) -> AppResult<PagedList<ProductDto>>;

    async fn by_category(&self, category_id: i32) -> AppResult<Vec<ProductDto>>;

    async fn get(&self, id: i32) -> AppResult<ProductDto>;

    async fn create(&self, dto: ProductDto) -> AppResult<ProductDto>;

    /// Replace the editable fields; stock and registration date are kept.
    async fn update(&self, id: i32, dto: ProductDto) -> AppResult<ProductDto>;

    async fn update_partial(
        &self,
        id: i32,
        patch: ProductUpdateRequest,
    ) -> AppResult<ProductUpdateResponse>;

    async fn delete(&self, id: i32) -> AppResult<ProductDto>;
}

pub struct ProductManager {
    persistence: Arc<Persistence>,
}

impl ProductManager {
    pub fn new(persistence: Arc<Persistence>) -> Self {
        Self { persistence }
    }
}

async fn ensure_category(uow: &UnitOfWork, category_id: i32) -> AppResult<()> {
    if uow.categories().find_by_id(category_id).await?.is_none() {
        tracing::warn!(category_id, "Product references unknown category");
        return Err(AppError::bad_request(category_not_found(category_id)));
    }
    Ok(())
}

#[async_trait]
impl ProductService for ProductManager {
    async fn list(&self) -> AppResult<Vec<ProductDto>> {
        let uow = self.persistence.begin().await?;
        let mut products = uow.products().get_all().await?;
        products.sort_by_key(|p| p.id);

        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    async fn list_paged(&self, params: PaginationParams) -> AppResult<PagedList<ProductDto>> {
        params.validate()?;

        let uow = self.persistence.begin().await?;
        let page = uow.products().get_products(&params).await?;
        Ok(page.map(ProductDto::from))
    }

    async fn filter_by_price(&self, filter: ProductFilterPrice) -> AppResult<PagedList<ProductDto>> {
        let params = filter.pagination();
        params.validate()?;
        let criteria = filter.price_filter()?;

        let uow = self.persistence.begin().await?;
        let page = uow
            .products()
            .get_products_filter_price(criteria, &params)
            .await?;
        Ok(page.map(ProductDto::from))
    }

    async fn by_category(&self, category_id: i32) -> AppResult<Vec<ProductDto>> {
        let uow = self.persistence.begin().await?;
        let products = uow.products().get_products_by_category(category_id).await?;
        if products.is_empty() {
            return Err(AppError::not_found(format!(
                "Produtos da categoria id= {} não encontrados...",
                category_id
            )));
        }

        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    async fn get(&self, id: i32) -> AppResult<ProductDto> {
        if id <= 0 {
            return Err(AppError::bad_request("ID de produto inválido"));
        }

        let uow = self.persistence.begin().await?;
        uow.products()
            .find_by_id(id)
            .await?
            .map(ProductDto::from)
            .ok_or_not_found(PRODUCT_NOT_FOUND)
    }

    async fn create(&self, dto: ProductDto) -> AppResult<ProductDto> {
        let uow = self.persistence.begin().await?;
        ensure_category(&uow, dto.category_id).await?;

        let created = uow
            .products()
            .create(product::ActiveModel {
                name: Set(dto.name),
                description: Set(dto.description),
                price: Set(dto.price),
                image_url: Set(dto.image_url),
                stock: Set(0.0),
                register_date: Set(Utc::now()),
                category_id: Set(dto.category_id),
                ..Default::default()
            })
            .await?;
        uow.commit().await?;

        tracing::info!(id = created.id, "Product created");
        Ok(created.into())
    }

    async fn update(&self, id: i32, dto: ProductDto) -> AppResult<ProductDto> {
        if id != dto.id {
            return Err(AppError::bad_request("Dados inválidos"));
        }

        let uow = self.persistence.begin().await?;
        uow.products()
            .find_by_id(id)
            .await?
            .ok_or_not_found(PRODUCT_NOT_FOUND)?;
        ensure_category(&uow, dto.category_id).await?;

        let updated = uow
            .products()
            .update(product::ActiveModel {
                id: Set(id),
                name: Set(dto.name),
                description: Set(dto.description),
                price: Set(dto.price),
                image_url: Set(dto.image_url),
                category_id: Set(dto.category_id),
                ..Default::default()
            })
            .await?;
        uow.commit().await?;

        Ok(updated.into())
    }

    async fn update_partial(
        &self,
        id: i32,
        patch: ProductUpdateRequest,
    ) -> AppResult<ProductUpdateResponse> {
        if id <= 0 {
            return Err(AppError::bad_request("ID de produto inválido"));
        }
        if patch.is_empty() {
            return Err(AppError::bad_request("Informe stock ou registerDate"));
        }

        let uow = self.persistence.begin().await?;
        uow.products()
            .find_by_id(id)
            .await?
            .ok_or_not_found(PRODUCT_NOT_FOUND)?;

        let mut active = product::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(stock) = patch.stock {
            active.stock = Set(stock);
        }
        if let Some(register_date) = patch.register_date {
            active.register_date = Set(register_date);
        }

        let updated = uow.products().update(active).await?;
        uow.commit().await?;

        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> AppResult<ProductDto> {
        let uow = self.persistence.begin().await?;
        let products = uow.products();
        let existing = products
            .find_by_id(id)
            .await?
            .ok_or_not_found(PRODUCT_NOT_FOUND)?;

        let deleted = products.delete(existing).await?;
        uow.commit().await?;

        tracing::info!(id, "Product deleted");
        Ok(deleted.into())
    }
}
