//! Category use cases.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::Set;

use crate::domain::CategoryDto;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::entities::category;
use crate::infra::{Persistence, Repository};
use crate::types::{CategoriesFilterName, PagedList, PaginationParams};

pub(crate) fn category_not_found(id: i32) -> String {
    format!("Categoria com id= {} não encontrada...", id)
}

#[async_trait]
pub trait CategoryService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<CategoryDto>>;

    async fn list_paged(&self, params: PaginationParams) -> AppResult<PagedList<CategoryDto>>;

    async fn filter_by_name(
        &self,
        filter: CategoriesFilterName,
    ) -> AppResult<PagedList<CategoryDto>>;

    async fn get(&self, id: i32) -> AppResult<CategoryDto>;

    async fn create(&self, dto: CategoryDto) -> AppResult<CategoryDto>;

    async fn update(&self, id: i32, dto: CategoryDto) -> AppResult<CategoryDto>;

    /// Delete the category (and, by cascade, its products).
    async fn delete(&self, id: i32) -> AppResult<CategoryDto>;
}

pub struct CategoryManager {
    persistence: Arc<Persistence>,
}

impl CategoryManager {
    pub fn new(persistence: Arc<Persistence>) -> Self {
        Self { persistence }
    }
}

#[async_trait]
impl CategoryService for CategoryManager {
    async fn list(&self) -> AppResult<Vec<CategoryDto>> {
        let uow = self.persistence.begin().await?;
        let mut categories = uow.categories().get_all().await?;
        categories.sort_by_key(|c| c.id);

        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    async fn list_paged(&self, params: PaginationParams) -> AppResult<PagedList<CategoryDto>> {
        params.validate()?;

        let uow = self.persistence.begin().await?;
        let page = uow.categories().get_categories(&params).await?;
        Ok(page.map(CategoryDto::from))
    }

    async fn filter_by_name(
        &self,
        filter: CategoriesFilterName,
    ) -> AppResult<PagedList<CategoryDto>> {
        filter.pagination().validate()?;

        let uow = self.persistence.begin().await?;
        let page = uow.categories().get_categories_filter_name(&filter).await?;
        Ok(page.map(CategoryDto::from))
    }

    async fn get(&self, id: i32) -> AppResult<CategoryDto> {
        let uow = self.persistence.begin().await?;
        uow.categories()
            .find_by_id(id)
            .await?
            .map(CategoryDto::from)
            .ok_or_not_found(category_not_found(id))
    }

    async fn create(&self, dto: CategoryDto) -> AppResult<CategoryDto> {
        let uow = self.persistence.begin().await?;
        let created = uow
            .categories()
            .create(category::ActiveModel {
                name: Set(dto.name),
                image_url: Set(dto.image_url),
                ..Default::default()
            })
            .await?;
        uow.commit().await?;

        tracing::info!(id = created.id, "Category created");
        Ok(created.into())
    }

    async fn update(&self, id: i32, dto: CategoryDto) -> AppResult<CategoryDto> {
        if id != dto.id {
            return Err(AppError::bad_request("Dados inválidos"));
        }

        let uow = self.persistence.begin().await?;
        let categories = uow.categories();
        categories
            .find_by_id(id)
            .await?
            .ok_or_not_found(category_not_found(id))?;

        let updated = categories
            .update(category::ActiveModel {
                id: Set(id),
                name: Set(dto.name),
                image_url: Set(dto.image_url),
            })
            .await?;
        uow.commit().await?;

        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> AppResult<CategoryDto> {
        let uow = self.persistence.begin().await?;
        let categories = uow.categories();
        let existing = categories
            .find_by_id(id)
            .await?
            .ok_or_not_found(category_not_found(id))?;

        let deleted = categories.delete(existing).await?;
        uow.commit().await?;

        tracing::info!(id, "Category deleted");
        Ok(deleted.into())
    }
}
