//! Category repository.

use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder};

use super::base::{fetch_page, Repository};
use super::entities::category::{self, ActiveModel, Entity as CategoryEntity, Model};
use crate::errors::AppResult;
use crate::types::{CategoriesFilterName, PagedList, PaginationParams};

/// Categories within one unit of work
pub struct CategoryRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> CategoryRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Model>> {
        self.get(category::Column::Id.eq(id)).await
    }

    /// One page of categories ordered by id.
    pub async fn get_categories(&self, params: &PaginationParams) -> AppResult<PagedList<Model>> {
        let select = CategoryEntity::find().order_by_asc(category::Column::Id);
        fetch_page(select, self.txn, params).await
    }

    /// One page of categories whose name contains the filter.
    pub async fn get_categories_filter_name(
        &self,
        filter: &CategoriesFilterName,
    ) -> AppResult<PagedList<Model>> {
        let mut select = CategoryEntity::find();
        if let Some(name) = filter.name.as_deref().filter(|n| !n.is_empty()) {
            select = select.filter(category::Column::Name.contains(name));
        }

        let select = select.order_by_asc(category::Column::Id);
        fetch_page(select, self.txn, &filter.pagination()).await
    }
}

impl<'a> Repository<CategoryEntity, ActiveModel> for CategoryRepository<'a> {
    fn txn(&self) -> &DatabaseTransaction {
        self.txn
    }
}
