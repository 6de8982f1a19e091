//! Product repository.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder};

use super::base::{fetch_page, Repository};
use super::entities::product::{self, ActiveModel, Entity as ProductEntity, Model};
use crate::errors::AppResult;
use crate::types::{PagedList, PaginationParams, PriceCriterion};

/// Products within one unit of work
pub struct ProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> ProductRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Model>> {
        self.get(product::Column::Id.eq(id)).await
    }

    /// One page of products ordered by id.
    pub async fn get_products(&self, params: &PaginationParams) -> AppResult<PagedList<Model>> {
        let select = ProductEntity::find().order_by_asc(product::Column::Id);
        fetch_page(select, self.txn, params).await
    }

    /// One page of products ordered by price, optionally compared against `price`.
    pub async fn get_products_filter_price(
        &self,
        criteria: Option<(Decimal, PriceCriterion)>,
        params: &PaginationParams,
    ) -> AppResult<PagedList<Model>> {
        let mut select = ProductEntity::find();
        if let Some((price, criterion)) = criteria {
            let condition = match criterion {
                PriceCriterion::GreaterThan => product::Column::Price.gt(price),
                PriceCriterion::LessThan => product::Column::Price.lt(price),
                PriceCriterion::EqualTo => product::Column::Price.eq(price),
            };
            select = select.filter(condition);
        }

        let select = select
            .order_by_asc(product::Column::Price)
            .order_by_asc(product::Column::Id);
        fetch_page(select, self.txn, params).await
    }

    pub async fn get_products_by_category(&self, category_id: i32) -> AppResult<Vec<Model>> {
        ProductEntity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .order_by_asc(product::Column::Id)
            .all(self.txn)
            .await
            .map_err(Into::into)
    }
}

impl<'a> Repository<ProductEntity, ActiveModel> for ProductRepository<'a> {
    fn txn(&self) -> &DatabaseTransaction {
        self.txn
    }
}
