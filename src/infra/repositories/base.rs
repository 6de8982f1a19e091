//! Generic repository over a SeaORM entity.
//!
//! Every repository borrows the unit of work's transaction, so nothing it
//! writes is visible to other connections until the unit of work commits.

use async_trait::async_trait;
use sea_orm::{
    sea_query::IntoCondition, ActiveModelBehavior, ActiveModelTrait, DatabaseTransaction,
    EntityTrait, FromQueryResult, IntoActiveModel, PaginatorTrait, QueryFilter,
    Select,
};

use crate::errors::AppResult;
use crate::types::{PagedList, PaginationParams};

/// CRUD operations shared by every entity repository.
#[async_trait]
pub trait Repository<E, A>: Send + Sync
where
    E: EntityTrait,
    E::Model: IntoActiveModel<A> + Send + Sync,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
{
    /// Transaction the repository writes through
    fn txn(&self) -> &DatabaseTransaction;

    /// First row matching the predicate
    async fn get<F>(&self, predicate: F) -> AppResult<Option<E::Model>>
    where
        F: IntoCondition + Send + 'static,
    {
        E::find()
            .filter(predicate)
            .one(self.txn())
            .await
            .map_err(Into::into)
    }

    async fn get_all(&self) -> AppResult<Vec<E::Model>> {
        E::find().all(self.txn()).await.map_err(Into::into)
    }

    async fn create(&self, entity: A) -> AppResult<E::Model> {
        entity.insert(self.txn()).await.map_err(Into::into)
    }

    async fn update(&self, entity: A) -> AppResult<E::Model> {
        entity.update(self.txn()).await.map_err(Into::into)
    }

    /// Delete the row and hand back what was deleted.
    async fn delete(&self, model: E::Model) -> AppResult<E::Model>
    where
        E::Model: Clone,
    {
        let active: A = model.clone().into_active_model();
        active.delete(self.txn()).await?;
        Ok(model)
    }
}

/// Fetch one page of `select` with its metadata.
pub async fn fetch_page<E>(
    select: Select<E>,
    txn: &DatabaseTransaction,
    params: &PaginationParams,
) -> AppResult<PagedList<E::Model>>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
{
    params.validate()?;
    let page_size = params.limit();
    let paginator = select.paginate(txn, page_size);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(params.page_index()).await?;

    Ok(PagedList::new(items, params.page_number, page_size, total))
}
