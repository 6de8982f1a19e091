//! Unit of Work pattern implementation.
//!
//! A `UnitOfWork` owns one database transaction. Repositories borrowed from
//! it write through that transaction; nothing is persisted until `commit`.
//! Dropping a unit of work without committing rolls it back.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::repositories::{CategoryRepository, ProductRepository, UserRepository};
use crate::errors::{AppError, AppResult};

/// Repositories sharing one transaction
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    pub fn categories(&self) -> CategoryRepository<'_> {
        CategoryRepository::new(&self.txn)
    }

    pub fn products(&self) -> ProductRepository<'_> {
        ProductRepository::new(&self.txn)
    }

    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.txn)
    }

    /// Persist every pending change atomically.
    pub async fn commit(self) -> AppResult<()> {
        self.txn.commit().await.map_err(AppError::from)
    }
}

/// Entry point for opening units of work
#[derive(Clone)]
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open a unit of work on a fresh transaction.
    pub async fn begin(&self) -> AppResult<UnitOfWork> {
        let txn = self.db.begin().await?;
        Ok(UnitOfWork { txn })
    }

    /// Run `f` in a unit of work, committing on `Ok` and rolling back on `Err`.
    pub async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                &'a UnitOfWork,
            ) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>
            + Send,
        T: Send,
    {
        let uow = self.begin().await?;
        let result = f(&uow).await;

        match result {
            Ok(result) => {
                uow.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = uow.txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::infra::Database;

    async fn persistence() -> Persistence {
        let config =
            Config::new("sqlite::memory:", "unit-test-secret-key-with-32-chars!").unwrap();
        Persistence::new(Database::connect(&config).await.unwrap().get_connection())
    }

    #[tokio::test]
    async fn test_transaction_commits_on_ok() {
        let persistence = persistence().await;

        persistence
            .transaction(|uow| Box::pin(async move { uow.users().create_role("auditor").await }))
            .await
            .unwrap();

        let uow = persistence.begin().await.unwrap();
        assert!(uow.users().find_role("auditor").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_transaction_rolls_back_on_err() {
        let persistence = persistence().await;

        let result: AppResult<()> = persistence
            .transaction(|uow| {
                Box::pin(async move {
                    uow.users().create_role("auditor").await?;
                    Err(AppError::bad_request("abort"))
                })
            })
            .await;
        assert!(result.is_err());

        let uow = persistence.begin().await.unwrap();
        assert!(uow.users().find_role("auditor").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_discards_changes() {
        let persistence = persistence().await;

        {
            let uow = persistence.begin().await.unwrap();
            uow.users().create_role("temporario").await.unwrap();
        }

        let uow = persistence.begin().await.unwrap();
        assert!(uow.users().find_role("temporario").await.unwrap().is_none());
    }
}
