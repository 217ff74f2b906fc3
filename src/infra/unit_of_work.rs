//! Unit of Work: repository access plus the transaction coordinator.
//!
//! [`UnitOfWork::transaction`] begins a transaction, hands the closure a
//! [`TransactionContext`] bound to it, then commits on `Ok` or rolls back on
//! `Err`. Every statement of the unit must go through the context; the pooled
//! repositories returned by `customers()`/`catalogue()` run outside it.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::{
    customer_repository, CatalogueRepository, CatalogueStore, CustomerRepository, CustomerStore,
};
use crate::domain::{NewAddress, NewCard};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method.
/// For tests, implement it over mock repositories or use SQLite.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn customers(&self) -> Arc<dyn CustomerRepository>;

    fn catalogue(&self) -> Arc<dyn CatalogueRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Commit failure is returned to the caller. When the closure fails the
    /// transaction is rolled back and the closure's error is returned; a
    /// failed rollback is logged and does not replace that error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get customer repository for this transaction
    pub fn customers(&self) -> TxCustomerRepository<'_> {
        TxCustomerRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    customer_repo: Arc<CustomerStore>,
    catalogue_repo: Arc<CatalogueStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        let customer_repo = Arc::new(CustomerStore::new(db.clone()));
        let catalogue_repo = Arc::new(CatalogueStore::new(db.clone()));
        Self {
            db,
            customer_repo,
            catalogue_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn customers(&self) -> Arc<dyn CustomerRepository> {
        self.customer_repo.clone()
    }

    fn catalogue(&self) -> Arc<dyn CatalogueRepository> {
        self.catalogue_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self.db.begin().await.map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit()
                    .await
                    .map_err(|e| AppError::from(e).context("commit transaction"))?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, cause = %e, "Transaction rollback failed");
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware customer repository.
///
/// Borrows the transaction so it cannot outlive it.
pub struct TxCustomerRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCustomerRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Fail with `NotFound` unless the customer exists.
    pub async fn ensure_exists(&self, customer_id: Uuid) -> AppResult<()> {
        if customer_repository::customer_exists(self.txn, customer_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }

    /// Insert a card row. A repeated card number yields `DuplicateEntry("card")`.
    pub async fn insert_card(&self, card: NewCard) -> AppResult<Uuid> {
        customer_repository::insert_card(self.txn, card).await
    }

    pub async fn link_card(&self, customer_id: Uuid, card_id: Uuid) -> AppResult<()> {
        customer_repository::link_card(self.txn, customer_id, card_id).await
    }

    pub async fn insert_address(&self, address: NewAddress) -> AppResult<Uuid> {
        customer_repository::insert_address(self.txn, address).await
    }

    pub async fn link_address(&self, customer_id: Uuid, address_id: Uuid) -> AppResult<()> {
        customer_repository::link_address(self.txn, customer_id, address_id).await
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(move |$ctx| Box::pin(async move { $body })).await
    };
}
