//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories for the customer and catalogue tables
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{CatalogueRepository, CatalogueStore, CustomerRepository, CustomerStore};
pub use unit_of_work::{Persistence, TransactionContext, TxCustomerRepository, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockCatalogueRepository, MockCustomerRepository};
