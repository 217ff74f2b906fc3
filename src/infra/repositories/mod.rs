//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod catalogue_repository;
pub(crate) mod customer_repository;
pub mod entities;

pub use catalogue_repository::{CatalogueRepository, CatalogueStore};
pub use customer_repository::{CustomerRepository, CustomerStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use catalogue_repository::MockCatalogueRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use customer_repository::MockCustomerRepository;
