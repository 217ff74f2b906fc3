//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod catalogue_service;
pub mod container;
mod customer_service;
mod health_service;

pub use container::{ServiceContainer, Services};

pub use catalogue_service::{Catalogue, CatalogueService};
pub use customer_service::{CustomerManager, CustomerService, Registration};
pub use health_service::{Health, HealthChecker, HealthMonitor};
