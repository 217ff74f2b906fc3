//! Service Container - Centralized service access.

use std::sync::Arc;

use super::{Catalogue, CatalogueService, CustomerManager, CustomerService, HealthChecker, HealthMonitor};
use crate::infra::{Database, Persistence};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn catalogue(&self) -> Arc<dyn CatalogueService>;

    fn customers(&self) -> Arc<dyn CustomerService>;

    fn health(&self) -> Arc<dyn HealthChecker>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    catalogue_service: Arc<dyn CatalogueService>,
    customer_service: Arc<dyn CustomerService>,
    health_checker: Arc<dyn HealthChecker>,
}

impl Services {
    /// Wire every service over one Unit of Work
    pub fn from_database(database: Arc<Database>) -> Self {
        let uow = Arc::new(Persistence::new(database.get_connection()));

        Self {
            catalogue_service: Arc::new(Catalogue::new(uow.clone())),
            customer_service: Arc::new(CustomerManager::new(uow)),
            health_checker: Arc::new(HealthMonitor::new(database)),
        }
    }
}

impl ServiceContainer for Services {
    fn catalogue(&self) -> Arc<dyn CatalogueService> {
        self.catalogue_service.clone()
    }

    fn customers(&self) -> Arc<dyn CustomerService> {
        self.customer_service.clone()
    }

    fn health(&self) -> Arc<dyn HealthChecker> {
        self.health_checker.clone()
    }
}
