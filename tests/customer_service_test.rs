//! Customer and catalogue service unit tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::predicate::eq;
use sea_orm::DbErr;
use uuid::Uuid;

use sockshop::domain::{Card, Customer, Password, Sock};
use sockshop::errors::{AppError, AppResult};
use sockshop::infra::repositories::{MockCatalogueRepository, MockCustomerRepository};
use sockshop::infra::{CatalogueRepository, CustomerRepository, TransactionContext, UnitOfWork};
use sockshop::services::{
    Catalogue, CatalogueService, CustomerManager, CustomerService, Registration,
};

fn create_test_customer(id: Uuid, password: &str) -> Customer {
    Customer {
        id,
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
        email: "ann@example.com".to_string(),
        username: "ann".to_string(),
        password: Password::new(password).unwrap(),
        address_ids: BTreeSet::new(),
        card_ids: BTreeSet::new(),
    }
}

fn registration(username: &str, password: &str) -> Registration {
    Registration {
        first_name: "Ann".to_string(),
        last_name: "Lee".to_string(),
        email: "ann@example.com".to_string(),
        username: username.to_string(),
        password: password.to_string(),
    }
}

/// Test mock for UnitOfWork that wraps the repository mocks
struct TestUnitOfWork {
    customer_repo: Arc<MockCustomerRepository>,
    catalogue_repo: Arc<MockCatalogueRepository>,
}

impl TestUnitOfWork {
    fn new(customer_repo: MockCustomerRepository) -> Self {
        Self::with_catalogue(customer_repo, MockCatalogueRepository::new())
    }

    fn with_catalogue(
        customer_repo: MockCustomerRepository,
        catalogue_repo: MockCatalogueRepository,
    ) -> Self {
        Self {
            customer_repo: Arc::new(customer_repo),
            catalogue_repo: Arc::new(catalogue_repo),
        }
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn customers(&self) -> Arc<dyn CustomerRepository> {
        self.customer_repo.clone()
    }

    fn catalogue(&self) -> Arc<dyn CatalogueRepository> {
        self.catalogue_repo.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        // Transaction not supported in test mock
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

fn customer_service(repo: MockCustomerRepository) -> CustomerManager<TestUnitOfWork> {
    CustomerManager::new(Arc::new(TestUnitOfWork::new(repo)))
}

#[tokio::test]
async fn test_login_success() {
    let id = Uuid::new_v4();
    let mut repo = MockCustomerRepository::new();
    repo.expect_find_by_username()
        .returning(move |_| Ok(Some(create_test_customer(id, "secret"))));

    let customer = customer_service(repo).login("ann", "secret").await.unwrap();

    assert_eq!(customer.id, id);
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let mut repo = MockCustomerRepository::new();
    repo.expect_find_by_username()
        .returning(|_| Ok(Some(create_test_customer(Uuid::new_v4(), "secret"))));

    let err = customer_service(repo).login("ann", "guess").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_login_unknown_user_is_not_found() {
    let mut repo = MockCustomerRepository::new();
    repo.expect_find_by_username().returning(|_| Ok(None));

    let err = customer_service(repo).login("ghost", "secret").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(!err.is_unauthorized());
}

#[tokio::test]
async fn test_register_returns_new_id() {
    let id = Uuid::new_v4();
    let mut repo = MockCustomerRepository::new();
    repo.expect_create()
        .withf(|new| new.username == "ann" && new.password.verify("secret"))
        .times(1)
        .returning(move |_| Ok(id));

    let created = customer_service(repo)
        .register(registration("ann", "secret"))
        .await
        .unwrap();

    assert_eq!(created, id);
}

#[tokio::test]
async fn test_register_duplicate_keeps_entity() {
    let mut repo = MockCustomerRepository::new();
    repo.expect_create().returning(|_| {
        Err(AppError::DuplicateEntry {
            entity: "user".to_string(),
            source: DbErr::Custom("UNIQUE constraint failed: customer.username".to_string()),
        })
    });

    let err = customer_service(repo)
        .register(registration("ann", "secret"))
        .await
        .unwrap_err();

    assert_eq!(err.duplicate_entity(), Some("user"));
    assert!(err.to_string().starts_with("register(username=ann)"));
}

#[tokio::test]
async fn test_register_rejects_empty_password() {
    let mut repo = MockCustomerRepository::new();
    repo.expect_create().never();

    let err = customer_service(repo)
        .register(registration("ann", ""))
        .await
        .unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn test_customer_cards_of_missing_customer() {
    let id = Uuid::new_v4();
    let mut repo = MockCustomerRepository::new();
    repo.expect_find_by_id().with(eq(id)).returning(|_| Ok(None));
    repo.expect_list_cards().never();

    let err = customer_service(repo).customer_cards(id).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_customer_cards_lists_linked_cards() {
    let id = Uuid::new_v4();
    let mut repo = MockCustomerRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(create_test_customer(id, "secret"))));
    repo.expect_list_cards().with(eq(id)).returning(|_| {
        Ok(vec![Card {
            id: Uuid::new_v4(),
            long_num: "4111111111111111".to_string(),
            expires: "04/28".to_string(),
            ccv: "123".to_string(),
        }])
    });

    let cards = customer_service(repo).customer_cards(id).await.unwrap();

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].masked_number(), "************1111");
}

#[tokio::test]
async fn test_get_card_not_found_through_context() {
    let mut repo = MockCustomerRepository::new();
    repo.expect_find_card().returning(|_| Ok(None));

    let err = customer_service(repo)
        .get_card(Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Context { .. }));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_store_failure_stays_opaque() {
    let mut repo = MockCustomerRepository::new();
    repo.expect_find_address()
        .returning(|_| Err(AppError::Database(DbErr::Custom("connection reset".to_string()))));

    let err = customer_service(repo)
        .get_address(Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(!err.is_not_found());
    assert!(err.duplicate_entity().is_none());
    assert!(!err.is_unauthorized());
}

#[tokio::test]
async fn test_get_sock_missing_is_not_found() {
    let mut catalogue = MockCatalogueRepository::new();
    catalogue.expect_find_by_id().returning(|_| Ok(None));
    let uow = TestUnitOfWork::with_catalogue(MockCustomerRepository::new(), catalogue);

    let err = Catalogue::new(Arc::new(uow))
        .get_sock(Uuid::new_v4())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_socks_passes_query_through() {
    let mut catalogue = MockCatalogueRepository::new();
    catalogue
        .expect_list()
        .withf(|q| q.tags == vec!["blue".to_string()])
        .returning(|_| {
            Ok(vec![Sock {
                id: Uuid::new_v4(),
                name: "Crossed".to_string(),
                description: "A mature sock".to_string(),
                image_urls: vec!["/catalogue/images/cross_1.jpeg".to_string()],
                price: 17.32,
                count: 33,
                tags: vec!["blue".to_string()],
            }])
        });
    let uow = TestUnitOfWork::with_catalogue(MockCustomerRepository::new(), catalogue);

    let query = sockshop::domain::SockQuery {
        tags: vec!["blue".to_string()],
        ..Default::default()
    };
    let socks = Catalogue::new(Arc::new(uow)).list_socks(query).await.unwrap();

    assert_eq!(socks.len(), 1);
    assert_eq!(socks[0].name, "Crossed");
}
