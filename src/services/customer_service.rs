//! Customer service - login, registration, addresses and cards.
//!
//! Card and address creation run through the Unit of Work transaction so the
//! entity row and its customer join row commit together or not at all.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Address, Card, Customer, NewAddress, NewCard, NewCustomer, Password};
use crate::errors::{AppError, AppResult, OptionExt, ResultExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Customer service trait for dependency injection.
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Verify credentials. Unknown username is `NotFound`, a wrong password
    /// is `Unauthorized`.
    async fn login(&self, username: &str, password: &str) -> AppResult<Customer>;

    /// Register a customer. A taken username is `DuplicateEntry("user")`.
    async fn register(&self, registration: Registration) -> AppResult<Uuid>;

    async fn get_customer(&self, id: Uuid) -> AppResult<Customer>;

    async fn customer_cards(&self, customer_id: Uuid) -> AppResult<Vec<Card>>;

    async fn customer_addresses(&self, customer_id: Uuid) -> AppResult<Vec<Address>>;

    async fn get_card(&self, id: Uuid) -> AppResult<Card>;

    async fn get_address(&self, id: Uuid) -> AppResult<Address>;

    /// Add a card to a customer atomically. A repeated card number is
    /// `DuplicateEntry("card")`.
    async fn create_card(&self, customer_id: Uuid, card: NewCard) -> AppResult<Uuid>;

    /// Add an address to a customer atomically.
    async fn create_address(&self, customer_id: Uuid, address: NewAddress) -> AppResult<Uuid>;
}

/// Concrete implementation of CustomerService using Unit of Work.
pub struct CustomerManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CustomerManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CustomerService for CustomerManager<U> {
    async fn login(&self, username: &str, password: &str) -> AppResult<Customer> {
        let customer = self
            .uow
            .customers()
            .find_by_username(username)
            .await
            .and_then(|found| found.ok_or_not_found())
            .with_context(|| format!("login(username={})", username))?;

        if !customer.password.verify(password) {
            return Err(AppError::Unauthorized.context(format!("login(username={})", username)));
        }

        Ok(customer)
    }

    async fn register(&self, registration: Registration) -> AppResult<Uuid> {
        if registration.username.trim().is_empty() {
            return Err(AppError::validation("username must not be empty"));
        }
        let password = Password::new(&registration.password)?;

        let username = registration.username.clone();
        self.uow
            .customers()
            .create(NewCustomer {
                first_name: registration.first_name,
                last_name: registration.last_name,
                email: registration.email,
                username: registration.username,
                password,
            })
            .await
            .with_context(|| format!("register(username={})", username))
    }

    async fn get_customer(&self, id: Uuid) -> AppResult<Customer> {
        self.uow
            .customers()
            .find_by_id(id)
            .await?
            .ok_or_not_found()
            .with_context(|| format!("get_customer(id={})", id))
    }

    async fn customer_cards(&self, customer_id: Uuid) -> AppResult<Vec<Card>> {
        self.get_customer(customer_id).await?;
        self.uow
            .customers()
            .list_cards(customer_id)
            .await
            .with_context(|| format!("customer_cards(customer_id={})", customer_id))
    }

    async fn customer_addresses(&self, customer_id: Uuid) -> AppResult<Vec<Address>> {
        self.get_customer(customer_id).await?;
        self.uow
            .customers()
            .list_addresses(customer_id)
            .await
            .with_context(|| format!("customer_addresses(customer_id={})", customer_id))
    }

    async fn get_card(&self, id: Uuid) -> AppResult<Card> {
        self.uow
            .customers()
            .find_card(id)
            .await?
            .ok_or_not_found()
            .with_context(|| format!("get_card(id={})", id))
    }

    async fn get_address(&self, id: Uuid) -> AppResult<Address> {
        self.uow
            .customers()
            .find_address(id)
            .await?
            .ok_or_not_found()
            .with_context(|| format!("get_address(id={})", id))
    }

    async fn create_card(&self, customer_id: Uuid, card: NewCard) -> AppResult<Uuid> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let customers = ctx.customers();
                    customers.ensure_exists(customer_id).await?;
                    let card_id = customers.insert_card(card).await?;
                    customers.link_card(customer_id, card_id).await?;
                    Ok::<Uuid, AppError>(card_id)
                })
            })
            .await
            .with_context(|| format!("create_card(customer_id={})", customer_id))
    }

    async fn create_address(&self, customer_id: Uuid, address: NewAddress) -> AppResult<Uuid> {
        let result: AppResult<Uuid> = with_transaction!(self.uow, |ctx| {
            let customers = ctx.customers();
            customers.ensure_exists(customer_id).await?;
            let address_id = customers.insert_address(address).await?;
            customers.link_address(customer_id, address_id).await?;
            Ok::<Uuid, AppError>(address_id)
        });

        result.with_context(|| format!("create_address(customer_id={})", customer_id))
    }
}
