//! Customer repository: customers, addresses, cards and their join rows.
//!
//! Query helpers are generic over [`ConnectionTrait`] so the same statements
//! run against the pool here and against a transaction in
//! [`TxCustomerRepository`](crate::infra::TxCustomerRepository).

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{
    address::{self, Entity as AddressEntity},
    card::{self, Entity as CardEntity},
    customer::{self, Entity as CustomerEntity},
    customer_address::{self, Entity as CustomerAddressEntity},
    customer_card::{self, Entity as CustomerCardEntity},
};
use crate::config::{ENTITY_ADDRESS, ENTITY_CARD, ENTITY_USER};
use crate::domain::{Address, Card, Customer, NewAddress, NewCard, NewCustomer, Password};
use crate::errors::{AppError, AppResult, ResultExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Customer repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find customer by ID, with linked address and card IDs
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>>;

    /// Find customer by username, with linked address and card IDs
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Customer>>;

    /// Insert a customer. A taken username yields `DuplicateEntry("user")`.
    async fn create(&self, customer: NewCustomer) -> AppResult<Uuid>;

    async fn find_address(&self, id: Uuid) -> AppResult<Option<Address>>;

    /// Addresses linked to a customer
    async fn list_addresses(&self, customer_id: Uuid) -> AppResult<Vec<Address>>;

    async fn find_card(&self, id: Uuid) -> AppResult<Option<Card>>;

    /// Cards linked to a customer
    async fn list_cards(&self, customer_id: Uuid) -> AppResult<Vec<Card>>;
}

/// Concrete implementation of CustomerRepository
pub struct CustomerStore {
    db: DatabaseConnection,
}

impl CustomerStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerRepository for CustomerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>> {
        let model = CustomerEntity::find_by_id(id).one(&self.db).await?;
        match model {
            Some(model) => Ok(Some(hydrate(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Customer>> {
        let model = CustomerEntity::find()
            .filter(customer::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        match model {
            Some(model) => Ok(Some(hydrate(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, new: NewCustomer) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        let active = customer::ActiveModel {
            id: Set(id),
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            email: Set(new.email),
            username: Set(new.username),
            password: Set(new.password.hash().to_string()),
            salt: Set(new.password.salt().to_string()),
        };

        CustomerEntity::insert(active)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| AppError::from_insert(e, ENTITY_USER))?;

        Ok(id)
    }

    async fn find_address(&self, id: Uuid) -> AppResult<Option<Address>> {
        let model = AddressEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Address::from))
    }

    async fn list_addresses(&self, customer_id: Uuid) -> AppResult<Vec<Address>> {
        let ids = address_ids(&self.db, customer_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = AddressEntity::find()
            .filter(address::Column::Id.is_in(ids))
            .order_by_asc(address::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Address::from).collect())
    }

    async fn find_card(&self, id: Uuid) -> AppResult<Option<Card>> {
        let model = CardEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Card::from))
    }

    async fn list_cards(&self, customer_id: Uuid) -> AppResult<Vec<Card>> {
        let ids = card_ids(&self.db, customer_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = CardEntity::find()
            .filter(card::Column::Id.is_in(ids))
            .order_by_asc(card::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Card::from).collect())
    }
}

/// Attach join-table back-references to a customer row.
async fn hydrate<C: ConnectionTrait>(db: &C, model: customer::Model) -> AppResult<Customer> {
    let address_ids = address_ids(db, model.id).await?;
    let card_ids = card_ids(db, model.id).await?;

    Ok(Customer {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        username: model.username,
        password: Password::from_parts(model.password, model.salt),
        address_ids,
        card_ids,
    })
}

async fn address_ids<C: ConnectionTrait>(db: &C, customer_id: Uuid) -> AppResult<BTreeSet<Uuid>> {
    let rows = CustomerAddressEntity::find()
        .filter(customer_address::Column::CustomerId.eq(customer_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.address_id).collect())
}

async fn card_ids<C: ConnectionTrait>(db: &C, customer_id: Uuid) -> AppResult<BTreeSet<Uuid>> {
    let rows = CustomerCardEntity::find()
        .filter(customer_card::Column::CustomerId.eq(customer_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.card_id).collect())
}

pub(crate) async fn customer_exists<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<bool> {
    let count = CustomerEntity::find_by_id(id).count(db).await?;
    Ok(count > 0)
}

/// Insert a card row. A repeated card number yields `DuplicateEntry("card")`.
pub(crate) async fn insert_card<C: ConnectionTrait>(db: &C, card: NewCard) -> AppResult<Uuid> {
    let id = Uuid::new_v4();
    let active = card::ActiveModel {
        id: Set(id),
        long_num: Set(card.long_num),
        expires: Set(card.expires),
        ccv: Set(card.ccv),
    };

    CardEntity::insert(active)
        .exec_without_returning(db)
        .await
        .map_err(|e| AppError::from_insert(e, ENTITY_CARD))?;

    Ok(id)
}

pub(crate) async fn link_card<C: ConnectionTrait>(
    db: &C,
    customer_id: Uuid,
    card_id: Uuid,
) -> AppResult<()> {
    let active = customer_card::ActiveModel {
        customer_id: Set(customer_id),
        card_id: Set(card_id),
    };

    CustomerCardEntity::insert(active)
        .exec_without_returning(db)
        .await
        .with_context(|| format!("link card {} to customer {}", card_id, customer_id))?;
    Ok(())
}

pub(crate) async fn insert_address<C: ConnectionTrait>(
    db: &C,
    address: NewAddress,
) -> AppResult<Uuid> {
    let id = Uuid::new_v4();
    let active = address::ActiveModel {
        id: Set(id),
        street: Set(address.street),
        number: Set(address.number),
        country: Set(address.country),
        city: Set(address.city),
        postcode: Set(address.postcode),
    };

    AddressEntity::insert(active)
        .exec_without_returning(db)
        .await
        .context(format!("insert {}", ENTITY_ADDRESS))?;

    Ok(id)
}

pub(crate) async fn link_address<C: ConnectionTrait>(
    db: &C,
    customer_id: Uuid,
    address_id: Uuid,
) -> AppResult<()> {
    let active = customer_address::ActiveModel {
        customer_id: Set(customer_id),
        address_id: Set(address_id),
    };

    CustomerAddressEntity::insert(active)
        .exec_without_returning(db)
        .await
        .with_context(|| format!("link address {} to customer {}", address_id, customer_id))?;
    Ok(())
}
