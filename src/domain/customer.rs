//! Customer aggregate: the customer plus the addresses and cards linked to it.

use std::collections::BTreeSet;

use serde::Serialize;
use uuid::Uuid;

use super::links::{LinkDomain, Links};
use super::password::Password;
use crate::config::{CARD_MASK_CHAR, VISIBLE_CARD_DIGITS};

/// Customer domain entity
///
/// `address_ids` and `card_ids` are read back from the join tables; ownership
/// of addresses and cards lives in those tables, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: Password,
    pub address_ids: BTreeSet<Uuid>,
    pub card_ids: BTreeSet<Uuid>,
}

/// Input for registering a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub password: Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub id: Uuid,
    pub street: String,
    pub number: String,
    pub country: String,
    pub city: String,
    pub postcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub street: String,
    pub number: String,
    pub country: String,
    pub city: String,
    pub postcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: Uuid,
    pub long_num: String,
    pub expires: String,
    pub ccv: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub long_num: String,
    pub expires: String,
    pub ccv: String,
}

impl Card {
    /// Card number with everything but the last four characters masked.
    pub fn masked_number(&self) -> String {
        mask_card_number(&self.long_num)
    }
}

/// Replace all but the last `VISIBLE_CARD_DIGITS` characters with the mask
/// character. Numbers of four characters or fewer are returned unchanged.
pub fn mask_card_number(number: &str) -> String {
    let len = number.chars().count();
    let hidden = len.saturating_sub(VISIBLE_CARD_DIGITS);

    std::iter::repeat(CARD_MASK_CHAR)
        .take(hidden)
        .chain(number.chars().skip(hidden))
        .collect()
}

/// Customer as rendered to clients. Credentials never leave the service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub id: Uuid,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl CustomerResponse {
    pub fn new(customer: Customer, domain: &LinkDomain) -> Self {
        Self {
            links: domain.customer(customer.id),
            first_name: customer.first_name,
            last_name: customer.last_name,
            username: customer.username,
            email: customer.email,
            id: customer.id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddressResponse {
    pub id: Uuid,
    pub street: String,
    pub number: String,
    pub country: String,
    pub city: String,
    pub postcode: String,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl AddressResponse {
    pub fn new(address: Address, domain: &LinkDomain) -> Self {
        Self {
            links: domain.address(address.id),
            id: address.id,
            street: address.street,
            number: address.number,
            country: address.country,
            city: address.city,
            postcode: address.postcode,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    pub id: Uuid,
    pub long_num: String,
    pub expires: String,
    pub ccv: String,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl CardResponse {
    /// Build the client view; the card number is always masked.
    pub fn new(card: Card, domain: &LinkDomain) -> Self {
        Self {
            links: domain.card(card.id),
            long_num: card.masked_number(),
            id: card.id,
            expires: card.expires,
            ccv: card.ccv,
        }
    }
}
