//! Domain layer - Core business entities and logic
//!
//! Catalogue and customer models, independent of storage and HTTP.

pub mod catalogue;
pub mod customer;
pub mod links;
pub mod password;

pub use catalogue::{Sock, SockOrder, SockQuery};
pub use customer::{
    mask_card_number, Address, AddressResponse, Card, CardResponse, Customer, CustomerResponse,
    NewAddress, NewCard, NewCustomer,
};
pub use links::{Href, LinkDomain, Links};
pub use password::Password;
