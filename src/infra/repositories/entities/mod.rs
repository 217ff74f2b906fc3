//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod address;
pub mod card;
pub mod customer;
pub mod customer_address;
pub mod customer_card;
pub mod sock;
pub mod sock_tag;
pub mod tag;
