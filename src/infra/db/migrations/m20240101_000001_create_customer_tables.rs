//! Migration: customers, their addresses and cards, and the join tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customer::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customer::FirstName).string().not_null())
                    .col(ColumnDef::new(Customer::LastName).string().not_null())
                    .col(ColumnDef::new(Customer::Email).string().not_null())
                    .col(
                        ColumnDef::new(Customer::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customer::Password).string().not_null())
                    .col(ColumnDef::new(Customer::Salt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Address::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Address::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Address::Street).string().not_null())
                    .col(ColumnDef::new(Address::Number).string().not_null())
                    .col(ColumnDef::new(Address::Country).string().not_null())
                    .col(ColumnDef::new(Address::City).string().not_null())
                    .col(ColumnDef::new(Address::Postcode).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Card::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Card::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Card::LongNum).string().not_null().unique_key())
                    .col(ColumnDef::new(Card::Expires).string().not_null())
                    .col(ColumnDef::new(Card::Ccv).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerAddress::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CustomerAddress::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(CustomerAddress::AddressId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(CustomerAddress::CustomerId)
                            .col(CustomerAddress::AddressId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_address_customer")
                            .from(CustomerAddress::Table, CustomerAddress::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_address_address")
                            .from(CustomerAddress::Table, CustomerAddress::AddressId)
                            .to(Address::Table, Address::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerCard::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CustomerCard::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(CustomerCard::CardId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(CustomerCard::CustomerId)
                            .col(CustomerCard::CardId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_card_customer")
                            .from(CustomerCard::Table, CustomerCard::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_card_card")
                            .from(CustomerCard::Table, CustomerCard::CardId)
                            .to(Card::Table, Card::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Join tables first
        manager
            .drop_table(Table::drop().table(CustomerCard::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CustomerAddress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Card::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Address::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customer::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Customer {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Username,
    Password,
    Salt,
}

#[derive(Iden)]
enum Address {
    Table,
    Id,
    Street,
    Number,
    Country,
    City,
    Postcode,
}

#[derive(Iden)]
enum Card {
    Table,
    Id,
    LongNum,
    Expires,
    Ccv,
}

#[derive(Iden)]
enum CustomerAddress {
    Table,
    CustomerId,
    AddressId,
}

#[derive(Iden)]
enum CustomerCard {
    Table,
    CustomerId,
    CardId,
}
