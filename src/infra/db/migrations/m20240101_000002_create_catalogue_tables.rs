//! Migration: socks, tags and the sock to tag join table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sock::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sock::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sock::Name).string().not_null())
                    .col(ColumnDef::new(Sock::Description).text().not_null())
                    .col(ColumnDef::new(Sock::Price).double().not_null())
                    .col(ColumnDef::new(Sock::Count).integer().not_null())
                    .col(ColumnDef::new(Sock::ImageUrls).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tag::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tag::Name).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SockTag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SockTag::SockId).uuid().not_null())
                    .col(ColumnDef::new(SockTag::TagId).integer().not_null())
                    .primary_key(Index::create().col(SockTag::SockId).col(SockTag::TagId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sock_tag_sock")
                            .from(SockTag::Table, SockTag::SockId)
                            .to(Sock::Table, Sock::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sock_tag_tag")
                            .from(SockTag::Table, SockTag::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SockTag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sock::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Sock {
    Table,
    Id,
    Name,
    Description,
    Price,
    Count,
    ImageUrls,
}

#[derive(Iden)]
enum Tag {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum SockTag {
    Table,
    SockId,
    TagId,
}
