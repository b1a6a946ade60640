//! Author accounts. Owned by the surrounding application; the blog only
//! needs the table so `post.author_id` has something to reference.

use sea_orm_migration::prelude::*;

use crate::schema::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub(crate) fn create_users() -> TableCreateStatement {
    Table::create()
        .table(Users::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Users::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Users::Username)
                .string_len(150)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Users::Email).string_len(254).not_null().default(""))
        .col(
            ColumnDef::new(Users::DateJoined)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(create_users()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
