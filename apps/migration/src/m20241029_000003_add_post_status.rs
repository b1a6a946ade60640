use sea_orm_migration::prelude::*;

use crate::schema::Post;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// `DF` = draft, `PB` = published.
pub(crate) fn add_status() -> TableAlterStatement {
    Table::alter()
        .table(Post::Table)
        .add_column(
            ColumnDef::new(Post::Status)
                .string_len(2)
                .not_null()
                .default("DF"),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.alter_table(add_status()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Post::Table)
                    .drop_column(Post::Status)
                    .to_owned(),
            )
            .await
    }
}
