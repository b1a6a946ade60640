use sea_orm_migration::prelude::*;

use crate::schema::{Post, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

pub(crate) fn create_post() -> TableCreateStatement {
    Table::create()
        .table(Post::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Post::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Post::Title).string_len(250).not_null())
        .col(ColumnDef::new(Post::Slug).string_len(250).not_null())
        .col(ColumnDef::new(Post::AuthorId).big_integer().not_null())
        .col(ColumnDef::new(Post::Body).text().not_null())
        .col(ColumnDef::new(Post::Publish).timestamp_with_time_zone().not_null())
        .col(ColumnDef::new(Post::Created).timestamp_with_time_zone().not_null())
        .col(ColumnDef::new(Post::Updated).timestamp_with_time_zone().not_null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_post_author_id")
                .from(Post::Table, Post::AuthorId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

pub(crate) fn author_index() -> IndexCreateStatement {
    Index::create()
        .name("post_author_id_idx")
        .table(Post::Table)
        .col(Post::AuthorId)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(create_post()).await?;
        manager.create_index(author_index()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Post::Table).to_owned())
            .await
    }
}
