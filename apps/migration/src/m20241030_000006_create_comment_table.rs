use sea_orm_migration::prelude::*;

use crate::schema::{Comment, Post};

#[derive(DeriveMigrationName)]
pub struct Migration;

pub(crate) fn create_comment() -> TableCreateStatement {
    Table::create()
        .table(Comment::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Comment::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Comment::PostId).big_integer().not_null())
        .col(ColumnDef::new(Comment::Name).string_len(80).not_null())
        .col(ColumnDef::new(Comment::Email).string_len(254).not_null())
        .col(ColumnDef::new(Comment::Body).text().not_null())
        .col(
            ColumnDef::new(Comment::Created)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Comment::Updated)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Comment::Active)
                .boolean()
                .not_null()
                .default(true),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_comment_post_id")
                .from(Comment::Table, Comment::PostId)
                .to(Post::Table, Post::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

pub(crate) fn indexes() -> [IndexCreateStatement; 2] {
    [
        Index::create()
            .name("comment_created_idx")
            .table(Comment::Table)
            .col(Comment::Created)
            .to_owned(),
        Index::create()
            .name("comment_post_id_idx")
            .table(Comment::Table)
            .col(Comment::PostId)
            .to_owned(),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(create_comment()).await?;
        for index in indexes() {
            manager.create_index(index).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await
    }
}
