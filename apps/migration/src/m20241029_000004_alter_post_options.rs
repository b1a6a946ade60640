//! Posts list newest first. Ordering itself lives in the queries; the
//! schema side is an index matching it.

use sea_orm_migration::prelude::*;

use crate::schema::Post;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub(crate) fn publish_index() -> IndexCreateStatement {
    Index::create()
        .name("post_publish_idx")
        .table(Post::Table)
        .col((Post::Publish, IndexOrder::Desc))
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_index(publish_index()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("post_publish_idx")
                    .table(Post::Table)
                    .to_owned(),
            )
            .await
    }
}
