//! Generic tagging: tags are shared by every entity type, and a tagged item
//! points at any row through `(content_type, object_id)`.

use sea_orm_migration::prelude::*;

use crate::schema::{TaggitTag, TaggitTaggeditem};

#[derive(DeriveMigrationName)]
pub struct Migration;

pub(crate) fn create_tag() -> TableCreateStatement {
    Table::create()
        .table(TaggitTag::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(TaggitTag::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(TaggitTag::Name)
                .string_len(100)
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(TaggitTag::Slug)
                .string_len(100)
                .not_null()
                .unique_key(),
        )
        .to_owned()
}

pub(crate) fn create_tagged_item() -> TableCreateStatement {
    Table::create()
        .table(TaggitTaggeditem::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(TaggitTaggeditem::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(TaggitTaggeditem::TagId).big_integer().not_null())
        .col(
            ColumnDef::new(TaggitTaggeditem::ContentType)
                .string_len(100)
                .not_null(),
        )
        .col(ColumnDef::new(TaggitTaggeditem::ObjectId).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_taggeditem_tag_id")
                .from(TaggitTaggeditem::Table, TaggitTaggeditem::TagId)
                .to(TaggitTag::Table, TaggitTag::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade),
        )
        .index(
            Index::create()
                .name("taggeditem_content_object_tag_uniq")
                .col(TaggitTaggeditem::ContentType)
                .col(TaggitTaggeditem::ObjectId)
                .col(TaggitTaggeditem::TagId)
                .unique(),
        )
        .to_owned()
}

pub(crate) fn object_index() -> IndexCreateStatement {
    Index::create()
        .name("taggeditem_content_object_idx")
        .table(TaggitTaggeditem::Table)
        .col(TaggitTaggeditem::ContentType)
        .col(TaggitTaggeditem::ObjectId)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(create_tag()).await?;
        manager.create_table(create_tagged_item()).await?;
        manager.create_index(object_index()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaggitTaggeditem::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TaggitTag::Table).to_owned())
            .await
    }
}
