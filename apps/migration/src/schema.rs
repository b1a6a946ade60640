//! Table and column identifiers shared by the migration steps.

use sea_orm_migration::prelude::*;

/// Content type label the blog uses in `taggit_taggeditem`.
pub const POST_CONTENT_TYPE: &str = "blog.post";

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Username,
    Email,
    DateJoined,
}

#[derive(DeriveIden)]
pub enum Post {
    Table,
    Id,
    Title,
    Slug,
    AuthorId,
    Body,
    Publish,
    Created,
    Updated,
    Status,
}

#[derive(DeriveIden)]
pub enum Comment {
    Table,
    Id,
    PostId,
    Name,
    Email,
    Body,
    Created,
    Updated,
    Active,
}

#[derive(DeriveIden)]
pub enum TaggitTag {
    Table,
    Id,
    Name,
    Slug,
}

#[derive(DeriveIden)]
pub enum TaggitTaggeditem {
    Table,
    Id,
    TagId,
    ContentType,
    ObjectId,
}
