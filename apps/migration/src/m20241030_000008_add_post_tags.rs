//! Posts gain tags. The relation adds no column: links live in
//! `taggit_taggeditem`, which has no foreign key to `post`, so a trigger
//! removes a post's links when the post is deleted.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use crate::schema::POST_CONTENT_TYPE;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub(crate) fn create_function() -> String {
    format!(
        r#"CREATE OR REPLACE FUNCTION "post_delete_tagged_items"() RETURNS trigger AS $$
BEGIN
    DELETE FROM "taggit_taggeditem"
    WHERE "content_type" = '{POST_CONTENT_TYPE}' AND "object_id" = OLD."id";
    RETURN OLD;
END;
$$ LANGUAGE plpgsql"#
    )
}

const CREATE_TRIGGER: &str = r#"CREATE TRIGGER "post_delete_tagged_items" AFTER DELETE ON "post" FOR EACH ROW EXECUTE FUNCTION "post_delete_tagged_items"()"#;

const DROP_TRIGGER: &str = r#"DROP TRIGGER IF EXISTS "post_delete_tagged_items" ON "post""#;

const DROP_FUNCTION: &str = r#"DROP FUNCTION IF EXISTS "post_delete_tagged_items"()"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(&create_function()).await?;
        db.execute_unprepared(DROP_TRIGGER).await?;
        db.execute_unprepared(CREATE_TRIGGER).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_TRIGGER).await?;
        db.execute_unprepared(DROP_FUNCTION).await?;
        Ok(())
    }
}
