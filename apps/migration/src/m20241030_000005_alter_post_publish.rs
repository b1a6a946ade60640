//! `publish` defaults to the insertion time, and a slug may be reused only
//! on a different publish date.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

use crate::schema::Post;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Publish dates are compared in UTC, which keeps the expression immutable
/// and therefore indexable.
pub(crate) const CREATE_SLUG_DATE_UNIQUE: &str = r#"CREATE UNIQUE INDEX IF NOT EXISTS "post_slug_publish_date_uniq" ON "post" ("slug", (("publish" AT TIME ZONE 'UTC')::date))"#;

const DROP_SLUG_DATE_UNIQUE: &str = r#"DROP INDEX IF EXISTS "post_slug_publish_date_uniq""#;

pub(crate) fn publish_default_now() -> TableAlterStatement {
    Table::alter()
        .table(Post::Table)
        .modify_column(
            ColumnDef::new(Post::Publish)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.alter_table(publish_default_now()).await?;
        manager
            .get_connection()
            .execute_unprepared(CREATE_SLUG_DATE_UNIQUE)
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DROP_SLUG_DATE_UNIQUE)
            .await?;
        manager
            .get_connection()
            .execute_unprepared(r#"ALTER TABLE "post" ALTER COLUMN "publish" DROP DEFAULT"#)
            .await?;
        Ok(())
    }
}
