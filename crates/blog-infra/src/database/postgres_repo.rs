//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, Query, SelectStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};

use blog_core::domain::fields::mask_email;
use blog_core::domain::tag::{suffixed_slug, tag_slug};
use blog_core::domain::{Comment, NewComment, NewPost, NewUser, Post, Tag, TaggedObject, User};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};
use blog_core::query::PostScope;

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::tagged_item::{self, Entity as TaggedItemEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// Base post query for a scope, newest `publish` first.
///
/// The returned select composes with further filters.
pub fn scoped_posts(scope: PostScope) -> Select<PostEntity> {
    let query = PostEntity::find();
    let query = match scope.required_status() {
        Some(status) => query.filter(post::Column::Status.eq(post::Status::from(status))),
        None => query,
    };
    query
        .order_by_desc(post::Column::Publish)
        .order_by_desc(post::Column::Id)
}

/// Ids of posts carrying the tag with `tag_slug`.
pub(crate) fn tagged_post_ids(tag_slug: &str) -> SelectStatement {
    Query::select()
        .column((TaggedItemEntity, tagged_item::Column::ObjectId))
        .from(TaggedItemEntity)
        .inner_join(
            TagEntity,
            Expr::col((TagEntity, tag::Column::Id))
                .equals((TaggedItemEntity, tagged_item::Column::TagId)),
        )
        .and_where(
            Expr::col((TaggedItemEntity, tagged_item::Column::ContentType)).eq(Post::CONTENT_TYPE),
        )
        .and_where(Expr::col((TagEntity, tag::Column::Slug)).eq(tag_slug))
        .to_owned()
}

/// Half-open UTC range covering `date`.
fn day_bounds(date: NaiveDate) -> (DateTimeWithTimeZone, DateTimeWithTimeZone) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    let end = start + Duration::days(1);
    (start.into(), end.into())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        user.validate()?;
        tracing::debug!(username = %user.username, "Creating user");

        let model = user::ActiveModel::from(user)
            .insert(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        post.validate()?;

        // The unique index enforces this too; checking first gives a clearer error.
        let date = post.publish.unwrap_or_else(Utc::now).date_naive();
        if self
            .find_by_date_and_slug(date, &post.slug, PostScope::All)
            .await?
            .is_some()
        {
            return Err(Post::slug_taken(&post.slug, date).into());
        }

        tracing::debug!(slug = %post.slug, author_id = post.author_id, "Creating post");
        let model = post::ActiveModel::from(post)
            .insert(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        post.validate()?;

        let date = post.publish_date();
        if let Some(other) = self
            .find_by_date_and_slug(date, &post.slug, PostScope::All)
            .await?
        {
            if other.id != post.id {
                return Err(Post::slug_taken(&post.slug, date).into());
            }
        }

        tracing::debug!(post_id = post.id, "Updating post");
        let model = post::ActiveModel::from(post)
            .update(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn list(&self, scope: PostScope) -> Result<Vec<Post>, RepoError> {
        let result = scoped_posts(scope)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_tagged(
        &self,
        scope: PostScope,
        tag_slug: &str,
    ) -> Result<Vec<Post>, RepoError> {
        let result = scoped_posts(scope)
            .filter(post::Column::Id.in_subquery(tagged_post_ids(tag_slug)))
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_date_and_slug(
        &self,
        date: NaiveDate,
        slug: &str,
        scope: PostScope,
    ) -> Result<Option<Post>, RepoError> {
        let (start, end) = day_bounds(date);
        let result = scoped_posts(scope)
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end))
            .one(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_author(&self, author_id: i64) -> Result<Vec<Post>, RepoError> {
        let result = scoped_posts(PostScope::All)
            .filter(post::Column::AuthorId.eq(author_id))
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        comment.validate()?;
        tracing::debug!(
            post_id = comment.post_id,
            email = %mask_email(&comment.email),
            "Creating comment"
        );

        // A missing post surfaces as a foreign-key violation.
        let model = comment::ActiveModel::from(comment)
            .insert(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        comment.validate()?;
        tracing::debug!(comment_id = comment.id, active = comment.active, "Updating comment");

        let model = comment::ActiveModel::from(comment)
            .update(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_post(
        &self,
        post_id: i64,
        active_only: bool,
    ) -> Result<Vec<Comment>, RepoError> {
        let mut query = CommentEntity::find().filter(comment::Column::PostId.eq(post_id));
        if active_only {
            query = query.filter(comment::Column::Active.eq(true));
        }

        let result = query
            .order_by_asc(comment::Column::Created)
            .order_by_asc(comment::Column::Id)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

async fn load_tags<C>(db: &C, object: TaggedObject) -> Result<Vec<Tag>, RepoError>
where
    C: ConnectionTrait,
{
    let result = TagEntity::find()
        .inner_join(TaggedItemEntity)
        .filter(tagged_item::Column::ContentType.eq(object.content_type))
        .filter(tagged_item::Column::ObjectId.eq(object.object_id))
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
        .map_err(map_db_err)?;

    Ok(result.into_iter().map(Into::into).collect())
}

/// Picks a free slug for a new tag, suffixing `_1`, `_2`, ... on collision.
pub(crate) async fn free_tag_slug<C>(db: &C, name: &str) -> Result<String, RepoError>
where
    C: ConnectionTrait,
{
    let base = tag_slug(name)?;
    let mut candidate = base.clone();
    let mut suffix = 1;
    loop {
        let taken = TagEntity::find()
            .filter(tag::Column::Slug.eq(candidate.as_str()))
            .count(db)
            .await
            .map_err(map_db_err)?;
        if taken == 0 {
            return Ok(candidate);
        }
        candidate = suffixed_slug(&base, suffix);
        suffix += 1;
    }
}

async fn get_or_create_tag<C>(db: &C, name: &str) -> Result<tag::Model, RepoError>
where
    C: ConnectionTrait,
{
    let existing = TagEntity::find()
        .filter(tag::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(map_db_err)?;
    if let Some(tag) = existing {
        return Ok(tag);
    }

    let slug = free_tag_slug(db, name).await?;
    tracing::debug!(tag = %name, slug = %slug, "Creating tag");
    tag::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slug),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(map_db_err)
}

async fn attach_tags<C>(db: &C, object: TaggedObject, names: &[String]) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let tag = get_or_create_tag(db, name).await?;

        let linked = TaggedItemEntity::find()
            .filter(tagged_item::Column::TagId.eq(tag.id))
            .filter(tagged_item::Column::ContentType.eq(object.content_type))
            .filter(tagged_item::Column::ObjectId.eq(object.object_id))
            .count(db)
            .await
            .map_err(map_db_err)?;
        if linked > 0 {
            continue;
        }

        tagged_item::ActiveModel {
            tag_id: Set(tag.id),
            content_type: Set(object.content_type.to_string()),
            object_id: Set(object.object_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(map_db_err)?;
    }
    Ok(())
}

async fn detach_all<C>(db: &C, object: TaggedObject) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    TaggedItemEntity::delete_many()
        .filter(tagged_item::Column::ContentType.eq(object.content_type))
        .filter(tagged_item::Column::ObjectId.eq(object.object_id))
        .exec(db)
        .await
        .map_err(map_db_err)?;
    Ok(())
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn tags_for(&self, object: TaggedObject) -> Result<Vec<Tag>, RepoError> {
        load_tags(self.conn(), object).await
    }

    async fn set_tags(
        &self,
        object: TaggedObject,
        names: &[String],
    ) -> Result<Vec<Tag>, RepoError> {
        tracing::debug!(
            content_type = object.content_type,
            object_id = object.object_id,
            count = names.len(),
            "Replacing tags"
        );

        let txn = self.conn().begin().await.map_err(map_db_err)?;
        detach_all(&txn, object).await?;
        attach_tags(&txn, object, names).await?;
        let tags = load_tags(&txn, object).await?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(tags)
    }

    async fn add_tags(
        &self,
        object: TaggedObject,
        names: &[String],
    ) -> Result<Vec<Tag>, RepoError> {
        let txn = self.conn().begin().await.map_err(map_db_err)?;
        attach_tags(&txn, object, names).await?;
        let tags = load_tags(&txn, object).await?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(tags)
    }

    async fn clear(&self, object: TaggedObject) -> Result<(), RepoError> {
        detach_all(self.conn(), object).await
    }

    async fn all(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(self.conn())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
