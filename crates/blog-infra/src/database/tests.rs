use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use sea_orm::{DatabaseBackend, DbConn, MockDatabase, MockExecResult, QueryTrait, Value};

use blog_core::domain::fields::TAG_MAX_LEN;
use blog_core::domain::{Comment, NewComment, NewPost, Post, PostStatus};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository};
use blog_core::query::PostScope;

use crate::database::BlogDatabase;
use crate::database::entity::{comment, post};
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, free_tag_slug, scoped_posts,
    tagged_post_ids,
};
use crate::store::BlogStore;

fn post_model(id: i64, slug: &str, status: post::Status) -> post::Model {
    let at = Utc.with_ymd_and_hms(2024, 10, 30, 14, 22, 0).unwrap();
    post::Model {
        id,
        title: "Test Post".to_owned(),
        slug: slug.to_owned(),
        author_id: 1,
        body: "Content".to_owned(),
        publish: at.into(),
        created: at.into(),
        updated: at.into(),
        status,
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(7, "hello", post::Status::Draft)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(7).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, 7);
    assert_eq!(post.status, PostStatus::Draft);
}

#[tokio::test]
async fn test_create_post_checks_slug_then_inserts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            Vec::<post::Model>::new(),
            vec![post_model(1, "hello", post::Status::Draft)],
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let created = repo
        .create(NewPost::new(1, "Test Post", "hello", "Content"))
        .await
        .unwrap();

    assert_eq!(created.id, 1);
    assert_eq!(created.slug, "hello");
}

#[tokio::test]
async fn test_create_post_rejects_taken_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(3, "hello", post::Status::Published)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let publish = Utc.with_ymd_and_hms(2024, 10, 30, 9, 0, 0).unwrap();
    let err = repo
        .create(NewPost::new(1, "Again", "hello", "Content").published_at(publish))
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::Constraint(_)));
}

#[tokio::test]
async fn test_create_post_validates_before_querying() {
    // No results queued: any query would fail the test with a Query error.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let repo = PostgresPostRepository::new(db);
    let err = repo
        .create(NewPost::new(1, "", "hello", "Content"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn test_list_maps_models_in_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            post_model(2, "second", post::Status::Published),
            post_model(1, "first", post::Status::Published),
        ]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let posts = repo.list(PostScope::Published).await.unwrap();

    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let err = BaseRepository::<Post, i64>::delete(&repo, 99).await.unwrap_err();

    assert_eq!(err, RepoError::NotFound);
}

fn comment_model(id: i64, active: bool) -> comment::Model {
    let at = Utc.with_ymd_and_hms(2024, 10, 30, 14, 22, 0).unwrap();
    comment::Model {
        id,
        post_id: 1,
        name: "Olena".to_owned(),
        email: "olena@example.com".to_owned(),
        body: "Nice".to_owned(),
        created: at.into(),
        updated: at.into(),
        active,
    }
}

/// SQL of the first statement starting with `verb`, and its SET clause.
fn logged_statement(db: Arc<DbConn>, verb: &str) -> (String, String) {
    let db = Arc::into_inner(db).expect("repository still holds the connection");
    let sql = db
        .into_transaction_log()
        .iter()
        .flat_map(|txn| txn.statements().to_vec())
        .map(|stmt| stmt.sql)
        .find(|sql| sql.starts_with(verb))
        .unwrap_or_else(|| panic!("no {verb} statement was executed"));

    let start = sql.find(" SET ").expect("UPDATE has a SET clause");
    let end = sql.find(" WHERE ").expect("UPDATE has a WHERE clause");
    let set = sql[start..end].to_owned();
    (sql, set)
}

#[tokio::test]
async fn test_update_post_stamps_updated_but_never_created() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![post_model(7, "hello", post::Status::Draft)],
                vec![post_model(7, "hello", post::Status::Published)],
            ])
            .into_connection(),
    );

    let repo = PostgresPostRepository::shared(Arc::clone(&db));
    let mut changed = Post::from(post_model(7, "hello", post::Status::Draft));
    changed.status = PostStatus::Published;
    let stored = repo.update(changed).await.unwrap();
    drop(repo);

    assert_eq!(stored.status, PostStatus::Published);

    let (sql, set) = logged_statement(db, "UPDATE");
    assert!(set.contains(r#""updated" = "#), "{sql}");
    assert!(!set.contains(r#""created""#), "{sql}");
    assert!(sql.contains(r#"WHERE "post"."id" = "#), "{sql}");
}

#[tokio::test]
async fn test_update_post_rejects_slug_held_by_another_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(3, "hello", post::Status::Published)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let mine = Post::from(post_model(7, "hello", post::Status::Draft));
    let err = repo.update(mine).await.unwrap_err();

    assert!(matches!(err, RepoError::Constraint(_)));
}

#[tokio::test]
async fn test_update_comment_stamps_updated_but_never_created() {
    let db = Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![comment_model(5, false)]])
            .into_connection(),
    );

    let repo = PostgresCommentRepository::shared(Arc::clone(&db));
    let mut hidden = Comment::from(comment_model(5, true));
    hidden.active = false;
    let stored = repo.update(hidden).await.unwrap();
    drop(repo);

    assert!(!stored.active);

    let (sql, set) = logged_statement(db, "UPDATE");
    assert!(set.contains(r#""active" = "#), "{sql}");
    assert!(set.contains(r#""updated" = "#), "{sql}");
    assert!(!set.contains(r#""created""#), "{sql}");
}

#[tokio::test]
async fn test_store_shares_one_pool_across_repositories() {
    let db = BlogDatabase {
        conn: Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![post_model(2, "live", post::Status::Published)]])
                .append_query_results([vec![comment_model(9, true)]])
                .into_connection(),
        ),
    };

    let store = BlogStore::postgres(&db);
    let posts = store.published_posts().await.unwrap();
    let comments = store.comments.find_by_post(2, true).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(comments.len(), 1);
    assert_eq!(Arc::strong_count(&db.conn), 5);
}

#[tokio::test]
async fn test_comments_for_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment_model(5, true)]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments = repo.find_by_post(1, true).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].name, "Olena");
    assert!(comments[0].active);
}

#[tokio::test]
async fn test_comment_with_bad_email_is_rejected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let repo = PostgresCommentRepository::new(db);
    let err = repo
        .create(NewComment::new(1, "Olena", "olena", "Nice"))
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::Validation(_)));
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::from(n))])
}

#[tokio::test]
async fn test_colliding_tag_slug_is_shortened_to_fit() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[count_row(1)], [count_row(0)]])
        .into_connection();

    let slug = free_tag_slug(&db, &"a".repeat(TAG_MAX_LEN)).await.unwrap();

    assert_eq!(slug.chars().count(), TAG_MAX_LEN);
    assert!(slug.ends_with("a_1"), "{slug}");
}

#[test]
fn published_scope_filters_on_status_and_orders_by_publish() {
    let sql = scoped_posts(PostScope::Published)
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#""post"."status" = 'PB'"#), "{sql}");
    assert!(sql.contains(r#"ORDER BY "post"."publish" DESC"#), "{sql}");
}

#[test]
fn all_scope_has_no_status_filter() {
    let sql = scoped_posts(PostScope::All)
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(!sql.contains("WHERE"), "{sql}");
    assert!(sql.contains(r#"ORDER BY "post"."publish" DESC"#), "{sql}");
}

#[test]
fn tagged_subquery_joins_tags_for_posts() {
    let sql = tagged_post_ids("rust").to_string(sea_orm::sea_query::PostgresQueryBuilder);

    assert!(sql.contains(r#"FROM "taggit_taggeditem""#), "{sql}");
    assert!(sql.contains(r#"INNER JOIN "taggit_tag""#), "{sql}");
    assert!(sql.contains("'blog.post'"), "{sql}");
    assert!(sql.contains("'rust'"), "{sql}");
}
