use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use blogicum_core::domain::{Category, Post};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{BaseRepository, CategoryRepository, CommentRepository, PostRepository};

use super::entity::{category, comment, post, user};
use super::postgres_repo::PostgresRepositories;

fn post_model(id: Uuid, author_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        title: "Test Post".to_owned(),
        text: "Content".to_owned(),
        pub_date: now.into(),
        image: None,
        author_id,
        location_id: None,
        category_id: None,
        is_published: true,
        created_at: now.into(),
    }
}

fn user_model(id: Uuid, username: &str) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        username: username.to_owned(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        password_hash: "hash".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, author_id)]])
        .into_connection();

    let repos = PostgresRepositories::new(db);
    let result: Option<Post> = repos.posts.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
}

#[tokio::test]
async fn test_find_category_by_slug() {
    let id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![category::Model {
            id,
            title: "Travel".to_owned(),
            description: "Trips".to_owned(),
            slug: "travel".to_owned(),
            is_published: false,
            created_at: Utc::now().into(),
        }]])
        .into_connection();

    let repos = PostgresRepositories::new(db);
    let found: Category = repos.categories.find_by_slug("travel").await.unwrap().unwrap();

    assert_eq!(found.id, id);
    assert!(!found.is_published);
}

#[tokio::test]
async fn test_save_inserts_unknown_row() {
    let author_id = Uuid::new_v4();
    let post = Post::new(author_id, "Fresh".into(), "Body".into(), Utc::now());
    let stored = post_model(post.id, author_id);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // existence probe, then INSERT ... RETURNING
        .append_query_results(vec![Vec::<post::Model>::new()])
        .append_query_results(vec![vec![stored]])
        .into_connection();

    let repos = PostgresRepositories::new(db);
    let saved = repos.posts.save(post.clone()).await.unwrap();
    assert_eq!(saved.id, post.id);
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repos = PostgresRepositories::new(db);
    let result = repos.comments.delete(Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_comment_thread_carries_author_names() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let row = (
        comment::Model {
            id: Uuid::new_v4(),
            text: "First!".to_owned(),
            created_at: Utc::now().into(),
            author_id,
            post_id,
        },
        Some(user_model(author_id, "gogol")),
    );

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();

    let repos = PostgresRepositories::new(db);
    let thread = repos.comments.list_for_post(post_id).await.unwrap();

    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].author_username, "gogol");
    assert_eq!(thread[0].comment.text, "First!");
}

#[tokio::test]
async fn test_missing_summary_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<post::Model>::new()])
        .into_connection();

    let repos = PostgresRepositories::new(db);
    assert!(repos.posts.find_summary(Uuid::new_v4()).await.unwrap().is_none());
}
