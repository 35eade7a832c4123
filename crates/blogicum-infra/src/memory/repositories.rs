//! Repository views over the shared in-memory store.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, Location, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use blogicum_core::query::{AuthoredComment, PageWindow, PostQuery, PostSummary};

use super::store::{InMemoryStore, Tables};

macro_rules! store_view {
    ($($name:ident => $doc:literal),+ $(,)?) => {
        $(
            #[doc = $doc]
            #[derive(Clone)]
            pub struct $name {
                store: Arc<InMemoryStore>,
            }

            impl $name {
                pub fn new(store: Arc<InMemoryStore>) -> Self {
                    Self { store }
                }
            }
        )+
    };
}

store_view!(
    InMemoryUserRepository => "In-memory user repository.",
    InMemoryCategoryRepository => "In-memory category repository.",
    InMemoryLocationRepository => "In-memory location repository.",
    InMemoryPostRepository => "In-memory post repository.",
    InMemoryCommentRepository => "In-memory comment repository.",
);

fn deleted(found: bool) -> Result<(), RepoError> {
    if found { Ok(()) } else { Err(RepoError::NotFound) }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        self.store.write().await.upsert_user(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        deleted(self.store.write().await.delete_user(id))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.store.read().await.categories.get(&id).cloned())
    }

    async fn save(&self, entity: Category) -> Result<Category, RepoError> {
        self.store.write().await.upsert_category(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        deleted(self.store.write().await.delete_category(id))
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.store.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> =
            self.store.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl BaseRepository<Location, Uuid> for InMemoryLocationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self.store.read().await.locations.get(&id).cloned())
    }

    async fn save(&self, entity: Location) -> Result<Location, RepoError> {
        Ok(self.store.write().await.upsert_location(entity))
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        deleted(self.store.write().await.delete_location(id))
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn list_all(&self) -> Result<Vec<Location>, RepoError> {
        let mut locations: Vec<Location> =
            self.store.read().await.locations.values().cloned().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}

/// Matching posts, newest publication first.
fn matching<'a>(tables: &'a Tables, query: &PostQuery) -> Vec<&'a Post> {
    let mut posts: Vec<&Post> = tables
        .posts
        .values()
        .filter(|p| query.matches(p, tables.category_of(p)))
        .collect();
    posts.sort_by_key(|p| (Reverse(p.pub_date), Reverse(p.created_at), p.id));
    posts
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        self.store.write().await.upsert_post(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        deleted(self.store.write().await.delete_post(id))
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn count_filtered(&self, query: &PostQuery) -> Result<u64, RepoError> {
        let tables = self.store.read().await;
        Ok(matching(&tables, query).len() as u64)
    }

    async fn list_filtered(
        &self,
        query: &PostQuery,
        window: &PageWindow,
    ) -> Result<Vec<PostSummary>, RepoError> {
        let tables = self.store.read().await;
        Ok(matching(&tables, query)
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.limit() as usize)
            .map(|p| tables.summarize(p))
            .collect())
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError> {
        let tables = self.store.read().await;
        Ok(tables.posts.get(&id).map(|p| tables.summarize(p)))
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, entity: Comment) -> Result<Comment, RepoError> {
        self.store.write().await.upsert_comment(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        deleted(self.store.write().await.comments.remove(&id).is_some())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<AuthoredComment>, RepoError> {
        let tables = self.store.read().await;
        let mut thread: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        thread.sort_by_key(|c| (c.created_at, c.id));
        Ok(thread.into_iter().map(|c| tables.authored(c)).collect())
    }

    async fn find_for_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, RepoError> {
        let tables = self.store.read().await;
        Ok(tables
            .comments
            .get(&comment_id)
            .filter(|c| c.post_id == post_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    struct Repos {
        users: InMemoryUserRepository,
        categories: InMemoryCategoryRepository,
        locations: InMemoryLocationRepository,
        posts: InMemoryPostRepository,
        comments: InMemoryCommentRepository,
    }

    fn repos() -> Repos {
        let store = Arc::new(InMemoryStore::new());
        Repos {
            users: InMemoryUserRepository::new(store.clone()),
            categories: InMemoryCategoryRepository::new(store.clone()),
            locations: InMemoryLocationRepository::new(store.clone()),
            posts: InMemoryPostRepository::new(store.clone()),
            comments: InMemoryCommentRepository::new(store),
        }
    }

    async fn user(repos: &Repos, name: &str) -> User {
        repos
            .users
            .save(User::new(name.into(), String::new(), "hash".into()))
            .await
            .unwrap()
    }

    async fn post(repos: &Repos, author: &User, category: Option<&Category>, age: i64) -> Post {
        let post = Post {
            category_id: category.map(|c| c.id),
            ..Post::new(
                author.id,
                format!("post aged {age}"),
                "text".into(),
                Utc::now() - Duration::minutes(age),
            )
        };
        repos.posts.save(post).await.unwrap()
    }

    #[tokio::test]
    async fn test_usernames_and_slugs_are_unique() {
        let repos = repos();
        user(&repos, "gogol").await;
        let duplicate = repos
            .users
            .save(User::new("gogol".into(), String::new(), "hash".into()))
            .await;
        assert!(matches!(duplicate, Err(RepoError::Constraint(_))));

        let category = Category::new("A".into(), String::new(), "same".into()).unwrap();
        repos.categories.save(category).await.unwrap();
        let clash = Category::new("B".into(), String::new(), "same".into()).unwrap();
        assert!(matches!(
            repos.categories.save(clash).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_post_requires_existing_author() {
        let repos = repos();
        let orphan = Post::new(Uuid::new_v4(), "t".into(), "x".into(), Utc::now());
        assert!(matches!(
            repos.posts.save(orphan).await,
            Err(RepoError::Constraint(_))
        ));
    }

    #[tokio::test]
    async fn test_deleting_post_removes_its_comments() {
        let repos = repos();
        let author = user(&repos, "chekhov").await;
        let post = post(&repos, &author, None, 1).await;
        let comment = repos
            .comments
            .save(Comment::new(post.id, author.id, "first".into()))
            .await
            .unwrap();

        repos.posts.delete(post.id).await.unwrap();

        assert!(repos.comments.find_by_id(comment.id).await.unwrap().is_none());
        assert!(matches!(
            repos.posts.delete(post.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_deleting_author_cascades() {
        let repos = repos();
        let author = user(&repos, "turgenev").await;
        let reader = user(&repos, "reader").await;
        let own = post(&repos, &author, None, 1).await;
        let other = post(&repos, &reader, None, 2).await;
        let on_own = repos
            .comments
            .save(Comment::new(own.id, reader.id, "nice".into()))
            .await
            .unwrap();
        let by_author = repos
            .comments
            .save(Comment::new(other.id, author.id, "thanks".into()))
            .await
            .unwrap();

        repos.users.delete(author.id).await.unwrap();

        assert!(repos.posts.find_by_id(own.id).await.unwrap().is_none());
        assert!(repos.posts.find_by_id(other.id).await.unwrap().is_some());
        assert!(repos.comments.find_by_id(on_own.id).await.unwrap().is_none());
        assert!(repos.comments.find_by_id(by_author.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_category_or_location_keeps_posts() {
        let repos = repos();
        let author = user(&repos, "bunin").await;
        let category = repos
            .categories
            .save(Category::new("Travel".into(), String::new(), "travel".into()).unwrap())
            .await
            .unwrap();
        let location = repos.locations.save(Location::new("Moscow".into())).await.unwrap();
        let post = repos
            .posts
            .save(Post {
                category_id: Some(category.id),
                location_id: Some(location.id),
                ..Post::new(author.id, "t".into(), "x".into(), Utc::now())
            })
            .await
            .unwrap();

        repos.categories.delete(category.id).await.unwrap();
        repos.locations.delete(location.id).await.unwrap();

        let kept = repos.posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(kept.category_id, None);
        assert_eq!(kept.location_id, None);
    }

    #[tokio::test]
    async fn test_listing_is_filtered_and_newest_first() {
        let repos = repos();
        let author = user(&repos, "pushkin").await;
        let category = repos
            .categories
            .save(Category::new("Poems".into(), String::new(), "poems".into()).unwrap())
            .await
            .unwrap();
        let older = post(&repos, &author, Some(&category), 30).await;
        let newer = post(&repos, &author, Some(&category), 5).await;
        let draft = repos
            .posts
            .save(Post {
                is_published: false,
                ..post(&repos, &author, Some(&category), 1).await
            })
            .await
            .unwrap();
        repos
            .comments
            .save(Comment::new(older.id, author.id, "c".into()))
            .await
            .unwrap();

        let query = PostQuery::published(Utc::now());
        assert_eq!(repos.posts.count_filtered(&query).await.unwrap(), 2);

        let window = PageWindow::resolve(2, 10, None);
        let listed = repos.posts.list_filtered(&query, &window).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|s| s.post.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(listed[1].comment_count, 1);
        assert_eq!(listed[0].author_username, "pushkin");
        assert_eq!(listed[0].category.as_ref().map(|c| c.id), Some(category.id));

        let everything = PostQuery::any().by_author(author.id);
        assert_eq!(repos.posts.count_filtered(&everything).await.unwrap(), 3);
        assert!(repos.posts.find_summary(draft.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_comment_thread_is_chronological_and_scoped() {
        let repos = repos();
        let author = user(&repos, "tolstoy").await;
        let post = post(&repos, &author, None, 1).await;
        let other = post_other(&repos, &author).await;

        let base = Utc::now();
        for (i, offset) in [3, 1, 2].into_iter().enumerate() {
            let mut comment = Comment::new(post.id, author.id, format!("c{i}"));
            comment.created_at = base + Duration::seconds(offset);
            repos.comments.save(comment).await.unwrap();
        }
        let elsewhere = repos
            .comments
            .save(Comment::new(other.id, author.id, "elsewhere".into()))
            .await
            .unwrap();

        let thread = repos.comments.list_for_post(post.id).await.unwrap();
        assert_eq!(thread.len(), 3);
        assert!(
            thread
                .windows(2)
                .all(|w| w[0].comment.created_at <= w[1].comment.created_at)
        );
        assert_eq!(thread[0].author_username, "tolstoy");

        assert!(
            repos
                .comments
                .find_for_post(post.id, elsewhere.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    async fn post_other(repos: &Repos, author: &User) -> Post {
        post(repos, author, None, 2).await
    }
}
