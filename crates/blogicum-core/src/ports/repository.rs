use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Location, Post, User};
use crate::error::RepoError;
use crate::query::{AuthoredComment, PageWindow, PostQuery, PostSummary};

/// Entities addressable by a primary key.
pub trait Identifiable<ID> {
    fn id(&self) -> ID;
}

macro_rules! identified_by_uuid {
    ($($entity:ty),+) => {
        $(impl Identifiable<Uuid> for $entity {
            fn id(&self) -> Uuid {
                self.id
            }
        })+
    };
}

identified_by_uuid!(Category, Comment, Location, Post, User);

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, cascading to dependent records.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories ordered by title, for form choices.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;
}

/// Location repository.
#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    /// All locations ordered by name, for form choices.
    async fn list_all(&self) -> Result<Vec<Location>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Number of posts matching the query.
    async fn count_filtered(&self, query: &PostQuery) -> Result<u64, RepoError>;

    /// One window of the matching posts, newest `pub_date` first.
    async fn list_filtered(
        &self,
        query: &PostQuery,
        window: &PageWindow,
    ) -> Result<Vec<PostSummary>, RepoError>;

    /// A single post with its author, category, location and comment count.
    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// The comment thread of a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<AuthoredComment>, RepoError>;

    /// A comment, provided it belongs to the given post.
    async fn find_for_post(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<Comment>, RepoError>;
}
