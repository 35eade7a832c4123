use std::collections::HashMap;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, Location, Post, User};
use blogicum_core::error::RepoError;
use blogicum_core::query::{AuthoredComment, PostSummary};

/// Row storage for every table.
#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) users: HashMap<Uuid, User>,
    pub(crate) categories: HashMap<Uuid, Category>,
    pub(crate) locations: HashMap<Uuid, Location>,
    pub(crate) posts: HashMap<Uuid, Post>,
    pub(crate) comments: HashMap<Uuid, Comment>,
}

/// Shared in-memory database.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

fn missing(what: &str, id: Uuid) -> RepoError {
    RepoError::Constraint(format!("{what} {id} does not exist"))
}

impl Tables {
    pub(crate) fn upsert_user(&mut self, user: User) -> Result<User, RepoError> {
        let taken = self
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username);
        if taken {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub(crate) fn upsert_category(&mut self, category: Category) -> Result<Category, RepoError> {
        let taken = self
            .categories
            .values()
            .any(|c| c.id != category.id && c.slug == category.slug);
        if taken {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                category.slug
            )));
        }
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }

    pub(crate) fn upsert_location(&mut self, location: Location) -> Location {
        self.locations.insert(location.id, location.clone());
        location
    }

    pub(crate) fn upsert_post(&mut self, post: Post) -> Result<Post, RepoError> {
        if !self.users.contains_key(&post.author_id) {
            return Err(missing("user", post.author_id));
        }
        if let Some(id) = post.category_id.filter(|id| !self.categories.contains_key(id)) {
            return Err(missing("category", id));
        }
        if let Some(id) = post.location_id.filter(|id| !self.locations.contains_key(id)) {
            return Err(missing("location", id));
        }
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    pub(crate) fn upsert_comment(&mut self, comment: Comment) -> Result<Comment, RepoError> {
        if !self.users.contains_key(&comment.author_id) {
            return Err(missing("user", comment.author_id));
        }
        if !self.posts.contains_key(&comment.post_id) {
            return Err(missing("post", comment.post_id));
        }
        self.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    /// Removes the user, their posts, and every comment on or by them.
    pub(crate) fn delete_user(&mut self, id: Uuid) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        let authored: Vec<Uuid> = self
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in authored {
            self.delete_post(post_id);
        }
        self.comments.retain(|_, c| c.author_id != id);
        true
    }

    /// Removes the post and its comment thread.
    pub(crate) fn delete_post(&mut self, id: Uuid) -> bool {
        if self.posts.remove(&id).is_none() {
            return false;
        }
        self.comments.retain(|_, c| c.post_id != id);
        true
    }

    /// Removes the category; its posts stay, uncategorized.
    pub(crate) fn delete_category(&mut self, id: Uuid) -> bool {
        if self.categories.remove(&id).is_none() {
            return false;
        }
        for post in self.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        true
    }

    /// Removes the location; its posts stay, without a location.
    pub(crate) fn delete_location(&mut self, id: Uuid) -> bool {
        if self.locations.remove(&id).is_none() {
            return false;
        }
        for post in self.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        true
    }

    pub(crate) fn category_of(&self, post: &Post) -> Option<&Category> {
        post.category_id.and_then(|id| self.categories.get(&id))
    }

    fn username(&self, id: Uuid) -> String {
        self.users
            .get(&id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    pub(crate) fn summarize(&self, post: &Post) -> PostSummary {
        PostSummary {
            post: post.clone(),
            author_username: self.username(post.author_id),
            category: self.category_of(post).cloned(),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id))
                .cloned(),
            comment_count: self
                .comments
                .values()
                .filter(|c| c.post_id == post.id)
                .count() as u64,
        }
    }

    pub(crate) fn authored(&self, comment: &Comment) -> AuthoredComment {
        AuthoredComment {
            comment: comment.clone(),
            author_username: self.username(comment.author_id),
        }
    }
}
