use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, Comment, Location, Post};

/// Which publication states a listing admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only posts passing the publication gate at the given instant.
    Published { at: DateTime<Utc> },
    /// Every post, drafts and scheduled ones included.
    Any,
}

/// Filter over posts, composed per listing.
///
/// ```ignore
/// // Home page
/// PostQuery::published(Utc::now());
/// // Category page
/// PostQuery::published(Utc::now()).in_category(category.id);
/// // Author looking at their own profile
/// PostQuery::any().by_author(user.id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub visibility: Visibility,
    pub category_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
}

impl PostQuery {
    pub fn published(at: DateTime<Utc>) -> Self {
        Self {
            visibility: Visibility::Published { at },
            category_id: None,
            author_id: None,
        }
    }

    pub fn any() -> Self {
        Self {
            visibility: Visibility::Any,
            category_id: None,
            author_id: None,
        }
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// In-process evaluation of the filter; `category` is the post's category, if any.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        if self.category_id.is_some_and(|id| post.category_id != Some(id)) {
            return false;
        }
        if self.author_id.is_some_and(|id| post.author_id != id) {
            return false;
        }
        match self.visibility {
            Visibility::Published { at } => post.is_publicly_visible(category, at),
            Visibility::Any => true,
        }
    }
}

/// A post joined with what listings display next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub post: Post,
    pub author_username: String,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

impl PostSummary {
    pub fn is_visible_to(&self, viewer: Option<Uuid>, now: DateTime<Utc>) -> bool {
        self.post.is_visible_to(viewer, self.category.as_ref(), now)
    }
}

/// A comment together with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredComment {
    pub comment: Comment,
    pub author_username: String,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn setup() -> (Category, Post) {
        let category = Category::new("Art".into(), String::new(), "art".into()).unwrap();
        let post = Post {
            category_id: Some(category.id),
            ..Post::new(
                Uuid::new_v4(),
                "Title".into(),
                "Text".into(),
                Utc::now() - Duration::minutes(5),
            )
        };
        (category, post)
    }

    #[test]
    fn test_published_query_applies_gate() {
        let (category, mut post) = setup();
        let query = PostQuery::published(Utc::now());
        assert!(query.matches(&post, Some(&category)));

        post.is_published = false;
        assert!(!query.matches(&post, Some(&category)));
        assert!(PostQuery::any().matches(&post, Some(&category)));
    }

    #[test]
    fn test_scoping_by_category_and_author() {
        let (category, post) = setup();
        let query = PostQuery::published(Utc::now()).in_category(category.id);
        assert!(query.matches(&post, Some(&category)));

        let other = PostQuery::any().in_category(Uuid::new_v4());
        assert!(!other.matches(&post, Some(&category)));

        assert!(PostQuery::any().by_author(post.author_id).matches(&post, None));
        assert!(!PostQuery::any().by_author(Uuid::new_v4()).matches(&post, None));
    }
}
