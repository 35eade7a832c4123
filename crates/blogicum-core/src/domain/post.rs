use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

/// Post entity - a blog publication.
///
/// A post with `pub_date` in the future is a scheduled publication: it stays
/// hidden from readers until that moment passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    /// Path of the attached picture in media storage.
    pub image: Option<String>,
    pub author_id: Uuid,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new published post without category, location or image.
    pub fn new(author_id: Uuid, title: String, text: String, pub_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            text,
            pub_date,
            image: None,
            author_id,
            location_id: None,
            category_id: None,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: Option<Uuid>) -> bool {
        user_id == Some(self.author_id)
    }

    /// The publication gate: the post itself is published, its date has come,
    /// and it is filed under a published category.
    pub fn is_publicly_visible(&self, category: Option<&Category>, now: DateTime<Utc>) -> bool {
        self.is_published
            && self.pub_date <= now
            && category.is_some_and(|c| self.category_id == Some(c.id) && c.is_published)
    }

    /// Readers see what passes the gate; authors always see their own posts.
    pub fn is_visible_to(
        &self,
        viewer: Option<Uuid>,
        category: Option<&Category>,
        now: DateTime<Utc>,
    ) -> bool {
        self.is_owned_by(viewer) || self.is_publicly_visible(category, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn category(published: bool) -> Category {
        let mut category = Category::new("News".into(), String::new(), "news".into()).unwrap();
        category.is_published = published;
        category
    }

    fn post_in(category: &Category) -> Post {
        Post {
            category_id: Some(category.id),
            ..Post::new(
                Uuid::new_v4(),
                "Title".into(),
                "Body".into(),
                Utc::now() - Duration::hours(1),
            )
        }
    }

    #[test]
    fn test_published_post_passes_gate() {
        let category = category(true);
        let post = post_in(&category);
        assert!(post.is_publicly_visible(Some(&category), Utc::now()));
    }

    #[test]
    fn test_gate_rejects_each_condition() {
        let now = Utc::now();
        let published = category(true);

        let mut draft = post_in(&published);
        draft.is_published = false;
        assert!(!draft.is_publicly_visible(Some(&published), now));

        let mut scheduled = post_in(&published);
        scheduled.pub_date = now + Duration::days(1);
        assert!(!scheduled.is_publicly_visible(Some(&published), now));

        let hidden = category(false);
        let in_hidden = post_in(&hidden);
        assert!(!in_hidden.is_publicly_visible(Some(&hidden), now));

        let mut uncategorized = post_in(&published);
        uncategorized.category_id = None;
        assert!(!uncategorized.is_publicly_visible(None, now));
    }

    #[test]
    fn test_author_sees_own_draft() {
        let category = category(false);
        let mut post = post_in(&category);
        post.is_published = false;

        assert!(post.is_visible_to(Some(post.author_id), Some(&category), Utc::now()));
        assert!(!post.is_visible_to(Some(Uuid::new_v4()), Some(&category), Utc::now()));
        assert!(!post.is_visible_to(None, Some(&category), Utc::now()));
    }
}
