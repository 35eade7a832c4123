//! Rendered view documents - what each page shows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::{CommentForm, PostForm, ProfileForm};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationView {
    pub id: Uuid,
    pub name: String,
}

/// A post as listings and the detail page show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCard {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    /// Author's username.
    pub author: String,
    pub category: Option<CategoryView>,
    /// Only present when the location itself is published.
    pub location: Option<LocationView>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub comment_count: u64,
}

/// One page of a listing plus navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPage {
    pub category: CategoryView,
    pub page: PageView<PostCard>,
}

/// Public part of a user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub date_joined: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePage {
    pub profile: ProfileView,
    pub page: PageView<PostCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Author's username.
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: PostCard,
    /// Oldest first.
    pub comments: Vec<CommentView>,
    /// Whether the viewer may edit or delete the post.
    pub is_author: bool,
}

/// Post form page: the current values (none when creating) and the choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFormPage {
    pub form: Option<PostForm>,
    pub categories: Vec<CategoryView>,
    pub locations: Vec<LocationView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDeletePage {
    pub post: PostCard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentFormPage {
    pub post_id: Uuid,
    pub comment_id: Uuid,
    pub form: CommentForm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDeletePage {
    pub post_id: Uuid,
    pub comment: CommentView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFormPage {
    pub form: ProfileForm,
}
