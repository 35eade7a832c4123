//! Domain records to view documents.

use blogicum_core::domain::{Category, Comment, Location, Post, User};
use blogicum_core::query::{AuthoredComment, Page, PostSummary};
use blogicum_shared::dto::{CommentForm, PostForm, ProfileForm};
use blogicum_shared::view::{
    CategoryView, CommentView, LocationView, PageView, PostCard, ProfileView,
};

pub fn category(category: &Category) -> CategoryView {
    CategoryView {
        id: category.id,
        title: category.title.clone(),
        description: category.description.clone(),
        slug: category.slug.clone(),
    }
}

pub fn location(location: &Location) -> LocationView {
    LocationView {
        id: location.id,
        name: location.name.clone(),
    }
}

/// Unpublished locations are left off the card.
pub fn post_card(summary: &PostSummary) -> PostCard {
    let post = &summary.post;
    PostCard {
        id: post.id,
        title: post.title.clone(),
        text: post.text.clone(),
        pub_date: post.pub_date,
        image: post.image.clone(),
        author: summary.author_username.clone(),
        category: summary.category.as_ref().map(category),
        location: summary
            .location
            .as_ref()
            .filter(|l| l.is_published)
            .map(location),
        is_published: post.is_published,
        created_at: post.created_at,
        comment_count: summary.comment_count,
    }
}

pub fn post_page(page: Page<PostSummary>) -> PageView<PostCard> {
    let window = page.window;
    let page = page.map(|summary| post_card(&summary));
    PageView {
        items: page.items,
        number: window.number,
        num_pages: window.num_pages,
        count: window.count,
        has_next: window.has_next(),
        has_previous: window.has_previous(),
    }
}

pub fn comment(comment: &Comment, author: &str) -> CommentView {
    CommentView {
        id: comment.id,
        text: comment.text.clone(),
        created_at: comment.created_at,
        author: author.to_string(),
    }
}

pub fn thread(comments: &[AuthoredComment]) -> Vec<CommentView> {
    comments
        .iter()
        .map(|c| comment(&c.comment, &c.author_username))
        .collect()
}

pub fn profile(user: &User) -> ProfileView {
    ProfileView {
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        full_name: user.full_name(),
        date_joined: user.created_at,
    }
}

pub fn post_form(post: &Post) -> PostForm {
    PostForm {
        title: post.title.clone(),
        text: post.text.clone(),
        pub_date: Some(post.pub_date),
        image: post.image.clone(),
        location: post.location_id,
        category: post.category_id,
        is_published: post.is_published,
    }
}

pub fn comment_form(comment: &Comment) -> CommentForm {
    CommentForm {
        text: comment.text.clone(),
    }
}

pub fn profile_form(user: &User) -> ProfileForm {
    ProfileForm {
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
    }
}
