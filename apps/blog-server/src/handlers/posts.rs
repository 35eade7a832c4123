//! Post listings, detail and the post lifecycle.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use blogicum_core::domain::Post;
use blogicum_core::ports::BaseRepository;
use blogicum_core::query::{PostQuery, paginate_posts};
use blogicum_shared::FieldErrors;
use blogicum_shared::dto::{PageQuery, PostForm};
use blogicum_shared::view::{CategoryPage, PostDeletePage, PostDetail, PostFormPage};

use super::{current_user, post_not_found, post_url, profile_url, read_form, redirect, render};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = paginate_posts(
        state.posts.as_ref(),
        &PostQuery::published(Utc::now()),
        query.page.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(render::post_page(page)))
}

/// GET /posts/{id}/
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let viewer_id = viewer.user_id();

    let summary = state
        .posts
        .find_summary(id)
        .await?
        .filter(|s| s.is_visible_to(viewer_id, Utc::now()))
        .ok_or_else(|| post_not_found(id))?;
    let comments = state.comments.list_for_post(id).await?;

    Ok(HttpResponse::Ok().json(PostDetail {
        post: render::post_card(&summary),
        comments: render::thread(&comments),
        is_author: summary.post.is_owned_by(viewer_id),
    }))
}

/// GET /category/{slug}/
pub async fn category_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| AppError::NotFound(format!("Category '{slug}' not found")))?;

    let filter = PostQuery::published(Utc::now()).in_category(category.id);
    let page = paginate_posts(state.posts.as_ref(), &filter, query.page.as_deref()).await?;

    Ok(HttpResponse::Ok().json(CategoryPage {
        category: render::category(&category),
        page: render::post_page(page),
    }))
}

async fn form_page(state: &AppState, form: Option<PostForm>) -> AppResult<PostFormPage> {
    let categories = state.categories.list_all().await?;
    let locations = state.locations.list_all().await?;

    Ok(PostFormPage {
        form,
        categories: categories.iter().map(render::category).collect(),
        locations: locations.iter().map(render::location).collect(),
    })
}

/// Validate the form and copy it onto `post`; the author is left alone.
async fn bind(state: &AppState, mut post: Post, form: PostForm) -> AppResult<Post> {
    form.validate()?;

    let mut errors = FieldErrors::new();
    if let Some(id) = form.category {
        if state.categories.find_by_id(id).await?.is_none() {
            errors.insert("category".into(), vec![INVALID_CHOICE.into()]);
        }
    }
    if let Some(id) = form.location {
        if state.locations.find_by_id(id).await?.is_none() {
            errors.insert("location".into(), vec![INVALID_CHOICE.into()]);
        }
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    post.title = form.title;
    post.text = form.text;
    post.pub_date = form.pub_date.unwrap_or(post.pub_date);
    post.image = form.image.filter(|i| !i.is_empty());
    post.category_id = form.category;
    post.location_id = form.location;
    post.is_published = form.is_published;
    Ok(post)
}

/// Loads the post or fails with not-found; ownership is checked by the caller.
async fn load(state: &AppState, id: Uuid) -> AppResult<Post> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))
}

/// GET /create
pub async fn create_form(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(form_page(&state, None).await?))
}

/// POST /create
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let author = current_user(&state, &identity).await?;
    let form = body.into_inner();
    let draft = Post::new(author.id, String::new(), String::new(), Utc::now());
    let post = state.posts.save(bind(&state, draft, form).await?).await?;

    tracing::info!(post_id = %post.id, author = %author.username, "Post created");
    Ok(redirect(&profile_url(&author.username)))
}

/// GET /posts/{id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load(&state, path.into_inner()).await?;
    if !post.is_owned_by(Some(identity.user_id)) {
        return Ok(redirect(&post_url(post.id)));
    }

    let page = form_page(&state, Some(render::post_form(&post))).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /posts/{id}/edit/
///
/// The body is only read once ownership is settled.
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let post = load(&state, path.into_inner()).await?;
    let id = post.id;
    if !post.is_owned_by(Some(identity.user_id)) {
        tracing::debug!(post_id = %id, user = %identity.username, "Edit by non-author refused");
        return Ok(redirect(&post_url(id)));
    }

    let form = read_form::<PostForm>(&body)?;
    state.posts.save(bind(&state, post, form).await?).await?;
    Ok(redirect(&post_url(id)))
}

/// GET /posts/{id}/delete/
pub async fn delete_confirm(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let summary = state
        .posts
        .find_summary(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;
    if !summary.post.is_owned_by(Some(identity.user_id)) {
        return Ok(redirect(&post_url(id)));
    }

    Ok(HttpResponse::Ok().json(PostDeletePage {
        post: render::post_card(&summary),
    }))
}

/// POST /posts/{id}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = load(&state, path.into_inner()).await?;
    if !post.is_owned_by(Some(identity.user_id)) {
        tracing::debug!(
            post_id = %post.id,
            user = %identity.username,
            "Delete by non-author refused"
        );
        return Ok(redirect(&post_url(post.id)));
    }

    state.posts.delete(post.id).await?;
    tracing::info!(post_id = %post.id, "Post deleted");

    let author = current_user(&state, &identity).await?;
    Ok(redirect(&profile_url(&author.username)))
}
