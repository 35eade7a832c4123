//! Comment lifecycle: add, edit, delete.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use blogicum_core::domain::Comment;
use blogicum_core::ports::BaseRepository;
use blogicum_shared::dto::CommentForm;
use blogicum_shared::view::{CommentDeletePage, CommentFormPage};

use super::{current_user, post_not_found, post_url, read_form, redirect, render};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /posts/{id}/comment/
///
/// Always lands back on the post; an invalid or unreadable form is dropped.
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: Option<web::Json<CommentForm>>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state
        .posts
        .find_summary(post_id)
        .await?
        .filter(|s| s.is_visible_to(Some(identity.user_id), Utc::now()))
        .ok_or_else(|| post_not_found(post_id))?;

    match body.map(web::Json::into_inner) {
        Some(form) if form.validate().is_ok() => {
            let comment = Comment::new(post_id, identity.user_id, form.text);
            state.comments.save(comment).await?;
        }
        _ => tracing::debug!(post_id = %post_id, "Discarded invalid comment form"),
    }

    Ok(redirect(&post_url(post_id)))
}

/// The comment addressed by the path; `None` when it belongs to someone else.
async fn own_comment(
    state: &AppState,
    identity: &Identity,
    post_id: Uuid,
    comment_id: Uuid,
) -> AppResult<Option<Comment>> {
    let comment = state
        .comments
        .find_for_post(post_id, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {comment_id} not found")))?;

    if comment.is_authored_by(identity.user_id) {
        Ok(Some(comment))
    } else {
        tracing::debug!(
            comment_id = %comment_id,
            user = %identity.username,
            "Comment change by non-author refused"
        );
        Ok(None)
    }
}

/// GET /posts/{id}/edit_comment/{comment_id}/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let Some(comment) = own_comment(&state, &identity, post_id, comment_id).await? else {
        return Ok(redirect(&post_url(post_id)));
    };

    Ok(HttpResponse::Ok().json(CommentFormPage {
        post_id,
        comment_id,
        form: render::comment_form(&comment),
    }))
}

/// POST /posts/{id}/edit_comment/{comment_id}/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let Some(mut comment) = own_comment(&state, &identity, post_id, comment_id).await? else {
        return Ok(redirect(&post_url(post_id)));
    };

    let form = read_form::<CommentForm>(&body)?;
    form.validate()?;
    comment.text = form.text;
    state.comments.save(comment).await?;

    Ok(redirect(&post_url(post_id)))
}

/// GET /posts/{id}/delete_comment/{comment_id}/
pub async fn delete_confirm(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let Some(comment) = own_comment(&state, &identity, post_id, comment_id).await? else {
        return Ok(redirect(&post_url(post_id)));
    };
    let author = current_user(&state, &identity).await?;

    Ok(HttpResponse::Ok().json(CommentDeletePage {
        post_id,
        comment: render::comment(&comment, &author.username),
    }))
}

/// POST /posts/{id}/delete_comment/{comment_id}/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    if let Some(comment) = own_comment(&state, &identity, post_id, comment_id).await? {
        state.comments.delete(comment.id).await?;
    }

    Ok(redirect(&post_url(post_id)))
}
