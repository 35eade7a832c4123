//! Author profiles.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use validator::Validate;

use blogicum_core::ports::BaseRepository;
use blogicum_core::query::{PostQuery, paginate_posts};
use blogicum_shared::dto::{PageQuery, ProfileForm};
use blogicum_shared::view::{ProfileFormPage, ProfilePage};

use super::{current_user, profile_url, redirect, render};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /profile/{username}/
///
/// The owner sees every post of theirs; everyone else only the published ones.
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User '{username}' not found")))?;

    let filter = if viewer.user_id() == Some(user.id) {
        PostQuery::any()
    } else {
        PostQuery::published(Utc::now())
    }
    .by_author(user.id);
    let page = paginate_posts(state.posts.as_ref(), &filter, query.page.as_deref()).await?;

    Ok(HttpResponse::Ok().json(ProfilePage {
        profile: render::profile(&user),
        page: render::post_page(page),
    }))
}

/// GET /edit_profile/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = current_user(&state, &identity).await?;
    Ok(HttpResponse::Ok().json(ProfileFormPage {
        form: render::profile_form(&user),
    }))
}

/// POST /edit_profile/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileForm>,
) -> AppResult<HttpResponse> {
    let mut user = current_user(&state, &identity).await?;
    let form = body.into_inner();
    form.validate()?;

    if form.username != user.username
        && state.users.find_by_username(&form.username).await?.is_some()
    {
        return Err(AppError::invalid(
            "username",
            "A user with that username already exists.",
        ));
    }

    user.username = form.username;
    user.first_name = form.first_name;
    user.last_name = form.last_name;
    user.email = form.email;
    user.updated_at = Utc::now();
    let user = state.users.save(user).await?;

    Ok(redirect(&profile_url(&user.username)))
}
