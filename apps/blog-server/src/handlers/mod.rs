//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod profile;
mod render;


use actix_web::{HttpResponse, http::header, web};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use blogicum_core::domain::User;
use blogicum_core::ports::BaseRepository;

use crate::middleware::auth::{Identity, RequireLogin};
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::rate_limit::RateLimit;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/health", web::get().to(health::health_check))
    .route("/", web::get().to(posts::index))
    .route("/posts/{id}/", web::get().to(posts::post_detail))
    .route("/category/{slug}/", web::get().to(posts::category_posts))
    .route("/profile/{username}/", web::get().to(profile::profile))
    .service(
        web::resource("/create")
            .wrap(RequireLogin)
            .route(web::get().to(posts::create_form))
            .route(web::post().to(posts::create)),
    )
    .service(
        web::resource("/posts/{id}/edit/")
            .wrap(RequireLogin)
            .route(web::get().to(posts::edit_form))
            .route(web::post().to(posts::edit)),
    )
    .service(
        web::resource("/posts/{id}/delete/")
            .wrap(RequireLogin)
            .route(web::get().to(posts::delete_confirm))
            .route(web::post().to(posts::delete)),
    )
    .service(
        web::resource("/posts/{id}/comment/")
            .wrap(RequireLogin)
            .route(web::post().to(comments::add_comment)),
    )
    .service(
        web::resource("/posts/{id}/edit_comment/{comment_id}/")
            .wrap(RequireLogin)
            .route(web::get().to(comments::edit_form))
            .route(web::post().to(comments::edit)),
    )
    .service(
        web::resource("/posts/{id}/delete_comment/{comment_id}/")
            .wrap(RequireLogin)
            .route(web::get().to(comments::delete_confirm))
            .route(web::post().to(comments::delete)),
    )
    .service(
        web::resource("/edit_profile/")
            .wrap(RequireLogin)
            .route(web::get().to(profile::edit_form))
            .route(web::post().to(profile::edit)),
    )
    .service(
        web::scope("/auth")
            .wrap(RateLimit)
            .service(
                web::resource("/login/")
                    .route(web::get().to(auth::login_prompt))
                    .route(web::post().to(auth::login)),
            )
            .route("/registration/", web::post().to(auth::register)),
    );
}

/// 302 to `location`.
fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Deserialize a JSON form body taken as raw bytes.
fn read_form<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Json deserialize error: {e}")))
}

fn post_url(id: Uuid) -> String {
    format!("/posts/{id}/")
}

fn profile_url(username: &str) -> String {
    format!("/profile/{username}/")
}

fn post_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Post {id} not found"))
}

/// The requester's account as currently stored; the token may predate a rename.
async fn current_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}
