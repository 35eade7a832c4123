//! Account handlers: login and registration.

use actix_web::{HttpResponse, web};
use validator::Validate;

use blogicum_core::domain::User;
use blogicum_core::ports::BaseRepository;
use blogicum_shared::dto::{AuthResponse, LoginPrompt, LoginRequest, RegisterUserRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn token_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// GET /auth/login/
///
/// Where the login guard sends anonymous visitors; echoes `next` back.
pub async fn login_prompt(query: web::Query<LoginPrompt>) -> HttpResponse {
    HttpResponse::Ok().json(query.into_inner())
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %user.username, "Password mismatch");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(token_response(&state, &user)?))
}

/// POST /auth/registration/
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict(
            "A user with that username already exists.".to_string(),
        ));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = state
        .users
        .save(User::new(req.username, req.email, password_hash))
        .await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(token_response(&state, &user)?))
}
