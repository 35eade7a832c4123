//! Session identity and the login guard.

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderMap},
    web,
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use uuid::Uuid;

use blogicum_core::ports::{TokenClaims, TokenService};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated requester.
///
/// Handlers behind [`RequireLogin`] take it as an argument:
/// ```ignore
/// async fn edit_profile(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    /// Username at token issue time; may be stale after a rename.
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Resolve the `Authorization: Bearer` header, if any, into an identity.
fn bearer_identity(headers: &HeaderMap, tokens: &dyn TokenService) -> Option<Identity> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;

    match tokens.validate_token(token.trim()) {
        Ok(claims) => Some(claims.into()),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            None
        }
    }
}

/// Login URL carrying the originally requested path as `next`.
pub fn login_redirect(login_url: &str, req: &HttpRequest) -> String {
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    // Path separators stay readable, as in `?next=/create`.
    let next = urlencoding::encode(target).replace("%2F", "/");
    let separator = if login_url.contains('?') { '&' } else { '?' };
    format!("{login_url}{separator}next={next}")
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        tracing::error!("AppState not found in app data");
        AppError::Internal("Server configuration error".to_string())
    })
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Placed there by the login guard.
        if let Some(identity) = req.extensions().get::<Identity>() {
            return ready(Ok(identity.clone()));
        }

        let state = match app_state(req) {
            Ok(state) => state,
            Err(e) => return ready(Err(e)),
        };

        ready(
            bearer_identity(req.headers(), state.tokens.as_ref())
                .ok_or_else(|| AppError::LoginRequired(login_redirect(&state.login_url, req))),
        )
    }
}

/// Identity of the requester if there is a valid session; anonymous otherwise.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(
            Identity::from_request(req, payload).into_inner().ok(),
        )))
    }
}

/// Login guard: lets authenticated requests through with their [`Identity`]
/// attached, redirects everyone else to the login page.
///
/// ```ignore
/// web::resource("/create").wrap(RequireLogin).route(web::get().to(posts::create_form))
/// ```
pub struct RequireLogin;

impl<S, B> Transform<S, ServiceRequest> for RequireLogin
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireLoginService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireLoginService { service }))
    }
}

pub struct RequireLoginService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequireLoginService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let (identity, login) = match app_state(req.request()) {
            Ok(state) => (
                bearer_identity(req.headers(), state.tokens.as_ref()),
                login_redirect(&state.login_url, req.request()),
            ),
            Err(e) => return Box::pin(ready(Err::<Self::Response, Self::Error>(e.into()))),
        };

        match identity {
            Some(identity) => {
                req.extensions_mut().insert(identity);
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
            None => {
                tracing::debug!(path = %req.path(), "Anonymous request to login-only page");
                let response = HttpResponse::Found()
                    .insert_header((header::LOCATION, login))
                    .finish();
                let (http_req, _payload) = req.into_parts();
                Box::pin(ready(Ok(
                    ServiceResponse::new(http_req, response).map_into_right_body()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn test_login_redirect_escapes_next() {
        let req = TestRequest::get()
            .uri("/profile/anna/?page=2&x=1")
            .to_http_request();
        assert_eq!(
            login_redirect("/auth/login/", &req),
            "/auth/login/?next=/profile/anna/%3Fpage%3D2%26x%3D1"
        );
        let spaced = TestRequest::get()
            .uri("/profile/anna%20k/")
            .to_http_request();
        assert_eq!(
            login_redirect("/auth/login/", &spaced),
            "/auth/login/?next=/profile/anna%2520k/"
        );
        assert_eq!(
            login_redirect("/accounts/login/?theme=dark", &req),
            "/accounts/login/?theme=dark&next=/profile/anna/%3Fpage%3D2%26x%3D1"
        );
    }
}
