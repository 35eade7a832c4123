//! Per-client rate limiting.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
    web,
};
use blogicum_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use crate::state::AppState;

const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Rate limiting middleware factory.
///
/// Uses the limiter from [`AppState`]; without one, requests pass untouched.
pub struct RateLimit;

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService {
            service: Rc::new(service),
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = req
            .app_data::<web::Data<AppState>>()
            .and_then(|state| state.rate_limiter.clone());

        Box::pin(async move {
            if let Some(limiter) = limiter {
                let key = req
                    .connection_info()
                    .realip_remote_addr()
                    .unwrap_or("unknown")
                    .to_string();

                match limiter.check(&key).await {
                    Ok(result) if !result.allowed => {
                        tracing::warn!("Rate limit exceeded for key: {}", key);

                        let retry_after = result.reset_after.as_secs().max(1);
                        let error = ErrorResponse::new(429, "Too Many Requests").with_detail(
                            format!("Rate limit exceeded. Try again in {} seconds.", retry_after),
                        );
                        let response = HttpResponse::TooManyRequests()
                            .insert_header((REMAINING_HEADER, result.remaining.to_string()))
                            .insert_header(("Retry-After", retry_after.to_string()))
                            .json(error);

                        let (http_req, _payload) = req.into_parts();
                        return Ok(ServiceResponse::new(http_req, response).map_into_right_body());
                    }
                    Ok(result) => {
                        let mut res = service.call(req).await?;
                        res.headers_mut().insert(
                            HeaderName::from_static(REMAINING_HEADER),
                            HeaderValue::from(result.remaining),
                        );
                        return Ok(res.map_into_left_body());
                    }
                    // Fail open.
                    Err(e) => tracing::error!(error = %e, "Rate limiter error"),
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
