//! Security middleware: response hardening headers and, in production,
//! HTTPS enforcement.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use ms_shared::config::Environment;
use ms_shared::{error_codes, ErrorResponse};

use super::peer_is_trusted;

/// Security middleware factory
#[derive(Clone)]
pub struct SecurityMiddleware {
    /// Reject plain HTTP requests
    enforce_https: bool,
    /// Proxies whose `X-Forwarded-Proto` header is believed
    trusted_proxies: Arc<Vec<String>>,
}

impl SecurityMiddleware {
    /// HTTPS is enforced in production only
    pub fn new(environment: Environment, trusted_proxies: Vec<String>) -> Self {
        let enforce_https = environment.is_production();
        tracing::info!(
            enforce_https,
            trusted_proxies = trusted_proxies.len(),
            "Security middleware configured"
        );
        Self {
            enforce_https,
            trusted_proxies: Arc::new(trusted_proxies),
        }
    }

    pub fn development() -> Self {
        Self {
            enforce_https: false,
            trusted_proxies: Arc::new(Vec::new()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            enforce_https: self.enforce_https,
            trusted_proxies: self.trusted_proxies.clone(),
        }))
    }
}

/// Security middleware service implementation
pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    enforce_https: bool,
    trusted_proxies: Arc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let enforce_https = self.enforce_https;
        let trusted_proxies = self.trusted_proxies.clone();

        Box::pin(async move {
            if enforce_https && !is_secure_request(&req, &trusted_proxies) {
                tracing::warn!(
                    method = %req.method(),
                    path = req.path(),
                    "Insecure request blocked"
                );
                let body = ErrorResponse::new(error_codes::BAD_REQUEST, "HTTPS required");
                let response = req.into_response(HttpResponse::Forbidden().json(body));
                return Ok(response.map_into_right_body());
            }

            let mut response = service.call(req).await?;
            add_security_response_headers(&mut response, enforce_https);
            Ok(response.map_into_left_body())
        })
    }
}

/// Checks if the request arrived over HTTPS, directly or via a trusted proxy
fn is_secure_request(req: &ServiceRequest, trusted_proxies: &[String]) -> bool {
    let forwarded_proto = req
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok());

    // Without the header the scheme comes from the connection itself
    let Some(proto) = forwarded_proto else {
        return req.connection_info().scheme() == "https";
    };
    proto.eq_ignore_ascii_case("https") && peer_is_trusted(req, trusted_proxies)
}

/// Adds security headers to the response
fn add_security_response_headers<B>(response: &mut ServiceResponse<B>, hsts: bool) {
    let headers = response.headers_mut();

    if hsts {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(
        header::HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );
}
