//! Rate limiting middleware for the public endpoints.
//!
//! Fixed window per client IP, held in process memory. Each worker shares
//! the same counters because the factory is cloned, not rebuilt.
//!
//! The client is the socket peer. `X-Forwarded-For` is only consulted when
//! that peer is a configured proxy.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue, RETRY_AFTER},
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    collections::HashMap,
    future::{ready, Ready},
    rc::Rc,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use ms_shared::config::RateLimitConfig;
use ms_shared::{error_codes, ErrorResponse};

use super::peer_is_trusted;

/// Windows are swept once the table grows past this many clients
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Rate limit status
#[derive(Debug, PartialEq, Eq)]
enum RateLimitStatus {
    Ok { remaining: u32 },
    Exceeded { retry_after_seconds: u64 },
}

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimiter {
    enabled: bool,
    max_requests: u32,
    window: Duration,
    trusted_proxies: Arc<Vec<String>>,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_requests: config.max_requests.max(1),
            window: Duration::from_secs(config.window_secs.max(1)),
            trusted_proxies: Arc::new(Vec::new()),
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Proxies allowed to name the client in `X-Forwarded-For`
    pub fn with_trusted_proxies(mut self, trusted_proxies: Vec<String>) -> Self {
        self.trusted_proxies = Arc::new(trusted_proxies);
        self
    }

    /// Key a request by its peer address, or by the address a trusted proxy
    /// reports it received the request from
    fn client_key(&self, req: &ServiceRequest) -> String {
        if peer_is_trusted(req, &self.trusted_proxies) {
            // The last hop is the one the proxy itself appended
            let forwarded = req
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.rsplit(',').map(str::trim).find(|hop| !hop.is_empty()));
            if let Some(client) = forwarded {
                return client.to_string();
            }
        }

        req.peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// A limiter that lets everything through
    pub fn disabled() -> Self {
        Self::new(&RateLimitConfig {
            enabled: false,
            max_requests: u32::MAX,
            window_secs: 1,
        })
    }

    fn check(&self, client: &str, now: Instant) -> RateLimitStatus {
        let Ok(mut windows) = self.windows.lock() else {
            // Poisoned table: fail open
            return RateLimitStatus::Ok { remaining: 0 };
        };

        if windows.len() > SWEEP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max_requests {
            let elapsed = now.duration_since(entry.started);
            let retry_after_seconds = self.window.saturating_sub(elapsed).as_secs().max(1);
            return RateLimitStatus::Exceeded {
                retry_after_seconds,
            };
        }

        entry.count += 1;
        RateLimitStatus::Ok {
            remaining: self.max_requests - entry.count,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            limiter: self.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    limiter: RateLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        if !self.limiter.enabled {
            return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
        }

        let client = self.limiter.client_key(&req);
        let status = self.limiter.check(&client, Instant::now());
        let limit = self.limiter.max_requests;

        Box::pin(async move {
            match status {
                RateLimitStatus::Exceeded {
                    retry_after_seconds,
                } => {
                    tracing::warn!(
                        client = %client,
                        path = req.path(),
                        event = "rate_limited",
                        "Rate limit exceeded"
                    );
                    let body = ErrorResponse::new(
                        error_codes::RATE_LIMIT_EXCEEDED,
                        "Too many requests, please try again later",
                    )
                    .add_detail("retryAfterSeconds", retry_after_seconds);
                    let response = HttpResponse::TooManyRequests()
                        .insert_header((RETRY_AFTER, retry_after_seconds.to_string()))
                        .json(body);
                    Ok(req.into_response(response).map_into_right_body())
                }
                RateLimitStatus::Ok { remaining } => {
                    let mut response = service.call(req).await?;
                    let headers = response.headers_mut();
                    headers.insert(
                        HeaderName::from_static("x-rate-limit-limit"),
                        HeaderValue::from(limit),
                    );
                    headers.insert(
                        HeaderName::from_static("x-rate-limit-remaining"),
                        HeaderValue::from(remaining),
                    );
                    Ok(response.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test as atest, web, App};

    fn limiter(max_requests: u32) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            enabled: true,
            max_requests,
            window_secs: 60,
        })
    }

    #[test]
    fn test_window_counts_down_and_blocks() {
        let limiter = limiter(2);
        let now = Instant::now();

        assert_eq!(limiter.check("1.2.3.4", now), RateLimitStatus::Ok { remaining: 1 });
        assert_eq!(limiter.check("1.2.3.4", now), RateLimitStatus::Ok { remaining: 0 });
        assert!(matches!(
            limiter.check("1.2.3.4", now),
            RateLimitStatus::Exceeded { .. }
        ));
        assert_eq!(limiter.check("5.6.7.8", now), RateLimitStatus::Ok { remaining: 1 });
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(1);
        let start = Instant::now();

        assert!(matches!(limiter.check("c", start), RateLimitStatus::Ok { .. }));
        assert!(matches!(limiter.check("c", start), RateLimitStatus::Exceeded { .. }));
        assert!(matches!(
            limiter.check("c", start + Duration::from_secs(61)),
            RateLimitStatus::Ok { .. }
        ));
    }

    #[actix_web::test]
    async fn test_middleware_returns_429() {
        let app = atest::init_service(
            App::new()
                .wrap(limiter(1))
                .route("/", web::post().to(HttpResponse::Ok)),
        )
        .await;

        let first = atest::call_service(&app, atest::TestRequest::post().uri("/").to_request()).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers().get("x-rate-limit-remaining").unwrap(), "0");

        let second = atest::call_service(&app, atest::TestRequest::post().uri("/").to_request()).await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().get("retry-after").is_some());
    }

    #[actix_web::test]
    async fn test_disabled_limiter_passes_through() {
        let app = atest::init_service(
            App::new()
                .wrap(RateLimiter::disabled())
                .route("/", web::post().to(HttpResponse::Ok)),
        )
        .await;

        for _ in 0..5 {
            let response =
                atest::call_service(&app, atest::TestRequest::post().uri("/").to_request()).await;
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    fn post_from(peer: &str, forwarded_for: Option<&str>) -> atest::TestRequest {
        let mut request = atest::TestRequest::post()
            .uri("/")
            .peer_addr(format!("{}:40000", peer).parse().unwrap());
        if let Some(value) = forwarded_for {
            request = request.insert_header(("x-forwarded-for", value));
        }
        request
    }

    #[actix_web::test]
    async fn test_forwarded_for_from_untrusted_peer_is_ignored() {
        let app = atest::init_service(
            App::new()
                .wrap(limiter(1))
                .route("/", web::post().to(HttpResponse::Ok)),
        )
        .await;

        let mut statuses = Vec::new();
        for i in 0..5 {
            let forwarded = format!("10.0.0.{}", i);
            let request = post_from("9.9.9.9", Some(&forwarded)).to_request();
            statuses.push(atest::call_service(&app, request).await.status());
        }

        assert_eq!(statuses[0], StatusCode::OK);
        assert!(statuses[1..]
            .iter()
            .all(|status| *status == StatusCode::TOO_MANY_REQUESTS));
    }

    #[actix_web::test]
    async fn test_trusted_proxy_limits_each_forwarded_client() {
        let app = atest::init_service(
            App::new()
                .wrap(limiter(1).with_trusted_proxies(vec!["10.1.1.1".to_string()]))
                .route("/", web::post().to(HttpResponse::Ok)),
        )
        .await;

        let first = post_from("10.1.1.1", Some("203.0.113.7")).to_request();
        let first = atest::call_service(&app, first).await;
        assert_eq!(first.status(), StatusCode::OK);

        // Only the hop the proxy appended counts, not what the client claimed
        let spoofed = post_from("10.1.1.1", Some("198.51.100.1, 203.0.113.7")).to_request();
        let second = atest::call_service(&app, spoofed).await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

        let other = post_from("10.1.1.1", Some("203.0.113.8")).to_request();
        let other = atest::call_service(&app, other).await;
        assert_eq!(other.status(), StatusCode::OK);
    }
}
