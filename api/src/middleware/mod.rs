pub mod cors;
pub mod rate_limit;
pub mod security;

pub use cors::create_cors;
pub use rate_limit::RateLimiter;
pub use security::SecurityMiddleware;

use actix_web::dev::ServiceRequest;

/// Whether the directly connected peer is one of the configured proxies,
/// and so may speak for the client through forwarding headers
pub(crate) fn peer_is_trusted(req: &ServiceRequest, trusted_proxies: &[String]) -> bool {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .is_some_and(|ip| trusted_proxies.iter().any(|trusted| *trusted == ip))
}
