//! API 서버용 HTTP middleware.

mod auth;
mod metrics;

pub use auth::{require_auth, CurrentIdentity, HttpHeaders, RouteGuard};
pub use metrics::metrics_layer;
