//! 데모용 공개/보호 endpoint.
//!
//! | 경로 | 조건 |
//! |------|------|
//! | `/` | 없음 |
//! | `/protected` | 유효한 Access Token |
//! | `/protected_admin_required` | `admin` 역할 필수 |
//! | `/protected_admin_accepted` | `admin` 또는 `operator` 역할 |

use std::sync::Arc;

use axum::{middleware, routing::get, Json, Router};
use praetor_auth::{CheckChain, RolePolicy};
use serde::{Deserialize, Serialize};

use crate::middleware::{require_auth, CurrentIdentity, RouteGuard};
use crate::state::AppState;

/// 메시지 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// GET /
pub async fn root() -> Json<MessageResponse> {
    MessageResponse::new("root endpoint")
}

/// GET /protected
pub async fn protected(CurrentIdentity(identity): CurrentIdentity) -> Json<MessageResponse> {
    MessageResponse::new(format!(
        "protected endpoint (allowed user {})",
        identity.username
    ))
}

/// GET /protected_admin_required
pub async fn protected_admin_required(
    CurrentIdentity(identity): CurrentIdentity,
) -> Json<MessageResponse> {
    MessageResponse::new(format!(
        "protected_admin_required endpoint (allowed user {})",
        identity.username
    ))
}

/// GET /protected_admin_accepted
pub async fn protected_admin_accepted(
    CurrentIdentity(identity): CurrentIdentity,
) -> Json<MessageResponse> {
    MessageResponse::new(format!(
        "protected_admin_accepted endpoint (allowed user {})",
        identity.username
    ))
}

fn guarded(
    path: &str,
    handler: axum::routing::MethodRouter<Arc<AppState>>,
    guard: RouteGuard,
) -> Router<Arc<AppState>> {
    Router::new()
        .route(path, handler)
        .route_layer(middleware::from_fn_with_state(guard, require_auth))
}

/// 보호 라우터 생성.
///
/// 가드가 상태를 직접 들고 있어야 하므로 상태를 인자로 받습니다.
pub fn protected_router(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let admin_required = CheckChain::policy(RolePolicy::require_all(["admin"]));
    let admin_accepted = CheckChain::policy(RolePolicy::accept_any(["admin", "operator"]));

    Router::new()
        .route("/", get(root))
        .merge(guarded(
            "/protected",
            get(protected),
            RouteGuard::authenticated(state.clone()),
        ))
        .merge(guarded(
            "/protected_admin_required",
            get(protected_admin_required),
            RouteGuard::new(state.clone(), admin_required),
        ))
        .merge(guarded(
            "/protected_admin_accepted",
            get(protected_admin_accepted),
            RouteGuard::new(state.clone(), admin_accepted),
        ))
}
