//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/` - 공개 endpoint
//! - `/login` - 로그인 (Access + Refresh Token 발급)
//! - `/refresh` - Access Token 갱신
//! - `/protected*` - 인증/역할 보호 endpoint
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)

pub mod auth;
pub mod health;
pub mod protected;

use std::sync::Arc;

use axum::Router;

pub use auth::{auth_router, LoginRequest, RefreshResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use protected::{protected_router, MessageResponse};

use crate::state::AppState;

/// 전체 API 라우터 생성 (`/metrics` 제외).
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(protected_router(&state))
        .merge(auth_router())
        .nest("/health", health_router())
        .with_state(state)
}
