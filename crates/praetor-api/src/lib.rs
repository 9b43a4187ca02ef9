//! JWT 인증 데모 HTTP 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 로그인/갱신/보호 라우트
//! - 토큰 검증 및 역할 검사 미들웨어
//! - 메모리 기반 사용자 저장소
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`store`]: 메모리 기반 사용자 저장소
//! - [`routes`]: REST API 엔드포인트
//! - [`middleware`]: 인증 및 메트릭 미들웨어
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`error`]: API 에러 응답

pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::{metrics_layer, require_auth, CurrentIdentity, RouteGuard};
pub use routes::create_api_router;
pub use state::AppState;
pub use store::{InMemoryPrincipalStore, UserRecord};

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
