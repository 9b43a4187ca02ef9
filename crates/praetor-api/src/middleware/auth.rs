//! 토큰 인증 및 역할 검사 미들웨어.
//!
//! 보호된 라우트 앞에서 Access Token을 검증하고 [`CheckChain`]을 실행한 뒤
//! 검증된 [`Identity`]를 요청 extension에 넣습니다.
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/protected_admin_required", get(handler))
//!     .route_layer(middleware::from_fn_with_state(
//!         RouteGuard::new(state.clone(), CheckChain::policy(RolePolicy::require_all(["admin"]))),
//!         require_auth,
//!     ));
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use praetor_auth::{CheckChain, HeaderSource};
use praetor_core::{Identity, TokenError};
use tracing::{debug, warn, Instrument};

use crate::error::ApiError;
use crate::metrics::{record_access_denied, record_token_rejection};
use crate::state::AppState;

/// axum `HeaderMap` 어댑터.
pub struct HttpHeaders<'a>(pub &'a HeaderMap);

impl HeaderSource for HttpHeaders<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.to_str().ok())
    }
}

/// 라우트별 인증 설정.
#[derive(Clone)]
pub struct RouteGuard {
    state: Arc<AppState>,
    chain: CheckChain,
}

impl RouteGuard {
    pub fn new(state: Arc<AppState>, chain: CheckChain) -> Self {
        Self { state, chain }
    }

    /// 유효한 Access Token만 요구하는 가드.
    pub fn authenticated(state: Arc<AppState>) -> Self {
        Self::new(state, CheckChain::new())
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, TokenError> {
        let lifecycle = &self.state.lifecycle;
        let headers = HttpHeaders(headers);
        let token = lifecycle.read_token_from_header(&headers)?;
        lifecycle.validate_access(token, self.state.now())
    }
}

/// 인증 + 역할 검사 미들웨어.
pub async fn require_auth(
    State(guard): State<RouteGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = guard.authenticate(request.headers()).map_err(|e| {
        record_token_rejection(e.reason());
        debug!(reason = e.reason(), path = %request.uri().path(), "Token rejected");
        ApiError::from(e)
    })?;

    if let Err(denial) = guard.chain.run(&identity) {
        record_access_denied(&denial.check);
        warn!(
            subject = %identity.id,
            check = %denial.check,
            reason = %denial.reason,
            "Access denied"
        );
        return Err(denial.into());
    }

    let span = praetor_core::auth_span!("authorized_request", identity.id);
    request.extensions_mut().insert(identity);
    Ok(next.run(request).instrument(span).await)
}

/// 미들웨어가 검증한 신원 추출기.
///
/// [`require_auth`]가 적용되지 않은 라우트에서는 `MISSING_TOKEN`으로 거부됩니다.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or(ApiError::Token(TokenError::MissingHeader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use praetor_auth::RolePolicy;
    use praetor_core::PrincipalLookup;
    use tower::ServiceExt;

    async fn whoami(CurrentIdentity(identity): CurrentIdentity) -> String {
        identity.username
    }

    async fn app(chain: CheckChain) -> (Router, Arc<AppState>) {
        let state = Arc::new(create_test_state().await);
        let router = Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                RouteGuard::new(state.clone(), chain),
                require_auth,
            ));
        (router, state)
    }

    async fn header_for(state: &AppState, username: &str) -> (String, String) {
        let principal = state.store.lookup_by_username(username).await.unwrap().unwrap();
        state
            .lifecycle
            .pack_header_for_user(&principal, state.now())
            .unwrap()
    }

    fn get_request(header: Option<(String, String)>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let (app, _) = app(CheckChain::new()).await;
        let response = app.oneshot(get_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let (app, state) = app(CheckChain::new()).await;
        let header = header_for(&state, "TheDude").await;

        let response = app.oneshot(get_request(Some(header))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"TheDude");
    }

    #[tokio::test]
    async fn test_role_policy_denial_is_forbidden() {
        let (app, state) = app(CheckChain::policy(RolePolicy::require_all(["admin"]))).await;

        let donnie = header_for(&state, "Donnie").await;
        let response = app.clone().oneshot(get_request(Some(donnie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let walter = header_for(&state, "Walter").await;
        let response = app.oneshot(get_request(Some(walter))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_http_headers_adapter() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc".parse().unwrap());

        let adapter = HttpHeaders(&headers);
        assert_eq!(adapter.header("Authorization"), Some("Bearer abc"));
        assert_eq!(adapter.header("X-Missing"), None);
    }
}
