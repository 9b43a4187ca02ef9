//! 로그인 및 토큰 갱신 endpoint.
//!
//! - `POST /login`: 사용자 이름/비밀번호로 Access + Refresh Token 발급
//! - `GET /refresh`: 헤더의 Refresh Token으로 새 Access Token 발급

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, routing::{get, post}, Json, Router};
use praetor_auth::TokenPair;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_login, record_token_rejection};
use crate::middleware::HttpHeaders;
use crate::state::AppState;

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "사용자 이름이 비어 있습니다"))]
    pub username: String,
    #[validate(length(min = 1, message = "비밀번호가 비어 있습니다"))]
    pub password: String,
}

/// 토큰 갱신 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// 로그인.
///
/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    request.validate()?;

    let result = state
        .lifecycle
        .login_pair(&request.username, &request.password, state.now())
        .await;

    match result {
        Ok(pair) => {
            record_login("success");
            Ok(Json(pair))
        }
        Err(e) => {
            record_login(e.reason());
            Err(e.into())
        }
    }
}

/// Refresh Token으로 새 Access Token 발급.
///
/// GET /refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<RefreshResponse>> {
    let lifecycle = &state.lifecycle;
    let now = state.now();

    let headers = HttpHeaders(&headers);
    let token = lifecycle.read_token_from_header(&headers).map_err(|e| {
        record_token_rejection(e.reason());
        ApiError::from(e)
    })?;

    let access_token = lifecycle.refresh(token, now).await.map_err(|e| {
        record_token_rejection(e.reason());
        ApiError::from(e)
    })?;

    info!("Refresh token exchanged");
    Ok(Json(RefreshResponse { access_token }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", get(refresh))
}
