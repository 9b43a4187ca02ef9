//! API 에러 응답.
//!
//! 인증 계층의 에러를 HTTP 상태 코드와 일관된 JSON 형식으로 변환합니다.
//!
//! | 에러 | 상태 | 코드 |
//! |------|------|------|
//! | 자격증명 실패 (사용자 없음, 비밀번호 불일치, 비활성 계정) | 401 | `AUTHENTICATION_FAILED` |
//! | 토큰 헤더 없음 | 401 | `MISSING_TOKEN` |
//! | 만료된 토큰 | 401 | `TOKEN_EXPIRED` |
//! | 잘못된 토큰 타입 | 401 | `WRONG_TOKEN_TYPE` |
//! | 서명/형식 오류 | 401 | `INVALID_TOKEN` |
//! | 역할 부족 | 403 | `INSUFFICIENT_PERMISSION` |
//! | 입력 검증 실패 | 422 | `VALIDATION_ERROR` |
//! | 내부 에러 | 500 | `INTERNAL_ERROR` |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use praetor_auth::Denial;
use praetor_core::{AuthError, TokenError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

/// API 에러 응답 본문.
///
/// ```json
/// {
///   "code": "AUTHENTICATION_FAILED",
///   "message": "사용자 이름 또는 비밀번호가 올바르지 않습니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 핸들러/미들웨어 에러.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 로그인/갱신 시 자격증명 실패. 원인은 응답에 드러내지 않는다.
    #[error("사용자 이름 또는 비밀번호가 올바르지 않습니다")]
    AuthenticationFailed,

    #[error(transparent)]
    Token(TokenError),

    #[error("권한이 부족합니다: {}", .0.reason)]
    Forbidden(Denial),

    #[error("입력값이 올바르지 않습니다")]
    Validation(Value),

    /// 로그에만 상세를 남기고 응답은 일반 메시지
    #[error("내부 서버 에러")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationFailed | ApiError::Token(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            ApiError::Token(TokenError::MissingHeader) => "MISSING_TOKEN",
            ApiError::Token(TokenError::Expired) => "TOKEN_EXPIRED",
            ApiError::Token(TokenError::WrongType { .. }) => "WRONG_TOKEN_TYPE",
            ApiError::Token(_) => "INVALID_TOKEN",
            ApiError::Forbidden(_) => "INSUFFICIENT_PERMISSION",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        if e.is_credential_failure() {
            return ApiError::AuthenticationFailed;
        }
        match e {
            AuthError::Token(token) => ApiError::from(token),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Encoding(msg) => ApiError::Internal(msg),
            // 발급 단계 에러
            TokenError::InvalidLifespan => {
                ApiError::Internal(TokenError::InvalidLifespan.to_string())
            }
            other => ApiError::Token(other),
        }
    }
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        ApiError::Forbidden(denial)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or(Value::Null);
        ApiError::Validation(details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Internal(detail) => {
                error!(detail = %detail, "Internal error while handling request");
                ApiErrorResponse::new(self.code(), self.to_string())
            }
            ApiError::Validation(details) => {
                ApiErrorResponse::with_details(self.code(), self.to_string(), details.clone())
            }
            _ => ApiErrorResponse::new(self.code(), self.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;
