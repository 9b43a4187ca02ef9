//! 인증 시스템의 에러 타입.
//!
//! 자격증명 검증, 토큰 처리, 사용자 조회, 설정 검증에서 발생하는
//! 에러를 정의합니다. 모든 에러는 HTTP 경계에서 복구 가능하며
//! (401/403 응답으로 매핑) 프로세스를 중단시키지 않습니다.

use thiserror::Error;

use crate::types::TokenType;

/// 토큰 처리 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// 서명 불일치 또는 허용되지 않은 알고리즘
    #[error("토큰 서명이 유효하지 않습니다")]
    BadSignature,

    /// 만료된 토큰
    #[error("토큰이 만료되었습니다")]
    Expired,

    /// 요청한 용도와 다른 타입의 토큰
    #[error("잘못된 토큰 타입: {expected} 필요, {found} 전달됨")]
    WrongType {
        expected: TokenType,
        found: TokenType,
    },

    /// Authorization 헤더 누락 또는 형식 오류
    #[error("인증 헤더가 없거나 형식이 잘못되었습니다")]
    MissingHeader,

    /// 파싱할 수 없는 토큰
    #[error("잘못된 토큰 형식: {0}")]
    MalformedToken(String),

    /// 예약된 클레임 이름과 충돌하는 사용자 정의 클레임
    #[error("예약된 클레임 이름입니다: {0}")]
    ReservedClaim(String),

    /// 0 이하의 토큰 수명
    #[error("토큰 수명은 0보다 커야 합니다")]
    InvalidLifespan,

    /// 서명/직렬화 실패
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(String),
}

impl TokenError {
    /// 메트릭/로그용 짧은 사유 문자열.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "expired",
            TokenError::WrongType { .. } => "wrong_type",
            TokenError::MissingHeader => "missing_header",
            TokenError::MalformedToken(_) => "malformed",
            TokenError::ReservedClaim(_) => "reserved_claim",
            TokenError::InvalidLifespan => "invalid_lifespan",
            TokenError::Encoding(_) => "encoding",
        }
    }
}

/// 사용자 조회 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// 저장소의 역할 데이터를 파싱할 수 없음
    #[error("역할 데이터가 잘못되었습니다 ({subject}): {raw:?}")]
    MalformedRoleData { subject: String, raw: String },

    /// 저장소 백엔드 에러
    #[error("사용자 저장소 에러: {0}")]
    Backend(String),
}

/// 인증 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// 존재하지 않는 사용자
    #[error("존재하지 않는 사용자입니다")]
    UnknownUser,

    /// 비활성화된 계정
    #[error("비활성화된 계정입니다")]
    AccountDisabled,

    /// 비밀번호 불일치
    #[error("잘못된 자격증명입니다")]
    InvalidCredentials,

    /// 사용자 조회 실패
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// 토큰 처리 실패
    #[error(transparent)]
    Token(#[from] TokenError),

    /// 비밀번호 해싱 실패
    #[error("비밀번호 해싱 실패: {0}")]
    PasswordHash(String),
}

impl AuthError {
    /// 자격증명 실패 여부.
    ///
    /// 사용자 열거를 막기 위해 HTTP 계층은 이 에러들을 구분하지 않고
    /// 하나의 일반적인 인증 실패로 응답합니다.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthError::UnknownUser | AuthError::AccountDisabled | AuthError::InvalidCredentials
        )
    }

    /// 내부 에러 여부 (클라이언트 잘못이 아님).
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Lookup(_)
                | AuthError::PasswordHash(_)
                | AuthError::Token(TokenError::Encoding(_))
        )
    }

    /// 메트릭/로그용 짧은 사유 문자열.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::UnknownUser => "unknown_user",
            AuthError::AccountDisabled => "account_disabled",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Lookup(LookupError::MalformedRoleData { .. }) => "malformed_role_data",
            AuthError::Lookup(LookupError::Backend(_)) => "lookup_backend",
            AuthError::Token(e) => e.reason(),
            AuthError::PasswordHash(_) => "password_hash",
        }
    }
}

/// 설정 검증 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 설정 로드 실패
    #[error("설정 로드 실패: {0}")]
    Load(#[from] config::ConfigError),

    /// 값이 유효하지 않음
    #[error("잘못된 설정 ({field}): {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// 인증 작업을 위한 Result 타입.
pub type AuthResult<T> = Result<T, AuthError>;
