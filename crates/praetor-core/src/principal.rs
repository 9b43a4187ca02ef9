//! 사용자(Principal) 모델 및 조회 인터페이스.
//!
//! Principal 레코드는 외부 저장소가 소유합니다. 인증 코어는
//! [`PrincipalLookup`]을 통해 읽기만 합니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LookupError;
use crate::types::{PrincipalId, RoleSet};

/// 인증 가능한 사용자 레코드.
#[derive(Clone, PartialEq, Eq)]
pub struct Principal {
    /// 고유 식별자
    pub id: PrincipalId,
    /// 고유 사용자 이름
    pub username: String,
    /// PHC 형식 비밀번호 해시
    pub password_hash: String,
    /// 역할 집합
    pub roles: RoleSet,
    /// 계정 활성화 여부
    pub is_active: bool,
}

impl Principal {
    /// 활성 상태의 Principal 생성.
    pub fn new(
        id: impl Into<PrincipalId>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        roles: RoleSet,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password_hash: password_hash.into(),
            roles,
            is_active: true,
        }
    }

    /// 활성화 여부 설정.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// 토큰에 담기는 신원 스냅샷.
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            username: self.username.clone(),
            roles: self.roles.clone(),
        }
    }
}

// 비밀번호 해시는 로그에 남기지 않는다
impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("roles", &self.roles)
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// 토큰 발급 시점의 신원 스냅샷.
///
/// Access Token 검증은 저장소를 다시 조회하지 않으므로, 역할 변경은
/// 다음 토큰 발급부터 반영됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: PrincipalId,
    pub username: String,
    pub roles: RoleSet,
}

/// Principal 조회 인터페이스.
///
/// 동시 호출에 안전해야 하며 읽기 전용입니다.
#[async_trait]
pub trait PrincipalLookup: Send + Sync {
    /// 사용자 이름으로 조회.
    async fn lookup_by_username(&self, username: &str) -> Result<Option<Principal>, LookupError>;

    /// 식별자로 조회.
    async fn lookup_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, LookupError>;
}

#[async_trait]
impl<T: PrincipalLookup + ?Sized> PrincipalLookup for std::sync::Arc<T> {
    async fn lookup_by_username(&self, username: &str) -> Result<Option<Principal>, LookupError> {
        (**self).lookup_by_username(username).await
    }

    async fn lookup_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, LookupError> {
        (**self).lookup_by_id(id).await
    }
}
