//! 메모리 기반 사용자 저장소.
//!
//! 역할은 저장소 레코드에 쉼표 구분 문자열로 보관되며, 조회 시점에
//! [`RoleSet`]으로 파싱됩니다. 파싱에 실패하면 빈 역할로 대체하지 않고
//! `MalformedRoleData` 에러를 반환합니다.

use std::collections::HashMap;

use async_trait::async_trait;
use praetor_auth::{hash_password, PasswordError};
use praetor_core::{LookupError, Principal, PrincipalId, PrincipalLookup, RoleSet};
use tokio::sync::RwLock;

/// 저장소 레코드.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: PrincipalId,
    pub username: String,
    pub password_hash: String,
    /// 쉼표 구분 역할 목록 (예: "operator,admin")
    pub roles: String,
    pub is_active: bool,
}

impl UserRecord {
    fn to_principal(&self) -> Result<Principal, LookupError> {
        let roles = RoleSet::parse_delimited(&self.roles).map_err(|e| {
            LookupError::MalformedRoleData {
                subject: self.id.to_string(),
                raw: e.raw,
            }
        })?;

        Ok(Principal {
            id: self.id.clone(),
            username: self.username.clone(),
            password_hash: self.password_hash.clone(),
            roles,
            is_active: self.is_active,
        })
    }
}

/// 메모리 기반 [`PrincipalLookup`] 구현.
#[derive(Debug, Default)]
pub struct InMemoryPrincipalStore {
    users: RwLock<HashMap<PrincipalId, UserRecord>>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 데모 사용자가 등록된 저장소.
    ///
    /// | 사용자 | 비밀번호 | 역할 |
    /// |--------|----------|------|
    /// | TheDude | abides | (없음) |
    /// | Walter | calmerthanyouare | admin |
    /// | Donnie | iamthewalrus | operator |
    /// | Maude | andthorough | operator,admin |
    pub async fn with_demo_users() -> Result<Self, PasswordError> {
        let store = Self::new();
        store.add_user(1, "TheDude", "abides", "").await?;
        store.add_user(2, "Walter", "calmerthanyouare", "admin").await?;
        store.add_user(3, "Donnie", "iamthewalrus", "operator").await?;
        store.add_user(4, "Maude", "andthorough", "operator,admin").await?;
        Ok(store)
    }

    /// 비밀번호를 해싱하여 사용자 등록.
    pub async fn add_user(
        &self,
        id: impl Into<PrincipalId>,
        username: &str,
        password: &str,
        roles: &str,
    ) -> Result<(), PasswordError> {
        let record = UserRecord {
            id: id.into(),
            username: username.to_string(),
            password_hash: hash_password(password)?,
            roles: roles.to_string(),
            is_active: true,
        };
        self.insert(record).await;
        Ok(())
    }

    /// 레코드를 그대로 등록 (같은 id는 교체).
    pub async fn insert(&self, record: UserRecord) {
        self.users.write().await.insert(record.id.clone(), record);
    }

    /// 계정 활성화 상태 변경. 사용자가 없으면 `false`.
    pub async fn set_active(&self, username: &str, is_active: bool) -> bool {
        let mut users = self.users.write().await;
        match users.values_mut().find(|u| u.username == username) {
            Some(user) => {
                user.is_active = is_active;
                true
            }
            None => false,
        }
    }

    /// 역할 문자열 변경. 사용자가 없으면 `false`.
    pub async fn set_roles(&self, username: &str, roles: &str) -> bool {
        let mut users = self.users.write().await;
        match users.values_mut().find(|u| u.username == username) {
            Some(user) => {
                user.roles = roles.to_string();
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl PrincipalLookup for InMemoryPrincipalStore {
    async fn lookup_by_username(&self, username: &str) -> Result<Option<Principal>, LookupError> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.username == username)
            .map(UserRecord::to_principal)
            .transpose()
    }

    async fn lookup_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, LookupError> {
        let users = self.users.read().await;
        users.get(id).map(UserRecord::to_principal).transpose()
    }
}
