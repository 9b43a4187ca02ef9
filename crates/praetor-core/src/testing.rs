//! 테스트용 메모리 기반 [`PrincipalLookup`].
//!
//! 하위 크레이트의 테스트에서 `test-utils` 기능으로 사용합니다.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::LookupError;
use crate::principal::{Principal, PrincipalLookup};
use crate::types::{PrincipalId, RoleSet};

/// id로 색인되는 메모리 조회 구현.
#[derive(Debug, Default)]
pub struct MemoryLookup {
    by_id: RwLock<HashMap<PrincipalId, Principal>>,
}

impl MemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// 등록 (같은 id는 교체).
    pub fn insert(&self, principal: Principal) {
        self.by_id
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(principal.id.clone(), principal);
    }

    pub fn get(&self, username: &str) -> Option<Principal> {
        self.by_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|p| p.username == username)
            .cloned()
    }

    pub fn remove(&self, username: &str) -> Option<Principal> {
        let mut users = self.by_id.write().unwrap_or_else(PoisonError::into_inner);
        let id = users
            .values()
            .find(|p| p.username == username)
            .map(|p| p.id.clone())?;
        users.remove(&id)
    }

    pub fn set_active(&self, username: &str, is_active: bool) {
        self.update(username, |p| p.is_active = is_active);
    }

    pub fn set_roles(&self, username: &str, roles: RoleSet) {
        self.update(username, |p| p.roles = roles);
    }

    fn update(&self, username: &str, f: impl FnOnce(&mut Principal)) {
        let mut users = self.by_id.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(p) = users.values_mut().find(|p| p.username == username) {
            f(p);
        }
    }
}

#[async_trait]
impl PrincipalLookup for MemoryLookup {
    async fn lookup_by_username(&self, username: &str) -> Result<Option<Principal>, LookupError> {
        Ok(self.get(username))
    }

    async fn lookup_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, LookupError> {
        Ok(self
            .by_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned())
    }
}
