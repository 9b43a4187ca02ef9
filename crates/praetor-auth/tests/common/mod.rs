//! 통합 테스트 공통 헬퍼.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use praetor_auth::{hash_password, TokenLifecycle};
use praetor_core::testing::MemoryLookup;
use praetor_core::{AuthConfig, Principal, RoleSet};

pub const SECRET: &str = "integration-secret-key-that-is-long-enough";

/// 기준 시각 (2023-11-14T22:13:20Z).
pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

pub fn add_user(store: &MemoryLookup, id: u64, username: &str, password: &str, roles: &str) {
    store.insert(Principal::new(
        id,
        username,
        hash_password(password).unwrap(),
        RoleSet::parse_delimited(roles).unwrap(),
    ));
}

/// 데모 사용자가 등록된 저장소.
pub fn demo_store() -> Arc<MemoryLookup> {
    let store = MemoryLookup::new();
    add_user(&store, 1, "TheDude", "abides", "");
    add_user(&store, 2, "Walter", "calmerthanyouare", "admin");
    add_user(&store, 3, "Donnie", "iamthewalrus", "operator");
    add_user(&store, 4, "Maude", "andthorough", "operator,admin");
    Arc::new(store)
}

pub fn lifecycle(store: Arc<MemoryLookup>) -> TokenLifecycle<Arc<MemoryLookup>> {
    lifecycle_with(AuthConfig::new(SECRET), store)
}

pub fn lifecycle_with(
    config: AuthConfig,
    store: Arc<MemoryLookup>,
) -> TokenLifecycle<Arc<MemoryLookup>> {
    TokenLifecycle::new(Arc::new(config), store).unwrap()
}
