//! 단위 테스트용 헬퍼.

use praetor_core::{Principal, RoleSet};

pub(crate) use praetor_core::testing::MemoryLookup;

use crate::password::hash_password;

pub(crate) const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 해시 검증이 필요 없는 테스트용 Principal.
pub(crate) fn principal(id: &str, username: &str, roles: &str) -> Principal {
    Principal::new(
        id,
        username,
        "not-a-real-hash",
        RoleSet::parse_delimited(roles).unwrap(),
    )
}

/// 실제 argon2 해시를 가진 Principal.
pub(crate) fn principal_with_password(
    id: &str,
    username: &str,
    password: &str,
    roles: &str,
) -> Principal {
    Principal::new(
        id,
        username,
        hash_password(password).unwrap(),
        RoleSet::parse_delimited(roles).unwrap(),
    )
}

/// 데모 사용자 4명이 등록된 조회 구현.
pub(crate) fn demo_lookup() -> MemoryLookup {
    let lookup = MemoryLookup::default();
    lookup.insert(principal_with_password("1", "TheDude", "abides", ""));
    lookup.insert(principal_with_password("2", "Walter", "calmerthanyouare", "admin"));
    lookup.insert(principal_with_password("3", "Donnie", "iamthewalrus", "operator"));
    lookup.insert(principal_with_password("4", "Maude", "andthorough", "operator,admin"));
    lookup
}
