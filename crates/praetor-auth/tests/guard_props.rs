//! 역할 정책 속성 테스트.

use proptest::prelude::*;
use praetor_auth::{authorize, RolePolicy};
use praetor_core::RoleSet;

fn role_set() -> impl Strategy<Value = RoleSet> {
    prop::collection::btree_set("[a-e]", 0..5).prop_map(|roles| roles.into_iter().collect())
}

proptest! {
    #[test]
    fn require_all_is_superset(held in role_set(), required in role_set()) {
        let policy = RolePolicy::RequireAll(required.clone());
        prop_assert_eq!(
            authorize(&held, &policy),
            required.iter().all(|r| held.contains(r))
        );
    }

    #[test]
    fn accept_any_is_intersection(held in role_set(), accepted in role_set()) {
        let policy = RolePolicy::AcceptAny(accepted.clone());
        prop_assert_eq!(
            authorize(&held, &policy),
            accepted.iter().any(|r| held.contains(r))
        );
    }

    #[test]
    fn empty_policies(held in role_set()) {
        prop_assert!(authorize(&held, &RolePolicy::RequireAll(RoleSet::new())));
        prop_assert!(!authorize(&held, &RolePolicy::AcceptAny(RoleSet::new())));
    }
}
