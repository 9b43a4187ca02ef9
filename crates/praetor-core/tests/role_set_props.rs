//! RoleSet 파싱 속성 테스트

use praetor_core::RoleSet;
use proptest::prelude::*;

fn role_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,11}"
}

proptest! {
    #[test]
    fn delimited_round_trip(names in prop::collection::btree_set(role_name(), 0..6)) {
        let raw = names.iter().cloned().collect::<Vec<_>>().join(",");
        let roles = RoleSet::parse_delimited(&raw).unwrap();

        prop_assert_eq!(roles.len(), names.len());
        for name in &names {
            prop_assert!(roles.contains(name));
        }
        prop_assert_eq!(roles.to_delimited(), raw);
    }

    #[test]
    fn empty_element_always_fails(
        names in prop::collection::vec(role_name(), 1..5),
        position in 0usize..5,
    ) {
        let mut parts = names.clone();
        let at = position.min(parts.len());
        parts.insert(at, String::new());
        let raw = parts.join(",");

        prop_assert!(RoleSet::parse_delimited(&raw).is_err());
    }

    #[test]
    fn superset_matches_subset_relation(
        held in prop::collection::btree_set(role_name(), 0..6),
        required in prop::collection::btree_set(role_name(), 0..3),
    ) {
        let held_set: RoleSet = held.iter().cloned().collect();
        let required_set: RoleSet = required.iter().cloned().collect();

        prop_assert_eq!(held_set.is_superset(&required_set), required.is_subset(&held));
        prop_assert_eq!(held_set.intersects(&required_set), !required.is_disjoint(&held));
    }
}
