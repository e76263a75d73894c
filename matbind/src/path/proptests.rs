//! Property-based tests for scene paths and path sets.

use super::{PathRelationship, PathSet, ScenePath};
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,6}"
}

fn path_strategy() -> impl Strategy<Value = ScenePath> {
    prop::collection::vec(segment_strategy(), 0..6).prop_map(|segments| {
        segments
            .iter()
            .try_fold(ScenePath::root(), |path, name| path.child(name))
            .unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Display and parse are inverse
    #[test]
    fn path_display_parse_roundtrip(path in path_strategy()) {
        let text = path.to_string();
        prop_assert_eq!(ScenePath::parse(&text).unwrap(), path);
    }

    // Every ancestor is reported as an ancestor and sorts first
    #[test]
    fn ancestors_are_ancestors(path in path_strategy()) {
        for ancestor in path.ancestors() {
            prop_assert!(ancestor.is_ancestor_of(&path));
            prop_assert!(ancestor < path);
            prop_assert_eq!(
                PathRelationship::between(&ancestor, &path),
                PathRelationship::Ancestor
            );
        }
    }

    // The relationship is antisymmetric
    #[test]
    fn relationship_antisymmetric(a in path_strategy(), b in path_strategy()) {
        let forward = PathRelationship::between(&a, &b);
        let backward = PathRelationship::between(&b, &a);
        let expected = match forward {
            PathRelationship::Ancestor => PathRelationship::Descendant,
            PathRelationship::Descendant => PathRelationship::Ancestor,
            other => other,
        };
        prop_assert_eq!(backward, expected);
    }

    // The common ancestor is a prefix of both inputs
    #[test]
    fn common_ancestor_is_prefix(a in path_strategy(), b in path_strategy()) {
        let common = ScenePath::common_ancestor(&a, &b);
        prop_assert!(a.has_prefix(&common));
        prop_assert!(b.has_prefix(&common));
    }

    // contains_descendant_of agrees with a linear scan
    #[test]
    fn descendant_query_matches_scan(
        members in prop::collection::vec(path_strategy(), 0..12),
        probe in path_strategy(),
    ) {
        let set: PathSet = members.iter().cloned().collect();
        let expected = members.iter().any(|m| probe.is_ancestor_of(m));
        prop_assert_eq!(set.contains_descendant_of(&probe), expected);
    }

    // Minimal members never have an ancestor in the set, and cover everything
    #[test]
    fn minimal_covers_all(members in prop::collection::vec(path_strategy(), 0..12)) {
        let set: PathSet = members.into_iter().collect();
        let minimal = set.minimal();
        for path in &minimal {
            prop_assert!(!set.contains_ancestor_of(path));
        }
        for path in &set {
            prop_assert!(minimal.covers(path));
        }
    }
}
