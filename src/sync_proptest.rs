//! Property-based tests for subject normalization, commit maps and
//! differences.
//!
//! These tests use proptest to generate random histories and subjects and
//! verify that the matching invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use crate::commit_map::{build, CommitRecord, Fingerprint};
    use crate::difference::diff;
    use crate::patch::{split_lines, PatchRewriter};
    use crate::subject::{normalize, PATCH_SUBJECT_PREFIX};
    use proptest::prelude::*;

    const TOPICS: &[&str] = &[
        "Cycles: ",
        "cycles: ",
        "Cycles Standalone: ",
        "Cycles standalone: ",
        "cycles standalone: ",
    ];

    /// Subjects with an optional topic. The body has no `:` so it can never
    /// start with a second topic.
    fn subject() -> impl Strategy<Value = String> {
        (prop::option::of(prop::sample::select(TOPICS)), "[A-Za-z0-9 .,_-]{0,24}")
            .prop_map(|(topic, body)| format!("{}{}", topic.unwrap_or(""), body))
    }

    /// Histories drawn from a small id/timestamp space so collisions and
    /// overlaps actually happen.
    fn history() -> impl Strategy<Value = Vec<CommitRecord>> {
        prop::collection::vec((0u8..12, 0i64..6, subject()), 0..16).prop_map(|records| {
            records
                .into_iter()
                .map(|(id, stamp, subject)| CommitRecord::new(format!("{:040x}", id), stamp, subject))
                .collect()
        })
    }

    fn ignore_set() -> impl Strategy<Value = HashSet<String>> {
        prop::collection::hash_set((0u8..12).prop_map(|id| format!("{:040x}", id)), 0..4)
    }

    // ============================================================================
    // Subject normalization properties
    // ============================================================================

    proptest! {
        /// Property: normalizing an already normalized subject changes nothing
        #[test]
        fn normalize_is_idempotent(input in subject()) {
            let once = normalize(input.as_bytes(), b"", TOPICS);
            let twice = normalize(&once, b"", TOPICS);
            prop_assert_eq!(once, twice);
        }

        /// Property: idempotence also holds with the patch header prefix
        #[test]
        fn normalize_with_prefix_is_idempotent(input in subject()) {
            let line = [PATCH_SUBJECT_PREFIX, input.as_bytes()].concat();
            let once = normalize(&line, PATCH_SUBJECT_PREFIX, TOPICS);
            let twice = normalize(&once, PATCH_SUBJECT_PREFIX, TOPICS);
            prop_assert_eq!(once, twice);
        }

        /// Property: subjects without the required prefix are never touched
        #[test]
        fn normalize_requires_prefix(input in subject()) {
            let result = normalize(input.as_bytes(), PATCH_SUBJECT_PREFIX, TOPICS);
            prop_assert_eq!(result, input.into_bytes());
        }
    }

    // ============================================================================
    // Commit map and difference properties
    // ============================================================================

    proptest! {
        /// Property: ignored ids never reach a map or a difference
        #[test]
        fn ignored_ids_never_appear(a in history(), b in history(), ignore in ignore_set()) {
            let map_a = build(&a, &ignore, TOPICS);
            let map_b = build(&b, &ignore, TOPICS);
            for id in map_a.ids().chain(map_b.ids()) {
                prop_assert!(!ignore.contains(id));
            }
            let result = diff(&map_a, &map_b);
            for id in result.only_in_a.iter().chain(&result.only_in_b) {
                prop_assert!(!ignore.contains(id));
            }
        }

        /// Property: every fingerprint is shared, only in A, or only in B
        #[test]
        fn difference_partitions_fingerprints(a in history(), b in history()) {
            let ignore = HashSet::new();
            let map_a = build(&a, &ignore, TOPICS);
            let map_b = build(&b, &ignore, TOPICS);
            let result = diff(&map_a, &map_b);

            let only_a: Vec<&Fingerprint> = map_a.keys().filter(|k| !map_b.contains_key(k)).collect();
            let only_b: Vec<&Fingerprint> = map_b.keys().filter(|k| !map_a.contains_key(k)).collect();
            prop_assert_eq!(result.only_in_a.len(), only_a.len());
            prop_assert_eq!(result.only_in_b.len(), only_b.len());

            for (key, id) in only_a.iter().zip(&result.only_in_a) {
                prop_assert_eq!(map_a.get(key), Some(id.as_str()));
            }
            for (key, id) in only_b.iter().zip(&result.only_in_b) {
                prop_assert_eq!(map_b.get(key), Some(id.as_str()));
            }

            let shared = map_a.keys().filter(|k| map_b.contains_key(k)).count();
            prop_assert_eq!(shared + only_a.len(), map_a.len());
            prop_assert_eq!(shared + only_b.len(), map_b.len());
        }

        /// Property: a history compared with itself has no differences
        #[test]
        fn same_history_has_no_difference(a in history(), ignore in ignore_set()) {
            let result = diff(&build(&a, &ignore, TOPICS), &build(&a, &ignore, TOPICS));
            prop_assert!(result.is_empty());
        }

        /// Property: building is deterministic
        #[test]
        fn build_is_deterministic(a in history()) {
            let ignore = HashSet::new();
            let first: Vec<String> = build(&a, &ignore, TOPICS).ids().map(str::to_string).collect();
            let second: Vec<String> = build(&a, &ignore, TOPICS).ids().map(str::to_string).collect();
            prop_assert_eq!(first, second);
        }
    }

    // ============================================================================
    // Patch rewriting properties
    // ============================================================================

    proptest! {
        /// Property: a patch without any marker lines passes through unchanged
        #[test]
        fn unmarked_lines_pass_through(body in prop::collection::vec("[a-z@ ]{0,12}\n", 0..10)) {
            let content = body.concat();
            let lines = split_lines(content.as_bytes());
            let output = PatchRewriter::new(b"src", b"intern/cycles", TOPICS)
                .unwrap()
                .rewrite(&lines);
            prop_assert_eq!(output.concat(), content.into_bytes());
        }
    }
}
