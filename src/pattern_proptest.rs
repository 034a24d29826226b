//! Property-based tests for pattern compilation and filtering.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::pattern::compile;
    use proptest::prelude::*;

    proptest! {
        /// Property: the match-all pattern accepts every string
        #[test]
        fn match_all_accepts_every_string(input in ".*") {
            let p = compile(".*").unwrap();
            prop_assert!(p.matches(&input));
        }

        /// Property: blank patterns behave exactly like the match-all pattern
        #[test]
        fn blank_behaves_like_match_all(input in ".*", blanks in " {0,4}") {
            let blank = compile(&blanks).unwrap();
            let match_all = compile(".*").unwrap();
            prop_assert_eq!(blank.matches(&input), match_all.matches(&input));
        }

        /// Property: filter output is a subsequence of its input
        #[test]
        fn filter_output_is_ordered_subsequence(
            names in proptest::collection::vec("[a-z]{1,8}", 0..20)
        ) {
            let p = compile("[a-m].*").unwrap();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let filtered = p.filter(refs.iter().copied());

            // every output name appears in the input, in the same relative order
            let mut cursor = 0;
            for name in &filtered {
                let pos = names[cursor..]
                    .iter()
                    .position(|n| n == name)
                    .expect("filtered name missing from input");
                cursor += pos + 1;
            }
        }

        /// Property: filtering is idempotent under the same pattern
        #[test]
        fn filter_is_idempotent(
            names in proptest::collection::vec("[a-z]{1,8}", 0..20)
        ) {
            let p = compile("[a-m].*").unwrap();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let once = p.filter(refs.iter().copied());
            let twice = p.filter(once.iter().map(String::as_str));
            prop_assert_eq!(once, twice);
        }

        /// Property: a literal alphanumeric pattern matches only itself
        #[test]
        fn literal_pattern_matches_only_itself(name in "[a-z0-9]{1,12}") {
            let p = compile(&name).unwrap();
            prop_assert!(p.matches(&name));
            let suffixed = format!("{}x", name);
            let prefixed = format!("x{}", name);
            prop_assert!(!p.matches(&suffixed));
            prop_assert!(!p.matches(&prefixed));
        }
    }
}
