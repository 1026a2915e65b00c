//! Property-based tests for byte formatting and path normalization.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::error::{Error, PathRejection};
    use crate::path_guard::{normalize, PathGuard};
    use crate::sizes::format_bytes;
    use proptest::prelude::*;
    use std::path::{Component, Path, PathBuf};

    fn split_unit(formatted: &str) -> (&str, &str) {
        let at = formatted
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(formatted.len());
        formatted.split_at(at)
    }

    fn segment() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => "[a-zA-Z0-9_]{1,8}",
            1 => Just(".".to_string()),
            1 => Just("..".to_string()),
        ]
    }

    // ============================================================================
    // format_bytes property tests
    // ============================================================================

    proptest! {
        /// Property: below a kilobyte the exact count is printed
        #[test]
        fn format_bytes_small_values_are_exact(bytes in 0u64..1000) {
            prop_assert_eq!(format_bytes(bytes), format!("{}B", bytes));
        }

        /// Property: larger values carry exactly one decimal and a known unit
        #[test]
        fn format_bytes_large_values_have_one_decimal(bytes in 1000u64..u64::MAX) {
            let formatted = format_bytes(bytes);
            let (number, unit) = split_unit(&formatted);
            prop_assert!(["KB", "MB", "GB", "TB"].contains(&unit), "unit {}", unit);

            let (whole, tenths) = number.split_once('.').expect("decimal point");
            prop_assert_eq!(tenths.len(), 1);
            prop_assert!(whole.parse::<u64>().is_ok());
        }

        /// Property: below a terabyte the integer part is between 1 and 999
        #[test]
        fn format_bytes_integer_part_in_range(bytes in 1000u64..1_000_000_000_000) {
            let formatted = format_bytes(bytes);
            let (number, _) = split_unit(&formatted);
            let whole: u64 = number.split('.').next().unwrap().parse().unwrap();
            prop_assert!((1..=999).contains(&whole), "{} from {}", formatted, bytes);
        }

        /// Property: the printed value never exceeds the real one (truncation)
        #[test]
        fn format_bytes_truncates(bytes in 1000u64..1_000_000_000_000_000) {
            let formatted = format_bytes(bytes);
            let (number, unit) = split_unit(&formatted);
            let scale: u64 = match unit {
                "KB" => 1_000,
                "MB" => 1_000_000,
                "GB" => 1_000_000_000,
                _ => 1_000_000_000_000,
            };
            let tenths: u64 = number.replace('.', "").parse().unwrap();
            prop_assert!(tenths * (scale / 10) <= bytes);
            prop_assert!(bytes < (tenths + 1) * (scale / 10));
        }
    }

    // ============================================================================
    // normalize property tests
    // ============================================================================

    proptest! {
        /// Property: normalization is idempotent
        #[test]
        fn normalize_is_idempotent(segments in prop::collection::vec(segment(), 0..10)) {
            let path: PathBuf = std::iter::once("/".to_string()).chain(segments).collect();
            let once = normalize(&path);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        /// Property: absolute paths normalize without `.` or `..` components
        #[test]
        fn normalize_absolute_has_no_dot_components(
            segments in prop::collection::vec(segment(), 0..10)
        ) {
            let path: PathBuf = std::iter::once("/".to_string()).chain(segments).collect();
            let normalized = normalize(&path);
            prop_assert!(normalized.is_absolute());
            prop_assert!(normalized
                .components()
                .all(|c| !matches!(c, Component::CurDir | Component::ParentDir)));
        }

        /// Property: anything under a protected prefix is rejected
        #[test]
        fn protected_prefix_rejects_descendants(
            segments in prop::collection::vec("[a-zA-Z0-9_]{1,8}", 0..6)
        ) {
            let guard = PathGuard::new("Flashpoint")
                .protect("/protected/area", PathRejection::Protected);
            let mut path = PathBuf::from("/protected/area");
            path.extend(segments);

            let result = guard.validate_destination(&path);
            let rejected = matches!(
                result,
                Err(Error::PathRejected { reason: PathRejection::Protected, .. })
            );
            prop_assert!(rejected);
        }

        /// Property: accepted destinations end with the product folder
        #[test]
        fn accepted_destination_ends_with_product(
            segments in prop::collection::vec("[a-zA-Z0-9_]{1,8}", 1..6)
        ) {
            let guard = PathGuard::new("Flashpoint")
                .protect("/protected/area", PathRejection::Protected);
            let mut path = PathBuf::from("/home");
            path.extend(segments);

            let accepted = guard.validate_destination(&path).unwrap();
            prop_assert!(accepted.ends_with(Path::new("Flashpoint")));
            prop_assert!(accepted.starts_with(&path));
        }
    }
}
