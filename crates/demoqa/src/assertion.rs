//! Assertions for test validation.
//!
//! They return [`SuiteResult`] instead of panicking so a failing case is
//! recorded by the harness, gets its artifacts captured and does not take
//! the rest of the run down with it. Arguments are `(actual, expected)`.

use crate::result::{SuiteError, SuiteResult};
use std::fmt::Debug;

fn check(passed: bool, message: impl FnOnce() -> String) -> SuiteResult<()> {
    if passed {
        Ok(())
    } else {
        Err(SuiteError::assertion(message()))
    }
}

/// Assert two values are equal
pub fn equals<T: PartialEq + Debug + ?Sized>(actual: &T, expected: &T) -> SuiteResult<()> {
    check(actual == expected, || format!("expected {expected:?}, got {actual:?}"))
}

/// Assert a string contains a substring
pub fn contains(haystack: &str, needle: &str) -> SuiteResult<()> {
    check(haystack.contains(needle), || {
        format!("expected '{haystack}' to contain '{needle}'")
    })
}

/// Assert a string does not contain a substring
pub fn not_contains(haystack: &str, needle: &str) -> SuiteResult<()> {
    check(!haystack.contains(needle), || {
        format!("expected '{haystack}' not to contain '{needle}'")
    })
}

/// Assert a condition is true
pub fn is_true(condition: bool, message: &str) -> SuiteResult<()> {
    check(condition, || format!("expected true: {message}"))
}

/// Assert a condition is false
pub fn is_false(condition: bool, message: &str) -> SuiteResult<()> {
    check(!condition, || format!("expected false: {message}"))
}

/// Assert `actual > bound`
pub fn greater_than<T: PartialOrd + Debug>(actual: T, bound: T) -> SuiteResult<()> {
    check(actual > bound, || format!("expected {actual:?} to be greater than {bound:?}"))
}

/// Assert `actual >= bound`
pub fn at_least<T: PartialOrd + Debug>(actual: T, bound: T) -> SuiteResult<()> {
    check(actual >= bound, || format!("expected {actual:?} to be at least {bound:?}"))
}

/// Assert `actual < bound`
pub fn less_than<T: PartialOrd + Debug>(actual: T, bound: T) -> SuiteResult<()> {
    check(actual < bound, || format!("expected {actual:?} to be less than {bound:?}"))
}

/// Assert `|actual - expected| <= delta`
pub fn close_to(actual: f64, expected: f64, delta: f64) -> SuiteResult<()> {
    check((actual - expected).abs() <= delta, || {
        format!("expected {actual} to be close to {expected} +/- {delta}")
    })
}

/// Assert both collections hold the same members, in any order
pub fn has_members<T: PartialEq + Debug>(actual: &[T], expected: &[T]) -> SuiteResult<()> {
    let mut remaining: Vec<&T> = actual.iter().collect();
    let mut same = actual.len() == expected.len();
    for item in expected {
        match remaining.iter().position(|a| *a == item) {
            Some(i) => {
                remaining.swap_remove(i);
            }
            None => same = false,
        }
    }
    check(same && remaining.is_empty(), || {
        format!("expected {actual:?} to have the same members as {expected:?}")
    })
}

/// Assert a collection has `len` items
pub fn has_length<T: Debug>(actual: &[T], len: usize) -> SuiteResult<()> {
    check(actual.len() == len, || {
        format!("expected {actual:?} to have length {len}, got {}", actual.len())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod comparison_tests {
        use super::*;

        #[test]
        fn test_equals() {
            assert!(equals(&"Dropped!", &"Dropped!").is_ok());
            let err = equals(&"Drop here", &"Dropped!").unwrap_err();
            assert!(matches!(err, SuiteError::AssertionFailed { .. }));
            assert!(err.to_string().contains("expected \"Dropped!\", got \"Drop here\""));
        }

        #[test]
        fn test_equals_unsized() {
            assert!(equals("Small Modal", "Small Modal").is_ok());
            assert!(equals([1, 2].as_slice(), [1, 2].as_slice()).is_ok());
        }

        #[test]
        fn test_ordering() {
            assert!(greater_than(41, 40).is_ok());
            assert!(greater_than(40, 40).is_err());
            assert!(at_least(40, 40).is_ok());
            assert!(less_than(9.5, 10.0).is_ok());
            assert!(less_than(10.0, 10.0).is_err());
        }

        #[test]
        fn test_close_to() {
            assert!(close_to(101.0, 100.0, 2.0).is_ok());
            assert!(close_to(97.5, 100.0, 2.0).is_err());
        }
    }

    mod text_tests {
        use super::*;

        #[test]
        fn test_contains() {
            assert!(contains("You have selected : commands", "commands").is_ok());
            assert!(contains("", "x").is_err());
            assert!(not_contains("TestName", "EditedName").is_ok());
            assert!(not_contains("EditedName", "EditedName").is_err());
        }

        #[test]
        fn test_bool() {
            assert!(is_true(true, "x").is_ok());
            assert!(is_false(true, "radio disabled").unwrap_err().to_string().contains("radio disabled"));
        }
    }

    mod collection_tests {
        use super::*;

        #[test]
        fn test_has_members_any_order() {
            let actual = vec!["Blue", "Red", "Green"];
            assert!(has_members(&actual, &["Red", "Green", "Blue"]).is_ok());
        }

        #[test]
        fn test_has_members_rejects_subset_and_duplicates() {
            assert!(has_members(&["Red"], &["Red", "Blue"]).is_err());
            assert!(has_members(&["Red", "Red"], &["Red", "Blue"]).is_err());
            assert!(has_members(&["Red", "Blue", "Blue"], &["Red", "Blue"]).is_err());
        }

        #[test]
        fn test_has_length() {
            assert!(has_length(&["Red", "Blue"], 2).is_ok());
            assert!(has_length::<u8>(&[], 1).is_err());
        }
    }
}
