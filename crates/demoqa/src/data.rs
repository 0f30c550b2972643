//! Random form data.
//!
//! Every generator has a `*_with` variant taking the RNG so tests can seed
//! it; the plain versions use the thread RNG.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Default length of [`random_string`]
pub const DEFAULT_STRING_LENGTH: usize = 6;

/// Gender options of the practice form
pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
/// Subjects known to the subjects autocomplete
pub const SUBJECTS: [&str; 4] = ["Maths", "Physics", "Chemistry", "Computer Science"];
/// Hobby checkboxes
pub const HOBBIES: [&str; 3] = ["Sports", "Reading", "Music"];
/// States of the state dropdown
pub const STATES: [&str; 3] = ["NCR", "Haryana", "Rajasthan"];

/// Gender radio of the practice form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Every option, in page order
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    /// Label text
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Suffix of the radio's id (`gender-radio-N`)
    #[must_use]
    pub const fn radio_index(self) -> u8 {
        match self {
            Self::Male => 1,
            Self::Female => 2,
            Self::Other => 3,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cities offered for a state; empty for unknown states
#[must_use]
pub fn cities_for(state: &str) -> &'static [&'static str] {
    match state {
        "NCR" => &["Delhi", "Gurgaon", "Noida"],
        "Haryana" => &["Karnal", "Panipat"],
        "Rajasthan" => &["Jaipur", "Jaiselmer"],
        _ => &[],
    }
}

/// Lowercase ASCII string of `len` letters
pub fn random_string_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(LOWERCASE[rng.gen_range(0..LOWERCASE.len())]))
        .collect()
}

/// Lowercase ASCII string of `len` letters
#[must_use]
pub fn random_string(len: usize) -> String {
    random_string_with(&mut rand::thread_rng(), len)
}

/// Ten-digit mobile number starting with 9
pub fn random_phone_number_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("9{}", rng.gen_range(100_000_000..999_999_999u32))
}

/// Ten-digit mobile number starting with 9
#[must_use]
pub fn random_phone_number() -> String {
    random_phone_number_with(&mut rand::thread_rng())
}

/// One element of a non-empty slice
pub fn random_item_with<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}

/// One element of a non-empty slice
#[must_use]
pub fn random_item<T>(items: &[T]) -> Option<&T> {
    random_item_with(&mut rand::thread_rng(), items)
}

/// A random gender
pub fn random_gender_with<R: Rng + ?Sized>(rng: &mut R) -> Gender {
    Gender::ALL[rng.gen_range(0..Gender::ALL.len())]
}

/// A state and one of its cities
pub fn random_state_and_city_with<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
    let state = STATES[rng.gen_range(0..STATES.len())];
    let cities = cities_for(state);
    (state, cities[rng.gen_range(0..cities.len())])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    mod generator_tests {
        use super::*;

        #[test]
        fn test_seeded_rng_is_deterministic() {
            let a = random_string_with(&mut StdRng::seed_from_u64(7), 10);
            let b = random_string_with(&mut StdRng::seed_from_u64(7), 10);
            assert_eq!(a, b);
        }

        #[test]
        fn test_default_length() {
            assert_eq!(random_string(DEFAULT_STRING_LENGTH).len(), 6);
            assert!(random_string(0).is_empty());
        }

        #[test]
        fn test_random_item_empty() {
            let empty: [&str; 0] = [];
            assert!(random_item(&empty).is_none());
            assert!(SUBJECTS.contains(random_item(&SUBJECTS).unwrap()));
        }

        #[test]
        fn test_every_state_has_cities() {
            for state in STATES {
                assert!(!cities_for(state).is_empty(), "{state}");
            }
            assert!(cities_for("Goa").is_empty());
            assert_eq!(cities_for("Rajasthan"), &["Jaipur", "Jaiselmer"]);
        }

        #[test]
        fn test_gender_table_matches_enum() {
            let names: Vec<&str> = Gender::ALL.iter().map(|g| g.as_str()).collect();
            assert_eq!(names, GENDERS);
            assert_eq!(Gender::Female.radio_index(), 2);
        }
    }

    proptest! {
        #[test]
        fn prop_string_is_lowercase(seed in any::<u64>(), len in 0usize..64) {
            let s = random_string_with(&mut StdRng::seed_from_u64(seed), len);
            prop_assert_eq!(s.len(), len);
            prop_assert!(s.chars().all(|c| c.is_ascii_lowercase()));
        }

        #[test]
        fn prop_phone_is_ten_digits_starting_with_nine(seed in any::<u64>()) {
            let phone = random_phone_number_with(&mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(phone.len(), 10);
            prop_assert!(phone.starts_with('9'));
            prop_assert!(phone.chars().all(|c| c.is_ascii_digit()));
        }

        #[test]
        fn prop_city_belongs_to_state(seed in any::<u64>()) {
            let (state, city) = random_state_and_city_with(&mut StdRng::seed_from_u64(seed));
            prop_assert!(cities_for(state).contains(&city));
        }

        #[test]
        fn prop_item_comes_from_slice(seed in any::<u64>()) {
            let hobby = random_item_with(&mut StdRng::seed_from_u64(seed), &HOBBIES).unwrap();
            prop_assert!(HOBBIES.contains(hobby));
        }
    }
}
