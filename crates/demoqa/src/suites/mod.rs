//! The suites themselves: one per application section plus the BookStore
//! API flow.

pub mod alerts_frames_windows;
pub mod bookstore;
pub mod elements;
pub mod forms;
pub mod interactions;
pub mod widgets;

use crate::api::BookStoreClient;
use crate::harness::TestSuite;
use crate::page_object::{CardName, MenuItem, PageObject};
use crate::pages::HomePage;
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use std::str::FromStr;

/// Every browser suite, in run order
#[must_use]
pub fn desktop() -> Vec<TestSuite<Session>> {
    vec![
        elements::suite(),
        forms::suite(),
        alerts_frames_windows::suite(),
        widgets::suite(),
        interactions::suite(),
    ]
}

/// Every API suite
#[must_use]
pub fn api() -> Vec<TestSuite<BookStoreClient>> {
    vec![bookstore::suite()]
}

/// Which suites a run covers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Browser suites
    #[default]
    Desktop,
    /// API suites
    Api,
    /// Both
    All,
    /// Suites whose name contains this (case-insensitive)
    Named(String),
}

impl Selection {
    /// Whether a suite of the given group and name is selected
    #[must_use]
    pub fn includes(&self, is_api: bool, suite_name: &str) -> bool {
        match self {
            Self::Desktop => !is_api,
            Self::Api => is_api,
            Self::All => true,
            Self::Named(name) => suite_name.to_lowercase().contains(&name.to_lowercase()),
        }
    }

    /// Selected browser suites
    #[must_use]
    pub fn desktop_suites(&self) -> Vec<TestSuite<Session>> {
        desktop()
            .into_iter()
            .filter(|s| self.includes(false, &s.name))
            .collect()
    }

    /// Selected API suites
    #[must_use]
    pub fn api_suites(&self) -> Vec<TestSuite<BookStoreClient>> {
        api()
            .into_iter()
            .filter(|s| self.includes(true, &s.name))
            .collect()
    }
}

impl FromStr for Selection {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Err(SuiteError::config("empty suite selection")),
            "desktop" => Ok(Self::Desktop),
            "api" => Ok(Self::Api),
            "all" => Ok(Self::All),
            _ => Ok(Self::Named(trimmed.to_string())),
        }
    }
}

/// Home page, then a card, then an entry of the side menu
pub(crate) async fn navigate(session: &mut Session, card: CardName, item: impl MenuItem) -> SuiteResult<()> {
    let home = HomePage::new();
    home.open(session).await?;
    home.click_card(session, card).await?;
    home.select_menu_item(session, item).await
}

/// Item of a list read from the page, or "" when the list is too short
pub(crate) fn nth(items: &[String], index: usize) -> &str {
    items.get(index).map_or("", String::as_str)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod registry_tests {
        use super::*;

        #[test]
        fn test_desktop_suites_in_order() {
            let names: Vec<String> = desktop().into_iter().map(|s| s.name).collect();
            assert_eq!(
                names,
                [
                    "DemoQA Elements Section",
                    "DemoQA Forms Section",
                    "DemoQA Alerts, Frame & Windows Section",
                    "DemoQA Widgets Section",
                    "DemoQA Interactions Section",
                ]
            );
        }

        #[test]
        fn test_case_counts() {
            let counts: Vec<usize> = desktop().iter().map(TestSuite::test_count).collect();
            assert_eq!(counts, [5, 2, 5, 5, 5]);
            assert_eq!(api()[0].test_count(), 3);
        }

        #[test]
        fn test_case_names_are_unique_per_suite() {
            for suite in desktop() {
                let mut names: Vec<&str> = suite.tests().iter().map(|t| t.name.as_str()).collect();
                let before = names.len();
                names.sort_unstable();
                names.dedup();
                assert_eq!(names.len(), before, "{}", suite.name);
            }
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_parse_keywords() {
            assert_eq!("desktop".parse::<Selection>().unwrap(), Selection::Desktop);
            assert_eq!("API".parse::<Selection>().unwrap(), Selection::Api);
            assert_eq!("all".parse::<Selection>().unwrap(), Selection::All);
            assert_eq!(
                "widgets".parse::<Selection>().unwrap(),
                Selection::Named("widgets".into())
            );
            assert!("  ".parse::<Selection>().is_err());
        }

        #[test]
        fn test_named_selection_matches_either_group() {
            let widgets = Selection::Named("Widgets".into());
            assert_eq!(widgets.desktop_suites().len(), 1);
            assert!(widgets.api_suites().is_empty());

            let bookstore = Selection::Named("bookstore".into());
            assert!(bookstore.desktop_suites().is_empty());
            assert_eq!(bookstore.api_suites().len(), 1);
        }

        #[test]
        fn test_group_selection() {
            assert_eq!(Selection::Desktop.desktop_suites().len(), 5);
            assert!(Selection::Desktop.api_suites().is_empty());
            assert_eq!(Selection::All.api_suites().len(), 1);
        }
    }

    #[test]
    fn test_nth_out_of_range() {
        let items = vec!["a".to_string()];
        assert_eq!(nth(&items, 0), "a");
        assert_eq!(nth(&items, 3), "");
    }
}
