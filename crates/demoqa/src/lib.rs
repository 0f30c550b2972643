//! End-to-end suite for the DemoQA practice site.
//!
//! Browser suites drive Chromium over CDP through page objects; the API
//! suite talks to the BookStore REST service directly.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ suites       │──►│ pages        │──►│ session      │──►│ browser      │
//! │ (TestSuite)  │   │ (PageObject) │   │ (waits, Key) │   │ (CDP)        │
//! └──────┬───────┘   └──────────────┘   └──────────────┘   └──────────────┘
//!        │
//!        ▼           ┌──────────────┐   ┌──────────────┐
//!   TestHarness ────►│ reporter     │   │ api          │
//!                    │ (JUnit, png) │   │ (reqwest)    │
//!                    └──────────────┘   └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use demoqa::{ArtifactStore, Reporter, Session, SuiteConfig, TestHarness};
//!
//! # async fn run() -> demoqa::SuiteResult<()> {
//! let config = SuiteConfig::default();
//! let harness = TestHarness::from_config(&config);
//! let store = ArtifactStore::from_config(&config);
//! let mut reporter = Reporter::new("desktop");
//! let mut session = Session::start(config.clone()).await?;
//! for suite in demoqa::suites::desktop() {
//!     harness.run(&suite, &mut session, &store, &mut reporter).await;
//! }
//! session.close().await?;
//! reporter.write_junit(&config.junit_dir, "junit")?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod assertion;
pub mod browser;
pub mod config;
pub mod console;
pub mod data;
pub mod dialog;
pub mod file_ops;
pub mod harness;
pub mod input;
pub mod locator;
pub mod page_object;
pub mod pages;
pub mod reporter;
pub mod result;
pub mod session;
pub mod suites;
pub mod wait;

pub use api::{assert_fields, ApiResponse, BookStoreClient, Credentials};
pub use config::{Capabilities, Profile, SuiteConfig};
pub use console::{ConsoleLog, ConsoleMessage, ConsoleSeverity};
pub use harness::{AfterTest, CaseFuture, NoArtifacts, SuiteOutcome, TestCase, TestHarness, TestSuite};
pub use locator::{Locator, Selector};
pub use page_object::{CardName, MenuItem, PageObject};
pub use reporter::{ArtifactStore, Reporter, TestResultEntry, TestStatus};
pub use result::{SuiteError, SuiteResult};
pub use session::{Session, SessionPool};
pub use suites::Selection;
