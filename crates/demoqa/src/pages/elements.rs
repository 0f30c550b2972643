//! Elements section: text box, check box tree, radio buttons, web tables,
//! upload and download.

use crate::file_ops::{self, wait_for_download};
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::{SuiteError, SuiteResult};
use crate::session::{Session, HELPER_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How long a download may take to land on disk
pub const DOWNLOAD_TIMEOUT_MS: u64 = 10_000;

// Text box
const FULL_NAME: &str = "#userName";
const EMAIL: &str = "#userEmail";
const CURRENT_ADDRESS: &str = "#currentAddress";
const PERMANENT_ADDRESS: &str = "#permanentAddress";
const SUBMIT: &str = "#submit";
const TEXT_BOX_LABELS: [&str; 4] = [
    "#userName-label",
    "#userEmail-label",
    "#currentAddress-label",
    "#permanentAddress-label",
];

// Check box tree
const EXPAND_ALL: &str = "button[aria-label=\"Expand all\"]";
const COLLAPSE_ALL: &str = "button[aria-label=\"Collapse all\"]";
const RESULT: &str = "#result";
const DESKTOP_NODE: &str = "span=Desktop";

// Upload and download
const DOWNLOAD_BUTTON: &str = "#downloadButton";
const UPLOAD_INPUT: &str = "#uploadFile";
const UPLOADED_PATH: &str = "#uploadedFilePath";

// Radio buttons
const RADIO_RESULT: &str = ".text-success";

// Web tables
const ROWS_PER_PAGE: &str = "select[aria-label=\"rows per page\"]";
const ADD_RECORD: &str = "#addNewRecordButton";
const SEARCH_BOX: &str = "#searchBox";
const TABLE_BODY: &str = "div.rt-tbody";
const COLUMN_HEADERS: [&str; 6] = ["First Name", "Last Name", "Age", "Email", "Salary", "Department"];

/// Radio buttons on the radio button page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Radio {
    Yes,
    Impressive,
    No,
}

impl Radio {
    /// Input id
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Yes => "yesRadio",
            Self::Impressive => "impressiveRadio",
            Self::No => "noRadio",
        }
    }

    /// Locator of the input
    #[must_use]
    pub fn input(self) -> Locator {
        Locator::css(format!("#{}", self.id()))
    }

    /// Locator of the label bound to the input
    #[must_use]
    pub fn label(self) -> Locator {
        Locator::css(format!("label[for=\"{}\"]", self.id()))
    }
}

/// One row of the registration form behind the web table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebTableRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: String,
    pub salary: String,
    pub department: String,
}

impl WebTableRecord {
    /// Build a record from its six fields
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        age: impl Into<String>,
        salary: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            age: age.into(),
            salary: salary.into(),
            department: department.into(),
        }
    }
}

/// The Elements section
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementsPage;

impl PageObject for ElementsPage {
    fn path(&self) -> &str {
        "/elements"
    }

    fn page_name(&self) -> &str {
        "elements"
    }
}

impl ElementsPage {
    /// Create the page object
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    // ========================================================================
    // Check box tree
    // ========================================================================

    /// Expand arrow of a tree node
    #[must_use]
    pub fn expand_arrow(&self, name: &str) -> Locator {
        Locator::xpath(format!(
            "//span[@class=\"rct-title\" and text()=\"{name}\"]/ancestor::span[@class=\"rct-text\"]//button"
        ))
    }

    /// Checkbox of a tree node
    #[must_use]
    pub fn checkbox(&self, name: &str) -> Locator {
        Locator::xpath(checkbox_xpath(name))
    }

    /// The "Desktop" node title
    #[must_use]
    pub fn desktop_node(&self) -> Locator {
        Locator::parse(DESKTOP_NODE)
    }

    /// Expand every node
    pub async fn expand_all(&self, session: &Session) -> SuiteResult<()> {
        session.scroll_into_view(EXPAND_ALL).await?;
        session.wait_and_click(EXPAND_ALL, HELPER_TIMEOUT_MS).await
    }

    /// Collapse every node
    pub async fn collapse_all(&self, session: &Session) -> SuiteResult<()> {
        session.scroll_into_view(COLLAPSE_ALL).await?;
        session.wait_and_click(COLLAPSE_ALL, HELPER_TIMEOUT_MS).await
    }

    /// Expand one node by its title
    pub async fn expand_node(&self, session: &Session, name: &str) -> SuiteResult<()> {
        let arrow = self.expand_arrow(name);
        session.scroll_into_view(arrow.clone()).await?;
        session.click(arrow).await
    }

    /// Toggle one node's checkbox
    pub async fn click_checkbox(&self, session: &Session, name: &str) -> SuiteResult<()> {
        let checkbox = self.checkbox(name);
        session.scroll_into_view(checkbox.clone()).await?;
        session.click(checkbox).await
    }

    /// Whether the node's checkbox shows the checked icon
    pub async fn is_checkbox_checked(&self, session: &Session, name: &str) -> SuiteResult<bool> {
        let icon = Locator::xpath(format!("{}//*[local-name()='svg']", checkbox_xpath(name)));
        let class = session.get_attribute(icon, "class").await?;
        Ok(class.is_some_and(|c| c.contains("rct-icon-check")))
    }

    /// Result line listing the selected nodes
    pub async fn result_text(&self, session: &Session) -> SuiteResult<String> {
        session.get_text(RESULT).await
    }

    /// Whether the "Desktop" node is displayed
    pub async fn is_desktop_node_visible(&self, session: &Session) -> SuiteResult<bool> {
        session.is_visible(self.desktop_node()).await
    }

    // ========================================================================
    // Text box
    // ========================================================================

    /// Fill the four text box inputs
    pub async fn fill_form(
        &self,
        session: &Session,
        full_name: &str,
        email: &str,
        current_address: &str,
        permanent_address: &str,
    ) -> SuiteResult<()> {
        session.type_text(FULL_NAME, full_name).await?;
        session.type_text(EMAIL, email).await?;
        session.type_text(CURRENT_ADDRESS, current_address).await?;
        session.type_text(PERMANENT_ADDRESS, permanent_address).await
    }

    /// Submit the form on screen
    pub async fn submit_form(&self, session: &Session) -> SuiteResult<()> {
        session.scroll_into_view(SUBMIT).await?;
        if !session.is_visible(SUBMIT).await? {
            return Err(SuiteError::assertion("submit button is not displayed"));
        }
        session.click(SUBMIT).await
    }

    /// Fail unless every text box label and input is displayed
    pub async fn verify_form_elements_visible(&self, session: &Session) -> SuiteResult<()> {
        let inputs = [FULL_NAME, EMAIL, CURRENT_ADDRESS, PERMANENT_ADDRESS, SUBMIT];
        for selector in TEXT_BOX_LABELS.iter().chain(inputs.iter()) {
            session
                .wait_until_visible(*selector, HELPER_TIMEOUT_MS)
                .await
                .map_err(|_| SuiteError::assertion(format!("{selector} is not displayed")))?;
        }
        Ok(())
    }

    // ========================================================================
    // Upload and download
    // ========================================================================

    /// Attach a local file to the upload input
    pub async fn upload_file(&self, session: &Session, path: impl AsRef<Path>) -> SuiteResult<()> {
        session.upload_file(UPLOAD_INPUT, path.as_ref()).await
    }

    /// Path the page reports for the uploaded file
    pub async fn uploaded_file_path(&self, session: &Session) -> SuiteResult<String> {
        session.get_text(UPLOADED_PATH).await
    }

    /// Click download and wait for `file_name` to appear in the download dir
    pub async fn download_file(&self, session: &Session, file_name: &str) -> SuiteResult<PathBuf> {
        let target = session.download_dir().join(file_name);
        file_ops::delete_file_if_exists(&target)?;
        session.scroll_into_view(DOWNLOAD_BUTTON).await?;
        session
            .wait_and_click(DOWNLOAD_BUTTON, HELPER_TIMEOUT_MS)
            .await?;
        wait_for_download(&target, DOWNLOAD_TIMEOUT_MS).await
    }

    /// Whether a file exists
    #[must_use]
    pub fn is_file_exists(&self, path: impl AsRef<Path>) -> bool {
        file_ops::file_exists(path)
    }

    /// Remove a downloaded file
    pub fn delete_file(&self, path: impl AsRef<Path>) -> SuiteResult<()> {
        file_ops::delete_file_if_exists(path)?;
        Ok(())
    }

    // ========================================================================
    // Radio buttons
    // ========================================================================

    /// Whether a radio input is enabled
    pub async fn is_radio_enabled(&self, session: &Session, radio: Radio) -> SuiteResult<bool> {
        session.is_enabled(radio.input()).await
    }

    /// Select a radio through its label
    pub async fn click_label_for_radio(&self, session: &Session, radio: Radio) -> SuiteResult<()> {
        let label = radio.label();
        session.scroll_into_view(label.clone()).await?;
        session.click(label).await
    }

    /// "You have selected ..." text
    pub async fn radio_result_text(&self, session: &Session) -> SuiteResult<String> {
        session.get_text(RADIO_RESULT).await
    }

    // ========================================================================
    // Web tables
    // ========================================================================

    /// Choose how many rows the table shows
    pub async fn change_rows_per_page(&self, session: &Session, rows: u32) -> SuiteResult<()> {
        session
            .select_by_visible_text(ROWS_PER_PAGE, &format!("{rows} rows"))
            .await
    }

    /// Open the registration form, fill it and submit
    pub async fn add_new_record(&self, session: &Session, record: &WebTableRecord) -> SuiteResult<()> {
        session.click(ADD_RECORD).await?;
        self.fill_registration_form(session, record).await?;
        session.click(SUBMIT).await
    }

    /// Edit the row containing `name`, replacing every field
    pub async fn edit_record(
        &self,
        session: &Session,
        name: &str,
        record: &WebTableRecord,
    ) -> SuiteResult<()> {
        let edit = row_action(name, "Edit");
        session.scroll_into_view(edit.clone()).await?;
        session.wait_and_click(edit, HELPER_TIMEOUT_MS).await?;
        self.fill_registration_form(session, record).await?;
        self.submit_form(session).await
    }

    /// Delete the row containing `name`
    pub async fn delete_record_by_name(&self, session: &Session, name: &str) -> SuiteResult<()> {
        let delete = row_action(name, "Delete");
        session.scroll_into_view(delete.clone()).await?;
        session.wait_and_click(delete, HELPER_TIMEOUT_MS).await
    }

    /// Type into the search box
    pub async fn search_record(&self, session: &Session, text: &str) -> SuiteResult<()> {
        session.wait_until_visible(SEARCH_BOX, HELPER_TIMEOUT_MS).await?;
        session.wait_for_enabled(SEARCH_BOX, HELPER_TIMEOUT_MS).await?;
        session.clear_value(SEARCH_BOX).await?;
        session.type_text(SEARCH_BOX, text).await
    }

    /// Fail unless every column header is displayed
    pub async fn verify_column_headers(&self, session: &Session) -> SuiteResult<()> {
        for header in COLUMN_HEADERS {
            let locator = column_header(header);
            if !session.is_visible(locator).await? {
                return Err(SuiteError::assertion(format!(
                    "column header '{header}' is not displayed"
                )));
            }
        }
        Ok(())
    }

    /// All text of the table body
    pub async fn table_text(&self, session: &Session) -> SuiteResult<String> {
        session.text_now(TABLE_BODY).await
    }

    async fn fill_registration_form(&self, session: &Session, record: &WebTableRecord) -> SuiteResult<()> {
        session.type_text("#firstName", &record.first_name).await?;
        session.type_text("#lastName", &record.last_name).await?;
        session.type_text(EMAIL, &record.email).await?;
        session.type_text("#age", &record.age).await?;
        session.type_text("#salary", &record.salary).await?;
        session.type_text("#department", &record.department).await
    }
}

fn checkbox_xpath(name: &str) -> String {
    format!("//label[.//span[@class='rct-title' and text()='{name}']]//span[@class='rct-checkbox']")
}

fn row_action(name: &str, action: &str) -> Locator {
    Locator::xpath(format!(
        "//div[@role='row' and .//div[text()='{name}']]//span[@title='{action}']"
    ))
}

fn column_header(title: &str) -> Locator {
    Locator::parse(&format!("div.rt-resizable-header-content={title}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::locator::Selector;

    mod locator_tests {
        use super::*;

        #[test]
        fn test_tree_locators() {
            let page = ElementsPage::new();
            assert_eq!(
                page.expand_arrow("Home").to_string(),
                "//span[@class=\"rct-title\" and text()=\"Home\"]/ancestor::span[@class=\"rct-text\"]//button"
            );
            assert!(page
                .checkbox("Commands")
                .to_string()
                .contains("text()='Commands'"));
            assert_eq!(page.desktop_node().selector(), &Selector::text("span", "Desktop"));
        }

        #[test]
        fn test_row_action_xpath() {
            assert_eq!(
                row_action("TestName", "Edit").to_string(),
                "//div[@role='row' and .//div[text()='TestName']]//span[@title='Edit']"
            );
        }

        #[test]
        fn test_column_header_is_text_selector() {
            assert_eq!(
                column_header("First Name").selector(),
                &Selector::text("div.rt-resizable-header-content", "First Name")
            );
        }

        #[test]
        fn test_radio_locators() {
            assert_eq!(Radio::Impressive.input().to_string(), "#impressiveRadio");
            assert_eq!(Radio::No.label().to_string(), "label[for=\"noRadio\"]");
        }
    }

    mod record_tests {
        use super::*;

        #[test]
        fn test_record_new() {
            let r = WebTableRecord::new("TestName", "TestLastName", "test@example.com", "30", "5000", "QA");
            assert_eq!(r.first_name, "TestName");
            assert_eq!(r.department, "QA");
        }
    }
}
