//! Practice form.

use crate::data::Gender;
use crate::input::Key;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::{SuiteError, SuiteResult};
use crate::session::{Session, HELPER_TIMEOUT_MS};
use crate::wait::{self, WaitOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Border colour bootstrap gives invalid fields
pub const INVALID_BORDER_HEX: &str = "#dc3545";

/// How long a field may take to turn invalid
pub const INVALID_FIELD_TIMEOUT_MS: u64 = 2_000;

pub const FIRST_NAME: &str = "#firstName";
pub const LAST_NAME: &str = "#lastName";
pub const EMAIL: &str = "#userEmail";
pub const MOBILE: &str = "#userNumber";
pub const CURRENT_ADDRESS: &str = "#currentAddress";
const DATE_OF_BIRTH: &str = "#dateOfBirthInput";
const SUBJECTS: &str = "#subjectsInput";
const UPLOAD_PICTURE: &str = "#uploadPicture";
const STATE: &str = "#state";
const CITY: &str = "#city";
const SUBMIT: &str = "#submit";
const MODAL_TITLE: &str = ".modal-title";
const MODAL_CLOSE: &str = "#closeLargeModal";
const GENDER_TIMEOUT_MS: u64 = 3_000;

/// Text inputs of the practice form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub current_address: String,
}

impl FormData {
    /// Build from the five text fields
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        mobile: impl Into<String>,
        current_address: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            mobile: mobile.into(),
            current_address: current_address.into(),
        }
    }

    /// "First Last", as the confirmation modal shows it
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Values the confirmation modal is expected to show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalData {
    pub student_name: String,
    pub student_email: String,
    pub gender: String,
    pub mobile: String,
    pub date_of_birth: String,
    pub subjects: String,
    pub hobbies: String,
    pub picture: String,
    pub address: String,
    pub state_and_city: String,
}

impl ModalData {
    /// Rows of the modal table as (label, expected value)
    #[must_use]
    pub fn rows(&self) -> [(&'static str, &str); 10] {
        [
            ("Student Name", self.student_name.as_str()),
            ("Student Email", self.student_email.as_str()),
            ("Gender", self.gender.as_str()),
            ("Mobile", self.mobile.as_str()),
            ("Date of Birth", self.date_of_birth.as_str()),
            ("Subjects", self.subjects.as_str()),
            ("Hobbies", self.hobbies.as_str()),
            ("Picture", self.picture.as_str()),
            ("Address", self.address.as_str()),
            ("State and City", self.state_and_city.as_str()),
        ]
    }
}

/// A "DD Month YYYY" date split for the date picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerDate {
    pub day: u32,
    pub month: String,
    pub year: String,
}

impl PickerDate {
    /// Parse "01 December 2000"
    pub fn parse(date: &str) -> SuiteResult<Self> {
        let mut parts = date.split_whitespace();
        let (Some(day), Some(month), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(SuiteError::assertion(format!(
                "date '{date}' is not in 'DD Month YYYY' form"
            )));
        };
        let day: u32 = day
            .parse()
            .ok()
            .filter(|d| (1..=31).contains(d))
            .ok_or_else(|| SuiteError::assertion(format!("invalid day in date '{date}'")))?;
        Ok(Self {
            day,
            month: month.to_string(),
            year: year.to_string(),
        })
    }

    /// Selector of the day cell inside the displayed month
    #[must_use]
    pub fn day_cell(&self) -> String {
        format!(
            ".react-datepicker__day--{:03}:not(.react-datepicker__day--outside-month)",
            self.day
        )
    }
}

/// Convert a computed CSS colour (`rgb(...)`/`rgba(...)`, possibly one per
/// side) into lowercase `#rrggbb` of the first colour
#[must_use]
pub fn css_color_to_hex(value: &str) -> Option<String> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        let hex: String = hex.chars().take_while(char::is_ascii_hexdigit).collect();
        return match hex.len() {
            6 => Some(format!("#{}", hex.to_lowercase())),
            3 => Some(format!(
                "#{}",
                hex.chars()
                    .flat_map(|c| [c, c])
                    .collect::<String>()
                    .to_lowercase()
            )),
            _ => None,
        };
    }
    let start = value.find('(')?;
    let end = value[start..].find(')')? + start;
    let channels: Vec<u8> = value[start + 1..end]
        .split(',')
        .take(3)
        .map(|c| c.trim().parse::<f64>().ok().map(|v| v.round().clamp(0.0, 255.0) as u8))
        .collect::<Option<_>>()?;
    match channels.as_slice() {
        [r, g, b] => Some(format!("#{r:02x}{g:02x}{b:02x}")),
        _ => None,
    }
}

/// The practice form
#[derive(Debug, Clone, Copy, Default)]
pub struct FormsPage;

impl PageObject for FormsPage {
    fn path(&self) -> &str {
        "/automation-practice-form"
    }

    fn page_name(&self) -> &str {
        "forms"
    }

    fn load_marker(&self) -> Option<Locator> {
        Some(Locator::css(FIRST_NAME))
    }
}

impl FormsPage {
    /// Create the page object
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Fill the text inputs
    pub async fn fill_form(&self, session: &Session, data: &FormData) -> SuiteResult<()> {
        session.type_text(FIRST_NAME, &data.first_name).await?;
        session.type_text(LAST_NAME, &data.last_name).await?;
        session.type_text(EMAIL, &data.email).await?;
        session.type_text(MOBILE, &data.mobile).await?;
        session
            .type_text(CURRENT_ADDRESS, &data.current_address)
            .await
    }

    /// Pick a gender through its label
    pub async fn select_gender(&self, session: &Session, gender: Gender) -> SuiteResult<()> {
        let label = Locator::css(format!("label[for=\"gender-radio-{}\"]", gender.radio_index()));
        session
            .wait_until_visible(label.clone(), GENDER_TIMEOUT_MS)
            .await?;
        session.scroll_into_view(label.clone()).await?;
        session.click(label).await
    }

    /// Choose a state in the react-select dropdown
    pub async fn select_state(&self, session: &Session, state: &str) -> SuiteResult<()> {
        select_option(session, STATE, 3, state).await
    }

    /// Choose a city in the react-select dropdown
    pub async fn select_city(&self, session: &Session, city: &str) -> SuiteResult<()> {
        select_option(session, CITY, 4, city).await
    }

    /// Submit the form
    pub async fn submit_form(&self, session: &Session) -> SuiteResult<()> {
        session.scroll_into_view(SUBMIT).await?;
        session.wait_and_click(SUBMIT, HELPER_TIMEOUT_MS).await
    }

    /// Pick a "DD Month YYYY" date in the calendar
    pub async fn select_date_of_birth(&self, session: &Session, date: &str) -> SuiteResult<()> {
        let date = PickerDate::parse(date)?;
        session.click(DATE_OF_BIRTH).await?;
        session
            .select_by_visible_text(".react-datepicker__year-select", &date.year)
            .await?;
        session
            .select_by_visible_text(".react-datepicker__month-select", &date.month)
            .await?;
        session.click(date.day_cell()).await
    }

    /// Add subjects one at a time
    pub async fn select_subjects(&self, session: &Session, subjects: &[&str]) -> SuiteResult<()> {
        for subject in subjects {
            session.type_text(SUBJECTS, subject).await?;
            session.keys(&[Key::Enter]).await?;
        }
        Ok(())
    }

    /// Tick hobbies through their labels
    pub async fn select_hobbies(&self, session: &Session, hobbies: &[&str]) -> SuiteResult<()> {
        for hobby in hobbies {
            let label = Locator::xpath(format!("//label[text()='{hobby}']"));
            session.scroll_into_view(label.clone()).await?;
            session.click(label).await?;
        }
        Ok(())
    }

    /// Attach a picture
    pub async fn upload_picture(&self, session: &Session, path: impl AsRef<Path>) -> SuiteResult<()> {
        session.upload_file(UPLOAD_PICTURE, path.as_ref()).await
    }

    /// Value of one row of the confirmation modal
    pub async fn modal_value_by_label(&self, session: &Session, label: &str) -> SuiteResult<String> {
        session
            .get_text(Locator::xpath(format!("//td[text()='{label}']/following-sibling::td")))
            .await
    }

    /// Title of the confirmation modal
    pub async fn modal_title(&self, session: &Session) -> SuiteResult<String> {
        session.get_text(MODAL_TITLE).await
    }

    /// Whether the confirmation modal is displayed
    pub async fn is_modal_displayed(&self, session: &Session) -> bool {
        session.is_visible(MODAL_TITLE).await.unwrap_or(false)
    }

    /// Close the confirmation modal
    pub async fn close_modal(&self, session: &Session) -> SuiteResult<()> {
        session.scroll_into_view(MODAL_CLOSE).await?;
        session.wait_and_click(MODAL_CLOSE, HELPER_TIMEOUT_MS).await
    }

    /// Fail unless the modal shows the title and every expected value
    pub async fn verify_modal_data(&self, session: &Session, expected: &ModalData) -> SuiteResult<()> {
        if !session.is_visible(MODAL_TITLE).await? {
            session
                .wait_until_visible(MODAL_TITLE, HELPER_TIMEOUT_MS)
                .await?;
        }
        let title = self.modal_title(session).await?;
        crate::assertion::equals(&title.as_str(), &"Thanks for submitting the form")?;
        for (label, value) in expected.rows() {
            let actual = self.modal_value_by_label(session, label).await?;
            crate::assertion::equals(&actual.as_str(), &value)
                .map_err(|e| e.context(format!("modal row '{label}'")))?;
        }
        Ok(())
    }

    /// Fail unless every text input is empty
    pub async fn verify_form_fields_are_empty(&self, session: &Session) -> SuiteResult<()> {
        for field in [FIRST_NAME, LAST_NAME, EMAIL, MOBILE, CURRENT_ADDRESS, SUBJECTS] {
            let value = session.get_value(field).await?;
            if !value.is_empty() {
                return Err(SuiteError::assertion(format!(
                    "{field} should be empty after reset but was '{value}'"
                )));
            }
        }
        Ok(())
    }

    /// Placeholder or chosen value of the state dropdown
    pub async fn state_text(&self, session: &Session) -> SuiteResult<String> {
        session.get_text(STATE).await
    }

    /// Placeholder or chosen value of the city dropdown
    pub async fn city_text(&self, session: &Session) -> SuiteResult<String> {
        session.get_text(CITY).await
    }

    /// Wait until the field's border turns the invalid red
    pub async fn wait_for_field_to_be_invalid(
        &self,
        session: &Session,
        field: &str,
        timeout_ms: u64,
    ) -> SuiteResult<()> {
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_message(format!(
                "Border color did not become {INVALID_BORDER_HEX} within expected time"
            ));
        wait::wait_until(&options, || async move {
            let color = session.css_property(field, "border-color").await?;
            Ok::<_, SuiteError>(css_color_to_hex(&color).as_deref() == Some(INVALID_BORDER_HEX))
        })
        .await?;
        Ok(())
    }
}

async fn select_option(session: &Session, dropdown: &str, menu: u8, text: &str) -> SuiteResult<()> {
    session.scroll_into_view(dropdown).await?;
    session.click(dropdown).await?;
    let option = Locator::xpath(format!(
        "//div[contains(@id,'react-select-{menu}-option') and text()='{text}']"
    ));
    session
        .wait_for_exist(option.clone(), HELPER_TIMEOUT_MS)
        .await?;
    session.wait_and_click(option, HELPER_TIMEOUT_MS).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod color_tests {
        use super::*;

        #[test]
        fn test_rgb_to_hex() {
            assert_eq!(css_color_to_hex("rgb(220, 53, 69)").as_deref(), Some("#dc3545"));
        }

        #[test]
        fn test_rgba_ignores_alpha() {
            assert_eq!(
                css_color_to_hex("rgba(220, 53, 69, 0.5)").as_deref(),
                Some("#dc3545")
            );
        }

        #[test]
        fn test_per_side_colors_take_first() {
            assert_eq!(
                css_color_to_hex("rgb(220, 53, 69) rgb(0, 0, 0) rgb(0, 0, 0) rgb(0, 0, 0)").as_deref(),
                Some("#dc3545")
            );
        }

        #[test]
        fn test_hex_passthrough() {
            assert_eq!(css_color_to_hex("#DC3545").as_deref(), Some("#dc3545"));
            assert_eq!(css_color_to_hex("#fff").as_deref(), Some("#ffffff"));
        }

        #[test]
        fn test_unparseable() {
            assert!(css_color_to_hex("red").is_none());
            assert!(css_color_to_hex("rgb(1, 2)").is_none());
        }
    }

    mod date_tests {
        use super::*;

        #[test]
        fn test_parse_date_of_birth() {
            let d = PickerDate::parse("01 December 2000").unwrap();
            assert_eq!(d.day, 1);
            assert_eq!(d.month, "December");
            assert_eq!(d.year, "2000");
            assert!(d.day_cell().starts_with(".react-datepicker__day--001"));
        }

        #[test]
        fn test_day_cell_padding() {
            let d = PickerDate::parse("15 May 2020").unwrap();
            assert!(d.day_cell().starts_with(".react-datepicker__day--015:"));
        }

        #[test]
        fn test_rejects_malformed() {
            assert!(PickerDate::parse("2000-12-01").is_err());
            assert!(PickerDate::parse("32 May 2020").is_err());
            assert!(PickerDate::parse("01 May 2020 extra").is_err());
        }
    }

    mod data_tests {
        use super::*;

        #[test]
        fn test_full_name() {
            let data = FormData::new("John", "Doe", "invalidemail", "", "Some Address");
            assert_eq!(data.full_name(), "John Doe");
        }

        #[test]
        fn test_modal_rows_order() {
            let modal = ModalData {
                student_name: "a b".into(),
                student_email: "e".into(),
                gender: "Male".into(),
                mobile: "9".into(),
                date_of_birth: "01 December,2000".into(),
                subjects: "Maths".into(),
                hobbies: "Sports".into(),
                picture: "test_img.png".into(),
                address: "x".into(),
                state_and_city: "NCR Delhi".into(),
            };
            let rows = modal.rows();
            assert_eq!(rows[0], ("Student Name", "a b"));
            assert_eq!(rows[9], ("State and City", "NCR Delhi"));
        }
    }
}
