//! Widgets section: accordion, auto complete, date pickers, slider and
//! progress bar.

use crate::input::Key;
use crate::locator::Locator;
use crate::page_object::PageObject;
use crate::result::{SuiteError, SuiteResult};
use crate::session::{Session, HELPER_TIMEOUT_MS};
use crate::wait::{self, WaitOptions};

/// How long the progress bar may take to reach a value
pub const PROGRESS_TIMEOUT_MS: u64 = 15_000;

/// Upper bound on arrow presses while moving the slider
const MAX_SLIDER_STEPS: u32 = 200;

const MULTI_INPUT: &str = "#autoCompleteMultipleInput";
const SINGLE_INPUT: &str = "#autoCompleteSingleInput";
const MULTI_TAGS: &str = ".css-12jo7m5.auto-complete__multi-value__label";
const MULTI_REMOVES: &str = ".css-xb97g8.auto-complete__multi-value__remove";
const SINGLE_VALUE: &str = ".css-1uccc91-singleValue";

const DATE_INPUT: &str = "#datePickerMonthYearInput";
const DATE_TIME_INPUT: &str = "#dateAndTimePickerInput";
const MONTH_SELECT: &str = ".react-datepicker__month-select";
const YEAR_SELECT: &str = ".react-datepicker__year-select";
const DAY_15: &str = ".react-datepicker__day--015:not(.react-datepicker__day--outside-month)";

const SLIDER_VALUE: &str = "#sliderValue";
const SLIDER: &str = ".range-slider";

const PROGRESS_START_STOP: &str = "#startStopButton";
const PROGRESS_RESET: &str = "#resetButton";
const PROGRESS_BAR: &str = "#progressBar";

/// Percentage shown by the progress bar ("40%" -> 40); `None` without a `%`
#[must_use]
pub fn parse_progress_percent(text: &str) -> Option<u32> {
    let (number, _) = text.trim().split_once('%')?;
    number.trim().parse().ok()
}

/// The Widgets section
#[derive(Debug, Clone, Copy, Default)]
pub struct WidgetsPage;

impl PageObject for WidgetsPage {
    fn path(&self) -> &str {
        "/widgets"
    }

    fn page_name(&self) -> &str {
        "widgets"
    }
}

impl WidgetsPage {
    /// Create the page object
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    // ========================================================================
    // Accordion
    // ========================================================================

    fn section_heading(index: u32) -> String {
        format!("#section{index}Heading")
    }

    fn section_content(index: u32) -> String {
        format!("#section{index}Content")
    }

    /// Click a section heading
    pub async fn open_section(&self, session: &Session, index: u32) -> SuiteResult<()> {
        let heading = Self::section_heading(index);
        session.scroll_into_view(heading.as_str()).await?;
        session.click(heading).await
    }

    /// Wait for a section's content to show
    pub async fn wait_for_section_content(&self, session: &Session, index: u32) -> SuiteResult<()> {
        session
            .wait_until_visible(Self::section_content(index), HELPER_TIMEOUT_MS)
            .await
    }

    /// Whether a section's content is displayed
    pub async fn is_section_content_displayed(&self, session: &Session, index: u32) -> SuiteResult<bool> {
        session.is_visible(Self::section_content(index)).await
    }

    /// Trimmed text of a section's content
    pub async fn section_content_text(&self, session: &Session, index: u32) -> SuiteResult<String> {
        Ok(session
            .text_now(Self::section_content(index))
            .await?
            .trim()
            .to_string())
    }

    /// Open sections 2 and 3 (1 starts open) and check each shows text
    pub async fn validate_all_sections(&self, session: &Session) -> SuiteResult<()> {
        for index in 1..=3 {
            if index != 1 {
                self.open_section(session, index).await?;
                self.wait_for_section_content(session, index).await?;
            }
            crate::assertion::is_true(
                self.is_section_content_displayed(session, index).await?,
                &format!("accordion section {index} content is displayed"),
            )?;
            let text = self.section_content_text(session, index).await?;
            crate::assertion::greater_than(text.len(), 0)
                .map_err(|e| e.context(format!("accordion section {index} text")))?;
        }
        Ok(())
    }

    // ========================================================================
    // Auto complete
    // ========================================================================

    /// Add colours to the multi-select, one per Enter
    pub async fn enter_multi_colors(&self, session: &Session, colors: &[&str]) -> SuiteResult<()> {
        for color in colors {
            session.type_text(MULTI_INPUT, color).await?;
            session.keys(&[Key::Enter]).await?;
        }
        Ok(())
    }

    /// Colours currently selected in the multi-select
    pub async fn selected_multi_colors(&self, session: &Session) -> SuiteResult<Vec<String>> {
        session.all_texts(MULTI_TAGS).await
    }

    /// Remove one colour from the multi-select; absent colours are ignored
    pub async fn remove_multi_color(&self, session: &Session, color: &str) -> SuiteResult<()> {
        let tags = self.selected_multi_colors(session).await?;
        if let Some(index) = tags.iter().position(|t| t == color) {
            session.click(Locator::css(MULTI_REMOVES).nth(index)).await?;
        } else {
            tracing::debug!(color, "colour not selected, nothing to remove");
        }
        Ok(())
    }

    /// Choose a colour in the single-select
    pub async fn enter_single_color(&self, session: &Session, color: &str) -> SuiteResult<()> {
        session.type_text(SINGLE_INPUT, color).await?;
        session.keys(&[Key::Enter]).await
    }

    /// Colour chosen in the single-select
    pub async fn selected_single_color(&self, session: &Session) -> SuiteResult<String> {
        Ok(session.get_text(SINGLE_VALUE).await?.trim().to_string())
    }

    // ========================================================================
    // Date pickers
    // ========================================================================

    /// Replace the date by typing it key by key
    pub async fn enter_date(&self, session: &Session, date: &str) -> SuiteResult<()> {
        session.click(DATE_INPUT).await?;
        session.pause(100).await;
        session.keys(&[Key::Control, Key::Char('a')]).await?;
        session.keys(&[Key::Backspace]).await?;
        session.pause(100).await;
        session.type_keys(date).await
    }

    /// Value of the date input
    pub async fn date_value(&self, session: &Session) -> SuiteResult<String> {
        Ok(session.get_value(DATE_INPUT).await?.trim().to_string())
    }

    /// Pick 15 May 2020 through the calendar
    pub async fn pick_date_via_ui(&self, session: &Session) -> SuiteResult<()> {
        session.clear_value(DATE_INPUT).await?;
        session.click(DATE_INPUT).await?;
        session.select_by_visible_text(MONTH_SELECT, "May").await?;
        session.select_by_visible_text(YEAR_SELECT, "2020").await?;
        session.click(DAY_15).await
    }

    /// Replace the date-and-time value
    pub async fn enter_date_time(&self, session: &Session, date_time: &str) -> SuiteResult<()> {
        session.clear_value(DATE_TIME_INPUT).await?;
        session.type_text(DATE_TIME_INPUT, date_time).await
    }

    /// Value of the date-and-time input
    pub async fn date_time_value(&self, session: &Session) -> SuiteResult<String> {
        Ok(session.get_value(DATE_TIME_INPUT).await?.trim().to_string())
    }

    // ========================================================================
    // Slider
    // ========================================================================

    /// Focus the slider and step it with arrow keys until it shows `target`
    pub async fn move_slider_to(&self, session: &Session, target: i64) -> SuiteResult<()> {
        session.scroll_into_view(SLIDER).await?;
        session.click(SLIDER).await?;
        let mut current = self.slider_value(session).await?;
        let mut steps = 0;
        while current != target {
            if steps >= MAX_SLIDER_STEPS {
                return Err(SuiteError::assertion(format!(
                    "slider stuck at {current} after {steps} steps towards {target}"
                )));
            }
            let key = if current < target {
                Key::ArrowRight
            } else {
                Key::ArrowLeft
            };
            session.keys(&[key]).await?;
            current = self.slider_value(session).await?;
            steps += 1;
        }
        Ok(())
    }

    /// Number shown next to the slider
    pub async fn slider_value(&self, session: &Session) -> SuiteResult<i64> {
        let raw = session.get_value(SLIDER_VALUE).await?;
        raw.trim()
            .parse()
            .map_err(|_| SuiteError::assertion(format!("slider value '{raw}' is not a number")))
    }

    // ========================================================================
    // Progress bar
    // ========================================================================

    /// Press start/stop
    pub async fn start_progress_bar(&self, session: &Session) -> SuiteResult<()> {
        session.click(PROGRESS_START_STOP).await
    }

    /// Wait until the bar shows at least `percent`
    pub async fn wait_for_progress_to_reach(&self, session: &Session, percent: u32, timeout_ms: u64) -> SuiteResult<()> {
        let options = WaitOptions::new()
            .with_timeout(timeout_ms)
            .with_message(format!("Progress bar did not reach {percent}% in time"));
        let bar = session.locate(PROGRESS_BAR);
        let target = &bar;
        wait::wait_until(&options, || async move {
            let text = session.page().text(target).await?;
            Ok::<_, SuiteError>(parse_progress_percent(&text).is_some_and(|p| p >= percent))
        })
        .await?;
        Ok(())
    }

    /// Press reset
    pub async fn reset_progress_bar(&self, session: &Session) -> SuiteResult<()> {
        session.click(PROGRESS_RESET).await
    }

    /// Current percentage; 0 when the bar shows no percentage
    pub async fn progress_bar_value(&self, session: &Session) -> SuiteResult<u32> {
        let text = session.text_now(PROGRESS_BAR).await?;
        Ok(parse_progress_percent(&text).unwrap_or(0))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod progress_tests {
        use super::*;

        #[test]
        fn test_parse_percent() {
            assert_eq!(parse_progress_percent("40%"), Some(40));
            assert_eq!(parse_progress_percent(" 100% "), Some(100));
        }

        #[test]
        fn test_no_percent_sign() {
            assert_eq!(parse_progress_percent(""), None);
            assert_eq!(parse_progress_percent("0"), None);
        }

        #[test]
        fn test_garbage_before_percent() {
            assert_eq!(parse_progress_percent("abc%"), None);
        }
    }

    mod accordion_tests {
        use super::*;

        #[test]
        fn test_section_selectors() {
            assert_eq!(WidgetsPage::section_heading(2), "#section2Heading");
            assert_eq!(WidgetsPage::section_content(3), "#section3Content");
        }
    }
}
