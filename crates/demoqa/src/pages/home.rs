//! Landing page: category cards and the side menu.

use crate::locator::Locator;
use crate::page_object::{CardName, MenuItem, PageObject};
use crate::result::{SuiteError, SuiteResult};
use crate::session::{Session, HELPER_TIMEOUT_MS};

const CARDS: &str = "div.card-body h5";

/// The home page
#[derive(Debug, Clone, Copy, Default)]
pub struct HomePage;

impl PageObject for HomePage {
    fn path(&self) -> &str {
        "/"
    }

    fn page_name(&self) -> &str {
        "home"
    }

    fn load_marker(&self) -> Option<Locator> {
        Some(Locator::css(CARDS))
    }
}

impl HomePage {
    /// Create the page object
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Heading of one card
    #[must_use]
    pub fn card(&self, name: CardName) -> Locator {
        Locator::parse(&format!("h5={}", name.title()))
    }

    /// Titles of all cards on the page
    pub async fn all_cards(&self, session: &Session) -> SuiteResult<Vec<String>> {
        session.all_texts(CARDS).await
    }

    /// Open a category through its card
    pub async fn click_card(&self, session: &Session, name: CardName) -> SuiteResult<()> {
        let card = self.card(name);
        session.scroll_into_view(card.clone()).await?;
        session.click(card).await
    }

    /// Fail unless every card is displayed
    pub async fn verify_all_cards_visible(&self, session: &Session) -> SuiteResult<()> {
        for name in CardName::ALL {
            session
                .wait_until_visible(self.card(name), HELPER_TIMEOUT_MS)
                .await
                .map_err(|_| SuiteError::assertion(format!("card '{name}' is not visible")))?;
        }
        Ok(())
    }

    /// Click an entry of the side menu
    pub async fn select_menu_item(&self, session: &Session, item: impl MenuItem) -> SuiteResult<()> {
        tracing::debug!(item = item.label(), "selecting menu item");
        let locator = item.locator();
        session.scroll_into_view(locator.clone()).await?;
        session.click(locator).await
    }
}
