//! Page Object Model support.
//!
//! Every section of the application gets a page object implementing
//! [`PageObject`]; the home page cards and the left-hand menu are modelled
//! as enums so navigation is checked at compile time.

use crate::locator::Locator;
use crate::result::SuiteResult;
use crate::session::Session;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A page or component of the application under test
#[async_trait(?Send)]
pub trait PageObject {
    /// Path relative to the base URL (e.g. "/text-box")
    fn path(&self) -> &str;

    /// Page name for logging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Element that marks the page as loaded, if any
    fn load_marker(&self) -> Option<Locator> {
        None
    }

    /// Navigate to the page and wait for its load marker
    async fn open(&self, session: &mut Session) -> SuiteResult<()> {
        tracing::info!(page = self.page_name(), path = self.path(), "opening page");
        session.open(self.path()).await?;
        if let Some(marker) = self.load_marker() {
            let timeout = session.config().wait_timeout_ms;
            session.wait_until_visible(marker, timeout).await?;
        }
        Ok(())
    }
}

// ============================================================================
// Home page cards
// ============================================================================

/// Cards on the home page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardName {
    Elements,
    Forms,
    AlertsFrameWindows,
    Widgets,
    Interactions,
    BookStoreApplication,
}

impl CardName {
    /// Every card, in page order
    pub const ALL: [Self; 6] = [
        Self::Elements,
        Self::Forms,
        Self::AlertsFrameWindows,
        Self::Widgets,
        Self::Interactions,
        Self::BookStoreApplication,
    ];

    /// Card heading as displayed
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Elements => "Elements",
            Self::Forms => "Forms",
            Self::AlertsFrameWindows => "Alerts, Frame & Windows",
            Self::Widgets => "Widgets",
            Self::Interactions => "Interactions",
            Self::BookStoreApplication => "Book Store Application",
        }
    }
}

impl std::fmt::Display for CardName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

// ============================================================================
// Side menu
// ============================================================================

/// An entry of the left-hand menu
pub trait MenuItem: Copy + std::fmt::Debug {
    /// Text shown in the menu
    fn label(self) -> &'static str;

    /// Locator of the menu entry
    fn locator(self) -> Locator {
        Locator::xpath(format!(
            "//ul[@class=\"menu-list\"]//span[text()=\"{}\"]",
            self.label()
        ))
    }
}

macro_rules! menu {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every entry, in menu order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }

        impl MenuItem for $name {
            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }
    };
}

menu! {
    /// Elements menu
    ElementsMenu {
        TextBox => "Text Box",
        CheckBox => "Check Box",
        RadioButton => "Radio Button",
        WebTables => "Web Tables",
        Buttons => "Buttons",
        Links => "Links",
        BrokenLinks => "Broken Links - Images",
        UploadAndDownload => "Upload and Download",
        DynamicProperties => "Dynamic Properties",
    }
}

menu! {
    /// Forms menu
    FormsMenu {
        PracticeForm => "Practice Form",
    }
}

menu! {
    /// Alerts, Frame & Windows menu
    AlertsFrameWindowsMenu {
        BrowserWindows => "Browser Windows",
        Alerts => "Alerts",
        Frames => "Frames",
        NestedFrames => "Nested Frames",
        ModalDialogs => "Modal Dialogs",
    }
}

menu! {
    /// Widgets menu
    WidgetsMenu {
        Accordian => "Accordian",
        AutoComplete => "Auto Complete",
        DatePicker => "Date Picker",
        Slider => "Slider",
        ProgressBar => "Progress Bar",
        Tabs => "Tabs",
        ToolTips => "Tool Tips",
        Menu => "Menu",
        SelectMenu => "Select Menu",
    }
}

menu! {
    /// Interactions menu
    InteractionsMenu {
        Sortable => "Sortable",
        Selectable => "Selectable",
        Resizable => "Resizable",
        Droppable => "Droppable",
        Dragabble => "Dragabble",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod card_tests {
        use super::*;

        #[test]
        fn test_titles() {
            assert_eq!(CardName::AlertsFrameWindows.title(), "Alerts, Frame & Windows");
            assert_eq!(CardName::BookStoreApplication.to_string(), "Book Store Application");
            assert_eq!(CardName::ALL.len(), 6);
        }
    }

    mod menu_tests {
        use super::*;

        #[test]
        fn test_labels() {
            assert_eq!(ElementsMenu::BrokenLinks.label(), "Broken Links - Images");
            assert_eq!(WidgetsMenu::Accordian.label(), "Accordian");
            assert_eq!(InteractionsMenu::Dragabble.label(), "Dragabble");
            assert_eq!(FormsMenu::ALL, &[FormsMenu::PracticeForm]);
            assert_eq!(ElementsMenu::ALL.len(), 9);
        }

        #[test]
        fn test_locator_targets_menu_list() {
            let loc = AlertsFrameWindowsMenu::NestedFrames.locator();
            assert_eq!(
                loc.to_string(),
                "//ul[@class=\"menu-list\"]//span[text()=\"Nested Frames\"]"
            );
        }
    }
}
