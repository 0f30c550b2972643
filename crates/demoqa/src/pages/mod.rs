//! Page objects, one per section of the application.

pub mod alerts_frames_windows;
pub mod elements;
pub mod forms;
pub mod home;
pub mod interactions;
pub mod widgets;

pub use alerts_frames_windows::{AlertsFrameWindowsPage, ModalSize};
pub use elements::ElementsPage;
pub use forms::{FormData, FormsPage};
pub use home::HomePage;
pub use interactions::InteractionsPage;
pub use widgets::WidgetsPage;
