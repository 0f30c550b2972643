//! DemoQA Elements Section

use super::navigate;
use crate::assertion;
use crate::harness::{CaseFuture, TestSuite};
use crate::page_object::{CardName, ElementsMenu};
use crate::pages::elements::{Radio, WebTableRecord};
use crate::pages::ElementsPage;
use crate::session::Session;

const DOWNLOADED_FILE: &str = "sampleFile.jpeg";

/// The Elements suite
#[must_use]
pub fn suite() -> TestSuite<Session> {
    TestSuite::new("DemoQA Elements Section")
        .case("Checkbox - should expand/collapse tree and select a checkbox", check_box)
        .case("Text Box - should fill the Text Box form and submit", text_box)
        .case("Upload and Download - should upload and download a file successfully", upload_and_download)
        .case("Radio Button - should verify radio buttons functionality", radio_button)
        .case("Web Tables - should verify web tables functionality", web_tables)
}

fn check_box(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Elements, ElementsMenu::CheckBox).await?;
        let page = ElementsPage::new();

        page.expand_all(session).await?;
        assertion::is_true(
            page.is_desktop_node_visible(session).await?,
            "Desktop node is displayed after expanding all",
        )?;

        page.collapse_all(session).await?;
        assertion::is_false(
            page.is_desktop_node_visible(session).await?,
            "Desktop node is displayed after collapsing all",
        )?;

        page.expand_node(session, "Home").await?;
        page.expand_node(session, "Desktop").await?;
        page.click_checkbox(session, "Commands").await?;
        assertion::is_true(
            page.is_checkbox_checked(session, "Commands").await?,
            "Commands is checked",
        )?;

        assertion::contains(&page.result_text(session).await?, "commands")
    })
}

fn text_box(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Elements, ElementsMenu::TextBox).await?;
        let page = ElementsPage::new();

        page.verify_form_elements_visible(session).await?;
        page.fill_form(
            session,
            "John Doe",
            "john.doe@example.com",
            "123 Main St",
            "456 Another St",
        )
        .await?;
        page.submit_form(session).await
    })
}

fn upload_and_download(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Elements, ElementsMenu::UploadAndDownload).await?;
        let page = ElementsPage::new();

        let upload = session.fixtures().text_file();
        page.upload_file(session, &upload).await?;
        assertion::contains(&page.uploaded_file_path(session).await?, "test_txt.txt")?;

        let downloaded = page.download_file(session, DOWNLOADED_FILE).await?;
        assertion::is_true(
            page.is_file_exists(&downloaded),
            &format!("{} exists", downloaded.display()),
        )?;
        page.delete_file(&downloaded)
    })
}

fn radio_button(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Elements, ElementsMenu::RadioButton).await?;
        let page = ElementsPage::new();

        assertion::is_true(page.is_radio_enabled(session, Radio::Yes).await?, "Yes radio is enabled")?;
        page.click_label_for_radio(session, Radio::Yes).await?;
        assertion::contains(&page.radio_result_text(session).await?, "Yes")?;

        assertion::is_true(
            page.is_radio_enabled(session, Radio::Impressive).await?,
            "Impressive radio is enabled",
        )?;
        page.click_label_for_radio(session, Radio::Impressive).await?;
        assertion::contains(&page.radio_result_text(session).await?, "Impressive")?;

        assertion::is_false(page.is_radio_enabled(session, Radio::No).await?, "No radio is enabled")
    })
}

fn web_tables(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Elements, ElementsMenu::WebTables).await?;
        let page = ElementsPage::new();

        page.verify_column_headers(session).await?;
        page.change_rows_per_page(session, 50).await?;

        let record = WebTableRecord::new("TestName", "TestLastName", "test@example.com", "30", "5000", "QA");
        page.add_new_record(session, &record).await?;
        page.search_record(session, "TestName").await?;
        assertion::contains(&page.table_text(session).await?, "TestName")?;

        let edited = WebTableRecord::new(
            "EditedName",
            "EditedLastName",
            "edited@example.com",
            "31",
            "6000",
            "Dev",
        );
        page.edit_record(session, "TestName", &edited).await?;
        page.search_record(session, "EditedName").await?;
        assertion::contains(&page.table_text(session).await?, "EditedName")?;

        page.delete_record_by_name(session, "EditedName").await?;
        page.search_record(session, "EditedName").await?;
        assertion::not_contains(&page.table_text(session).await?, "EditedName")
    })
}
