//! DemoQA Forms Section

use super::navigate;
use crate::assertion;
use crate::data::{self, Gender, HOBBIES, SUBJECTS};
use crate::harness::{CaseFuture, TestSuite};
use crate::page_object::{CardName, FormsMenu};
use crate::pages::forms::{ModalData, EMAIL, INVALID_FIELD_TIMEOUT_MS, MOBILE};
use crate::pages::{FormData, FormsPage};
use crate::session::Session;
use rand::Rng;

const DATE_OF_BIRTH: &str = "01 December 2000";
const MODAL_DATE_OF_BIRTH: &str = "01 December,2000";

/// The Forms suite
#[must_use]
pub fn suite() -> TestSuite<Session> {
    TestSuite::new("DemoQA Forms Section")
        .case(
            "Should fill Practice Form with random data, validate modal and reset form fields",
            random_practice_form,
        )
        .case(
            "Should not submit form with invalid email and missing mobile number, highlighting errors",
            invalid_practice_form,
        )
}

/// Everything the random-data case enters
#[derive(Debug, Clone)]
struct PracticeFormInput {
    form: FormData,
    gender: Gender,
    subject: &'static str,
    hobby: &'static str,
    state: &'static str,
    city: &'static str,
}

impl PracticeFormInput {
    fn random_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let form = FormData::new(
            data::random_string_with(rng, 5),
            data::random_string_with(rng, 7),
            format!("{}@example.com", data::random_string_with(rng, 5)),
            data::random_phone_number_with(rng),
            format!("{} Street", data::random_string_with(rng, 10)),
        );
        let (state, city) = data::random_state_and_city_with(rng);
        Self {
            form,
            gender: data::random_gender_with(rng),
            subject: data::random_item_with(rng, &SUBJECTS).copied().unwrap_or(SUBJECTS[0]),
            hobby: data::random_item_with(rng, &HOBBIES).copied().unwrap_or(HOBBIES[0]),
            state,
            city,
        }
    }

    fn expected_modal(&self) -> ModalData {
        ModalData {
            student_name: self.form.full_name(),
            student_email: self.form.email.clone(),
            gender: self.gender.to_string(),
            mobile: self.form.mobile.clone(),
            date_of_birth: MODAL_DATE_OF_BIRTH.to_string(),
            subjects: self.subject.to_string(),
            hobbies: self.hobby.to_string(),
            picture: crate::file_ops::IMAGE_FIXTURE.to_string(),
            address: self.form.current_address.clone(),
            state_and_city: format!("{} {}", self.state, self.city),
        }
    }
}

fn random_practice_form(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Forms, FormsMenu::PracticeForm).await?;
        let page = FormsPage::new();
        let input = PracticeFormInput::random_with(&mut rand::thread_rng());
        tracing::debug!(?input, "practice form data");

        page.fill_form(session, &input.form).await?;
        page.select_gender(session, input.gender).await?;
        page.select_date_of_birth(session, DATE_OF_BIRTH).await?;
        page.select_subjects(session, &[input.subject]).await?;
        page.select_hobbies(session, &[input.hobby]).await?;
        let picture = session.fixtures().image_file();
        page.upload_picture(session, &picture).await?;
        page.select_state(session, input.state).await?;
        page.select_city(session, input.city).await?;
        page.submit_form(session).await?;

        page.verify_modal_data(session, &input.expected_modal()).await?;

        page.close_modal(session).await?;
        page.verify_form_fields_are_empty(session).await?;
        assertion::equals(page.state_text(session).await?.as_str(), "Select State")?;
        assertion::equals(page.city_text(session).await?.as_str(), "Select City")
    })
}

fn invalid_practice_form(session: &mut Session) -> CaseFuture<'_> {
    Box::pin(async move {
        navigate(session, CardName::Forms, FormsMenu::PracticeForm).await?;
        let page = FormsPage::new();

        let form = FormData::new("John", "Doe", "invalidemail", "", "Some Address");
        page.fill_form(session, &form).await?;
        page.select_gender(session, Gender::Male).await?;
        page.select_date_of_birth(session, DATE_OF_BIRTH).await?;
        page.select_subjects(session, &["Maths"]).await?;
        page.select_hobbies(session, &["Sports"]).await?;
        let picture = session.fixtures().image_file();
        page.upload_picture(session, &picture).await?;
        page.select_state(session, "NCR").await?;
        page.select_city(session, "Delhi").await?;
        page.submit_form(session).await?;

        assertion::is_false(page.is_modal_displayed(session).await, "confirmation modal is displayed")?;
        page.wait_for_field_to_be_invalid(session, EMAIL, INVALID_FIELD_TIMEOUT_MS)
            .await?;
        page.wait_for_field_to_be_invalid(session, MOBILE, INVALID_FIELD_TIMEOUT_MS)
            .await
    })
}
