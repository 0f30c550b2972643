//! BookStore and User API Flow

use crate::api::{assert_fields, BookStoreClient, Credentials};
use crate::assertion;
use crate::harness::{CaseFuture, TestSuite};
use crate::result::SuiteResult;
use serde_json::Value;

/// Password of the throwaway user
pub const PASSWORD: &str = "Password123!";
/// Book added and removed by the flow
pub const ISBN: &str = "9781449325862";

const USER_FIELDS: [&str; 2] = ["userID", "username"];
const TOKEN_FIELDS: [&str; 4] = ["token", "expires", "status", "result"];
const BOOK_FIELDS: [&str; 9] = [
    "isbn",
    "title",
    "subTitle",
    "author",
    "publish_date",
    "publisher",
    "pages",
    "description",
    "website",
];

/// The API suite
#[must_use]
pub fn suite() -> TestSuite<BookStoreClient> {
    TestSuite::new("BookStore and User API Flow")
        .with_before(create_user_and_token)
        .with_after(delete_user)
        .case("should add a new book successfully", add_book)
        .case("should get a list of books", list_books)
        .case("should delete the book successfully", delete_book)
}

/// `user_<unix millis>`, unique per run
#[must_use]
pub fn unique_username() -> String {
    format!("user_{}", chrono::Utc::now().timestamp_millis())
}

fn expect_status(actual: u16, expected: u16, call: &str) -> SuiteResult<()> {
    assertion::equals(&actual, &expected).map_err(|e| e.context(format!("{call} status")))
}

fn create_user_and_token(client: &mut BookStoreClient) -> CaseFuture<'_> {
    Box::pin(async move {
        let credentials = Credentials::new(unique_username(), PASSWORD);
        let created = client.create_user(&credentials).await?;
        expect_status(created.status, 201, "create user")?;
        assert_fields(&created.body, &USER_FIELDS)?;

        let token = client.generate_token(PASSWORD).await?;
        expect_status(token.status, 200, "generate token")?;
        assert_fields(&token.body, &TOKEN_FIELDS)
    })
}

fn add_book(client: &mut BookStoreClient) -> CaseFuture<'_> {
    Box::pin(async move {
        let response = client.add_book(ISBN).await?;
        expect_status(response.status, 201, "add book")?;
        let books = response.books()?;
        let first = books.first().and_then(|b| b.get("isbn")).and_then(Value::as_str);
        assertion::equals(&first, &Some(ISBN))
    })
}

fn list_books(client: &mut BookStoreClient) -> CaseFuture<'_> {
    Box::pin(async move {
        let response = client.get_books().await?;
        expect_status(response.status, 200, "get books")?;
        let books = response.books()?;
        assertion::greater_than(books.len(), 0)?;
        assert_fields(&books[0], &BOOK_FIELDS)
    })
}

fn delete_book(client: &mut BookStoreClient) -> CaseFuture<'_> {
    Box::pin(async move {
        let response = client.delete_book(ISBN).await?;
        expect_status(response.status, 204, "delete book")
    })
}

fn delete_user(client: &mut BookStoreClient) -> CaseFuture<'_> {
    Box::pin(async move {
        let response = client.delete_user().await?;
        expect_status(response.status, 204, "delete user")
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::harness::{NoArtifacts, TestHarness};
    use crate::reporter::Reporter;
    use serde_json::json;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_happy_path(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/Account/v1/User"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"userID": "u-1", "username": "user_1", "books": []})))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/Account/v1/GenerateToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "tok",
                "expires": "2030-01-01T00:00:00.000Z",
                "status": "Success",
                "result": "User authorized successfully."
            })))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/BookStore/v1/Books"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"books": [{"isbn": ISBN}]})))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/BookStore/v1/Books"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"books": [{
                "isbn": ISBN,
                "title": "Git Pocket Guide",
                "subTitle": "A Working Introduction",
                "author": "Richard E. Silverman",
                "publish_date": "2020-06-04T08:48:39.000Z",
                "publisher": "O'Reilly Media",
                "pages": 234,
                "description": "This pocket guide is the perfect on-the-job companion to Git.",
                "website": "http://chimera.labs.oreilly.com/books/1230000000561/index.html"
            }]})))
            .mount(server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/BookStore/v1/Book"))
            .respond_with(ResponseTemplate::new(204))
            .mount(server)
            .await;
    }

    #[test]
    fn test_unique_username() {
        let name = unique_username();
        assert!(name.starts_with("user_"));
        assert!(name["user_".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_flow_passes_against_mock_server() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;
        Mock::given(method("DELETE"))
            .and(path_regex("^/Account/v1/User/u-1$"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = BookStoreClient::new(server.uri()).unwrap();
        let mut reporter = Reporter::new("api");
        let outcome = TestHarness::new()
            .run(&suite(), &mut client, &NoArtifacts, &mut reporter)
            .await;

        assert_eq!(outcome.passed, 3, "{:?}", reporter.failures());
        assert!(outcome.all_passed());
    }

    #[tokio::test]
    async fn test_missing_book_field_fails_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/BookStore/v1/Books"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"books": [{"isbn": ISBN, "title": "t"}]})))
            .mount(&server)
            .await;

        let mut client = BookStoreClient::new(server.uri()).unwrap();
        let err = list_books(&mut client).await.unwrap_err();
        assert!(err.to_string().contains("'subTitle'"));
    }

    #[tokio::test]
    async fn test_failed_user_deletion_is_reported() {
        let server = MockServer::start().await;
        mount_happy_path(&server).await;
        Mock::given(method("DELETE"))
            .and(path_regex("^/Account/v1/User/.*$"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"code": "1200", "message": "User not authorized!"})))
            .mount(&server)
            .await;

        let mut client = BookStoreClient::new(server.uri()).unwrap();
        let mut reporter = Reporter::new("api");
        let outcome = TestHarness::new()
            .run(&suite(), &mut client, &NoArtifacts, &mut reporter)
            .await;

        assert_eq!(outcome.passed, 3);
        assert_eq!(outcome.failed, 1);
        let failure = reporter.failures()[0];
        assert!(failure.error.as_deref().unwrap().contains("delete user status"));
    }
}
