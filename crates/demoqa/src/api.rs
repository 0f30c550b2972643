//! BookStore and Account REST client.
//!
//! The client keeps the state of one user across calls: the id returned by
//! user creation, the username and the bearer token. Every call returns the
//! status and JSON body without judging the status, so suites can assert on
//! exact codes.

use crate::result::{SuiteError, SuiteResult};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Default API host
pub const DEFAULT_API_BASE_URL: &str = "https://demoqa.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status code and parsed body of one API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body; `Null` when empty, a string when not JSON
    pub body: Value,
}

impl ApiResponse {
    /// Field of the body, if the body is an object holding it
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// The `books` array of the body
    pub fn books(&self) -> SuiteResult<&Vec<Value>> {
        self.body
            .get("books")
            .and_then(Value::as_array)
            .ok_or_else(|| SuiteError::api(format!("expected a 'books' array in {}", self.body)))
    }
}

/// Login credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Account name
    pub username: String,
    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    user_name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct IsbnEntry<'a> {
    isbn: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddBooksRequest<'a> {
    user_id: &'a str,
    collection_of_isbns: Vec<IsbnEntry<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteBookRequest<'a> {
    user_id: &'a str,
    isbn: &'a str,
}

/// Client for the BookStore and Account services
#[derive(Debug, Clone)]
pub struct BookStoreClient {
    base_url: String,
    client: reqwest::Client,
    user_id: String,
    username: String,
    token: String,
}

impl BookStoreClient {
    /// Create a client for a base URL; certificate errors are ignored
    pub fn new(base_url: impl Into<String>) -> SuiteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            user_id: String::new(),
            username: String::new(),
            token: String::new(),
        }
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Id of the created user; empty before [`Self::create_user`]
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Name of the created user
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Bearer token; empty before [`Self::generate_token`]
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read(response: reqwest::Response) -> SuiteResult<ApiResponse> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        tracing::debug!(status, "api response");
        Ok(ApiResponse { status, body })
    }

    /// Create a user and remember its id and name
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn create_user(&mut self, credentials: &Credentials) -> SuiteResult<ApiResponse> {
        let request = LoginRequest {
            user_name: &credentials.username,
            password: &credentials.password,
        };
        let response = self
            .client
            .post(self.url("/Account/v1/User"))
            .json(&request)
            .send()
            .await?;
        let response = Self::read(response).await?;
        self.user_id = response
            .field("userID")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.username.clone_from(&credentials.username);
        Ok(response)
    }

    /// Generate a token for the created user
    #[tracing::instrument(skip(self, password), fields(username = %self.username))]
    pub async fn generate_token(&mut self, password: &str) -> SuiteResult<ApiResponse> {
        let request = LoginRequest {
            user_name: &self.username,
            password,
        };
        let response = self
            .client
            .post(self.url("/Account/v1/GenerateToken"))
            .json(&request)
            .send()
            .await?;
        let response = Self::read(response).await?;
        self.token = response
            .field("token")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if self.token.is_empty() {
            return Err(SuiteError::api(format!(
                "Token generation failed for {}",
                self.username
            )));
        }
        Ok(response)
    }

    /// Add a book to the user's collection
    #[tracing::instrument(skip(self))]
    pub async fn add_book(&self, isbn: &str) -> SuiteResult<ApiResponse> {
        let request = AddBooksRequest {
            user_id: &self.user_id,
            collection_of_isbns: vec![IsbnEntry { isbn }],
        };
        let response = self
            .client
            .post(self.url("/BookStore/v1/Books"))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        Self::read(response).await
    }

    /// List every book in the store
    #[tracing::instrument(skip(self))]
    pub async fn get_books(&self) -> SuiteResult<ApiResponse> {
        let response = self.client.get(self.url("/BookStore/v1/Books")).send().await?;
        Self::read(response).await
    }

    /// Remove a book from the user's collection
    #[tracing::instrument(skip(self))]
    pub async fn delete_book(&self, isbn: &str) -> SuiteResult<ApiResponse> {
        let request = DeleteBookRequest {
            user_id: &self.user_id,
            isbn,
        };
        let response = self
            .client
            .delete(self.url("/BookStore/v1/Book"))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;
        Self::read(response).await
    }

    /// Delete the created user
    #[tracing::instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn delete_user(&self) -> SuiteResult<ApiResponse> {
        let response = self
            .client
            .delete(self.url(&format!("/Account/v1/User/{}", self.user_id)))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::read(response).await
    }
}

/// Fail on the first field `object` does not have; `null` counts as present
pub fn assert_fields(object: &Value, fields: &[&str]) -> SuiteResult<()> {
    for field in fields {
        if !object.as_object().is_some_and(|o| o.contains_key(*field)) {
            return Err(SuiteError::assertion(format!(
                "Expected field '{field}' to be defined"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PASSWORD: &str = "Password123!";

    fn credentials() -> Credentials {
        Credentials::new("user_1", PASSWORD)
    }

    async fn logged_in_client(server: &MockServer) -> BookStoreClient {
        Mock::given(method("POST"))
            .and(path("/Account/v1/User"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"userID": "u-42", "username": "user_1", "books": []})),
            )
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
        let mut client = BookStoreClient::new(server.uri()).unwrap();
        client.create_user(&credentials()).await.unwrap();
        client.generate_token(PASSWORD).await.unwrap();
        client
    }

    mod account_tests {
        use super::*;

        #[tokio::test]
        async fn test_create_user_sends_credentials_and_stores_id() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/Account/v1/User"))
                .and(body_json(json!({"userName": "user_1", "password": PASSWORD})))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({"userID": "u-42", "username": "user_1"})))
                .expect(1)
                .mount(&server)
                .await;

            let mut client = BookStoreClient::new(server.uri()).unwrap();
            let response = client.create_user(&credentials()).await.unwrap();

            assert_eq!(response.status, 201);
            assert_eq!(client.user_id(), "u-42");
            assert_eq!(client.username(), "user_1");
        }

        #[tokio::test]
        async fn test_non_success_status_is_not_an_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/Account/v1/User"))
                .respond_with(
                    ResponseTemplate::new(406).set_body_json(json!({"code": "1204", "message": "User exists!"})),
                )
                .mount(&server)
                .await;

            let mut client = BookStoreClient::new(server.uri()).unwrap();
            let response = client.create_user(&credentials()).await.unwrap();

            assert_eq!(response.status, 406);
            assert_eq!(client.user_id(), "");
        }

        #[tokio::test]
        async fn test_generate_token_stores_token() {
            let server = MockServer::start().await;
            let client = logged_in_client(&server).await;
            assert_eq!(client.token(), "tok");
        }

        #[tokio::test]
        async fn test_null_token_fails_with_username() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/Account/v1/GenerateToken"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "token": null,
                    "expires": null,
                    "status": "Failed",
                    "result": "User authorization failed."
                })))
                .mount(&server)
                .await;

            let mut client = BookStoreClient::new(server.uri()).unwrap();
            client.username = "ghost".to_string();
            let err = client.generate_token(PASSWORD).await.unwrap_err();

            assert!(err.to_string().contains("Token generation failed for ghost"));
        }

        #[tokio::test]
        async fn test_delete_user_uses_id_and_bearer() {
            let server = MockServer::start().await;
            let client = logged_in_client(&server).await;
            Mock::given(method("DELETE"))
                .and(path("/Account/v1/User/u-42"))
                .and(header("Authorization", "Bearer tok"))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;

            let response = client.delete_user().await.unwrap();

            assert_eq!(response.status, 204);
            assert_eq!(response.body, Value::Null);
        }
    }

    mod book_tests {
        use super::*;

        #[tokio::test]
        async fn test_add_book_posts_collection() {
            let server = MockServer::start().await;
            let client = logged_in_client(&server).await;
            Mock::given(method("POST"))
                .and(path("/BookStore/v1/Books"))
                .and(header("Authorization", "Bearer tok"))
                .and(body_json(json!({
                    "userId": "u-42",
                    "collectionOfIsbns": [{"isbn": "9781449325862"}]
                })))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({"books": [{"isbn": "9781449325862"}]})))
                .expect(1)
                .mount(&server)
                .await;

            let response = client.add_book("9781449325862").await.unwrap();

            assert_eq!(response.status, 201);
            assert_eq!(response.books().unwrap()[0]["isbn"], "9781449325862");
        }

        #[tokio::test]
        async fn test_delete_book_sends_json_body() {
            let server = MockServer::start().await;
            let client = logged_in_client(&server).await;
            Mock::given(method("DELETE"))
                .and(path("/BookStore/v1/Book"))
                .and(header("Authorization", "Bearer tok"))
                .and(body_json(json!({"userId": "u-42", "isbn": "9781449325862"})))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;

            let response = client.delete_book("9781449325862").await.unwrap();
            assert_eq!(response.status, 204);
        }

        #[tokio::test]
        async fn test_get_books_without_token() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/BookStore/v1/Books"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"books": [{"isbn": "1"}, {"isbn": "2"}]})))
                .mount(&server)
                .await;

            let client = BookStoreClient::new(format!("{}/", server.uri())).unwrap();
            let response = client.get_books().await.unwrap();

            assert_eq!(response.status, 200);
            assert_eq!(response.books().unwrap().len(), 2);
        }

        #[tokio::test]
        async fn test_plain_text_body_is_kept() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/BookStore/v1/Books"))
                .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
                .mount(&server)
                .await;

            let client = BookStoreClient::new(server.uri()).unwrap();
            let response = client.get_books().await.unwrap();

            assert_eq!(response.status, 502);
            assert_eq!(response.body, Value::String("Bad Gateway".into()));
            assert!(response.books().is_err());
        }
    }

    mod field_tests {
        use super::*;

        #[test]
        fn test_all_fields_present() {
            let body = json!({"token": "t", "expires": "x", "status": "Success", "result": "ok"});
            assert!(assert_fields(&body, &["token", "expires", "status", "result"]).is_ok());
        }

        #[test]
        fn test_names_first_missing_field() {
            let body = json!({"isbn": "1", "title": "Git Pocket Guide"});
            let err = assert_fields(&body, &["isbn", "author", "publisher"]).unwrap_err();
            assert!(err.to_string().contains("'author'"));
        }

        #[test]
        fn test_null_field_counts_as_present() {
            let body = json!({"userId": "u-42", "username": "user_1", "books": null});
            assert!(assert_fields(&body, &["userId", "username", "books"]).is_ok());
        }

        #[test]
        fn test_non_object_has_no_fields() {
            assert!(assert_fields(&json!([1, 2]), &["isbn"]).is_err());
            assert!(assert_fields(&json!([1, 2]), &[]).is_ok());
        }
    }
}
