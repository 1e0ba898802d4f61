//! Typed HTTP client for the inkpost API.
//!
//! Wraps reqwest with a cookie store so the server-set session cookies
//! (`accessToken`, `refreshToken`) ride along automatically, and exposes
//! the derived session state a frontend needs: "am I logged in right
//! now", answered by probing the current-user endpoint with at most one
//! refresh attempt.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level failure (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error envelope.
    #[error("API error ({status_code}): {message}")]
    Api { status_code: u16, message: String },

    /// The response body did not match the expected envelope shape.
    #[error("Unexpected response shape: {0}")]
    Decode(String),

    /// A local file (avatar, blog image) could not be read.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// The uniform response envelope every endpoint returns.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "statusCode")]
    status_code: u16,
    // Absent on error envelopes; serde reads a missing Option as None
    // without needing T: Default.
    data: Option<T>,
    message: String,
    success: bool,
}

/// The user profile as the API exposes it (credentials never included).
#[derive(Debug, Clone, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub avatar: String,
}

/// Payload of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub user: UserIdentity,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Payload of a successful token refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Author identity embedded in each blog, as captured at creation time.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogAuthor {
    pub id: i64,
    pub username: String,
    pub avatar: String,
}

/// A blog post as returned by the listing and read endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(rename = "blogImage")]
    pub image_url: String,
    pub author: BlogAuthor,
}

/// Fields for `register`.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    /// Local path of the avatar image to upload.
    pub avatar_path: std::path::PathBuf,
}

/// Fields for `create_blog`.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub category: String,
    pub description: String,
    /// Local path of the cover image to upload.
    pub image_path: std::path::PathBuf,
}

/// Whether the cookie jar currently holds a usable session.
#[derive(Debug, Clone)]
pub enum SessionState {
    Authenticated(UserIdentity),
    Unauthenticated,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// API client bound to one server and one cookie jar.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the given server, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    /// POST /api/users/register (multipart with the avatar file).
    pub async fn register(&self, form: RegisterForm) -> Result<UserIdentity, ClientError> {
        let avatar = file_part(&form.avatar_path)?;
        let multipart = reqwest::multipart::Form::new()
            .text("fullName", form.full_name)
            .text("email", form.email)
            .text("username", form.username)
            .text("password", form.password)
            .part("avatar", avatar);

        let response = self
            .http
            .post(self.url("/users/register"))
            .multipart(multipart)
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    /// POST /api/users/login. The session cookies land in the jar; the
    /// returned pair is also available for non-cookie storage.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<LoginData, ClientError> {
        let response = self
            .http
            .post(self.url("/users/login"))
            .json(&serde_json::json!({ "username": identifier, "password": password }))
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    /// POST /api/users/logout. The server revokes the refresh token and
    /// expires both cookies.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let response = self.http.post(self.url("/users/logout")).send().await?;
        unwrap_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// POST /api/users/refresh-token, using the refresh cookie in the jar.
    pub async fn refresh(&self) -> Result<TokenPair, ClientError> {
        let response = self
            .http
            .post(self.url("/users/refresh-token"))
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    /// GET /api/users/current-user.
    pub async fn current_user(&self) -> Result<UserIdentity, ClientError> {
        let response = self
            .http
            .get(self.url("/users/current-user"))
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    /// GET /api/blogs/all (public).
    pub async fn all_blogs(&self) -> Result<Vec<BlogPost>, ClientError> {
        let response = self.http.get(self.url("/blogs/all")).send().await?;
        unwrap_envelope(response).await
    }

    /// POST /api/blogs/create (multipart with the cover image).
    pub async fn create_blog(&self, blog: NewBlog) -> Result<BlogPost, ClientError> {
        let image = file_part(&blog.image_path)?;
        let multipart = reqwest::multipart::Form::new()
            .text("title", blog.title)
            .text("category", blog.category)
            .text("description", blog.description)
            .part("blogImage", image);

        let response = self
            .http
            .post(self.url("/blogs/create"))
            .multipart(multipart)
            .send()
            .await?;
        unwrap_envelope(response).await
    }

    /// Derive the current session state by probing the current-user
    /// endpoint. On a 401 the client tries one token refresh and probes
    /// again; a second 401 (or a failed refresh) means the session is
    /// gone. There is no background refresh.
    pub async fn session_state(&self) -> Result<SessionState, ClientError> {
        match self.current_user().await {
            Ok(user) => return Ok(SessionState::Authenticated(user)),
            Err(ClientError::Api { status_code: 401, .. }) => {}
            Err(e) => return Err(e),
        }

        match self.refresh().await {
            Ok(_) => {}
            Err(ClientError::Api { status_code: 401, .. }) => {
                return Ok(SessionState::Unauthenticated)
            }
            Err(e) => return Err(e),
        }

        match self.current_user().await {
            Ok(user) => Ok(SessionState::Authenticated(user)),
            Err(ClientError::Api { status_code: 401, .. }) => {
                Ok(SessionState::Unauthenticated)
            }
            Err(e) => Err(e),
        }
    }
}

/// Read a local file into a multipart part, keeping its file name.
fn file_part(path: &Path) -> Result<reqwest::multipart::Part, ClientError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(reqwest::multipart::Part::bytes(bytes).file_name(file_name))
}

/// Parse an envelope response, mapping error envelopes to `ClientError::Api`.
async fn unwrap_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    let status = response.status().as_u16();
    let body = response.text().await?;

    let envelope: Envelope<T> = serde_json::from_str(&body)
        .map_err(|e| ClientError::Decode(format!("status {status}: {e}")))?;

    if !envelope.success {
        return Err(ClientError::Api {
            status_code: envelope.status_code,
            message: envelope.message,
        });
    }
    envelope
        .data
        .ok_or_else(|| ClientError::Decode("success envelope without data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_parses() {
        let body = r#"{
            "statusCode": 200,
            "data": {
                "id": 1,
                "username": "alice",
                "email": "alice@example.com",
                "fullName": "Alice A",
                "avatar": "http://img/a.png",
                "createdAt": "2024-01-01T00:00:00Z"
            },
            "message": "Current user fetched",
            "success": true
        }"#;

        let envelope: Envelope<UserIdentity> = serde_json::from_str(body).unwrap();
        assert!(envelope.success);
        let user = envelope.data.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.full_name, "Alice A");
    }

    #[test]
    fn error_envelope_parses_without_data() {
        let body = r#"{
            "statusCode": 401,
            "message": "Unauthorized request",
            "success": false,
            "errors": []
        }"#;

        let envelope: Envelope<UserIdentity> = serde_json::from_str(body).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.status_code, 401);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn blog_listing_parses() {
        let body = r#"{
            "statusCode": 200,
            "data": [{
                "id": 7,
                "title": "Hello",
                "category": "tech",
                "description": "Words",
                "blogImage": "http://img/cover.png",
                "author": { "id": 1, "username": "alice", "avatar": "http://img/a.png" },
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }],
            "message": "All blogs fetched",
            "success": true
        }"#;

        let envelope: Envelope<Vec<BlogPost>> = serde_json::from_str(body).unwrap();
        let blogs = envelope.data.unwrap();
        assert_eq!(blogs.len(), 1);
        assert_eq!(blogs[0].author.username, "alice");
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.url("/blogs/all"), "http://localhost:8000/api/blogs/all");
    }
}
