//! HTTP implementation of [`UserApi`] on top of `reqwest`.
//!
//! Every request carries the configured `x-api-key` header when one is set,
//! and list/update/delete carry `Authorization: Bearer <token>` once a session
//! token is attached.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use roster_core::{Credentials, SessionToken};
use roster_types::{
    ErrorBody, LoginRequest, LoginResponse, PageCursor, UpdateUserResponse, User, UserId,
    UserPage,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use zeroize::Zeroize;

use super::{ApiError, UserApi};

/// Public demo endpoint.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpApi`].
#[derive(Clone)]
pub struct HttpConfig {
    /// Base URL, without the trailing endpoint path.
    pub base_url: String,
    /// Value for the `x-api-key` header.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpConfig {
    /// Config for `base_url` with default timeout and no API key.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|key| !key.trim().is_empty());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// The directory API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    config: HttpConfig,
    token: Option<SessionToken>,
}

impl HttpApi {
    /// Build a client for `config`.
    pub fn new(config: HttpConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self {
            client,
            config,
            token: None,
        })
    }

    /// Attach the session token sent as a bearer credential.
    pub fn with_token(mut self, token: Option<SessionToken>) -> Self {
        self.token = token;
        self
    }

    /// The connection settings.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self.client.request(method, self.url(path));
        if let Some(key) = &self.config.api_key {
            request = request.header("x-api-key", key);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose());
        }
        request
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "API response");
        if status.is_success() {
            return Ok(response);
        }

        // Non-2xx: keep the server's message if the body is `{ "error": ... }`
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|body| body.error);
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl UserApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, ApiError> {
        let mut body = LoginRequest {
            email: credentials.email.clone(),
            password: credentials.password.to_string(),
        };
        let request = self.request(Method::POST, "login").json(&body);
        body.password.zeroize();

        let response = self.send(request).await?;
        let login: LoginResponse = Self::decode(response).await?;
        let token = SessionToken::new(login.token);
        if token.is_blank() {
            return Err(ApiError::Decode("empty token".into()));
        }
        Ok(token)
    }

    async fn list_users(&self, page: PageCursor) -> Result<UserPage, ApiError> {
        let request = self
            .request(Method::GET, "users")
            .query(&[("page", page.value())]);
        let response = self.send(request).await?;
        Self::decode(response).await
    }

    async fn update_user(&self, user: &User) -> Result<UpdateUserResponse, ApiError> {
        let request = self
            .request(Method::PUT, &format!("users/{}", user.id))
            .json(user);
        let response = self.send(request).await?;

        // Any JSON echo is accepted; only `updatedAt` is read.
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(UpdateUserResponse::default());
        }
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("users/{}", id));
        self.send(request).await?;
        Ok(())
    }
}
