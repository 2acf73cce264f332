//! Mock directory API for testing.
//!
//! Serves registered pages, records every request, and can be told to fail
//! the next call of each kind.

use super::{ApiError, UserApi};
use async_trait::async_trait;
use roster_core::{Credentials, SessionToken};
use roster_types::{PageCursor, UpdateUserResponse, User, UserId, UserPage};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Token handed out by a successful mock login.
pub const DEFAULT_MOCK_TOKEN: &str = "QpwL5tke4Pnpja7X4";

/// A request the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRequest {
    /// `login` with this email.
    Login {
        /// The email sent.
        email: String,
    },
    /// `list_users` for this page.
    ListUsers {
        /// The page requested.
        page: PageCursor,
    },
    /// `update_user` with this record.
    UpdateUser(User),
    /// `delete_user` for this id.
    DeleteUser(UserId),
}

/// Mock directory API for testing.
///
/// Clones share state, so a test can keep a handle while the client owns
/// another.
#[derive(Debug, Default)]
pub struct MockApi {
    inner: Arc<Mutex<MockApiInner>>,
}

#[derive(Debug, Default)]
struct MockApiInner {
    pages: BTreeMap<u32, Vec<User>>,
    token: Option<String>,
    requests: Vec<MockRequest>,
    fail_next_login: Option<ApiError>,
    fail_next_list: Option<ApiError>,
    fail_next_update: Option<ApiError>,
    fail_next_delete: Option<ApiError>,
    list_gate: Option<Arc<Semaphore>>,
}

impl MockApi {
    /// Create a new mock API with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock serving `per_page`-sized pages of users `1..=total`.
    pub fn with_users(total: u64, per_page: usize) -> Self {
        let api = Self::new();
        let users: Vec<User> = (1..=total).map(Self::sample_user).collect();
        for (index, chunk) in users.chunks(per_page.max(1)).enumerate() {
            api.set_page(PageCursor::new(index as u32 + 1), chunk.to_vec());
        }
        api
    }

    /// A deterministic sample record.
    pub fn sample_user(id: u64) -> User {
        User {
            id: UserId::new(id),
            first_name: format!("First{}", id),
            last_name: format!("Last{}", id),
            email: format!("user{}@reqres.in", id),
            avatar: format!("https://reqres.in/img/faces/{}-image.jpg", id),
        }
    }

    /// Serve `users` for `page`.
    pub fn set_page(&self, page: PageCursor, users: Vec<User>) {
        let mut inner = self.inner.lock().unwrap();
        inner.pages.insert(page.value(), users);
    }

    /// Token returned by the next successful logins.
    pub fn set_token(&self, token: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.token = Some(token.to_string());
    }

    /// Get all requests received, in order.
    pub fn requests(&self) -> Vec<MockRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// Pages requested through `list_users`, in order.
    pub fn requested_pages(&self) -> Vec<PageCursor> {
        let inner = self.inner.lock().unwrap();
        inner
            .requests
            .iter()
            .filter_map(|request| match request {
                MockRequest::ListUsers { page } => Some(*page),
                _ => None,
            })
            .collect()
    }

    /// Cause the next login() to fail with the given error.
    pub fn fail_next_login(&self, error: ApiError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_login = Some(error);
    }

    /// Cause the next list_users() to fail with the given error.
    pub fn fail_next_list(&self, error: ApiError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_list = Some(error);
    }

    /// Cause the next update_user() to fail with the given error.
    pub fn fail_next_update(&self, error: ApiError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_update = Some(error);
    }

    /// Cause the next delete_user() to fail with the given error.
    pub fn fail_next_delete(&self, error: ApiError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_delete = Some(error);
    }

    /// Hold every list_users() call until [`release_list`](Self::release_list).
    pub fn hold_list(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.list_gate = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let one held list_users() call complete.
    pub fn release_list(&self) {
        let inner = self.inner.lock().unwrap();
        if let Some(gate) = &inner.list_gate {
            gate.add_permits(1);
        }
    }

    /// Clear all state (pages, requests, failures).
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockApiInner::default();
    }
}

impl Clone for MockApi {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl UserApi for MockApi {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(MockRequest::Login {
            email: credentials.email.clone(),
        });

        // Check for forced failure
        if let Some(error) = inner.fail_next_login.take() {
            return Err(error);
        }

        let token = inner
            .token
            .clone()
            .unwrap_or_else(|| DEFAULT_MOCK_TOKEN.to_string());
        Ok(SessionToken::new(token))
    }

    async fn list_users(&self, page: PageCursor) -> Result<UserPage, ApiError> {
        let gate = {
            let mut inner = self.inner.lock().unwrap();
            inner.requests.push(MockRequest::ListUsers { page });
            inner.list_gate.clone()
        };

        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let mut inner = self.inner.lock().unwrap();

        // Check for forced failure
        if let Some(error) = inner.fail_next_list.take() {
            return Err(error);
        }

        // Out-of-range pages come back empty, like the real API.
        let data = inner.pages.get(&page.value()).cloned().unwrap_or_default();
        let total: usize = inner.pages.values().map(Vec::len).sum();
        Ok(UserPage {
            page,
            per_page: inner.pages.values().map(Vec::len).max().unwrap_or(0) as u32,
            total: total as u32,
            total_pages: inner.pages.len() as u32,
            data,
        })
    }

    async fn update_user(&self, user: &User) -> Result<UpdateUserResponse, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(MockRequest::UpdateUser(user.clone()));

        // Check for forced failure
        if let Some(error) = inner.fail_next_update.take() {
            return Err(error);
        }

        Ok(UpdateUserResponse {
            updated_at: Some("2026-01-01T00:00:00.000Z".to_string()),
        })
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(MockRequest::DeleteUser(id));

        // Check for forced failure
        if let Some(error) = inner.fail_next_delete.take() {
            return Err(error);
        }

        Ok(())
    }
}
