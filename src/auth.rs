/// Session token handling.
///
/// Wraps the durable storage that holds the bearer token and user record,
/// and decorates outgoing requests with `Authorization: Bearer <token>`.
///
/// Token presence is the only notion of "logged in"; the client never
/// validates or refreshes it.
use crate::api::{self, ApiRequest, ApiResponse, Transport, TransportError};
use crate::models::{LoginResponse, UserInfo};
use crate::storage::Storage;

/// Durable storage key of the bearer token.
pub const TOKEN_KEY: &str = "sentiment_jwt_token";

/// Durable storage key of the JSON user record.
pub const USER_KEY: &str = "sentiment_user_info";

const DEFAULT_LOGIN_ERROR: &str = "Login failed";

/// Why a login attempt did not produce a session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The backend answered but refused (or answered with garbage).
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Token store plus request decoration.
pub struct AuthClient {
    storage: Box<dyn Storage>,
}

impl AuthClient {
    pub fn new(storage: Box<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Post credentials and persist the session on success.
    ///
    /// Success requires a 2xx status, `status == "success"` and a token in
    /// the body. Otherwise the server's `message` (or a default) is returned.
    pub fn login<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let response = transport.send(&api::login(username, password))?;
        let parsed: LoginResponse = serde_json::from_str(&response.body).unwrap_or_default();

        let token = parsed
            .access_token
            .as_deref()
            .filter(|token| !token.is_empty());

        match token {
            Some(token) if response.is_success() && parsed.status.as_deref() == Some("success") => {
                let user = parsed.user.clone().unwrap_or_else(|| UserInfo {
                    username: username.to_string(),
                    id: None,
                });
                self.set_token(token);
                self.set_user(&user);
                log::info!("logged in as {}", user.username);
                Ok(())
            }
            _ => Err(AuthError::Rejected(
                parsed
                    .message
                    .unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string()),
            )),
        }
    }

    /// Drop the stored session. The caller is responsible for the reload.
    pub fn logout(&mut self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// The stored token; an empty string counts as absent.
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// The stored user record, `None` when missing or unreadable.
    pub fn user(&self) -> Option<UserInfo> {
        let raw = self.storage.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    fn set_token(&mut self, token: &str) {
        self.storage.set(TOKEN_KEY, token);
    }

    fn set_user(&mut self, user: &UserInfo) {
        match serde_json::to_string(user) {
            Ok(json) => self.storage.set(USER_KEY, &json),
            Err(e) => log::warn!("failed to store user record: {e}"),
        }
    }

    /// Attach the bearer token if there is one; leave the request as-is
    /// otherwise. For endpoints that also serve anonymous users.
    pub fn with_optional_bearer(&self, request: ApiRequest) -> ApiRequest {
        match self.token() {
            Some(token) => request.with_header("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }

    /// Perform an authenticated request.
    ///
    /// Returns `None` without touching the transport when no token is
    /// stored: "not authenticated", not a network error.
    pub fn authorized_fetch<T: Transport + ?Sized>(
        &self,
        transport: &T,
        request: ApiRequest,
    ) -> Option<Result<ApiResponse, TransportError>> {
        let token = self.token()?;
        let request = request.with_header("Authorization", &format!("Bearer {token}"));
        Some(transport.send(&request))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
