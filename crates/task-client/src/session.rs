//! Auth Session
//!
//! Anonymous/Authenticated state machine on top of `ApiClient`, mirrored to
//! persistent storage under `USER_KEY`.

use crate::auth::Credentials;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::User;
use crate::storage::{KeyValueStore, StorageChange, TOKEN_KEY, USER_KEY};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            AuthState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    /// State implied by a raw `USER_KEY` value. Unparseable means anonymous.
    fn from_stored(raw: Option<&str>) -> Self {
        match raw.map(serde_json::from_str::<User>) {
            Some(Ok(user)) => AuthState::Authenticated(user),
            Some(Err(e)) => {
                log::warn!("[SESSION] Discarding malformed stored user: {}", e);
                AuthState::Anonymous
            }
            None => AuthState::Anonymous,
        }
    }

    /// Map a storage write from another tab to the new state.
    ///
    /// Returns `None` for keys the session does not care about.
    pub fn from_change(change: &StorageChange) -> Option<Self> {
        match change.key.as_deref() {
            Some(USER_KEY) => Some(Self::from_stored(change.new_value.as_deref())),
            Some(_) => None,
            // storage.clear() in another tab
            None => Some(AuthState::Anonymous),
        }
    }
}

#[derive(Clone)]
pub struct SessionManager<T, S> {
    client: ApiClient<T, S>,
}

impl<T: Transport, S: KeyValueStore> SessionManager<T, S> {
    pub fn new(client: ApiClient<T, S>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient<T, S> {
        &self.client
    }

    /// Restore the persisted user; a corrupted entry is removed.
    pub fn restore(&self) -> AuthState {
        let store = self.client.store();
        let raw = store.get(USER_KEY);
        let state = AuthState::from_stored(raw.as_deref());
        if raw.is_some() && !state.is_authenticated() {
            store.remove(USER_KEY);
        }
        state
    }

    /// Log in and persist the user.
    ///
    /// Uses the user object from the response when the backend sends one,
    /// otherwise a projection holding only the email.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let credentials = Credentials::new(email, password);
        let response = self.client.login(&credentials).await?;
        let user = response
            .user
            .unwrap_or_else(|| User::from_email(&credentials.email));
        self.persist(&user)?;
        log::info!("[SESSION] Logged in");
        Ok(user)
    }

    /// Register and persist the returned user. The response must carry one.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let credentials = Credentials::new(email, password);
        let response = self.client.register(&credentials).await?;
        let Some(user) = response.user else {
            self.client.store().remove(TOKEN_KEY);
            return Err(ApiError::MissingField("User data not returned from server"));
        };
        self.persist(&user)?;
        log::info!("[SESSION] Registered new account");
        Ok(user)
    }

    /// Sign out locally, then revoke the token on the server.
    pub async fn logout(&self) {
        if let Some(token) = self.sign_out_locally() {
            self.client.revoke_token(&token).await;
        }
    }

    /// Drop the persisted user and token. Returns the token for server revocation.
    pub fn sign_out_locally(&self) -> Option<String> {
        self.client.store().remove(USER_KEY);
        let token = self.client.clear_token();
        log::info!("[SESSION] Logged out");
        token
    }

    fn persist(&self, user: &User) -> Result<(), ApiError> {
        let json = serde_json::to_string(user).map_err(|e| ApiError::Decode(e.to_string()))?;
        if let Err(e) = self.client.store().set(USER_KEY, &json) {
            self.client.store().remove(TOKEN_KEY);
            return Err(e);
        }
        Ok(())
    }
}
