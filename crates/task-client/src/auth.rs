//! Auth Endpoints
//!
//! Register/login/logout calls. These go out without a bearer token and
//! persist the token they receive.

use serde::Serialize;
use serde_json::Value;

use crate::client::{decode_body, ApiClient};
use crate::config::AuthBodyFormat;
use crate::error::ApiError;
use crate::models::User;
use crate::storage::{KeyValueStore, TOKEN_COOKIE, TOKEN_KEY};
use crate::transport::{HttpRequest, Method, Transport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }

    fn form_encoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("email", &self.email)
            .append_pair("password", &self.password)
            .finish()
    }
}

/// Decoded login/register response
#[derive(Debug, Clone, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    /// Present when the backend includes `user` or `data.user`
    pub user: Option<User>,
}

impl AuthResponse {
    pub fn from_json(data: &Value) -> Result<Self, ApiError> {
        let token = extract_token(data).ok_or(ApiError::MissingField("No token received from server"))?;
        Ok(Self {
            token,
            user: extract_user(data),
        })
    }
}

/// Token under `access_token`, `token` or `accessToken`, top level or inside `data`.
pub fn extract_token(data: &Value) -> Option<String> {
    const FIELDS: [&str; 3] = ["access_token", "token", "accessToken"];

    let scopes = [Some(data), data.get("data")];
    scopes
        .into_iter()
        .flatten()
        .flat_map(|scope| FIELDS.into_iter().filter_map(move |field| scope.get(field)))
        .filter_map(Value::as_str)
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

/// User object under `data.user` or `user`, if it decodes.
pub fn extract_user(data: &Value) -> Option<User> {
    data.get("data")
        .and_then(|d| d.get("user"))
        .or_else(|| data.get("user"))
        .and_then(|user| match serde_json::from_value::<User>(user.clone()) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("[AUTH] Ignoring malformed user in auth response: {}", e);
                None
            }
        })
}

impl<T: Transport, S: KeyValueStore> ApiClient<T, S> {
    pub async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.post_credentials("/auth/register", credentials).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.post_credentials("/auth/login", credentials).await
    }

    /// Clear the token locally, then revoke it on the server.
    ///
    /// Storage is cleared before the first await, so a login started while
    /// the server call is pending keeps its new token.
    pub async fn logout(&self) {
        if let Some(token) = self.clear_token() {
            self.revoke_token(&token).await;
        }
    }

    /// Remove the stored token and expire its cookie. Returns the removed token.
    pub fn clear_token(&self) -> Option<String> {
        let token = self.token();
        self.store().remove(TOKEN_KEY);
        self.store().expire_cookie(TOKEN_COOKIE);
        token
    }

    /// Best-effort server logout for `token`. Failures are only logged.
    pub async fn revoke_token(&self, token: &str) {
        let request = HttpRequest::new(Method::Post, self.config().endpoint("/auth/logout"))
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json");

        match self.transport_send(request).await {
            Ok(response) if !response.is_success() => {
                log::warn!("[AUTH] Logout returned status {}", response.status);
            }
            Err(e) => log::error!("[AUTH] Logout error: {}", e),
            Ok(_) => {}
        }
    }

    async fn post_credentials(&self, endpoint: &str, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = self.config().endpoint(endpoint);
        let request = match self.config().auth_body {
            AuthBodyFormat::Json => {
                let body = serde_json::to_string(credentials).map_err(|e| ApiError::Decode(e.to_string()))?;
                HttpRequest::new(Method::Post, url)
                    .header("Content-Type", "application/json")
                    .body(body)
            }
            AuthBodyFormat::Form => HttpRequest::new(Method::Post, url)
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(credentials.form_encoded()),
        };

        log::debug!("[AUTH] POST {}", endpoint);
        let response = self.transport_send(request).await?;
        if !response.is_success() {
            let err = ApiError::from_response(response.status, &response.status_text, &response.body);
            log::warn!("[AUTH] {} failed: {}", endpoint, err);
            return Err(err);
        }

        let data: Value = decode_body(response.status, &response.body)?;
        let auth = AuthResponse::from_json(&data)?;
        self.store().set(TOKEN_KEY, &auth.token)?;
        Ok(auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStore;
    use crate::transport::mock::MockTransport;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_token_shapes() {
        for body in [
            json!({ "access_token": "t1" }),
            json!({ "token": "t1" }),
            json!({ "accessToken": "t1" }),
            json!({ "data": { "token": "t1" } }),
            json!({ "token": "", "data": { "access_token": "t1" } }),
        ] {
            assert_eq!(extract_token(&body).as_deref(), Some("t1"), "body: {}", body);
        }
        assert_eq!(extract_token(&json!({ "success": true })), None);
    }

    #[test]
    fn test_user_shapes() {
        let user = json!({
            "id": "0b7e3a52-5f7c-4d4e-9a1b-2c3d4e5f6071",
            "email": "a@b.com",
            "created_at": "2024-05-01T10:20:30",
            "updated_at": "2024-05-01T10:20:30"
        });
        let nested = extract_user(&json!({ "data": { "user": user.clone() } })).unwrap();
        let flat = extract_user(&json!({ "user": user })).unwrap();
        assert_eq!(nested, flat);
        assert_eq!(nested.email, "a@b.com");
        assert!(nested.id.is_some());
        assert_eq!(extract_user(&json!({ "token": "t" })), None);
    }

    #[test]
    fn test_login_persists_token_without_bearer() {
        let (api, transport, store) = client();
        store.set(TOKEN_KEY, "stale").unwrap();
        transport.respond(200, r#"{"token":"t1"}"#);

        let auth = block_on(api.login(&Credentials::new("a@b.com", "x"))).unwrap();
        assert_eq!(auth.token, "t1");
        assert_eq!(auth.user, None);
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("t1"));

        let req = transport.last_request();
        assert_eq!(req.url, "http://api.test/v1/auth/login");
        assert_eq!(req.header_value("Authorization"), None);
        assert_eq!(req.body.as_deref(), Some(r#"{"email":"a@b.com","password":"x"}"#));
    }

    #[test]
    fn test_form_encoded_credentials() {
        let transport = MockTransport::new();
        let config = ClientConfig::new("http://api.test/v1")
            .unwrap()
            .with_auth_body(AuthBodyFormat::Form);
        let api = ApiClient::new(config, transport.clone(), MemoryStore::new());
        transport.respond(200, r#"{"access_token":"t1"}"#);

        block_on(api.register(&Credentials::new("a+b@c.com", "p&q"))).unwrap();
        let req = transport.last_request();
        assert_eq!(req.header_value("content-type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(req.body.as_deref(), Some("email=a%2Bb%40c.com&password=p%26q"));
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let (api, transport, store) = client();
        transport.respond(200, r#"{"success":true}"#);
        let err = block_on(api.login(&Credentials::new("a@b.com", "x"))).unwrap_err();
        assert_eq!(err.to_string(), "No token received from server");
        assert_eq!(store.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_rejected_login_keeps_store_untouched() {
        let (api, transport, store) = client();
        transport.respond(401, r#"{"detail":"Incorrect email or password"}"#);
        let err = block_on(api.login(&Credentials::new("a@b.com", "bad"))).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect email or password");
        assert_eq!(store.get(TOKEN_KEY), None);
    }

    #[test]
    fn test_logout_clears_token_and_cookie_even_if_server_fails() {
        let (api, transport, store) = client();
        store.set(TOKEN_KEY, "t1").unwrap();
        store.set_cookie(TOKEN_COOKIE, "t1");
        transport.fail(ApiError::Network("offline".to_string()));

        block_on(api.logout());

        let req = transport.last_request();
        assert_eq!(req.url, "http://api.test/v1/auth/logout");
        assert_eq!(req.header_value("Authorization"), Some("Bearer t1"));
        assert_eq!(store.get(TOKEN_KEY), None);
        assert_eq!(store.cookie(TOKEN_COOKIE), None);
    }

    #[test]
    fn test_logout_without_token_skips_server() {
        let (api, transport, _) = client();
        block_on(api.logout());
        assert!(transport.requests().is_empty());
    }
}
