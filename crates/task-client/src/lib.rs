//! Taskflow Client
//!
//! Framework-agnostic half of the frontend: REST calls to the task backend,
//! session persistence, and cross-tab session sync.
//!
//! - `client`/`auth`: HTTP wrappers over a pluggable `Transport`
//! - `storage`: key-value persistence behind `KeyValueStore`
//! - `session`: Anonymous/Authenticated state machine

mod auth;
mod client;
mod config;
mod error;
mod models;
mod session;
mod storage;
mod transport;

pub use auth::{extract_token, extract_user, AuthResponse, Credentials};
pub use client::ApiClient;
pub use config::{AuthBodyFormat, ClientConfig, ConfigError, DEFAULT_BASE_URL};
pub use error::{message_from_body, ApiError};
pub use models::{validate_title, NewTask, Task, TaskList, TaskUpdate, User, MAX_TITLE_LEN};
pub use session::{AuthState, SessionManager};
pub use storage::{
    ChangeListener, KeyValueStore, MemoryStore, StorageChange, Subscription, TOKEN_COOKIE, TOKEN_KEY, USER_KEY,
};
pub use transport::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};
