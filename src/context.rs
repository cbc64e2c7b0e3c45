//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;
use task_client::{AuthState, KeyValueStore, User};

use crate::api;
use crate::browser::BrowserStore;

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to reload tasks from backend - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to reload tasks from backend - write
    set_reload_trigger: WriteSignal<u32>,
}

impl AppContext {
    pub fn new(reload_trigger: (ReadSignal<u32>, WriteSignal<u32>)) -> Self {
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
        }
    }

    /// Trigger a reload of tasks
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }
}

/// Reactive session: who is signed in, and whether a login is running.
///
/// Lives for the whole page. Created once at the root with `init`.
#[derive(Clone, Copy)]
pub struct AuthContext {
    state: RwSignal<AuthState>,
    is_loading: RwSignal<bool>,
}

impl AuthContext {
    /// Restore the persisted session and follow session changes made in other tabs.
    pub fn init() -> Self {
        let state = RwSignal::new(api::session().restore());

        BrowserStore
            .subscribe(Box::new(move |change| {
                if let Some(next) = AuthState::from_change(&change) {
                    log::info!("[AUTH] Session changed in another tab (signed in: {})", next.is_authenticated());
                    state.set(next);
                }
            }))
            .keep_alive();

        Self {
            state,
            is_loading: RwSignal::new(false),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user().cloned())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(AuthState::is_authenticated)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading.get()
    }

    /// On failure the state is left as it was and the message is returned.
    pub async fn login(&self, email: String, password: String) -> Result<(), String> {
        self.is_loading.set(true);
        let result = api::session().login(&email, &password).await;
        self.is_loading.set(false);
        self.apply(result)
    }

    pub async fn register(&self, email: String, password: String) -> Result<(), String> {
        self.is_loading.set(true);
        let result = api::session().register(&email, &password).await;
        self.is_loading.set(false);
        self.apply(result)
    }

    /// Signs out locally right away; the server call finishes in the background.
    pub fn logout(&self) {
        let session = api::session();
        let token = session.sign_out_locally();
        self.state.set(AuthState::Anonymous);
        if let Some(token) = token {
            spawn_local(async move {
                session.client().revoke_token(&token).await;
            });
        }
    }

    fn apply(&self, result: Result<User, task_client::ApiError>) -> Result<(), String> {
        match result {
            Ok(user) => {
                self.state.set(AuthState::Authenticated(user));
                Ok(())
            }
            Err(e) => {
                log::error!("[AUTH] {}", e);
                Err(e.to_string())
            }
        }
    }
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
