//! Auth Form Component
//!
//! Login and registration in one form with a mode switch.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_auth;

#[derive(Clone, Copy, PartialEq, Eq)]
enum AuthMode {
    Login,
    Register,
}

#[component]
pub fn AuthForm() -> impl IntoView {
    let auth = use_auth();

    let (mode, set_mode) = signal(AuthMode::Login);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if auth.is_loading() {
            return;
        }
        let email = email.get_untracked();
        let password = password.get_untracked();
        if email.trim().is_empty() || password.is_empty() {
            set_error.set(Some("Email and password are required".to_string()));
            return;
        }

        set_error.set(None);
        let mode = mode.get_untracked();
        spawn_local(async move {
            let result = match mode {
                AuthMode::Login => auth.login(email, password).await,
                AuthMode::Register => auth.register(email, password).await,
            };
            match result {
                Ok(()) => set_password.set(String::new()),
                Err(e) => set_error.set(Some(e)),
            }
        });
    };

    let switch_mode = move |_| {
        set_error.set(None);
        set_mode.update(|m| {
            *m = match m {
                AuthMode::Login => AuthMode::Register,
                AuthMode::Register => AuthMode::Login,
            }
        });
    };

    view! {
        <form class="auth-form" on:submit=submit>
            <h2>{move || match mode.get() {
                AuthMode::Login => "Sign in",
                AuthMode::Register => "Create an account",
            }}</h2>

            {move || error.get().map(|e| view! { <div class="form-error">{e}</div> })}

            <label class="field">
                "Email"
                <input
                    type="email"
                    autocomplete="email"
                    disabled=move || auth.is_loading()
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
            </label>
            <label class="field">
                "Password"
                <input
                    type="password"
                    autocomplete=move || match mode.get() {
                        AuthMode::Login => "current-password",
                        AuthMode::Register => "new-password",
                    }
                    disabled=move || auth.is_loading()
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
            </label>

            <button type="submit" disabled=move || auth.is_loading()>
                {move || match (mode.get(), auth.is_loading()) {
                    (_, true) => "Please wait...",
                    (AuthMode::Login, false) => "Sign in",
                    (AuthMode::Register, false) => "Register",
                }}
            </button>
            <button type="button" class="link-btn" disabled=move || auth.is_loading() on:click=switch_mode>
                {move || match mode.get() {
                    AuthMode::Login => "Need an account? Register",
                    AuthMode::Register => "Already registered? Sign in",
                }}
            </button>
        </form>
    }
}
