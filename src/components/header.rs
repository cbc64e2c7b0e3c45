//! Header Component
//!
//! App title, signed-in user and session controls.

use leptos::prelude::*;

use crate::context::{use_auth, AppContext};

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let auth = use_auth();

    view! {
        <header class="app-header">
            <span class="app-title">"Taskflow"</span>
            {move || auth.user().map(|user| view! {
                <div class="header-controls">
                    <span class="user-email">{user.email}</span>
                    <button class="header-btn" title="Reload tasks" on:click=move |_| ctx.reload()>
                        "⟳"
                    </button>
                    <button class="header-btn logout" on:click=move |_| auth.logout()>
                        "Log out"
                    </button>
                </div>
            })}
        </header>
    }
}
