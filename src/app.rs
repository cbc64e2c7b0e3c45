//! Taskflow Frontend App
//!
//! Root component: provides contexts and switches between sign-in and the task list.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{AuthForm, Header, NewTaskForm, TaskList};
use crate::context::{AppContext, AuthContext};
use crate::store::AppState;

#[component]
pub fn App() -> impl IntoView {
    let (reload_trigger, set_reload_trigger) = signal(0u32);

    // Provide context to all children
    provide_context(AppContext::new((reload_trigger, set_reload_trigger)));
    provide_context(Store::new(AppState::new()));

    let auth = AuthContext::init();
    provide_context(auth);

    view! {
        <div class="app-layout">
            <Header />
            <main class="main-content">
                <Show
                    when=move || auth.is_authenticated()
                    fallback=|| view! { <AuthForm /> }
                >
                    <NewTaskForm />
                    <TaskList />
                </Show>
            </main>
        </div>
    }
}
