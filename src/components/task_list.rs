//! Task List Component
//!
//! Loads the signed-in user's tasks and renders one `TaskItem` per task.

use leptos::prelude::*;
use leptos::task::spawn_local;
use task_client::Task;
use uuid::Uuid;

use crate::api;
use crate::components::TaskItem;
use crate::context::{use_auth, AppContext};
use crate::store::{
    store_remove_task, store_set_tasks, store_update_task, task_summary, use_app_store, AppStateStoreFields,
};

#[component]
pub fn TaskList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let auth = use_auth();
    let store = use_app_store();

    let (loading, set_loading) = signal(false);
    let (load_error, set_load_error) = signal::<Option<String>>(None);

    // Load tasks when the session or reload trigger changes
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        if !auth.is_authenticated() {
            store_set_tasks(&store, Vec::new());
            return;
        }
        log::debug!("[TASKS] Loading tasks, trigger={}", trigger);
        set_loading.set(true);
        spawn_local(async move {
            match api::list_tasks().await {
                Ok(tasks) => {
                    log::debug!("[TASKS] Loaded {} tasks", tasks.len());
                    set_load_error.set(None);
                    store_set_tasks(&store, tasks);
                }
                Err(e) => {
                    log::error!("[TASKS] Failed to load tasks: {}", e);
                    set_load_error.set(Some(e));
                }
            }
            set_loading.set(false);
        });
    });

    let on_update = Callback::new(move |task: Task| store_update_task(&store, task));
    let on_delete = Callback::new(move |id: Uuid| store_remove_task(&store, id));

    let is_empty = move || store.tasks().read().is_empty();

    view! {
        <section class="task-list">
            {move || load_error.get().map(|e| view! {
                <div class="error-banner">
                    {e}
                    <button class="retry-btn" on:click=move |_| ctx.reload()>"Retry"</button>
                </div>
            })}

            <Show when=move || loading.get() && is_empty()>
                <p class="loading">"Loading tasks..."</p>
            </Show>
            <Show when=move || !loading.get() && is_empty() && load_error.get().is_none()>
                <p class="empty">"No tasks yet. Add one above."</p>
            </Show>

            <For
                each=move || store.tasks().get()
                // Re-create the row whenever the server version changes
                key=|task| (
                    task.id,
                    task.title.clone(),
                    task.description.clone(),
                    task.completed,
                    task.updated_at,
                )
                children=move |task| {
                    view! { <TaskItem task=task on_update=on_update on_delete=on_delete /> }
                }
            />

            <p class="task-count">{move || task_summary(&store.tasks().read())}</p>
        </section>
    }
}
