//! New Task Form Component
//!
//! Form for creating new tasks.

use leptos::prelude::*;
use leptos::task::spawn_local;
use task_client::NewTask;

use crate::api;
use crate::store::{store_add_task, use_app_store};

/// Form for creating a task; the created task goes to the top of the list
#[component]
pub fn NewTaskForm() -> impl IntoView {
    let store = use_app_store();

    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (saving, set_saving) = signal(false);

    let create_task = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let new_task = NewTask::new(&title.get_untracked(), &description.get_untracked());
        if let Err(e) = new_task.validate() {
            set_error.set(Some(e.to_string()));
            return;
        }

        set_error.set(None);
        set_saving.set(true);
        spawn_local(async move {
            match api::create_task(new_task).await {
                Ok(task) => {
                    log::info!("[TASKS] Created task {}", task.id);
                    store_add_task(&store, task);
                    set_title.set(String::new());
                    set_description.set(String::new());
                }
                Err(e) => set_error.set(Some(e)),
            }
            set_saving.set(false);
        });
    };

    view! {
        <form class="new-task-form" on:submit=create_task>
            {move || error.get().map(|e| view! { <div class="form-error">{e}</div> })}
            <div class="new-task-row">
                <input
                    type="text"
                    placeholder="What needs to be done?"
                    maxlength=task_client::MAX_TITLE_LEN.to_string()
                    disabled=move || saving.get()
                    prop:value=move || title.get()
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                />
                <button type="submit" disabled=move || saving.get()>
                    {move || if saving.get() { "Adding..." } else { "Add" }}
                </button>
            </div>
            <input
                type="text"
                class="new-task-description"
                placeholder="Description (optional)"
                disabled=move || saving.get()
                prop:value=move || description.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            />
        </form>
    }
}
