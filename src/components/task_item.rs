//! Task Item Component
//!
//! One task row with inline editing, completion toggle and delete.

use leptos::prelude::*;
use leptos::task::spawn_local;
use task_client::Task;
use uuid::Uuid;

use crate::api;
use crate::components::DeleteConfirmButton;
use crate::view_model::{ItemMode, TaskItemState};

/// A single task. Reports confirmed changes upward; never mutates optimistically.
#[component]
pub fn TaskItem(
    task: Task,
    #[prop(into)] on_update: Callback<Task>,
    #[prop(into)] on_delete: Callback<Uuid>,
) -> impl IntoView {
    let id = task.id;
    let state = RwSignal::new(TaskItemState::new(task));

    // Memos so typing into drafts does not rebuild the row
    let mode = Memo::new(move |_| state.with(|s| s.mode));
    let busy = Memo::new(move |_| state.with(|s| s.busy));
    let error = Memo::new(move |_| state.with(|s| s.error.clone()));

    let toggle = move |_| {
        let mut started = false;
        state.update(|s| started = s.start_request());
        if !started {
            return;
        }
        spawn_local(async move {
            let result = api::toggle_task(id).await;
            if let Err(e) = &result {
                log::error!("[TASK] Error toggling task completion: {}", e);
            }
            let mut confirmed = None;
            state.update(|s| confirmed = s.finish_toggle(result));
            if let Some(task) = confirmed {
                on_update.run(task);
            }
        });
    };

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let mut update = None;
        state.update(|s| {
            if let Some(u) = s.prepare_update() {
                if s.start_request() {
                    update = Some(u);
                }
            }
        });
        let Some(update) = update else { return };

        spawn_local(async move {
            let result = api::update_task(id, update).await;
            if let Err(e) = &result {
                log::error!("[TASK] Error updating task: {}", e);
            }
            let mut confirmed = None;
            state.update(|s| confirmed = s.finish_update(result));
            if let Some(task) = confirmed {
                on_update.run(task);
            }
        });
    };

    let delete = Callback::new(move |_: ()| {
        let mut started = false;
        state.update(|s| started = s.start_request());
        if !started {
            return;
        }
        spawn_local(async move {
            let result = api::delete_task(id).await;
            if let Err(e) = &result {
                log::error!("[TASK] Error deleting task: {}", e);
            }
            let mut deleted = false;
            state.update(|s| deleted = s.finish_delete(result));
            if deleted {
                on_delete.run(id);
            }
        });
    });

    let error_view = move || error.get().map(|msg| view! { <div class="task-error">{msg}</div> });

    let edit_view = move || {
        view! {
            <form class="task-item editing" on:submit=save>
                {error_view}
                <label class="field">
                    "Title"
                    <input
                        type="text"
                        required
                        disabled=move || busy.get()
                        prop:value=move || state.with(|s| s.drafts.title.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            state.update(|s| s.drafts.title = value);
                        }
                    />
                </label>
                <label class="field">
                    "Description"
                    <input
                        type="text"
                        disabled=move || busy.get()
                        prop:value=move || state.with(|s| s.drafts.description.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            state.update(|s| s.drafts.description = value);
                        }
                    />
                </label>
                <label class="completed-toggle">
                    <input
                        type="checkbox"
                        disabled=move || busy.get()
                        prop:checked=move || state.with(|s| s.drafts.completed)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            state.update(|s| s.drafts.completed = checked);
                        }
                    />
                    "Completed"
                </label>
                <div class="task-actions">
                    <button type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Saving..." } else { "Save" }}
                    </button>
                    <button
                        type="button"
                        disabled=move || busy.get()
                        on:click=move |_| state.update(|s| s.cancel_edit())
                    >
                        "Cancel"
                    </button>
                </div>
            </form>
        }
    };

    let read_view = move || {
        let completed = move || state.with(|s| s.task.completed);
        view! {
            <div class=move || if completed() { "task-item completed" } else { "task-item" }>
                {error_view}
                <button
                    class="task-check"
                    title=move || if completed() { "Mark as not done" } else { "Mark as done" }
                    disabled=move || busy.get()
                    on:click=toggle
                >
                    {move || if completed() { "✓" } else { "" }}
                </button>
                <div class="task-body">
                    <h3 class="task-title">{move || state.with(|s| s.task.title.clone())}</h3>
                    {move || state.with(|s| s.task.description.clone()).map(|d| view! {
                        <p class="task-description">{d}</p>
                    })}
                    <div class="task-meta">
                        {move || state.with(|s| s.task.created_at).map(|at| view! {
                            <span>"Created: " {at.format("%Y-%m-%d").to_string()}</span>
                        })}
                        <Show when=completed>
                            <span class="badge-completed">"Completed"</span>
                        </Show>
                    </div>
                </div>
                <div class="task-actions">
                    <button
                        class="task-btn edit"
                        disabled=move || busy.get()
                        on:click=move |_| state.update(|s| s.begin_edit())
                    >
                        "Edit"
                    </button>
                    <DeleteConfirmButton disabled=busy on_confirm=delete />
                </div>
            </div>
        }
    };

    move || match mode.get() {
        ItemMode::Editing => edit_view().into_any(),
        ItemMode::Viewing => read_view().into_any(),
    }
}
