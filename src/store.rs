//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;
use task_client::Task;
use uuid::Uuid;

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Tasks of the signed-in user, newest first as returned by the backend
    pub tasks: Vec<Task>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_set_tasks(store: &AppStore, tasks: Vec<Task>) {
    *store.tasks().write() = tasks;
}

/// Insert a freshly created task at the top
pub fn store_add_task(store: &AppStore, task: Task) {
    add_task(&mut store.tasks().write(), task);
}

/// Replace a task by ID with the server's version
pub fn store_update_task(store: &AppStore, updated: Task) {
    replace_task(&mut store.tasks().write(), updated);
}

pub fn store_remove_task(store: &AppStore, task_id: Uuid) {
    remove_task(&mut store.tasks().write(), task_id);
}

fn add_task(tasks: &mut Vec<Task>, task: Task) {
    tasks.retain(|t| t.id != task.id);
    tasks.insert(0, task);
}

fn replace_task(tasks: &mut [Task], updated: Task) {
    if let Some(task) = tasks.iter_mut().find(|t| t.id == updated.id) {
        *task = updated;
    }
}

fn remove_task(tasks: &mut Vec<Task>, task_id: Uuid) {
    tasks.retain(|t| t.id != task_id);
}

/// "3 tasks, 1 completed"
pub fn task_summary(tasks: &[Task]) -> String {
    let completed = tasks.iter().filter(|t| t.completed).count();
    let noun = if tasks.len() == 1 { "task" } else { "tasks" };
    format!("{} {}, {} completed", tasks.len(), noun, completed)
}
