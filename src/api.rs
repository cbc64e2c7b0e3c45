//! Backend API Wrappers
//!
//! Frontend bindings to the task backend. Errors come back as display-ready
//! strings for inline rendering.

use task_client::{
    ApiClient, ClientConfig, NewTask, ReqwestTransport, SessionManager, Task, TaskUpdate, DEFAULT_BASE_URL,
};
use uuid::Uuid;

use crate::browser::BrowserStore;

pub type Api = ApiClient<ReqwestTransport, BrowserStore>;
pub type Session = SessionManager<ReqwestTransport, BrowserStore>;

thread_local! {
    static CLIENT: Api = ApiClient::new(config(), ReqwestTransport::new(), BrowserStore);
}

fn config() -> ClientConfig {
    ClientConfig::from_env().unwrap_or_else(|e| {
        log::error!("[API] {}; falling back to {}", e, DEFAULT_BASE_URL);
        ClientConfig::default()
    })
}

/// The page-wide client, built on first use. Clones share its connection pool.
pub fn client() -> Api {
    CLIENT.with(Api::clone)
}

pub fn session() -> Session {
    SessionManager::new(client())
}

// ========================
// Tasks
// ========================

pub async fn list_tasks() -> Result<Vec<Task>, String> {
    client()
        .list_tasks()
        .await
        .map(|list| list.tasks)
        .map_err(|e| e.to_string())
}

pub async fn create_task(task: NewTask) -> Result<Task, String> {
    client().create_task(&task).await.map_err(|e| e.to_string())
}

pub async fn update_task(id: Uuid, update: TaskUpdate) -> Result<Task, String> {
    client().update_task(id, &update).await.map_err(|e| e.to_string())
}

pub async fn delete_task(id: Uuid) -> Result<(), String> {
    client().delete_task(id).await.map_err(|e| e.to_string())
}

pub async fn toggle_task(id: Uuid) -> Result<Task, String> {
    client()
        .toggle_task_completion(id)
        .await
        .map_err(|e| e.to_string())
}
