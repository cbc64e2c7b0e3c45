//! REST Client
//!
//! Bearer-token requests against the task backend, with error bodies
//! normalized into `ApiError` and `{task}` envelopes unwrapped.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{NewTask, Task, TaskEnvelope, TaskList, TaskUpdate};
use crate::storage::{KeyValueStore, TOKEN_KEY};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

#[derive(Clone)]
pub struct ApiClient<T, S> {
    config: ClientConfig,
    transport: T,
    store: S,
}

impl<T: Transport, S: KeyValueStore> ApiClient<T, S> {
    pub fn new(config: ClientConfig, transport: T, store: S) -> Self {
        Self {
            config,
            transport,
            store,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Send an authenticated JSON request and decode the response.
    ///
    /// 204 and empty bodies decode as `{}`.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<String>,
    ) -> Result<R, ApiError> {
        let url = self.config.endpoint(endpoint);
        let token = self.token();

        log::debug!("[API] {} {} (token available: {})", method.as_str(), url, token.is_some());

        let mut request = HttpRequest::new(method, url).header("Content-Type", "application/json");
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = self.transport_send(request).await?;
        if !response.is_success() {
            let err = ApiError::from_response(response.status, &response.status_text, &response.body);
            log::warn!("[API] {} {} failed: {}", method.as_str(), endpoint, err);
            return Err(err);
        }

        decode_body(response.status, &response.body)
    }

    pub(crate) async fn transport_send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport.send(request).await
    }

    async fn send_json<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let json = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.request(method, endpoint, Some(json)).await
    }

    // ========================
    // Tasks
    // ========================

    pub async fn list_tasks(&self) -> Result<TaskList, ApiError> {
        self.request(Method::Get, "/tasks", None).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        task.validate()?;
        let envelope: TaskEnvelope = self.send_json(Method::Post, "/tasks", task).await?;
        Ok(envelope.task)
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task, ApiError> {
        let envelope: TaskEnvelope = self.request(Method::Get, &format!("/tasks/{}", id), None).await?;
        Ok(envelope.task)
    }

    pub async fn update_task(&self, id: Uuid, update: &TaskUpdate) -> Result<Task, ApiError> {
        update.validate()?;
        let envelope: TaskEnvelope = self
            .send_json(Method::Put, &format!("/tasks/{}", id), update)
            .await?;
        Ok(envelope.task)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .request(Method::Delete, &format!("/tasks/{}", id), None)
            .await?;
        Ok(())
    }

    pub async fn toggle_task_completion(&self, id: Uuid) -> Result<Task, ApiError> {
        let envelope: TaskEnvelope = self
            .request(Method::Patch, &format!("/tasks/{}/toggle-completion", id), None)
            .await?;
        Ok(envelope.task)
    }
}

pub(crate) fn decode_body<R: DeserializeOwned>(status: u16, body: &str) -> Result<R, ApiError> {
    let body = if status == 204 || body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::transport::mock::MockTransport;
    use futures::executor::block_on;

    pub const TASK_ID: &str = "3f1c2a8e-9d4b-4c1e-8f2a-1b2c3d4e5f60";

    pub fn task_json(completed: bool) -> String {
        format!(
            r#"{{"id":"{}","title":"Buy milk","description":"2 liters","completed":{},"user_id":"0b7e3a52-5f7c-4d4e-9a1b-2c3d4e5f6071","created_at":"2024-05-01T10:20:30","updated_at":"2024-05-01T10:20:30"}}"#,
            TASK_ID, completed
        )
    }

    pub fn client() -> (ApiClient<MockTransport, MemoryStore>, MockTransport, MemoryStore) {
        let transport = MockTransport::new();
        let store = MemoryStore::new();
        let config = ClientConfig::new("http://api.test/v1").unwrap();
        (ApiClient::new(config, transport.clone(), store.clone()), transport, store)
    }

    fn task_id() -> Uuid {
        Uuid::parse_str(TASK_ID).unwrap()
    }

    #[test]
    fn test_bearer_header_only_with_token() {
        let (api, transport, store) = client();
        transport.respond(200, r#"{"tasks":[]}"#);
        block_on(api.list_tasks()).unwrap();
        let req = transport.last_request();
        assert_eq!(req.header_value("authorization"), None);
        assert_eq!(req.header_value("content-type"), Some("application/json"));

        store.set(TOKEN_KEY, "t1").unwrap();
        transport.respond(200, r#"{"tasks":[]}"#);
        block_on(api.list_tasks()).unwrap();
        assert_eq!(transport.last_request().header_value("Authorization"), Some("Bearer t1"));
    }

    #[test]
    fn test_list_tasks() {
        let (api, transport, _) = client();
        transport.respond(200, &format!(r#"{{"tasks":[{}],"pagination":{{"total":1}}}}"#, task_json(false)));

        let list = block_on(api.list_tasks()).unwrap();
        assert_eq!(list.tasks.len(), 1);
        assert_eq!(list.tasks[0].title, "Buy milk");
        assert!(list.pagination.is_some());

        let req = transport.last_request();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.url, "http://api.test/v1/tasks");
    }

    #[test]
    fn test_routes_and_verbs() {
        let (api, transport, _) = client();
        let envelope = format!(r#"{{"task":{}}}"#, task_json(true));
        transport
            .respond(200, &envelope)
            .respond(200, &envelope)
            .respond(200, &envelope)
            .respond(204, "");

        block_on(api.get_task(task_id())).unwrap();
        block_on(api.update_task(task_id(), &TaskUpdate { completed: Some(true), ..Default::default() })).unwrap();
        let toggled = block_on(api.toggle_task_completion(task_id())).unwrap();
        assert!(toggled.completed);
        block_on(api.delete_task(task_id())).unwrap();

        let sent: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.url))
            .collect();
        let base = format!("http://api.test/v1/tasks/{}", TASK_ID);
        assert_eq!(
            sent,
            vec![
                (Method::Get, base.clone()),
                (Method::Put, base.clone()),
                (Method::Patch, format!("{}/toggle-completion", base)),
                (Method::Delete, base),
            ]
        );
        assert_eq!(transport.requests()[1].body.as_deref(), Some(r#"{"completed":true}"#));
    }

    #[test]
    fn test_create_task_sends_payload() {
        let (api, transport, _) = client();
        transport.respond(201, &format!(r#"{{"task":{}}}"#, task_json(false)));

        let created = block_on(api.create_task(&NewTask::new(" Buy milk ", "2 liters"))).unwrap();
        assert_eq!(created.id, task_id());
        assert_eq!(
            transport.last_request().body.as_deref(),
            Some(r#"{"title":"Buy milk","description":"2 liters"}"#)
        );
    }

    #[test]
    fn test_invalid_title_never_hits_network() {
        let (api, transport, _) = client();
        let err = block_on(api.create_task(&NewTask::new("  ", ""))).unwrap_err();
        assert_eq!(err, ApiError::Validation("Title is required".to_string()));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_204_is_empty_success() {
        let (api, transport, _) = client();
        transport.respond(204, "");
        let value: serde_json::Value = block_on(api.request(Method::Delete, "/tasks/x", None)).unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[test]
    fn test_error_body_is_normalized() {
        let (api, transport, _) = client();
        transport.respond(404, r#"{"detail":"Task not found"}"#);
        let err = block_on(api.get_task(task_id())).unwrap_err();
        assert_eq!(err.to_string(), "Task not found");
        assert_eq!(err.status(), Some(404));

        transport.respond(500, "Internal failure");
        let err = block_on(api.list_tasks()).unwrap_err();
        assert_eq!(err.to_string(), "Internal Server Error");
    }

    #[test]
    fn test_network_failure_propagates() {
        let (api, transport, _) = client();
        transport.fail(ApiError::Network("Failed to fetch".to_string()));
        let err = block_on(api.list_tasks()).unwrap_err();
        assert_eq!(err.to_string(), "Network error: Failed to fetch");
    }
}
