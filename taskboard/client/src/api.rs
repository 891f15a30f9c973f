use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use taskboard_core::{NewTask, Task, TaskId, TaskPatch};

/// Base URL of a locally running task server.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// The four task operations exposed by the server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// All tasks, newest ID first.
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError>;
    /// Creates a task and returns it with its assigned ID.
    async fn create_task(&self, new_task: NewTask) -> Result<Task, ClientError>;
    /// Applies a partial update.
    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<(), ClientError>;
    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// [`TaskApi`] over HTTP + JSON.
#[derive(Clone, Debug)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-success response into the matching [`ClientError`].
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    Err(match status {
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    #[tracing::instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.client.get(self.url("/tasks")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    #[tracing::instrument(skip(self))]
    async fn create_task(&self, new_task: NewTask) -> Result<Task, ClientError> {
        let response = self
            .client
            .post(self.url("/tasks"))
            .json(&new_task)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    #[tracing::instrument(skip(self))]
    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<(), ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/tasks/{id}")))
            .json(&patch)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/tasks/{id}")))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}
