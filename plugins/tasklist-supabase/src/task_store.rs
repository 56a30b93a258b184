//! Task table over the hosted `/rest/v1` endpoints.
//!
//! Every update and delete carries both `id=eq.<id>` and `user_id=eq.<uid>`
//! filters. Row-level access rules on the table remain the real boundary.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use tracing::debug;

use tasklist_core::store::{StoreError, TaskStore};
use tasklist_core::types::{NewTask, Task, TaskPatch, TaskScope};

use crate::auth::SupabaseAuth;
use crate::error::{store_error, store_transport};

const RETURN_REPRESENTATION: &str = "return=representation";

pub struct SupabaseTaskStore {
    client: reqwest::Client,
    auth: Arc<SupabaseAuth>,
}

impl SupabaseTaskStore {
    /// Requests are sent with the access token of `auth`'s current session.
    pub fn new(auth: Arc<SupabaseAuth>) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(auth.config().timeout_secs))
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { client, auth })
    }

    async fn headers(&self) -> Result<HeaderMap, StoreError> {
        let anon_key = &self.auth.config().anon_key;
        let bearer = self
            .auth
            .access_token()
            .await
            .unwrap_or_else(|| anon_key.clone());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(anon_key).map_err(|e| StoreError::Internal(e.to_string()))?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", bearer))
                .map_err(|e| StoreError::Internal(e.to_string()))?,
        );
        headers.insert("Prefer", HeaderValue::from_static(RETURN_REPRESENTATION));
        Ok(headers)
    }

    async fn send_for_rows(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<Task>, StoreError> {
        let response = request
            .headers(self.headers().await?)
            .send()
            .await
            .map_err(store_transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(store_error(status, &text));
        }

        let text = response.text().await.map_err(store_transport)?;
        parse_rows(&text)
    }
}

fn select_query(user_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_string()),
        ("user_id", format!("eq.{}", user_id)),
        ("order", "id.asc".to_string()),
    ]
}

fn scope_query(scope: &TaskScope) -> Vec<(&'static str, String)> {
    vec![
        ("id", format!("eq.{}", scope.id)),
        ("user_id", format!("eq.{}", scope.user_id)),
    ]
}

fn patch_body(patch: &TaskPatch) -> Value {
    match patch {
        TaskPatch::Title(title) => json!({ "title": title }),
        TaskPatch::Completed(completed) => json!({ "completed": completed }),
    }
}

/// An empty body (no representation) counts as zero rows.
fn parse_rows(text: &str) -> Result<Vec<Task>, StoreError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[async_trait]
impl TaskStore for SupabaseTaskStore {
    async fn select_for_user(&self, user_id: &str) -> Result<Vec<Task>, StoreError> {
        let request = self
            .client
            .get(self.auth.config().rest_url())
            .query(&select_query(user_id));
        let rows = self.send_for_rows(request).await?;
        debug!(user_id, rows = rows.len(), "tasks selected");
        Ok(rows)
    }

    async fn insert(&self, task: &NewTask) -> Result<Vec<Task>, StoreError> {
        let request = self
            .client
            .post(self.auth.config().rest_url())
            .json(&[task]);
        self.send_for_rows(request).await
    }

    async fn update(&self, scope: &TaskScope, patch: &TaskPatch) -> Result<u64, StoreError> {
        let request = self
            .client
            .patch(self.auth.config().rest_url())
            .query(&scope_query(scope))
            .json(&patch_body(patch));
        let rows = self.send_for_rows(request).await?;
        debug!(
            task_id = scope.id,
            column = patch.column(),
            rows = rows.len(),
            "task updated"
        );
        Ok(rows.len() as u64)
    }

    async fn delete(&self, scope: &TaskScope) -> Result<u64, StoreError> {
        let request = self
            .client
            .delete(self.auth.config().rest_url())
            .query(&scope_query(scope));
        let rows = self.send_for_rows(request).await?;
        debug!(task_id = scope.id, rows = rows.len(), "task deleted");
        Ok(rows.len() as u64)
    }
}
