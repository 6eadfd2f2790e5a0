// In-memory transport for testing
use crate::client::{GraphQLRequest, Transport};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Records every request and answers from a queue of canned responses.
///
/// When the queue is empty it answers `{"data": null}`.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    requests: Arc<Mutex<Vec<(GraphQLRequest, String)>>>,
    responses: Arc<Mutex<VecDeque<Result<serde_json::Value, String>>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the body returned by the next unanswered request
    pub fn respond(&self, body: serde_json::Value) -> &Self {
        self.lock_responses().push_back(Ok(body));
        self
    }

    /// Queue a failure for the next unanswered request
    pub fn fail(&self, message: impl Into<String>) -> &Self {
        self.lock_responses().push_back(Err(message.into()));
        self
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<GraphQLRequest> {
        self.lock_requests()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    /// Bearer tokens seen so far, oldest first
    pub fn tokens(&self) -> Vec<String> {
        self.lock_requests()
            .iter()
            .map(|(_, token)| token.clone())
            .collect()
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<(GraphQLRequest, String)>> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_responses(
        &self,
    ) -> std::sync::MutexGuard<'_, VecDeque<Result<serde_json::Value, String>>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn execute(&self, request: &GraphQLRequest, token: &str) -> Result<serde_json::Value> {
        self.lock_requests()
            .push((request.clone(), token.to_string()));

        match self.lock_responses().pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(serde_json::json!({ "data": null })),
        }
    }
}
