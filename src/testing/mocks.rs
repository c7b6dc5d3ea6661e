//! Mock implementations for testing
//!
//! Provides mock CompletionClient and DocumentStore implementations so the
//! planning, execution, and judging layers can be exercised without external
//! dependencies.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{CompletionClient, CompletionRequest, LlmError};
use crate::retrieval::{Document, DocumentStore, RetrievalError};

/// Completion client that replays a scripted sequence of responses.
///
/// Each call to [`CompletionClient::complete`] consumes the next entry; a
/// call past the end of the script fails with [`LlmError::RequestFailed`].
/// The most recent request is captured for assertion via [`last_request`]
/// and [`last_prompt`].
///
/// [`last_request`]: MockCompletionClient::last_request
/// [`last_prompt`]: MockCompletionClient::last_prompt
pub struct MockCompletionClient {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockCompletionClient {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            last_request: Mutex::new(None),
        }
    }

    /// Client whose every call fails, for degraded-path tests.
    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    /// The most recent `complete` request, if any.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        match self.last_request.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The prompt from the most recent `complete` call, if any.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_request().map(|r| r.prompt)
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        match self.last_request.lock() {
            Ok(mut guard) => *guard = Some(request.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(request.clone()),
        }

        let next = match self.responses.lock() {
            Ok(mut guard) => guard.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        match next {
            Some(response) => response,
            None => Err(LlmError::RequestFailed(
                "mock response script exhausted".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }
}

/// Document store that returns a fixed set of documents for every query.
#[derive(Default)]
pub struct MockDocumentStore {
    documents: Vec<Document>,
    fail: bool,
}

impl MockDocumentStore {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            fail: false,
        }
    }

    /// Store whose searches always fail, for degraded-retrieval tests.
    pub fn failing() -> Self {
        Self {
            documents: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn search(&self, _query: &str, k: usize) -> Result<Vec<Document>, RetrievalError> {
        if self.fail {
            return Err(RetrievalError::Unavailable(
                "mock store configured to fail".to_string(),
            ));
        }
        Ok(self.documents.iter().take(k).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client_replays_script_in_order() {
        let client = MockCompletionClient::new(vec![
            Ok("first".to_string()),
            Err(LlmError::RequestFailed("boom".to_string())),
        ]);

        let first = client.complete(CompletionRequest::new("a")).await;
        assert_eq!(first.as_deref(), Ok("first"));

        let second = client.complete(CompletionRequest::new("b")).await;
        assert!(second.is_err());

        // Script exhausted
        let third = client.complete(CompletionRequest::new("c")).await;
        assert!(matches!(third, Err(LlmError::RequestFailed(_))));

        assert_eq!(client.last_prompt().as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_mock_client_captures_request_settings() {
        let client = MockCompletionClient::new(vec![Ok("ok".to_string())]);
        let _ = client
            .complete(
                CompletionRequest::new("p")
                    .with_temperature(0.3)
                    .with_max_tokens(64),
            )
            .await;

        let request = client.last_request().unwrap();
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(64));
    }

    #[tokio::test]
    async fn test_mock_store_caps_at_k() {
        let store = MockDocumentStore::new(vec![
            Document::new("d1", "A").with_source("leaflet-a"),
            Document::new("d2", "B").with_source("leaflet-b"),
            Document::new("d3", "C").with_source("leaflet-c"),
        ]);

        let hits = store.search("anything", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "d1");
    }
}
