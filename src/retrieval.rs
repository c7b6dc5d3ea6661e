//! Evidence documents and the retrieval seam.
//!
//! The vector store itself lives outside this crate; the gate only depends on
//! the [`DocumentStore`] trait and the [`Document`] shape it returns.
//! [`InMemoryStore`] backs the CLI and tests with naive keyword matching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// One retrieved evidence chunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    pub content: String,
    /// Human-readable origin, e.g. the leaflet section title.
    #[serde(default)]
    pub source: String,
    /// Retrieval relevance, higher is better.
    #[serde(default)]
    pub relevance: f64,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Document {
    pub fn new<S: Into<String>>(id: S, content: S) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            source: String::new(),
            relevance: 0.0,
            metadata: HashMap::new(),
        }
    }

    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = source.into();
        self
    }

    /// Format this document as a labeled context block.
    pub fn to_context_block(&self) -> String {
        let header = if self.source.is_empty() {
            "### Document".to_string()
        } else {
            format!("### {}", self.source)
        };
        format!("{header}\n\n{}", self.content)
    }
}

/// Format retrieved documents as one grounding context string.
pub fn format_documents(documents: &[Document]) -> String {
    if documents.is_empty() {
        return "No documents found.".to_string();
    }
    documents
        .iter()
        .map(Document::to_context_block)
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Retrieval errors.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid document data: {0}")]
    InvalidDocument(String),
}

/// Document search capability consumed by the gate.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return up to `k` documents relevant to `query`, best first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrievalError>;
}

/// Keyword-overlap store over a fixed document set.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: Vec<Document>,
}

impl InMemoryStore {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Load documents from a JSON array file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, RetrievalError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RetrievalError::Unavailable(e.to_string()))?;
        let documents: Vec<Document> = serde_json::from_str(&content)
            .map_err(|e| RetrievalError::InvalidDocument(e.to_string()))?;
        Ok(Self::new(documents))
    }

    fn overlap_score(query: &str, content: &str) -> f64 {
        let content_lower = content.to_lowercase();
        let terms: Vec<&str> = query.split_whitespace().collect();
        if terms.is_empty() {
            return 0.0;
        }
        let hits = terms
            .iter()
            .filter(|t| content_lower.contains(&t.to_lowercase()))
            .count();
        hits as f64 / terms.len() as f64
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Document>, RetrievalError> {
        let mut scored: Vec<Document> = self
            .documents
            .iter()
            .map(|d| {
                let mut doc = d.clone();
                doc.relevance = Self::overlap_score(query, &d.content);
                doc
            })
            .filter(|d| d.relevance > 0.0)
            .collect();

        scored.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaflet_docs() -> Vec<Document> {
        vec![
            Document {
                id: "d1".to_string(),
                content: "Paracetamol maximum daily dose is 4 grams for adults.".to_string(),
                source: "Paracetamol - Dosage".to_string(),
                relevance: 0.0,
                metadata: HashMap::new(),
            },
            Document {
                id: "d2".to_string(),
                content: "Ibuprofen should be taken with food.".to_string(),
                source: "Ibuprofen - Administration".to_string(),
                relevance: 0.0,
                metadata: HashMap::new(),
            },
        ]
    }

    #[tokio::test]
    async fn test_search_ranks_by_overlap() {
        let store = InMemoryStore::new(leaflet_docs());
        let results = store.search("paracetamol dose", 5).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "d1");
        assert!(results[0].relevance > 0.0);
    }

    #[tokio::test]
    async fn test_search_respects_k() {
        let store = InMemoryStore::new(leaflet_docs());
        let results = store.search("taken with food dose", 1).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_format_documents_empty() {
        assert_eq!(format_documents(&[]), "No documents found.");
    }

    #[test]
    fn test_format_documents_with_source_headers() {
        let formatted = format_documents(&leaflet_docs());
        assert!(formatted.contains("### Paracetamol - Dosage"));
        assert!(formatted.contains("---"));
        assert!(formatted.contains("Ibuprofen should be taken with food."));
    }
}
