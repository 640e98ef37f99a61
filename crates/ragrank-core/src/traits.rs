//! Traits for the collaborators surrounding the ranking core.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Passage, TurnMetrics};

/// Search backend returning raw passage hits for a query.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Retrieve passages for a search query.
    async fn retrieve(&self, query: &str) -> Result<Vec<Passage>>;
}

/// Produces a search query from the conversation so far.
///
/// Implementations typically ask a language model. The returned text is
/// raw model output and is normalized before use; a rewriter may return
/// `"INSUFFICIENT_QUERY"` to decline.
#[async_trait]
pub trait QueryRewriter: Send + Sync {
    /// Rewrite `latest` given earlier user queries (oldest first).
    async fn rewrite(&self, history: &[String], latest: &str) -> Result<String>;
}

/// Receives one summary record per retrieval turn.
pub trait MetricsSink: Send + Sync {
    fn record(&self, metrics: &TurnMetrics);
}
