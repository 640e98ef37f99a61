//! Retrieval turn: rewrite the query, search, rank, filter, report.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use ragrank_core::{
    MetricsSink, Passage, PassageDigest, QueryRewriter, RankConfig, RankedPassage, Result,
    SearchBackend, TurnMetrics,
};

use crate::filter::filter_with_config;
use crate::metrics::{summarize, TracingMetricsSink};
use crate::normalize::{normalize_query, QueryOutcome};
use crate::pipeline::rank;

/// Result of one retrieval turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Query sent to the search backend.
    pub query: String,

    /// Normalization rule applied to the rewrite; `None` if the rewriter failed.
    pub normalization: Option<QueryOutcome>,

    /// Ranked, merged and filtered passages, best first. May be empty.
    pub passages: Vec<RankedPassage>,

    /// Summary record, already handed to the metrics sink.
    pub metrics: TurnMetrics,
}

/// Runs retrieval turns against a search backend.
///
/// The engine owns no mutable state; concurrent turns need no coordination.
pub struct RetrievalEngine {
    /// Search backend.
    backend: Arc<dyn SearchBackend>,

    /// Query rewriter.
    rewriter: Arc<dyn QueryRewriter>,

    /// Metrics sink.
    metrics: Arc<dyn MetricsSink>,

    config: RankConfig,
}

impl RetrievalEngine {
    /// Create an engine that reports metrics through `tracing`.
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        rewriter: Arc<dyn QueryRewriter>,
        config: RankConfig,
    ) -> Self {
        let metrics = Arc::new(TracingMetricsSink::new(config.metrics.enabled));
        Self {
            backend,
            rewriter,
            metrics,
            config,
        }
    }

    /// Replace the metrics sink.
    pub fn with_metrics_sink(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.metrics = sink;
        self
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Decide what to search for.
    ///
    /// `history` holds earlier user queries, oldest first. A rewriter
    /// failure falls back to `latest`.
    pub async fn resolve_query(
        &self,
        history: &[String],
        latest: &str,
    ) -> (String, Option<QueryOutcome>) {
        let raw = match self.rewriter.rewrite(history, latest).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Query optimization error: {}", e);
                return (latest.to_string(), None);
            }
        };

        let normalized = normalize_query(&raw, latest, &self.config.query);
        match normalized.outcome {
            QueryOutcome::Accepted => {}
            QueryOutcome::Insufficient => {
                warn!(original = latest, "Query optimization returned INSUFFICIENT_QUERY");
            }
            QueryOutcome::TooShort => {
                warn!(
                    optimized = raw.trim(),
                    original = latest,
                    min_length = self.config.query.min_length,
                    "Query optimization returned too short query"
                );
            }
            QueryOutcome::Truncated => {
                warn!(
                    optimized = raw.trim(),
                    max_length = self.config.query.max_length,
                    "Query optimization returned too long query"
                );
            }
        }

        info!(original = latest, optimized = %normalized.query, "Optimized query");

        (normalized.query, Some(normalized.outcome))
    }

    /// Rank, merge and filter raw passages with the configured defaults.
    pub fn select(&self, passages: Vec<Passage>) -> Vec<RankedPassage> {
        let ranked = rank(passages, &self.config.document.scoring);
        filter_with_config(ranked, &self.config.document)
    }

    /// Run one retrieval turn.
    ///
    /// Search backend errors are returned as-is; ranking is skipped.
    pub async fn run_turn(&self, history: &[String], latest: &str) -> Result<TurnOutcome> {
        let start = Instant::now();

        let (query, normalization) = self.resolve_query(history, latest).await;

        let retrieved = self.backend.retrieve(&query).await?;
        let documents_retrieved = retrieved.len();

        let passages = self.select(retrieved);

        let metrics = summarize(
            query != latest,
            documents_retrieved,
            &passages,
            start.elapsed(),
        );
        self.metrics.record(&metrics);

        for digest in passages.iter().map(PassageDigest::from) {
            debug!(?digest, "Retrieved document");
        }

        Ok(TurnOutcome {
            query,
            normalization,
            passages,
            metrics,
        })
    }
}
