//! Per-turn metrics derived from pipeline outputs.

use std::time::Duration;

use tracing::info;

use ragrank_core::{now_millis, MetricsSink, RankedPassage, TurnMetrics};

/// Build the summary record for one turn.
///
/// `average_score` is `None` when no passage survived filtering.
pub fn summarize(
    query_optimized: bool,
    documents_retrieved: usize,
    survivors: &[RankedPassage],
    elapsed: Duration,
) -> TurnMetrics {
    let average_score = if survivors.is_empty() {
        None
    } else {
        let total: f64 = survivors.iter().map(|r| r.score).sum();
        Some(total / survivors.len() as f64)
    };

    TurnMetrics {
        query_optimized,
        documents_retrieved,
        documents_after_filtering: survivors.len(),
        average_score,
        processing_time_ms: elapsed.as_millis() as u64,
        timestamp_ms: now_millis(),
    }
}

/// Logs each record through `tracing` at info level.
#[derive(Debug, Clone)]
pub struct TracingMetricsSink {
    enabled: bool,
}

impl TracingMetricsSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for TracingMetricsSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MetricsSink for TracingMetricsSink {
    fn record(&self, metrics: &TurnMetrics) {
        if !self.enabled {
            return;
        }

        info!(
            query_optimized = metrics.query_optimized,
            documents_retrieved = metrics.documents_retrieved,
            documents_after_filtering = metrics.documents_after_filtering,
            average_score = ?metrics.average_score,
            processing_time_ms = metrics.processing_time_ms,
            timestamp_ms = metrics.timestamp_ms,
            "RAG metrics"
        );
    }
}

/// Discards every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record(&self, _metrics: &TurnMetrics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragrank_core::Passage;

    fn ranked(score: f64) -> RankedPassage {
        RankedPassage {
            score,
            passage: Passage::new("a", "content"),
        }
    }

    #[test]
    fn test_summarize_average() {
        let survivors = vec![ranked(6.5), ranked(4.0), ranked(3.0)];
        let metrics = summarize(true, 5, &survivors, Duration::from_millis(42));

        assert!(metrics.query_optimized);
        assert_eq!(metrics.documents_retrieved, 5);
        assert_eq!(metrics.documents_after_filtering, 3);
        assert_eq!(metrics.average_score, Some(13.5 / 3.0));
        assert_eq!(metrics.processing_time_ms, 42);
        assert!(metrics.timestamp_ms > 0);
    }

    #[test]
    fn test_summarize_no_survivors() {
        let metrics = summarize(false, 3, &[], Duration::ZERO);
        assert_eq!(metrics.documents_after_filtering, 0);
        assert_eq!(metrics.average_score, None);
    }

    #[test]
    fn test_sinks_accept_records() {
        let metrics = summarize(false, 0, &[], Duration::ZERO);
        TracingMetricsSink::default().record(&metrics);
        TracingMetricsSink::new(false).record(&metrics);
        NoopMetricsSink.record(&metrics);
    }
}
