//! ragrank-query - Passage ranking pipeline
//!
//! This crate turns the raw passage hits of a search backend into a short,
//! ordered list of consolidated passages for a prompt builder.
//!
//! # Stages
//!
//! - [`score`]: weighted heuristic over confidence, length, file type and title
//! - [`group_by_source`] / [`merge_group`]: one passage per source document,
//!   with page-annotated excerpts
//! - [`arrange`] / [`rank`]: score, group, merge, re-score, sort
//! - [`filter_quality`]: minimum length and maximum count
//! - [`normalize_query`]: validation of a model-rewritten search query
//!
//! All stages are pure and synchronous. [`RetrievalEngine`] wires them
//! around a search backend and a query rewriter.
//!
//! # Example
//!
//! ```rust
//! use ragrank_query::{arrange, filter_quality};
//! use ragrank_core::{Confidence, Passage, ScoringConfig};
//!
//! let passages = vec![
//!     Passage::new("doc1", "Lambda runs code without servers.").with_confidence(Confidence::High),
//!     Passage::new("doc2", "Short.").with_confidence(Confidence::Low),
//! ];
//! let arranged = arrange(passages, &ScoringConfig::default());
//! let kept = filter_quality(arranged, 10, 5);
//! assert_eq!(kept.len(), 1);
//! ```

mod engine;
mod filter;
mod merge;
mod metrics;
mod normalize;
mod pipeline;
mod rewriter;
mod scoring;

pub use engine::{RetrievalEngine, TurnOutcome};
pub use filter::{filter_quality, filter_with_config};
pub use merge::{group_by_source, merge_group, SourceGroup, EXCERPT_SEPARATOR};
pub use metrics::{summarize, NoopMetricsSink, TracingMetricsSink};
pub use normalize::{normalize, normalize_query, NormalizedQuery, QueryOutcome, INSUFFICIENT_QUERY};
pub use pipeline::{arrange, rank, rank_by_score};
pub use rewriter::{FixedRewriter, PassthroughRewriter};
pub use scoring::score;

// Re-export for convenience
pub use ragrank_core::{Passage, RankedPassage, ScoringConfig};
