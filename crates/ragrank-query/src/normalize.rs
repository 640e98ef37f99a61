//! Validation of model-produced search queries.

use ragrank_core::{FallbackStrategy, QueryConfig};

/// Literal a rewriter returns when it declines to produce a query.
pub const INSUFFICIENT_QUERY: &str = "INSUFFICIENT_QUERY";

/// Which rule decided the normalized query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The trimmed rewrite was used as-is.
    Accepted,
    /// The rewriter returned the sentinel; the original query was used.
    Insufficient,
    /// The rewrite was below the minimum length; the original query was used.
    TooShort,
    /// The rewrite was above the maximum length and was cut.
    Truncated,
}

impl QueryOutcome {
    /// Whether the original query was used instead of the rewrite.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Insufficient | Self::TooShort)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Insufficient => "insufficient",
            Self::TooShort => "too_short",
            Self::Truncated => "truncated",
        }
    }
}

impl std::fmt::Display for QueryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A normalized query together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub query: String,
    pub outcome: QueryOutcome,
}

/// Normalize a rewritten query, reporting which rule applied.
///
/// Rules, in order:
/// 1. a rewrite trimming to `INSUFFICIENT_QUERY` falls back,
/// 2. a rewrite shorter than `min_length` characters falls back,
/// 3. a rewrite longer than `max_length` characters is truncated,
/// 4. anything else is used trimmed.
///
/// Never fails. The result is non-empty whenever `original` is.
pub fn normalize_query(raw: &str, original: &str, config: &QueryConfig) -> NormalizedQuery {
    let trimmed = raw.trim();
    let length = trimmed.chars().count();

    if trimmed == INSUFFICIENT_QUERY {
        return fallback(original, config, QueryOutcome::Insufficient);
    }

    if trimmed.is_empty() || length < config.min_length {
        return fallback(original, config, QueryOutcome::TooShort);
    }

    if length > config.max_length {
        return NormalizedQuery {
            query: trimmed.chars().take(config.max_length).collect(),
            outcome: QueryOutcome::Truncated,
        };
    }

    NormalizedQuery {
        query: trimmed.to_string(),
        outcome: QueryOutcome::Accepted,
    }
}

/// Normalize a rewritten query, returning only the query text.
pub fn normalize(raw: &str, original: &str, config: &QueryConfig) -> String {
    normalize_query(raw, original, config).query
}

fn fallback(original: &str, config: &QueryConfig, outcome: QueryOutcome) -> NormalizedQuery {
    let query = match config.fallback {
        FallbackStrategy::Original => original.to_string(),
    };
    NormalizedQuery { query, outcome }
}
