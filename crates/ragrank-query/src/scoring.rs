//! Heuristic relevance scoring for a single passage.

use ragrank_core::{Confidence, LengthBands, Passage, ScoringConfig};

/// Score a passage.
///
/// The score is the sum of four terms, floored at zero:
///
/// - the weight of the confidence label (`LOW` when absent),
/// - one content-length band adjustment,
/// - the configured bonus for the file type, if any,
/// - the title bonus when the title is long enough.
///
/// Pure and deterministic: the pipeline recomputes scores instead of
/// caching them.
pub fn score(passage: &Passage, config: &ScoringConfig) -> f64 {
    let confidence = passage.confidence.unwrap_or(Confidence::Low);
    let mut score = config.confidence_weights.weight(confidence);

    score += length_adjustment(passage.content_length(), &config.length_bands);

    if let Some(bonus) = passage
        .attributes
        .file_type
        .as_ref()
        .and_then(|doc_type| config.document_type_bonus(doc_type))
    {
        score += bonus;
    }

    let descriptive_title = passage
        .title
        .as_deref()
        .is_some_and(|title| title.chars().count() > config.title_min_length);
    if descriptive_title {
        score += config.title_bonus;
    }

    score.max(0.0)
}

/// First matching band wins: long, then medium (both `>`), then short (`<`).
///
/// Lengths between the short and medium thresholds, and lengths exactly
/// on a long/medium threshold, get no adjustment.
fn length_adjustment(length: usize, bands: &LengthBands) -> f64 {
    if length > bands.long.threshold {
        bands.long.bonus
    } else if length > bands.medium.threshold {
        bands.medium.bonus
    } else if length < bands.short.threshold {
        bands.short.penalty
    } else {
        0.0
    }
}
