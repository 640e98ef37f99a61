//! Ranking pipeline: score, group, merge, re-score, sort.

use std::cmp::Ordering;

use ragrank_core::{Passage, RankedPassage, ScoringConfig};

use crate::merge::{group_by_source, merge_group};
use crate::scoring::score;

/// Score passages and sort them by descending score.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank_by_score(passages: Vec<Passage>, config: &ScoringConfig) -> Vec<RankedPassage> {
    let mut ranked: Vec<RankedPassage> = passages
        .into_iter()
        .map(|passage| RankedPassage {
            score: score(&passage, config),
            passage,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked
}

/// Run the full pipeline and keep the final scores.
///
/// 1. sort by score,
/// 2. group by source document (first-seen key order),
/// 3. merge each group,
/// 4. sort the merged passages by their recomputed score.
///
/// Each source document appears exactly once in the output.
pub fn rank(passages: Vec<Passage>, config: &ScoringConfig) -> Vec<RankedPassage> {
    if passages.is_empty() {
        return Vec::new();
    }

    let sorted: Vec<Passage> = rank_by_score(passages, config)
        .into_iter()
        .map(|ranked| ranked.passage)
        .collect();

    let merged: Vec<Passage> = group_by_source(sorted)
        .iter()
        .filter_map(|group| merge_group(&group.passages, config))
        .collect();

    rank_by_score(merged, config)
}

/// Run the full pipeline, returning merged passages best first.
pub fn arrange(passages: Vec<Passage>, config: &ScoringConfig) -> Vec<Passage> {
    rank(passages, config)
        .into_iter()
        .map(|ranked| ranked.passage)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ragrank_core::{Confidence, DocumentType};
    use std::collections::HashSet;

    #[test]
    fn test_arrange_empty() {
        assert!(arrange(Vec::new(), &ScoringConfig::default()).is_empty());
    }

    #[test]
    fn test_rank_by_score_is_stable() {
        let passages = vec![
            Passage::new("first", "same"),
            Passage::new("second", "same"),
            Passage::new("third", "same").with_confidence(Confidence::High),
        ];

        let ranked = rank_by_score(passages, &ScoringConfig::default());
        let ids: Vec<_> = ranked
            .iter()
            .map(|r| r.passage.source_id.as_deref().unwrap())
            .collect();

        assert_eq!(ids, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_final_ties_follow_first_seen_group_order() {
        // Equal scores everywhere: the output follows the order in which
        // source keys were first seen in the score-sorted input.
        let passages = vec![
            Passage::new("b", "one"),
            Passage::new("a", "two"),
            Passage::new("b", "three"),
            Passage::new("c", "four"),
        ];

        let arranged = arrange(passages, &ScoringConfig::default());
        let keys: Vec<_> = arranged.iter().map(|p| p.group_key().to_string()).collect();

        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(arranged[0].content, "one\n\n...\n\nthree");
    }

    #[test]
    fn test_merge_can_change_final_position() {
        // Two medium excerpts merge into one long enough to earn the
        // medium length bonus, overtaking a single HIGH passage.
        let excerpt = "y".repeat(300);
        let passages = vec![
            Passage::new("solo", &"z".repeat(300)).with_confidence(Confidence::High),
            Passage::new("pair", &excerpt).with_confidence(Confidence::High).with_page(1),
            Passage::new("pair", &excerpt).with_confidence(Confidence::High).with_page(2),
        ];

        let ranked = rank(passages, &ScoringConfig::default());

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].passage.group_key(), "pair");
        assert_eq!(ranked[0].score, 4.0);
        assert_eq!(ranked[1].score, 3.0);
    }

    fn confidence_strategy() -> impl Strategy<Value = Option<Confidence>> {
        prop_oneof![
            Just(None),
            Just(Some(Confidence::Low)),
            Just(Some(Confidence::Medium)),
            Just(Some(Confidence::High)),
            Just(Some(Confidence::VeryHigh)),
        ]
    }

    fn file_type_strategy() -> impl Strategy<Value = Option<DocumentType>> {
        prop_oneof![
            Just(None),
            Just(Some(DocumentType::Pdf)),
            Just(Some(DocumentType::Html)),
            Just(Some(DocumentType::Txt)),
            Just(Some(DocumentType::Other("docx".to_string()))),
        ]
    }

    fn passage_strategy() -> impl Strategy<Value = Passage> {
        (
            prop::option::of("[a-d]"),
            prop::option::of(prop_oneof![Just(String::new()), "https://x\\.test/[a-c]"]),
            prop::option::of("[A-Za-z ]{0,20}"),
            "[a-z ]{0,1200}",
            prop::option::of(0u64..6),
            confidence_strategy(),
            file_type_strategy(),
        )
            .prop_map(|(id, uri, title, content, page, confidence, file_type)| {
                let mut passage = Passage::new("", &content);
                passage.source_id = id;
                passage.source_uri = uri;
                passage.title = title;
                passage.confidence = confidence;
                passage.attributes.page_number = page;
                passage.attributes.file_type = file_type;
                passage
            })
    }

    proptest! {
        /// Property: every input source key appears exactly once in the output.
        #[test]
        fn prop_arrange_grouping_closure(passages in prop::collection::vec(passage_strategy(), 0..12)) {
            let config = ScoringConfig::default();
            let input_keys: HashSet<String> =
                passages.iter().map(|p| p.group_key().to_string()).collect();

            let arranged = arrange(passages, &config);
            let output_keys: Vec<String> =
                arranged.iter().map(|p| p.group_key().to_string()).collect();
            let unique: HashSet<String> = output_keys.iter().cloned().collect();

            prop_assert_eq!(output_keys.len(), unique.len());
            prop_assert_eq!(unique, input_keys);
        }

        /// Property: the final list is sorted by descending score.
        #[test]
        fn prop_rank_sorted_descending(passages in prop::collection::vec(passage_strategy(), 0..12)) {
            let config = ScoringConfig::default();
            let ranked = rank(passages, &config);

            for pair in ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
            for r in &ranked {
                prop_assert_eq!(r.score, score(&r.passage, &config));
                prop_assert!(r.score >= 0.0);
            }
        }

        /// Property: raising the confidence label never lowers the score.
        #[test]
        fn prop_score_monotonic_in_confidence(passage in passage_strategy()) {
            let config = ScoringConfig::default();
            let scores: Vec<f64> = Confidence::ALL
                .iter()
                .map(|c| score(&passage.clone().with_confidence(*c), &config))
                .collect();

            for pair in scores.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
        }

        /// Property: singleton groups merge to themselves.
        #[test]
        fn prop_merge_singleton_identity(passage in passage_strategy()) {
            let merged = merge_group(std::slice::from_ref(&passage), &ScoringConfig::default());
            prop_assert_eq!(merged, Some(passage));
        }
    }
}
