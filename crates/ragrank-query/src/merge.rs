//! Grouping passages by source document and merging each group.

use std::collections::HashMap;

use ragrank_core::{Passage, ScoringConfig};

use crate::scoring::score;

/// Separator placed between merged excerpts.
pub const EXCERPT_SEPARATOR: &str = "\n\n...\n\n";

/// Passages that belong to one source document, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceGroup {
    /// Group key (see [`Passage::group_key`]).
    pub key: String,

    /// Members in the order they were seen.
    pub passages: Vec<Passage>,
}

/// Group passages by source document.
///
/// Groups come out in first-seen key order, which makes the final
/// tie-break of the ranking pipeline reproducible.
pub fn group_by_source(passages: Vec<Passage>) -> Vec<SourceGroup> {
    let mut groups: Vec<SourceGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for passage in passages {
        let key = passage.group_key();
        match index.get(key) {
            Some(&i) => groups[i].passages.push(passage),
            None => {
                let key = key.to_string();
                index.insert(key.clone(), groups.len());
                groups.push(SourceGroup {
                    key,
                    passages: vec![passage],
                });
            }
        }
    }

    groups
}

/// Merge the members of one group into a single passage.
///
/// Members are ordered by page (missing pages count as 0) and their
/// excerpts joined with [`EXCERPT_SEPARATOR`], each prefixed with
/// `[Page n] ` when it has a page number. Metadata is copied from the
/// highest-scoring member; the earliest member in page order wins ties.
///
/// A single member is returned unchanged. Returns `None` for an empty
/// group.
pub fn merge_group(members: &[Passage], config: &ScoringConfig) -> Option<Passage> {
    match members {
        [] => None,
        [single] => Some(single.clone()),
        _ => {
            let mut ordered: Vec<&Passage> = members.iter().collect();
            ordered.sort_by_key(|p| p.page_number().unwrap_or(0));

            let mut base = ordered[0];
            let mut best = score(base, config);
            for &candidate in &ordered[1..] {
                let candidate_score = score(candidate, config);
                if candidate_score > best {
                    base = candidate;
                    best = candidate_score;
                }
            }

            let content = ordered
                .iter()
                .map(|p| match p.page_number() {
                    // Page 0 is a real page number and is prefixed too.
                    Some(page) => format!("[Page {}] {}", page, p.content),
                    None => p.content.clone(),
                })
                .collect::<Vec<_>>()
                .join(EXCERPT_SEPARATOR);

            Some(Passage {
                content,
                ..base.clone()
            })
        }
    }
}
