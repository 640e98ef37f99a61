//! Quality filter applied to an already-ranked passage list.

use ragrank_core::{DocumentConfig, Passage};

/// Drop passages shorter than `min_content_length` characters, then keep
/// at most `max_count` of the rest. Order is preserved; nothing is re-sorted.
pub fn filter_quality<P>(items: Vec<P>, min_content_length: usize, max_count: usize) -> Vec<P>
where
    P: AsRef<Passage>,
{
    items
        .into_iter()
        .filter(|item| item.as_ref().content_length() >= min_content_length)
        .take(max_count)
        .collect()
}

/// [`filter_quality`] with the configured defaults.
pub fn filter_with_config<P>(items: Vec<P>, config: &DocumentConfig) -> Vec<P>
where
    P: AsRef<Passage>,
{
    filter_quality(items, config.min_content_length, config.max_documents)
}
