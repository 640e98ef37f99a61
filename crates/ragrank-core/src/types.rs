//! Core domain types for ragrank.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Group key used when a passage carries neither a URI nor an id.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Discrete relevance tier attached to a passage by the search backend.
///
/// Variants are declared in ascending order so `Ord` follows the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Confidence {
    /// All labels, lowest first.
    pub const ALL: [Confidence; 4] = [Self::Low, Self::Medium, Self::High, Self::VeryHigh];

    /// Parse a backend label. Unrecognized labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "VERY_HIGH" => Some(Self::VeryHigh),
            "HIGH" => Some(Self::High),
            "MEDIUM" => Some(Self::Medium),
            "LOW" => Some(Self::Low),
            _ => None,
        }
    }

    /// The backend label for this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryHigh => "VERY_HIGH",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// File type facet of a passage.
///
/// Unrecognized labels are kept as-is so passages serialize back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentType {
    Pdf,
    Html,
    Txt,
    Other(String),
}

impl DocumentType {
    /// Map a backend file-type label. Matching is exact; `"PDF"` is `Other("PDF")`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "pdf" => Self::Pdf,
            "html" => Self::Html,
            "txt" => Self::Txt,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Txt => "txt",
            Self::Other(label) => label.as_str(),
        }
    }
}

impl From<String> for DocumentType {
    fn from(label: String) -> Self {
        match label.as_str() {
            "pdf" => Self::Pdf,
            "html" => Self::Html,
            "txt" => Self::Txt,
            _ => Self::Other(label),
        }
    }
}

impl From<DocumentType> for String {
    fn from(doc_type: DocumentType) -> Self {
        match doc_type {
            DocumentType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Facets attached to a passage by the search backend.
///
/// Known facets are typed; anything else is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    /// File type of the owning document.
    #[serde(rename = "_file_type", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<DocumentType>,

    /// Page the excerpt was taken from.
    #[serde(
        rename = "_excerpt_page_number",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub page_number: Option<u64>,

    /// Language code of the document.
    #[serde(rename = "_language_code", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Last-modified timestamp, as reported by the backend.
    #[serde(rename = "_modified_at", default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    /// Canonical source URI facet.
    #[serde(rename = "_source_uri", default, skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,

    /// Other facets.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// One excerpt hit returned by the search backend.
///
/// Passages are never mutated by the pipeline; transforms build new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// Backend-assigned identifier of the hit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,

    /// Location of the owning document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,

    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Excerpt text.
    #[serde(default)]
    pub content: String,

    /// Facet bag.
    #[serde(default)]
    pub attributes: Attributes,

    /// Confidence label; unrecognized labels deserialize to `None`.
    #[serde(
        default,
        deserialize_with = "lenient_confidence",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence: Option<Confidence>,
}

impl Passage {
    /// Create a passage with an id and content and no other metadata.
    pub fn new(source_id: &str, content: &str) -> Self {
        Self {
            source_id: Some(source_id.to_string()),
            source_uri: None,
            title: None,
            content: content.to_string(),
            attributes: Attributes::default(),
            confidence: None,
        }
    }

    pub fn with_uri(mut self, uri: &str) -> Self {
        self.source_uri = Some(uri.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_file_type(mut self, file_type: DocumentType) -> Self {
        self.attributes.file_type = Some(file_type);
        self
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.attributes.page_number = Some(page);
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.attributes.language = Some(language.to_string());
        self
    }

    /// Identity of the owning document: URI, then id, then `"unknown"`.
    /// Empty strings count as absent.
    pub fn group_key(&self) -> &str {
        non_empty(&self.source_uri)
            .or_else(|| non_empty(&self.source_id))
            .unwrap_or(UNKNOWN_SOURCE)
    }

    /// Content length in characters.
    pub fn content_length(&self) -> usize {
        self.content.chars().count()
    }

    /// Page number facet, if any.
    pub fn page_number(&self) -> Option<u64> {
        self.attributes.page_number
    }

    /// Confidence as shown to users: absent labels read as `MEDIUM`.
    pub fn display_confidence(&self) -> Confidence {
        self.confidence.unwrap_or(Confidence::Medium)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<Option<Confidence>, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(Confidence::parse))
}

/// A passage paired with a freshly computed score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPassage {
    /// Relevance score (higher is better, never negative).
    pub score: f64,

    /// The passage.
    pub passage: Passage,
}

impl AsRef<Passage> for Passage {
    fn as_ref(&self) -> &Passage {
        self
    }
}

impl AsRef<Passage> for RankedPassage {
    fn as_ref(&self) -> &Passage {
        &self.passage
    }
}

/// Compact description of a ranked passage, for logs.
#[derive(Debug, Clone, Serialize)]
pub struct PassageDigest {
    pub title: Option<String>,
    pub score: f64,
    pub confidence: Option<Confidence>,
    pub content_length: usize,
}

impl From<&RankedPassage> for PassageDigest {
    fn from(ranked: &RankedPassage) -> Self {
        Self {
            title: ranked.passage.title.clone(),
            score: ranked.score,
            confidence: ranked.passage.confidence,
            content_length: ranked.passage.content_length(),
        }
    }
}

/// Summary of one retrieval turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnMetrics {
    /// Whether the rewritten query differs from what the user typed.
    pub query_optimized: bool,

    /// Passages returned by the search backend.
    pub documents_retrieved: usize,

    /// Passages surviving ranking and filtering.
    pub documents_after_filtering: usize,

    /// Mean score of surviving passages; `None` when nothing survived.
    pub average_score: Option<f64>,

    /// Wall time of the turn in milliseconds.
    pub processing_time_ms: u64,

    /// Completion timestamp (Unix millis).
    pub timestamp_ms: u64,
}

/// Current time in Unix milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
