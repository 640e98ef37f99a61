//! Configuration types for ragrank.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{RankError, Result};
use crate::types::{Confidence, DocumentType};

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Document ranking and filtering.
    #[serde(default)]
    pub document: DocumentConfig,

    /// Query normalization.
    #[serde(default)]
    pub query: QueryConfig,

    /// Turn metrics.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Document ranking and filtering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Passages shorter than this (in characters) are dropped.
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,

    /// Maximum passages handed to the prompt stage.
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,

    /// Scoring weights.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            min_content_length: 50,
            max_documents: 5,
            scoring: ScoringConfig::default(),
        }
    }
}

impl DocumentConfig {
    /// Document configuration for a named preset.
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Balanced => Self::default(),
            Preset::HighPrecision => Self {
                min_content_length: 100,
                max_documents: 3,
                scoring: ScoringConfig {
                    confidence_weights: ConfidenceWeights {
                        very_high: 6.0,
                        high: 4.0,
                        medium: 2.0,
                        low: 0.0,
                    },
                    ..ScoringConfig::default()
                },
            },
            Preset::HighRecall => Self {
                min_content_length: 20,
                max_documents: 10,
                scoring: ScoringConfig {
                    confidence_weights: ConfidenceWeights {
                        very_high: 3.0,
                        high: 2.5,
                        medium: 2.0,
                        low: 1.5,
                    },
                    length_bands: LengthBands {
                        short: ShortBand {
                            threshold: 50,
                            penalty: -0.5,
                        },
                        ..LengthBands::default()
                    },
                    ..ScoringConfig::default()
                },
            },
        }
    }
}

/// Named scoring/filtering presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Balanced,
    HighPrecision,
    HighRecall,
}

impl std::str::FromStr for Preset {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "balanced" => Ok(Self::Balanced),
            "high-precision" => Ok(Self::HighPrecision),
            "high-recall" => Ok(Self::HighRecall),
            other => Err(RankError::invalid_argument(format!(
                "unknown preset '{}', expected balanced, high-precision or high-recall",
                other
            ))),
        }
    }
}

/// Weights for the passage relevance heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Flat bonus for a descriptive title.
    #[serde(default = "default_title_bonus")]
    pub title_bonus: f64,

    /// Titles longer than this many characters earn `title_bonus`.
    #[serde(default = "default_title_min_length")]
    pub title_min_length: usize,

    /// Base score per confidence label.
    #[serde(default)]
    pub confidence_weights: ConfidenceWeights,

    /// Content-length adjustments.
    #[serde(default)]
    pub length_bands: LengthBands,

    /// Bonus per document type. Types without an entry get nothing.
    #[serde(default = "default_document_type_bonus")]
    pub document_type_bonus: BTreeMap<DocumentType, f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            title_bonus: 0.5,
            title_min_length: 10,
            confidence_weights: ConfidenceWeights::default(),
            length_bands: LengthBands::default(),
            document_type_bonus: default_document_type_bonus(),
        }
    }
}

impl ScoringConfig {
    /// Bonus for a document type, if one is configured.
    pub fn document_type_bonus(&self, doc_type: &DocumentType) -> Option<f64> {
        self.document_type_bonus.get(doc_type).copied()
    }

    fn values(&self) -> Vec<(&'static str, f64)> {
        let w = &self.confidence_weights;
        let b = &self.length_bands;
        let mut values = vec![
            ("confidence_weights.very_high", w.very_high),
            ("confidence_weights.high", w.high),
            ("confidence_weights.medium", w.medium),
            ("confidence_weights.low", w.low),
            ("length_bands.long.bonus", b.long.bonus),
            ("length_bands.medium.bonus", b.medium.bonus),
            ("length_bands.short.penalty", b.short.penalty),
            ("title_bonus", self.title_bonus),
        ];
        values.extend(
            self.document_type_bonus
                .values()
                .map(|bonus| ("document_type_bonus", *bonus)),
        );
        values
    }
}

/// Base score per confidence label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub very_high: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            very_high: 4.0,
            high: 3.0,
            medium: 2.0,
            low: 1.0,
        }
    }
}

impl ConfidenceWeights {
    /// Weight for a label.
    pub fn weight(&self, confidence: Confidence) -> f64 {
        match confidence {
            Confidence::VeryHigh => self.very_high,
            Confidence::High => self.high,
            Confidence::Medium => self.medium,
            Confidence::Low => self.low,
        }
    }
}

/// Content-length bands. Long and medium apply above their threshold,
/// short applies below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthBands {
    #[serde(default = "default_long_band")]
    pub long: BonusBand,
    #[serde(default = "default_medium_band")]
    pub medium: BonusBand,
    #[serde(default = "default_short_band")]
    pub short: ShortBand,
}

impl Default for LengthBands {
    fn default() -> Self {
        Self {
            long: default_long_band(),
            medium: default_medium_band(),
            short: default_short_band(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusBand {
    pub threshold: usize,
    pub bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortBand {
    pub threshold: usize,
    pub penalty: f64,
}

/// What to search with when the rewritten query is unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackStrategy {
    /// Use the user's original query.
    #[default]
    Original,
}

/// Query normalization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Rewritten queries shorter than this fall back.
    #[serde(default = "default_query_min_length")]
    pub min_length: usize,

    /// Rewritten queries longer than this are truncated.
    #[serde(default = "default_query_max_length")]
    pub max_length: usize,

    #[serde(default)]
    pub fallback: FallbackStrategy,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 100,
            fallback: FallbackStrategy::Original,
        }
    }
}

/// Turn metrics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

// Default value functions

fn default_true() -> bool {
    true
}

fn default_min_content_length() -> usize {
    50
}

fn default_max_documents() -> usize {
    5
}

fn default_title_bonus() -> f64 {
    0.5
}

fn default_title_min_length() -> usize {
    10
}

fn default_query_min_length() -> usize {
    3
}

fn default_query_max_length() -> usize {
    100
}

fn default_long_band() -> BonusBand {
    BonusBand {
        threshold: 1000,
        bonus: 2.0,
    }
}

fn default_medium_band() -> BonusBand {
    BonusBand {
        threshold: 500,
        bonus: 1.0,
    }
}

fn default_short_band() -> ShortBand {
    ShortBand {
        threshold: 100,
        penalty: -1.0,
    }
}

fn default_document_type_bonus() -> BTreeMap<DocumentType, f64> {
    BTreeMap::from([
        (DocumentType::Pdf, 1.0),
        (DocumentType::Html, 0.5),
        (DocumentType::Txt, 0.0),
    ])
}

impl RankConfig {
    /// Configuration with the document section of a preset.
    pub fn with_preset(preset: Preset) -> Self {
        Self {
            document: DocumentConfig::preset(preset),
            ..Self::default()
        }
    }

    /// Load configuration from file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| RankError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default paths.
    pub fn load_default() -> Result<Self> {
        // Try user config first
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("ragrank").join("config.toml");
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        let local_config = PathBuf::from("ragrank.toml");
        if local_config.exists() {
            return Self::load(&local_config);
        }

        Ok(Self::default())
    }

    /// Check the invariants the ranking core relies on.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.document.scoring.values() {
            if !value.is_finite() {
                return Err(RankError::config(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        if self.query.min_length == 0 {
            return Err(RankError::config("query.min_length must be at least 1"));
        }

        if self.query.min_length > self.query.max_length {
            return Err(RankError::config(format!(
                "query.min_length ({}) exceeds query.max_length ({})",
                self.query.min_length, self.query.max_length
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RankConfig::default();
        assert_eq!(config.document.min_content_length, 50);
        assert_eq!(config.document.max_documents, 5);
        assert_eq!(config.query.min_length, 3);
        assert_eq!(config.query.max_length, 100);
        assert!(config.metrics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_scoring_weights() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.confidence_weights.weight(Confidence::VeryHigh), 4.0);
        assert_eq!(scoring.confidence_weights.weight(Confidence::Low), 1.0);
        assert_eq!(scoring.document_type_bonus(&DocumentType::Pdf), Some(1.0));
        assert_eq!(scoring.document_type_bonus(&DocumentType::Txt), Some(0.0));
        assert_eq!(scoring.document_type_bonus(&DocumentType::from_label("docx")), None);
        assert_eq!(scoring.length_bands.short.penalty, -1.0);
    }

    #[test]
    fn test_presets() {
        assert_eq!(DocumentConfig::preset(Preset::Balanced), DocumentConfig::default());

        let precision = DocumentConfig::preset(Preset::HighPrecision);
        let recall = DocumentConfig::preset(Preset::HighRecall);
        assert!(precision.max_documents < recall.max_documents);
        assert!(precision.min_content_length > recall.min_content_length);

        for preset in [Preset::Balanced, Preset::HighPrecision, Preset::HighRecall] {
            assert!(RankConfig::with_preset(preset).validate().is_ok());
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("high-recall".parse::<Preset>().unwrap(), Preset::HighRecall);
        assert_eq!("balanced".parse::<Preset>().unwrap(), Preset::Balanced);
        let err = "aggressive".parse::<Preset>().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_load_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[document]
max_documents = 8

[document.scoring]
title_bonus = 1.5

[document.scoring.document_type_bonus]
pdf = 2.0

[query]
max_length = 64
"#
        )
        .unwrap();

        let config = RankConfig::load(file.path()).unwrap();
        assert_eq!(config.document.max_documents, 8);
        assert_eq!(config.document.min_content_length, 50);
        assert_eq!(config.document.scoring.title_bonus, 1.5);
        assert_eq!(
            config.document.scoring.document_type_bonus(&DocumentType::Pdf),
            Some(2.0)
        );
        // An explicit table replaces the default map.
        assert_eq!(
            config.document.scoring.document_type_bonus(&DocumentType::Html),
            None
        );
        assert_eq!(config.query.max_length, 64);
        assert_eq!(config.query.min_length, 3);
    }

    #[test]
    fn test_load_rejects_inverted_query_bounds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[query]\nmin_length = 50\nmax_length = 10").unwrap();

        let err = RankConfig::load(file.path()).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_validate_rejects_zero_query_min_length() {
        let mut config = RankConfig::default();
        config.query.min_length = 0;

        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert!(err.to_string().contains("query.min_length"));
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[document\nmax_documents = ").unwrap();

        let err = RankConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_validate_rejects_non_finite_weight() {
        let mut config = RankConfig::default();
        config.document.scoring.confidence_weights.high = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = RankConfig::default();
        config
            .document
            .scoring
            .document_type_bonus
            .insert(DocumentType::from_label("docx"), f64::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_toml_roundtrip_keeps_defaults() {
        let config = RankConfig::with_preset(Preset::HighRecall);
        let text = toml::to_string(&config).unwrap();
        let parsed: RankConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
