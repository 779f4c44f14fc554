//! Configuration system for the autoland pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{AutolandError, AutolandResult};

/// Minimum trimmed text length for an extraction to be worth parsing.
pub const MIN_VIABLE_TEXT_LENGTH: usize = 100;

/// Approximate cost of one cloud OCR call, in USD.
pub const DEFAULT_OCR_COST_PER_DOCUMENT: f64 = 0.015;

/// Characters of extracted text kept in failure reports.
pub const DEFAULT_PREVIEW_CHARS: usize = 500;

/// Airport codes accepted by the bare-token airport fallback.
pub const DEFAULT_KNOWN_AIRPORTS: [&str; 13] = [
    "HAN", "SGN", "DAD", "HPH", "CXR", "VCA", "PQC", "VDO", "HGH", "NRT", "ICN", "BKK", "SIN",
];

/// Hybrid pipeline tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Below this many characters local text is not parsed at all.
    pub min_text_length: usize,
    /// Cost unit charged for every cloud OCR call.
    pub ocr_cost_per_document: f64,
    /// Length of the text preview attached to failures.
    pub preview_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_text_length: MIN_VIABLE_TEXT_LENGTH,
            ocr_cost_per_document: DEFAULT_OCR_COST_PER_DOCUMENT,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Document AI processor settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentAiConfig {
    /// Full processor resource name
    /// (`projects/{project}/locations/{location}/processors/{id}`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_name: Option<String>,
    /// OAuth access token. Never written back out.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Override for the API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Field parser settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub known_airports: Vec<String>,
    /// Fail instead of defaulting to the processing date when no date is found.
    pub strict_dates: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            known_airports: DEFAULT_KNOWN_AIRPORTS.iter().map(|s| s.to_string()).collect(),
            strict_dates: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutolandConfig {
    pub pipeline: PipelineConfig,
    pub document_ai: DocumentAiConfig,
    pub parser: ParserConfig,
}

impl AutolandConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> AutolandResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| AutolandError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| AutolandError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| AutolandError::Configuration(e.to_string())),
            Some(other) => Err(AutolandError::UnsupportedFormat(format!(".{}", other))),
            None => Err(AutolandError::UnsupportedFormat(
                "missing file extension".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> AutolandResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AutolandResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Overlay environment-style overrides onto this configuration.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AutolandResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Document AI
        if let Some(processor) = lookup("DOCUMENT_AI_PROCESSOR_ID") {
            self.document_ai.processor_name = Some(processor);
        }
        if let Some(token) = lookup("GOOGLE_OAUTH_ACCESS_TOKEN") {
            self.document_ai.access_token = Some(token);
        }
        if let Some(endpoint) = lookup("DOCUMENT_AI_ENDPOINT") {
            self.document_ai.endpoint = Some(endpoint);
        }

        // Pipeline
        if let Some(value) = lookup("AUTOLAND_MIN_TEXT_LENGTH") {
            self.pipeline.min_text_length = value.trim().parse().map_err(|_| {
                AutolandError::Configuration(format!(
                    "AUTOLAND_MIN_TEXT_LENGTH must be a non-negative integer, got '{}'",
                    value
                ))
            })?;
        }
        if let Some(value) = lookup("AUTOLAND_OCR_COST_PER_DOCUMENT") {
            self.pipeline.ocr_cost_per_document = value.trim().parse().map_err(|_| {
                AutolandError::Configuration(format!(
                    "AUTOLAND_OCR_COST_PER_DOCUMENT must be a number, got '{}'",
                    value
                ))
            })?;
        }

        // Parser
        if let Some(value) = lookup("AUTOLAND_KNOWN_AIRPORTS") {
            self.parser.known_airports = value
                .split(',')
                .map(|code| code.trim().to_ascii_uppercase())
                .filter(|code| !code.is_empty())
                .collect();
        }
        if let Some(value) = lookup("AUTOLAND_STRICT_DATES") {
            self.parser.strict_dates = matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        self.validate()
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> AutolandResult<()> {
        if !self.pipeline.ocr_cost_per_document.is_finite()
            || self.pipeline.ocr_cost_per_document < 0.0
        {
            return Err(AutolandError::Configuration(
                "ocr_cost_per_document must be a non-negative number".to_string(),
            ));
        }
        if let Some(processor) = &self.document_ai.processor_name {
            if processor.trim().is_empty() {
                return Err(AutolandError::Configuration(
                    "document_ai.processor_name is set but empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> AutolandConfigBuilder {
        AutolandConfigBuilder::default()
    }
}

/// Builder for AutolandConfig.
#[derive(Default)]
pub struct AutolandConfigBuilder {
    config: AutolandConfig,
}

impl AutolandConfigBuilder {
    /// Set the minimum viable text length.
    pub fn min_text_length(mut self, length: usize) -> Self {
        self.config.pipeline.min_text_length = length;
        self
    }

    /// Set the per-document OCR cost.
    pub fn ocr_cost_per_document(mut self, cost: f64) -> Self {
        self.config.pipeline.ocr_cost_per_document = cost;
        self
    }

    /// Set the Document AI processor resource name.
    pub fn processor_name(mut self, name: impl Into<String>) -> Self {
        self.config.document_ai.processor_name = Some(name.into());
        self
    }

    /// Set the OAuth access token used for Document AI.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.document_ai.access_token = Some(token.into());
        self
    }

    /// Set the Document AI base URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.document_ai.endpoint = Some(endpoint.into());
        self
    }

    /// Replace the known airport whitelist.
    pub fn known_airports<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.parser.known_airports = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Fail parsing when no date is found.
    pub fn strict_dates(mut self, strict: bool) -> Self {
        self.config.parser.strict_dates = strict;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AutolandConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AutolandConfig::default();
        assert_eq!(config.pipeline.min_text_length, 100);
        assert_eq!(config.pipeline.preview_chars, 500);
        assert!(config.document_ai.processor_name.is_none());
        assert!(config.parser.known_airports.contains(&"HGH".to_string()));
        assert!(!config.parser.strict_dates);
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = [
            ("DOCUMENT_AI_PROCESSOR_ID", "projects/p/locations/eu/processors/abc"),
            ("AUTOLAND_MIN_TEXT_LENGTH", "50"),
            ("AUTOLAND_KNOWN_AIRPORTS", "han, sgn,,dad"),
            ("AUTOLAND_STRICT_DATES", "true"),
        ]
        .into_iter()
        .collect();

        let config = AutolandConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(
            config.document_ai.processor_name.as_deref(),
            Some("projects/p/locations/eu/processors/abc")
        );
        assert_eq!(config.pipeline.min_text_length, 50);
        assert_eq!(config.parser.known_airports, vec!["HAN", "SGN", "DAD"]);
        assert!(config.parser.strict_dates);
    }

    #[test]
    fn test_from_lookup_rejects_bad_number() {
        let result = AutolandConfig::from_lookup(|k| {
            (k == "AUTOLAND_OCR_COST_PER_DOCUMENT").then(|| "cheap".to_string())
        });
        assert!(matches!(result, Err(AutolandError::Configuration(_))));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[pipeline]\nmin_text_length = 80\n\n[document_ai]\nprocessor_name = \"projects/p/locations/us/processors/x\""
        )
        .unwrap();

        let config = AutolandConfig::from_file(file.path()).unwrap();
        assert_eq!(config.pipeline.min_text_length, 80);
        assert_eq!(config.pipeline.preview_chars, 500);
        assert!(config.document_ai.processor_name.is_some());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = AutolandConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AutolandError::UnsupportedFormat(_)));
        assert_eq!(err.code().as_str(), "CFG_001");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AutolandConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(AutolandError::Io(_))));
    }

    #[test]
    fn test_access_token_not_serialized() {
        let config = AutolandConfig::builder().access_token("secret").build();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
