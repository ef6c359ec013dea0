use crate::error::ConfigError;
use crate::generator::{DEFAULT_NAMESPACE, TargetLanguage};
use crate::preview::PreviewFormat;
use crate::schema::DEFAULT_HELP_URL;
use serde::{Deserialize, Serialize};
use std::fs;

/// Options the host UI would otherwise supply on every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FactoryConfig {
    /// Language the generator stub is written for.
    pub language: TargetLanguage,
    /// Object the generator functions hang off, e.g. `Blockly`.
    pub namespace: String,
    pub help_url: String,
    pub tooltip: String,
    /// How hand-supplied preview code is interpreted.
    pub format: PreviewFormat,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            language: TargetLanguage::default(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            help_url: DEFAULT_HELP_URL.to_string(),
            tooltip: String::new(),
            format: PreviewFormat::default(),
        }
    }
}

impl FactoryConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = FactoryConfig::from_json(r#"{ "language": "Python" }"#).unwrap();
        assert_eq!(config.language, TargetLanguage::Python);
        assert_eq!(config.namespace, "Blockly");
        assert_eq!(config.help_url, "http://www.example.com/");
        assert_eq!(config.format, PreviewFormat::Json);
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(FactoryConfig::from_json(r#"{ "language": "Cobol" }"#).is_err());
    }
}
