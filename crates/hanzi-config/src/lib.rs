use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::hsk::HskConfig;
use self::resources::ResourcesConfig;
use self::translator::TranslatorConfig;

pub mod dictionary;
pub mod hsk;
pub mod resources;
pub mod translator;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub hsk: HskConfig,
    pub translator: TranslatorConfig,
    pub resources: ResourcesConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load a JSON config file, falling back to [`Config::new`] when the file
    /// does not exist. Environment overrides win over file values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::new());
        }

        let data = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&data)?;
        config.apply_env();
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(path) = env::var("CEDICT_PATH") {
            self.dictionary.path = path;
        }

        if let Ok(path) = env::var("HSK_PATH") {
            self.hsk.path = path;
        }

        if let Some(enabled) = env::var("AUTO_DOWNLOAD_RESOURCES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.resources.auto_download = enabled;
        }

        if let Ok(token) = env::var("HF_INFERENCE_TOKEN") {
            self.translator.api_key = token;
        }

        if let Ok(url) = env::var("TRANSLATOR_API_URL") {
            self.translator.api_url = url;
        }

        if let Some(max) = env::var("TRANSLATOR_MAX_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.translator.max_concurrency = max;
        }

        if let Some(secs) = env::var("TRANSLATOR_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.translator.timeout_secs = Some(secs);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_field_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "translator": {{ "max_concurrency": 8, "timeout_secs": 20 }} }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.translator.max_concurrency, 8);
        assert_eq!(config.translator.timeout_secs, Some(20));
        assert_eq!(config.translator.model, "Helsinki-NLP/opus-mt-zh-en");
        assert!(config.translator.enabled);
    }

    #[test]
    fn downloads_are_opt_in() {
        let config = Config::default();
        assert!(!config.resources.auto_download);
        assert!(config.resources.cedict_url.ends_with(".zip"));

        let parsed: Config =
            serde_json::from_str(r#"{ "resources": { "auto_download": true } }"#).unwrap();
        assert!(parsed.resources.auto_download);
        assert_eq!(parsed.resources.hsk_url, ResourcesConfig::default().hsk_url);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(dir.path().join("absent.json")).is_ok());
    }

    #[test]
    fn malformed_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn endpoint_joins_model() {
        let mut config = TranslatorConfig::default();
        config.api_url = "http://localhost:8080/models/".into();
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/models/Helsinki-NLP/opus-mt-zh-en"
        );
    }
}
