use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "huggingface".to_string()
}

fn default_model() -> String {
    "Helsinki-NLP/opus-mt-zh-en".to_string()
}

fn default_from_lang() -> String {
    "zh".to_string()
}

fn default_to_lang() -> String {
    "en".to_string()
}

fn default_api_url() -> String {
    "https://router.huggingface.co/hf-inference/models".to_string()
}

fn default_max_concurrency() -> usize {
    3
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_from_lang")]
    pub from_lang: String,
    #[serde(default = "default_to_lang")]
    pub to_lang: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Upper bound on in-flight translation requests
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Per-request limit; unset waits indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl TranslatorConfig {
    /// Full inference endpoint for the configured model
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), self.model)
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            model: default_model(),
            from_lang: default_from_lang(),
            to_lang: default_to_lang(),
            api_key: String::new(),
            api_url: default_api_url(),
            max_concurrency: default_max_concurrency(),
            timeout_secs: None,
        }
    }
}
