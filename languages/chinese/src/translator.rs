use async_trait::async_trait;
use hanzi_config::translator::TranslatorConfig;
use hanzi_translator::{LanguageCode, ProviderMetadata, TranslateError, Translation, Translator};
use serde::Deserialize;

/// Hosted inference client for a zh→en translation model
#[derive(Clone)]
pub struct HuggingFaceTranslator {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct InferenceOutput {
    translation_text: String,
}

impl HuggingFaceTranslator {
    pub fn new(api_key: String, endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint,
        }
    }

    pub fn from_config(config: &TranslatorConfig) -> Self {
        Self::new(config.api_key.clone(), config.endpoint())
    }
}

#[async_trait]
impl Translator for HuggingFaceTranslator {
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError> {
        if self.api_key.is_empty() {
            return Err(TranslateError::AuthenticationError);
        }

        if !self.supports(&from, &to) {
            return Err(TranslateError::UnsupportedLanguagePair { from, to });
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await?;

        let status = response.status();
        if status == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        if status == 401 || status == 403 {
            return Err(TranslateError::AuthenticationError);
        }

        if !status.is_success() {
            return Err(TranslateError::ApiError(format!("HTTP {}", status)));
        }

        let outputs: Vec<InferenceOutput> = response.json().await.map_err(|e| {
            TranslateError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        let translated_text = outputs
            .into_iter()
            .next()
            .map(|o| o.translation_text)
            .ok_or_else(|| TranslateError::ApiError("No translation in response".to_string()))?;

        Ok(Translation {
            text: translated_text,
            from,
            to,
            provider: "huggingface".to_string(),
        })
    }

    fn supported_languages(&self) -> Vec<(LanguageCode, LanguageCode)> {
        vec![("zh".to_string(), "en".to_string())]
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Hugging Face Inference".to_string(),
            requires_api_key: true,
        }
    }
}
