use std::time::Duration;

pub type LanguageCode = String;

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text from source to target language
    async fn translate(
        &self,
        text: &str,
        from: LanguageCode,
        to: LanguageCode,
    ) -> Result<Translation, TranslateError>;

    /// Get supported language pairs
    fn supported_languages(&self) -> Vec<(LanguageCode, LanguageCode)>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;

    /// True when `from -> to` is one of [`Translator::supported_languages`].
    /// Callers check this before submitting work the provider would reject.
    fn supports(&self, from: &str, to: &str) -> bool {
        self.supported_languages()
            .iter()
            .any(|(f, t)| f == from && t == to)
    }
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unsupported language pair: {from} -> {to}")]
    UnsupportedLanguagePair { from: String, to: String },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    /// The provider did not answer within the configured limit. Raised by
    /// callers that bound requests; providers themselves never time out.
    #[error("No response after {0:?}")]
    Timeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTranslator;

    #[async_trait::async_trait]
    impl Translator for EchoTranslator {
        async fn translate(
            &self,
            text: &str,
            from: LanguageCode,
            to: LanguageCode,
        ) -> Result<Translation, TranslateError> {
            Ok(Translation {
                text: text.to_string(),
                from,
                to,
                provider: "echo".to_string(),
            })
        }

        fn supported_languages(&self) -> Vec<(LanguageCode, LanguageCode)> {
            vec![("zh".to_string(), "en".to_string())]
        }

        fn metadata(&self) -> ProviderMetadata {
            ProviderMetadata {
                name: "echo".to_string(),
                requires_api_key: false,
            }
        }
    }

    #[test]
    fn supports_only_listed_pairs() {
        assert!(EchoTranslator.supports("zh", "en"));
        assert!(!EchoTranslator.supports("en", "zh"));
        assert!(!EchoTranslator.supports("zh", "ja"));
    }

    #[test]
    fn sub_second_timeout_keeps_its_unit() {
        let err = TranslateError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "No response after 250ms");
    }
}
