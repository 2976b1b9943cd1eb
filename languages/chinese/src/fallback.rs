use std::sync::Arc;
use std::time::Duration;

use hanzi_config::translator::TranslatorConfig;
use hanzi_translator::{LanguageCode, TranslateError, Translator};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::error::AnnotateError;

pub const DEFAULT_CONCURRENCY: usize = 3;

/// Bounded pool of in-flight requests to the translation collaborator.
///
/// [`TranslationFallback::submit`] returns immediately; at most
/// `concurrency` requests run at once and the rest wait for a permit.
/// Must be used from within a tokio runtime.
pub struct TranslationFallback {
    translator: Arc<dyn Translator>,
    permits: Arc<Semaphore>,
    concurrency: usize,
    from: LanguageCode,
    to: LanguageCode,
    timeout: Option<Duration>,
}

impl TranslationFallback {
    pub fn new(translator: Arc<dyn Translator>, concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            translator,
            permits: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            from: "zh".to_string(),
            to: "en".to_string(),
            timeout: None,
        }
    }

    pub fn from_config(translator: Arc<dyn Translator>, config: &TranslatorConfig) -> Self {
        Self::new(translator, config.max_concurrency)
            .with_languages(config.from_lang.clone(), config.to_lang.clone())
            .with_timeout(config.timeout_secs.map(Duration::from_secs))
    }

    pub fn with_languages(mut self, from: LanguageCode, to: LanguageCode) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// `None` waits on the collaborator indefinitely
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Queue `text` for translation and hand back its pending result
    pub fn submit(&self, text: &str) -> PendingTranslation {
        let translator = Arc::clone(&self.translator);
        let permits = Arc::clone(&self.permits);
        let source = text.to_string();
        let from = self.from.clone();
        let to = self.to.clone();
        let timeout = self.timeout;

        tracing::debug!("Submitting '{}' for translation", text);

        let handle = tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| TranslateError::ApiError("translation pool closed".to_string()))?;

            let call = translator.translate(&source, from, to);
            let translation = match timeout {
                Some(limit) => tokio::time::timeout(limit, call)
                    .await
                    .map_err(|_| TranslateError::Timeout(limit))??,
                None => call.await?,
            };

            Ok::<_, TranslateError>(translation.text)
        });

        PendingTranslation {
            phrase: text.to_string(),
            handle,
        }
    }
}

/// Handle to a translation that may still be running
pub struct PendingTranslation {
    phrase: String,
    handle: JoinHandle<Result<String, TranslateError>>,
}

impl PendingTranslation {
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    /// Wait for the translation to finish
    pub async fn resolve(self) -> Result<String, AnnotateError> {
        match self.handle.await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(source)) => Err(AnnotateError::Translation {
                phrase: self.phrase,
                source,
            }),
            Err(e) => Err(AnnotateError::Worker {
                phrase: self.phrase,
                reason: e.to_string(),
            }),
        }
    }

    /// Stop a request whose result will never be read
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl std::fmt::Debug for PendingTranslation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTranslation")
            .field("phrase", &self.phrase)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}
