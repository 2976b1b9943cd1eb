use std::sync::Arc;

use hanzi_config::Config;
use hanzi_lang_chinese::{AnnotationEngine, HuggingFaceTranslator, ResourceFetcher};
use hanzi_translator::Translator;

pub struct AppState {
    pub config: Config,
    pub engine: AnnotationEngine,
}

impl AppState {
    /// Fetch missing resources when enabled, then build the engine. A failed
    /// download leaves the engine with empty tables.
    pub async fn new(config: Config) -> Self {
        if let Err(e) = ResourceFetcher::new().ensure(&config).await {
            tracing::warn!("Resource download failed: {}", e);
        }

        let translator: Option<Arc<dyn Translator>> =
            if config.translator.enabled && !config.translator.api_key.is_empty() {
                Some(Arc::new(HuggingFaceTranslator::from_config(&config.translator)))
            } else {
                if config.translator.enabled {
                    tracing::warn!("No translator API key configured (set HF_INFERENCE_TOKEN)");
                }
                None
            };

        let engine = AnnotationEngine::from_config(&config, translator);
        let metadata = engine.dictionary().metadata();
        tracing::info!(
            "Engine ready: {} dictionary entries, {} HSK levels",
            metadata.entry_count,
            engine.hsk().len()
        );

        Self { config, engine }
    }
}
