use hanzi_translator::TranslateError;

#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("translation failed for '{phrase}': {source}")]
    Translation {
        phrase: String,
        #[source]
        source: TranslateError,
    },

    #[error("translation worker for '{phrase}' did not complete: {reason}")]
    Worker { phrase: String, reason: String },

    #[error("tokens do not reconstruct the input text")]
    InvalidSpans,
}
