pub mod cedict;
pub mod error;
pub mod fallback;
pub mod hsk;
pub mod pinyin;
pub mod pipeline;
pub mod resources;
pub mod segment;
pub mod translator;

pub use cedict::CedictDictionary;
pub use error::AnnotateError;
pub use fallback::{PendingTranslation, TranslationFallback};
pub use hsk::{HskLevel, HskLevels};
pub use pipeline::AnnotationEngine;
pub use resources::{ResourceError, ResourceFetcher};
pub use segment::{DictionarySegmenter, Segment, assemble_pinyin, match_longest};
pub use translator::HuggingFaceTranslator;
