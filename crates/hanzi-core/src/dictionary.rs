use serde::{Deserialize, Serialize};

/// Read-only phrase lookup shared by segmentation and annotation
pub trait Dictionary: Send + Sync {
    /// All entries indexed under `phrase`, in source order
    fn lookup(&self, phrase: &str) -> &[DictionaryEntry];

    /// Length in chars of the longest indexed phrase
    fn max_phrase_chars(&self) -> usize;

    /// Get dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;

    fn contains_phrase(&self, phrase: &str) -> bool {
        !self.lookup(phrase).is_empty()
    }

    /// First entry for `phrase`, if any
    fn lookup_best(&self, phrase: &str) -> Option<&DictionaryEntry> {
        self.lookup(phrase).first()
    }
}

/// One parsed dictionary line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub traditional: String,
    pub simplified: String,
    /// Numeric-tone pinyin as written in the source, e.g. `zhong1 wen2`
    pub pinyin_raw: String,
    /// Diacritic pinyin, e.g. `zhōng wén`
    pub pinyin_formatted: String,
    /// Slash-separated glosses with embedded pinyin already rendered
    pub definition: String,
}

impl DictionaryEntry {
    /// Individual glosses of the definition
    pub fn glosses(&self) -> impl Iterator<Item = &str> {
        self.definition.split('/').filter(|g| !g.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct DictionaryMetadata {
    pub name: String,
    pub language: String,
    pub entry_count: usize,
    pub phrase_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
