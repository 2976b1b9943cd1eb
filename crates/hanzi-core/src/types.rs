use serde::{Deserialize, Serialize};

use crate::dictionary::DictionaryEntry;

/// Sentinel grade for phrases with no known level
pub const NO_LEVEL: &str = "N/A";

/// A finalized annotation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    pub text: String,
    /// `None` when no reading could be assembled
    pub pinyin: Option<String>,
    pub definition: String,
    pub hsk_level: String,
    #[serde(default)]
    pub entries: Vec<DictionaryEntry>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_sentence_end: bool,
}

impl Phrase {
    /// Non-ideographic text passed through untouched
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pinyin: Some(String::new()),
            definition: String::new(),
            hsk_level: NO_LEVEL.to_string(),
            entries: Vec::new(),
            is_sentence_end: false,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Result of annotating one piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub phrases: Vec<Phrase>,
    pub original_text: String,
}

impl Annotation {
    pub fn empty(original_text: impl Into<String>) -> Self {
        Self {
            phrases: Vec::new(),
            original_text: original_text.into(),
        }
    }
}
