use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use hanzi_core::dictionary::LoadError;
use hanzi_core::types::NO_LEVEL;
use serde::Deserialize;

/// HSK level provider
#[derive(Debug, Default)]
pub struct HskLevels {
    levels: HashMap<String, HskLevel>,
    max_phrase_chars: usize,
}

/// One row of the complete-hsk-vocabulary JSON
#[derive(Debug, Deserialize)]
struct VocabularyJsonEntry {
    simplified: String,
    level: Labels,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Labels {
    One(String),
    Many(Vec<String>),
}

impl Labels {
    /// The last label is authoritative
    fn last(&self) -> Option<&str> {
        match self {
            Labels::One(label) => Some(label),
            Labels::Many(labels) => labels.last().map(String::as_str),
        }
    }
}

impl HskLevels {
    /// Create empty HSK database
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from complete-hsk-vocabulary JSON
    pub fn from_json(json_str: &str) -> Result<Self, LoadError> {
        let rows: Vec<VocabularyJsonEntry> =
            serde_json::from_str(json_str).map_err(|e| LoadError::InvalidFormat(e.to_string()))?;

        let mut levels = Self::new();
        for row in rows {
            if let Some(label) = row.level.last() {
                levels.insert(&row.simplified, label);
            }
        }
        Ok(levels)
    }

    /// Load from TSV text (phrase\tlabel format)
    pub fn from_tsv(content: &str) -> Self {
        let mut levels = Self::new();
        for line in content.lines() {
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() >= 2 {
                levels.insert(parts[0].trim(), parts[1].trim());
            }
        }
        levels
    }

    /// Load from a `.json` vocabulary file, or TSV for any other extension
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let levels = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_tsv(&content),
        };
        tracing::info!("Loaded {} HSK levels from {}", levels.len(), path.display());
        Ok(levels)
    }

    pub fn load_or_empty(path: &Path) -> Self {
        Self::load_from_file(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load HSK vocabulary from {}: {}", path.display(), e);
            Self::new()
        })
    }

    /// Record `label` for `phrase`. Labels without a trailing level are ignored.
    pub fn insert(&mut self, phrase: &str, label: &str) {
        if let Some(level) = HskLevel::from_label(label) {
            self.max_phrase_chars = self.max_phrase_chars.max(phrase.chars().count());
            self.levels.insert(phrase.to_string(), level);
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Direct table lookup, no substring fallback
    pub fn get_level(&self, phrase: &str) -> Option<HskLevel> {
        self.levels.get(phrase).copied()
    }

    /// Level of `phrase`, or the highest level among its substrings when the
    /// phrase itself is not listed
    pub fn level_of(&self, phrase: &str) -> Option<HskLevel> {
        if let Some(level) = self.get_level(phrase) {
            return Some(level);
        }

        let bounds: Vec<usize> = phrase
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(phrase.len()))
            .collect();
        let len = bounds.len() - 1;

        (0..len)
            .flat_map(|start| {
                (start + 1..=(start + self.max_phrase_chars).min(len)).map(move |end| (start, end))
            })
            .map(|(start, end)| self.get_level(&phrase[bounds[start]..bounds[end]]))
            .max()
            .flatten()
    }

    /// Level label for output, `N/A` when unknown
    pub fn label_of(&self, phrase: &str) -> String {
        self.level_of(phrase)
            .map(|level| level.to_string())
            .unwrap_or_else(|| NO_LEVEL.to_string())
    }
}

/// Numeric tier with an optional `+`. Orders by tier, then `+` above bare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HskLevel {
    pub tier: u32,
    pub plus: bool,
}

impl HskLevel {
    /// Parse the trailing run of digits and `+` from a label such as
    /// `new-3`, `HSK 6` or `7+`
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        let run_start = label
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit() || *c == '+')
            .last()
            .map(|(i, _)| i)?;
        let run = &label[run_start..];

        let plus = run.ends_with('+');
        let tier = run.trim_end_matches('+').parse().ok()?;
        Some(Self { tier, plus })
    }
}

impl fmt::Display for HskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tier, if self.plus { "+" } else { "" })
    }
}
