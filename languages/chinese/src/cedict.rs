use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use hanzi_core::dictionary::{Dictionary, DictionaryEntry, DictionaryMetadata, LoadError};
use regex::Regex;

use crate::pinyin::{render_embedded, render_phrase};

/// `TRADITIONAL SIMPLIFIED [PINYIN] /DEF1/DEF2/.../`
static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s+(.+?)\s+\[(.+?)\]\s+/(.+?)/$").expect("valid CEDICT line pattern")
});

/// Parse one CC-CEDICT line. Comments, blank lines and anything that does
/// not match the line format yield `None`.
pub fn parse_line(line: &str) -> Option<DictionaryEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let caps = LINE.captures(line)?;
    let pinyin_raw = caps[3].to_string();

    Some(DictionaryEntry {
        traditional: caps[1].to_string(),
        simplified: caps[2].to_string(),
        pinyin_formatted: render_phrase(&pinyin_raw),
        pinyin_raw,
        definition: render_embedded(&caps[4]),
    })
}

/// In-memory CC-CEDICT index keyed by both traditional and simplified forms
#[derive(Debug, Default)]
pub struct CedictDictionary {
    index: HashMap<String, Vec<DictionaryEntry>>,
    entry_count: usize,
    max_phrase_chars: usize,
}

impl CedictDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from in-memory dictionary text
    pub fn from_text(text: &str) -> Self {
        let mut dict = Self::new();
        for line in text.lines() {
            dict.add_line(line);
        }
        dict
    }

    /// Build from any line source
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, LoadError> {
        let mut dict = Self::new();
        let mut skipped = 0usize;

        for line in reader.lines() {
            let line = line?;
            if !dict.add_line(&line) && !is_ignorable(&line) {
                skipped += 1;
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} malformed dictionary lines", skipped);
        }

        Ok(dict)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }

        tracing::info!("Loading dictionary from {}", path.display());
        let dict = Self::from_reader(BufReader::new(File::open(path)?))?;
        tracing::info!(
            "Dictionary loaded: {} entries, {} unique phrases",
            dict.entry_count,
            dict.index.len()
        );
        Ok(dict)
    }

    /// Load `path`, degrading to an empty dictionary on any failure
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load_from_file(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load dictionary from {}: {}", path.display(), e);
            tracing::warn!("Dictionary will be empty");
            Self::new()
        })
    }

    /// Parse and index one line. Returns whether an entry was produced.
    pub fn add_line(&mut self, line: &str) -> bool {
        match parse_line(line) {
            Some(entry) => {
                self.insert(entry);
                true
            }
            None => false,
        }
    }

    pub fn insert(&mut self, entry: DictionaryEntry) {
        if entry.traditional != entry.simplified {
            self.index_under(entry.traditional.clone(), entry.clone());
        }
        self.index_under(entry.simplified.clone(), entry);
        self.entry_count += 1;
    }

    fn index_under(&mut self, key: String, entry: DictionaryEntry) {
        self.max_phrase_chars = self.max_phrase_chars.max(key.chars().count());
        self.index.entry(key).or_default().push(entry);
    }

    pub fn definition_of(&self, phrase: &str) -> Option<&str> {
        self.lookup_best(phrase).map(|e| e.definition.as_str())
    }

    /// Number of parsed lines
    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Number of distinct indexed phrases
    pub fn phrase_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Dictionary for CedictDictionary {
    fn lookup(&self, phrase: &str) -> &[DictionaryEntry] {
        self.index.get(phrase).map(Vec::as_slice).unwrap_or(&[])
    }

    fn max_phrase_chars(&self) -> usize {
        self.max_phrase_chars
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: "CC-CEDICT".to_string(),
            language: "zh".to_string(),
            entry_count: self.entry_count,
            phrase_count: self.index.len(),
        }
    }
}

fn is_ignorable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# CC-CEDICT
#! version=1

中文 中文 [Zhong1 wen2] /Chinese language/
國 国 [guo2] /country/nation/state/
盤子 盘子 [pan2 zi5] /plate/see [pan2]/
國 国 [Guo2] /surname Guo/
this line is garbage
";

    #[test]
    fn parsed_fields_match_line() {
        let entry = parse_line("盤子 盘子 [pan2 zi5] /plate/dish/").unwrap();
        assert_eq!(entry.traditional, "盤子");
        assert_eq!(entry.simplified, "盘子");
        assert_eq!(entry.pinyin_raw, "pan2 zi5");
        assert_eq!(entry.pinyin_formatted, "pán zi");
        assert_eq!(entry.definition, "plate/dish");
    }

    #[test]
    fn ignores_comments_blank_and_malformed() {
        assert!(parse_line("# comment").is_none());
        assert!(parse_line("   ").is_none());
        assert!(parse_line("中文 [zhong1 wen2] /Chinese/").is_none());
        assert!(parse_line("中文 中文 [zhong1 wen2] Chinese").is_none());
    }

    #[test]
    fn indexes_both_forms_in_file_order() {
        let dict = CedictDictionary::from_text(SAMPLE);
        assert_eq!(dict.entry_count(), 4);

        let simplified = dict.lookup("国");
        let traditional = dict.lookup("國");
        assert_eq!(simplified, traditional);
        assert_eq!(simplified.len(), 2);
        assert_eq!(simplified[0].pinyin_formatted, "guó");
        assert_eq!(simplified[1].definition, "surname Guo");
    }

    #[test]
    fn identical_forms_are_indexed_once() {
        let dict = CedictDictionary::from_text(SAMPLE);
        assert_eq!(dict.lookup("中文").len(), 1);
        assert_eq!(dict.phrase_count(), 5);
    }

    #[test]
    fn embedded_pinyin_rendered_in_definition() {
        let dict = CedictDictionary::from_text(SAMPLE);
        assert_eq!(dict.definition_of("盘子"), Some("plate/see pán"));
    }

    #[test]
    fn missing_phrase_is_empty() {
        let dict = CedictDictionary::from_text(SAMPLE);
        assert!(dict.lookup("猫").is_empty());
        assert!(!dict.contains_phrase("猫"));
        assert!(dict.contains_phrase("盤子"));
        assert_eq!(dict.max_phrase_chars(), 2);
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cedict_ts.u8");

        assert!(matches!(
            CedictDictionary::load_from_file(&path),
            Err(LoadError::FileNotFound(_))
        ));
        assert!(CedictDictionary::load_or_empty(&path).is_empty());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cedict_ts.u8");
        std::fs::write(&path, SAMPLE).unwrap();

        let dict = CedictDictionary::load_from_file(&path).unwrap();
        assert_eq!(dict.metadata().entry_count, 4);
    }
}
