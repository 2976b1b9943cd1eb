use std::sync::Arc;

use hanzi_core::dictionary::Dictionary;
use hanzi_core::language::{Token, Tokenizer, is_cjk_ideograph};

/// One unit of a longest-match segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    /// False for a single character with no dictionary entry
    pub matched: bool,
}

/// Byte offsets of every char boundary in `text`, including the end
fn char_bounds(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

/// Greedy left-to-right maximal munch over `run`.
///
/// At each position the longest prefix present in the dictionary is taken.
/// When nothing matches, the leading character is emitted unmatched and the
/// scan moves on by one character. There is no backtracking.
pub fn match_longest<'a, D: Dictionary + ?Sized>(dict: &D, run: &'a str) -> Vec<Segment<'a>> {
    let bounds = char_bounds(run);
    let len = bounds.len() - 1;
    let max = dict.max_phrase_chars();

    let mut segments = Vec::new();
    let mut start = 0;
    while start < len {
        let longest = (start + 1..=(start + max).min(len))
            .rev()
            .find(|&end| dict.contains_phrase(&run[bounds[start]..bounds[end]]));

        let (end, matched) = match longest {
            Some(end) => (end, true),
            None => (start + 1, false),
        };
        segments.push(Segment {
            text: &run[bounds[start]..bounds[end]],
            matched,
        });
        start = end;
    }

    segments
}

/// Assemble diacritic pinyin for `phrase` from dictionary readings.
///
/// Prefers the longest known prefix whose remainder is also resolvable.
/// Returns `None` if any part of the phrase cannot be covered; a partial
/// reading is never produced. The empty phrase reads as `Some("")`.
pub fn assemble_pinyin<D: Dictionary + ?Sized>(dict: &D, phrase: &str) -> Option<String> {
    let bounds = char_bounds(phrase);
    let len = bounds.len() - 1;
    let max = dict.max_phrase_chars();

    // suffix[i]: reading of phrase[bounds[i]..], solved right to left so each
    // suffix is resolved at most once
    let mut suffix: Vec<Option<String>> = vec![None; len + 1];
    suffix[len] = Some(String::new());

    for start in (0..len).rev() {
        let reading = (start + 1..=(start + max).min(len)).rev().find_map(|end| {
            let rest = suffix[end].as_deref()?;
            let entry = dict.lookup_best(&phrase[bounds[start]..bounds[end]])?;
            Some(if rest.is_empty() {
                entry.pinyin_formatted.clone()
            } else {
                format!("{} {}", entry.pinyin_formatted, rest)
            })
        });
        suffix[start] = reading;
    }

    suffix.swap_remove(0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharKind {
    Ideograph,
    Word,
    Space,
    Symbol,
}

impl CharKind {
    fn of(c: char) -> Self {
        if is_cjk_ideograph(c) {
            CharKind::Ideograph
        } else if c.is_whitespace() {
            CharKind::Space
        } else if c.is_alphanumeric() {
            CharKind::Word
        } else {
            CharKind::Symbol
        }
    }
}

/// Default tokenizer: ideograph runs are split by longest match, Latin
/// words and whitespace runs stay whole, every other symbol stands alone.
pub struct DictionarySegmenter {
    dictionary: Arc<dyn Dictionary>,
}

impl DictionarySegmenter {
    pub fn new(dictionary: Arc<dyn Dictionary>) -> Self {
        Self { dictionary }
    }

    /// Split `text` into runs of the same [`CharKind`], symbols one per run
    fn runs(text: &str) -> Vec<(usize, &str, CharKind)> {
        let mut runs = Vec::new();
        let mut current: Option<(usize, CharKind)> = None;

        for (i, c) in text.char_indices() {
            let kind = CharKind::of(c);
            match current {
                Some((_, k)) if k == kind && kind != CharKind::Symbol => {}
                Some((start, k)) => {
                    runs.push((start, &text[start..i], k));
                    current = Some((i, kind));
                }
                None => current = Some((i, kind)),
            }
        }
        if let Some((start, k)) = current {
            runs.push((start, &text[start..], k));
        }

        runs
    }
}

impl Tokenizer for DictionarySegmenter {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();

        for (start, run, kind) in Self::runs(text) {
            if kind != CharKind::Ideograph {
                tokens.push(Token::new(run, start));
                continue;
            }

            let mut position = start;
            for segment in match_longest(self.dictionary.as_ref(), run) {
                tokens.push(Token::new(segment.text, position));
                position += segment.text.len();
            }
        }

        tokens
    }
}
