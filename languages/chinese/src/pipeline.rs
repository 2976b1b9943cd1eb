use std::path::Path;
use std::sync::Arc;

use hanzi_config::Config;
use hanzi_core::dictionary::{Dictionary, DictionaryEntry};
use hanzi_core::language::{
    Token, Tokenizer, covers_exactly, is_ideographic, is_punctuation, tokens_from_spans,
};
use hanzi_core::types::{Annotation, NO_LEVEL, Phrase};
use hanzi_translator::Translator;

use crate::cedict::CedictDictionary;
use crate::error::AnnotateError;
use crate::fallback::{PendingTranslation, TranslationFallback};
use crate::hsk::HskLevels;
use crate::segment::{DictionarySegmenter, assemble_pinyin};

/// Token that closes a sentence
pub const SENTENCE_TERMINATOR: &str = "。";

const PINYIN_SEPARATOR: &str = " / ";
const DEFINITION_SEPARATOR: &str = " | ";

/// Definition of a phrase between submission and the final join
enum Gloss {
    Resolved(String),
    Pending(PendingTranslation),
}

/// A span after dictionary resolution, before any translation is submitted
struct Lookup {
    text: String,
    pinyin: Option<String>,
    /// `None` on a dictionary miss
    definition: Option<String>,
    hsk_level: String,
    entries: Vec<DictionaryEntry>,
}

impl Lookup {
    fn literal(text: &str) -> Self {
        Self {
            text: text.to_string(),
            pinyin: Some(String::new()),
            definition: Some(String::new()),
            hsk_level: NO_LEVEL.to_string(),
            entries: Vec::new(),
        }
    }

    /// Submit misses to the fallback pool
    fn into_draft(self, fallback: Option<&TranslationFallback>) -> DraftPhrase {
        let gloss = match (self.definition, fallback) {
            (Some(definition), _) => Gloss::Resolved(definition),
            (None, Some(fallback)) => Gloss::Pending(fallback.submit(&self.text)),
            (None, None) => Gloss::Resolved(String::new()),
        };

        DraftPhrase {
            text: self.text,
            pinyin: self.pinyin,
            gloss,
            hsk_level: self.hsk_level,
            entries: self.entries,
            is_sentence_end: false,
        }
    }
}

/// An emitted phrase whose definition may still be in flight
struct DraftPhrase {
    text: String,
    pinyin: Option<String>,
    gloss: Gloss,
    hsk_level: String,
    entries: Vec<DictionaryEntry>,
    is_sentence_end: bool,
}

impl DraftPhrase {
    async fn finalize(self) -> Result<Phrase, AnnotateError> {
        let definition = match self.gloss {
            Gloss::Resolved(text) => text,
            Gloss::Pending(pending) => pending.resolve().await?,
        };

        Ok(Phrase {
            text: self.text,
            pinyin: self.pinyin,
            definition,
            hsk_level: self.hsk_level,
            entries: self.entries,
            is_sentence_end: self.is_sentence_end,
        })
    }

    fn abort(&self) {
        if let Gloss::Pending(pending) = &self.gloss {
            pending.abort();
        }
    }
}

/// Owns every shared resource needed to annotate text. Built once and
/// shared by reference; all state is read-only after construction.
pub struct AnnotationEngine {
    dictionary: Arc<dyn Dictionary>,
    hsk: Arc<HskLevels>,
    fallback: Option<TranslationFallback>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl AnnotationEngine {
    /// Engine using the dictionary segmenter as tokenizer
    pub fn new(
        dictionary: Arc<dyn Dictionary>,
        hsk: Arc<HskLevels>,
        fallback: Option<TranslationFallback>,
    ) -> Self {
        let tokenizer: Arc<dyn Tokenizer> =
            Arc::new(DictionarySegmenter::new(Arc::clone(&dictionary)));
        Self {
            dictionary,
            hsk,
            fallback,
            tokenizer,
        }
    }

    /// Load dictionary and HSK sources named in `config`. Missing files
    /// degrade to empty tables. `translator` is ignored when translation is
    /// disabled in config.
    pub fn from_config(config: &Config, translator: Option<Arc<dyn Translator>>) -> Self {
        let dictionary = CedictDictionary::load_or_empty(Path::new(&config.dictionary.path));
        let hsk = HskLevels::load_or_empty(Path::new(&config.hsk.path));

        let fallback = match translator {
            Some(translator) if config.translator.enabled => Some(
                TranslationFallback::from_config(translator, &config.translator),
            ),
            _ => {
                tracing::warn!("Translation fallback disabled, unknown phrases get empty definitions");
                None
            }
        };

        Self::new(Arc::new(dictionary), Arc::new(hsk), fallback)
    }

    /// Replace the default tokenizer
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn dictionary(&self) -> &dyn Dictionary {
        self.dictionary.as_ref()
    }

    pub fn hsk(&self) -> &HskLevels {
        &self.hsk
    }

    /// Tokenize and annotate `text`
    pub async fn annotate(&self, text: &str) -> Result<Annotation, AnnotateError> {
        if text.is_empty() {
            return Ok(Annotation::empty(text));
        }

        let tokens = self.tokenizer.tokenize(text);
        self.annotate_tokens(text, tokens).await
    }

    /// Annotate `text` using externally produced spans
    pub async fn annotate_spans<I, S>(&self, text: &str, spans: I) -> Result<Annotation, AnnotateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotate_tokens(text, tokens_from_spans(spans)).await
    }

    async fn annotate_tokens(
        &self,
        text: &str,
        tokens: Vec<Token>,
    ) -> Result<Annotation, AnnotateError> {
        if !covers_exactly(text, &tokens) {
            return Err(AnnotateError::InvalidSpans);
        }

        let drafts = self.resolve(&tokens);
        tracing::debug!("Resolved {} spans into {} phrases", tokens.len(), drafts.len());

        let phrases = join_in_order(drafts).await?;
        Ok(Annotation {
            phrases,
            original_text: text.to_string(),
        })
    }

    /// Classify and resolve every span, grouping sentences. Punctuation
    /// other than the terminator breaks the buffer into single phrases.
    /// Never suspends; translations are submitted and left running.
    fn resolve(&self, tokens: &[Token]) -> Vec<DraftPhrase> {
        let mut emitted = Vec::new();
        let mut sentence: Vec<Lookup> = Vec::new();

        for token in tokens {
            let span = token.surface.as_str();

            if span == SENTENCE_TERMINATOR {
                self.close_sentence(&mut sentence, &mut emitted);
                continue;
            }

            if is_ideographic(span) {
                sentence.push(self.lookup_ideographic(span));
            } else if is_punctuation(span) {
                tracing::debug!("Punctuation span '{}'", span);
                self.flush(&mut sentence, &mut emitted);
                emitted.push(Lookup::literal(span).into_draft(None));
            } else {
                // Whitespace, digits and Latin words stay inside the sentence
                sentence.push(Lookup::literal(span));
            }
        }

        self.flush(&mut sentence, &mut emitted);
        emitted
    }

    fn lookup_ideographic(&self, span: &str) -> Lookup {
        let entries = self.dictionary.lookup(span);
        let hsk_level = self.hsk.label_of(span);

        if entries.is_empty() {
            tracing::debug!("Dictionary miss '{}'", span);
            return Lookup {
                text: span.to_string(),
                pinyin: assemble_pinyin(self.dictionary.as_ref(), span),
                definition: None,
                hsk_level,
                entries: Vec::new(),
            };
        }

        tracing::debug!("Dictionary hit '{}' ({} entries)", span, entries.len());
        Lookup {
            text: span.to_string(),
            pinyin: Some(join_unique(
                entries.iter().map(|e| e.pinyin_formatted.as_str()),
                PINYIN_SEPARATOR,
            )),
            definition: Some(join_unique(
                entries.iter().map(|e| e.definition.as_str()),
                DEFINITION_SEPARATOR,
            )),
            hsk_level,
            entries: entries.to_vec(),
        }
    }

    /// Emit buffered phrases individually
    fn flush(&self, sentence: &mut Vec<Lookup>, emitted: &mut Vec<DraftPhrase>) {
        let fallback = self.fallback.as_ref();
        emitted.extend(sentence.drain(..).map(|lookup| lookup.into_draft(fallback)));
    }

    /// Replace the buffered phrases with one translated sentence phrase
    fn close_sentence(&self, sentence: &mut Vec<Lookup>, emitted: &mut Vec<DraftPhrase>) {
        let joined: String = sentence.iter().map(|l| l.text.as_str()).collect();
        let text = joined.trim();

        if text.is_empty() {
            self.flush(sentence, emitted);
            emitted.push(Lookup::literal(SENTENCE_TERMINATOR).into_draft(None));
            return;
        }

        sentence.clear();
        let ideographs: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let gloss = match &self.fallback {
            Some(fallback) => Gloss::Pending(fallback.submit(text)),
            None => Gloss::Resolved(String::new()),
        };
        tracing::debug!("Sentence '{}'", text);

        emitted.push(DraftPhrase {
            text: text.to_string(),
            pinyin: assemble_pinyin(self.dictionary.as_ref(), &ideographs),
            gloss,
            hsk_level: self.hsk.label_of(&ideographs),
            entries: Vec::new(),
            is_sentence_end: true,
        });
    }
}

/// Single synchronization point: await every draft in emission order. On the
/// first failure the remaining requests are aborted.
async fn join_in_order(drafts: Vec<DraftPhrase>) -> Result<Vec<Phrase>, AnnotateError> {
    let mut phrases = Vec::with_capacity(drafts.len());
    let mut drafts = drafts.into_iter();

    while let Some(draft) = drafts.next() {
        match draft.finalize().await {
            Ok(phrase) => phrases.push(phrase),
            Err(e) => {
                drafts.by_ref().for_each(|rest| rest.abort());
                tracing::warn!("Annotation aborted: {}", e);
                return Err(e);
            }
        }
    }

    Ok(phrases)
}

/// Join non-empty values, first occurrence wins
fn join_unique<'a>(values: impl Iterator<Item = &'a str>, separator: &str) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen.join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_unique_keeps_first_seen_order() {
        let joined = join_unique(["guó", "Guó", "guó", ""].into_iter(), " / ");
        assert_eq!(joined, "guó / Guó");
    }

    #[tokio::test]
    async fn hit_aggregates_all_entries() {
        let dict = CedictDictionary::from_text(
            "國 国 [guo2] /country/nation/\n國 国 [Guo2] /surname Guo/\n國 国 [guo2] /country/nation/",
        );
        let engine = AnnotationEngine::new(Arc::new(dict), Arc::new(HskLevels::new()), None);

        let annotation = engine.annotate("国").await.unwrap();
        let phrase = &annotation.phrases[0];
        assert_eq!(phrase.pinyin.as_deref(), Some("guó / Guó"));
        assert_eq!(phrase.definition, "country/nation | surname Guo");
        assert_eq!(phrase.entries.len(), 3);
    }

    #[tokio::test]
    async fn without_fallback_misses_are_empty() {
        let engine = AnnotationEngine::new(
            Arc::new(CedictDictionary::new()),
            Arc::new(HskLevels::new()),
            None,
        );

        let annotation = engine.annotate("猫。").await.unwrap();
        assert_eq!(annotation.phrases.len(), 1);
        assert!(annotation.phrases[0].is_sentence_end);
        assert_eq!(annotation.phrases[0].definition, "");
        assert_eq!(annotation.phrases[0].pinyin, None);
    }

    #[tokio::test]
    async fn empty_text_has_no_phrases() {
        let engine = AnnotationEngine::new(
            Arc::new(CedictDictionary::new()),
            Arc::new(HskLevels::new()),
            None,
        );
        let annotation = engine.annotate("").await.unwrap();
        assert!(annotation.phrases.is_empty());
        assert_eq!(annotation.original_text, "");
    }

    #[tokio::test]
    async fn lone_terminator_is_kept_as_literal() {
        let engine = AnnotationEngine::new(
            Arc::new(CedictDictionary::new()),
            Arc::new(HskLevels::new()),
            None,
        );
        let annotation = engine.annotate("。").await.unwrap();
        assert_eq!(annotation.phrases, vec![Phrase::literal("。")]);
    }

    #[tokio::test]
    async fn rejects_spans_that_do_not_cover_text() {
        let engine = AnnotationEngine::new(
            Arc::new(CedictDictionary::new()),
            Arc::new(HskLevels::new()),
            None,
        );
        let result = engine.annotate_spans("你好", ["你"]).await;
        assert!(matches!(result, Err(AnnotateError::InvalidSpans)));
    }

    #[tokio::test]
    async fn empty_spans_produce_no_phrases() {
        let engine = AnnotationEngine::new(
            Arc::new(CedictDictionary::new()),
            Arc::new(HskLevels::new()),
            None,
        );
        let annotation = engine.annotate_spans("，", ["", "，", ""]).await.unwrap();
        assert_eq!(annotation.phrases, vec![Phrase::literal("，")]);
    }

    #[tokio::test]
    async fn numbers_stay_inside_the_sentence() {
        let engine = AnnotationEngine::new(
            Arc::new(CedictDictionary::new()),
            Arc::new(HskLevels::new()),
            None,
        );
        let annotation = engine
            .annotate_spans("买3 kg米。", ["买", "3", " ", "kg", "米", "。"])
            .await
            .unwrap();

        assert_eq!(annotation.phrases.len(), 1);
        assert_eq!(annotation.phrases[0].text, "买3 kg米");
        assert!(annotation.phrases[0].is_sentence_end);
    }
}
