/// Word segmentation interface. Implementations must return tokens whose
/// surfaces, concatenated in order, reconstruct the input exactly.
pub trait Tokenizer: Send + Sync {
    /// Break text into contiguous, non-overlapping tokens
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub surface: String,
    /// Byte offset of the token in the source text
    pub position: usize,
}

impl Token {
    pub fn new(surface: impl Into<String>, position: usize) -> Self {
        Self {
            surface: surface.into(),
            position,
        }
    }
}

/// Build positioned tokens from plain spans. Empty spans are dropped.
pub fn tokens_from_spans<I, S>(spans: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut position = 0;
    spans
        .into_iter()
        .map(Into::<String>::into)
        .filter(|span| !span.is_empty())
        .map(|span| {
            let token = Token::new(span, position);
            position += token.surface.len();
            token
        })
        .collect()
}

/// True when non-empty tokens cover `text` with no gaps or overlaps
pub fn covers_exactly(text: &str, tokens: &[Token]) -> bool {
    let mut position = 0;
    for token in tokens {
        if token.surface.is_empty()
            || token.position != position
            || !text[position..].starts_with(&token.surface)
        {
            return false;
        }
        position += token.surface.len();
    }
    position == text.len()
}

/// CJK ideograph blocks: unified ideographs with extensions A-H and the
/// compatibility ideographs
pub fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}'
        | '\u{2A700}'..='\u{2EBEF}'
        | '\u{2EBF0}'..='\u{2EE5F}'
        | '\u{2F800}'..='\u{2FA1F}'
        | '\u{30000}'..='\u{323AF}'
    )
}

/// Non-empty and every char is a CJK ideograph
pub fn is_ideographic(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_cjk_ideograph)
}

/// ASCII, general, CJK and full-width punctuation
pub fn is_punctuation_char(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(c,
            '\u{2010}'..='\u{2027}'
            | '\u{2030}'..='\u{205E}'
            | '\u{3001}'..='\u{303F}'
            | '\u{FE10}'..='\u{FE19}'
            | '\u{FE30}'..='\u{FE4F}'
            | '\u{FF01}'..='\u{FF0F}'
            | '\u{FF1A}'..='\u{FF20}'
            | '\u{FF3B}'..='\u{FF40}'
            | '\u{FF5B}'..='\u{FF65}'
        )
}

/// Non-empty and every char is punctuation
pub fn is_punctuation(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_punctuation_char)
}
