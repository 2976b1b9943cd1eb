use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Marked forms per vowel, indexed by tone - 1. Tone 5 is neutral.
const TONE_MARKS: [(char, [char; 5]); 12] = [
    ('a', ['ā', 'á', 'ǎ', 'à', 'a']),
    ('e', ['ē', 'é', 'ě', 'è', 'e']),
    ('o', ['ō', 'ó', 'ǒ', 'ò', 'o']),
    ('i', ['ī', 'í', 'ǐ', 'ì', 'i']),
    ('u', ['ū', 'ú', 'ǔ', 'ù', 'u']),
    ('ü', ['ǖ', 'ǘ', 'ǚ', 'ǜ', 'ü']),
    ('A', ['Ā', 'Á', 'Ǎ', 'À', 'A']),
    ('E', ['Ē', 'É', 'Ě', 'È', 'E']),
    ('O', ['Ō', 'Ó', 'Ǒ', 'Ò', 'O']),
    ('I', ['Ī', 'Í', 'Ǐ', 'Ì', 'I']),
    ('U', ['Ū', 'Ú', 'Ǔ', 'Ù', 'U']),
    ('Ü', ['Ǖ', 'Ǘ', 'Ǚ', 'Ǜ', 'Ü']),
];

/// Scan order for the vowel that carries the mark. First vowel found wins,
/// regardless of its position in the syllable.
const VOWEL_PRIORITY: [char; 6] = ['a', 'e', 'o', 'i', 'u', 'ü'];

static EMBEDDED_PINYIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([a-zA-ZüÜ:]+\d+(?:\s+[a-zA-ZüÜ:]+\d+)*)\]").expect("valid pinyin pattern")
});

/// Convert one numeric-tone syllable to diacritic form.
///
/// `zhong1` becomes `zhōng`, `ma5` becomes `ma`. A syllable without a
/// trailing tone digit is returned unchanged.
pub fn render_syllable(syllable: &str) -> String {
    let Some(last) = syllable.chars().last() else {
        return String::new();
    };
    let Some(tone) = last.to_digit(10).filter(|t| (1..=5).contains(t)) else {
        return syllable.to_string();
    };

    let body = normalize_umlaut(&syllable[..syllable.len() - last.len_utf8()]);
    let tone = tone as usize - 1;

    for vowel in VOWEL_PRIORITY {
        let found = body
            .char_indices()
            .find(|(_, c)| c.to_lowercase().eq(std::iter::once(vowel)));

        if let Some((idx, c)) = found {
            let Some(marked) = mark(c, tone) else {
                continue;
            };
            let mut out = String::with_capacity(body.len() + 2);
            out.push_str(&body[..idx]);
            out.push(marked);
            out.push_str(&body[idx + c.len_utf8()..]);
            return out;
        }
    }

    // Syllabic consonants such as `r5` or `m2` carry no mark
    body
}

/// Render a whitespace-separated run of syllables, rejoined with single spaces
pub fn render_phrase(raw: &str) -> String {
    raw.split_whitespace()
        .map(render_syllable)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace every bracketed numeric-pinyin group in `text` with its rendered
/// form. `see [pan2]` becomes `see pán`.
pub fn render_embedded(text: &str) -> String {
    EMBEDDED_PINYIN
        .replace_all(text, |caps: &Captures| render_phrase(&caps[1]))
        .into_owned()
}

fn mark(vowel: char, tone: usize) -> Option<char> {
    TONE_MARKS
        .iter()
        .find(|(base, _)| *base == vowel)
        .map(|(_, forms)| forms[tone])
}

/// CC-CEDICT writes ü as `u:`; some word lists use `v`
fn normalize_umlaut(body: &str) -> String {
    body.replace("u:", "ü")
        .replace("U:", "Ü")
        .replace('v', "ü")
        .replace('V', "Ü")
}
