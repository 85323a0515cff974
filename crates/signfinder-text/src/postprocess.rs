//! Street-name correction heuristics for raw OCR readings
//!
//! Three transforms, applied in order:
//!
//! 1. drop tokens shorter than two characters, except at the start of
//!    the string (stray specks read as letters)
//! 2. rewrite a mid-word capital `I` to lowercase `l`, unless the
//!    reading is mostly capitals (white-on-blue plates are often set
//!    in all caps, where `I` is legitimate)
//! 3. repair a mangled leading article against the Dutch `De `/`Het `

use crate::distance::levenshtein;

fn is_cap(c: char) -> bool {
    c.is_ascii_uppercase()
}

/// More than half of the first five characters are capitals
fn is_mostly_caps(chars: &[char]) -> bool {
    let n = chars.len().min(5);
    if n == 0 {
        return false;
    }
    let caps = chars[..n].iter().filter(|&&c| is_cap(c)).count();
    caps as f64 / n as f64 > 0.5
}

fn drop_short_words(input: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for (i, token) in input.split_whitespace().enumerate() {
        if i == 0 || token.chars().count() >= 2 {
            out.push(token);
        }
    }
    out.join(" ")
}

fn fix_capital_i(chars: &mut [char]) {
    if is_mostly_caps(chars) {
        return;
    }
    let mut word_pos = 0;
    for c in chars.iter_mut() {
        if *c == ' ' {
            word_pos = 0;
            continue;
        }
        if word_pos >= 1 && *c == 'I' {
            *c = 'l';
        }
        word_pos += 1;
    }
}

const ARTICLES: [&str; 2] = ["De ", "Het "];

fn fix_leading_article(chars: &mut Vec<char>) {
    if is_mostly_caps(chars) {
        return;
    }

    // The second capital opens the actual street name; anything before
    // it should be an article. Two spurious characters at most.
    let second_cap = match chars.iter().skip(3).position(|&c| is_cap(c)) {
        Some(p) => p + 3,
        None => return,
    };
    if second_cap > 6 {
        return;
    }

    let prefix: String = chars[..second_cap].iter().collect();
    let (dist, article) = ARTICLES
        .iter()
        .map(|&a| (levenshtein(a, &prefix), a))
        .min()
        .unwrap_or((u32::MAX, ""));
    if dist <= 2 {
        chars.splice(..second_cap, article.chars());
    }
}

/// Applies the street-name heuristics to a raw OCR reading.
pub fn postprocess(raw: &str) -> String {
    let cleaned = drop_short_words(raw);
    let mut chars: Vec<char> = cleaned.chars().collect();
    fix_capital_i(&mut chars);
    fix_leading_article(&mut chars);
    chars.into_iter().collect()
}
