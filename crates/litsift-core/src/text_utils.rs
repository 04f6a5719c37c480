use once_cell::sync::Lazy;
use regex::Regex;

/// Standalone 4-digit year in 2010–2029.
pub static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20[1-2][0-9])\b").unwrap());

/// First year in 2010–2029 appearing anywhere in `text`.
pub fn extract_year(text: &str) -> Option<String> {
    YEAR_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Cut `s` to at most `max_chars` characters, respecting UTF-8 boundaries.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// First author's surname: the part before the first `separator`, then
/// before the first comma.
///
/// `"Smith, J.; Doe, A."` → `"Smith"`.
pub fn first_author_surname(authors: &str, separator: char) -> String {
    let first = authors.split(separator).next().unwrap_or("").trim();
    first.split(',').next().unwrap_or("").trim().to_string()
}

/// The first `max_words` purely alphabetic whitespace-separated tokens of
/// `description`, joined by single spaces.
///
/// Tokens carrying digits or punctuation ("2021", "learning,") are skipped,
/// not truncated.
pub fn title_fragment(description: &str, max_words: usize) -> String {
    description
        .split_whitespace()
        .filter(|w| w.chars().all(char::is_alphabetic))
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}
