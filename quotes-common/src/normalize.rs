//! Text canonicalization for duplicate comparison
//!
//! Stored and incoming quotes go through the same function, so two texts
//! that differ only in case, punctuation, quotation marks or spacing compare
//! equal.

use once_cell::sync::Lazy;
use regex::Regex;

/// Unicode punctuation (Pc, Pd, Ps, Pe, Pi, Pf, Po): covers straight, curly
/// and angled quotation marks, dashes and ellipses. Grave accent and acute
/// accent are symbols (Sk) but get typed as apostrophes, so they go too.
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{P}`\x{00B4}]+").expect("punctuation pattern is valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Normalize quote text for comparison
///
/// Lowercases, strips punctuation, collapses whitespace runs to a single
/// space and trims both ends. Idempotent.
///
/// # Examples
/// ```
/// use quotes_common::normalize_text;
///
/// assert_eq!(normalize_text("Hello,  World!"), "hello world");
/// assert_eq!(normalize_text("«Я вернусь»"), "я вернусь");
/// ```
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}
