//! Reading a complexity score out of free-form completion text.

use super::FALLBACK_COMPLEXITY_SCORE;

/// Find the last whitespace-delimited token made only of ASCII digits.
///
/// Tokens carrying punctuation (`"42."`, `"7/10"`) are skipped. A digit run
/// too large for `u32` saturates rather than being rejected.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_complexity_score("Complexity Score: 87"), Some(87));
/// assert_eq!(parse_complexity_score("The score is 42."), None);
/// ```
pub fn parse_complexity_score(text: &str) -> Option<u32> {
    text.split_whitespace()
        .rev()
        .find(|token| token.bytes().all(|b| b.is_ascii_digit()))
        .map(|token| token.parse().unwrap_or(u32::MAX))
}

/// Parse a score, falling back to [`FALLBACK_COMPLEXITY_SCORE`].
pub fn resolve_complexity_score(text: &str) -> u32 {
    match parse_complexity_score(text) {
        Some(score) => score,
        None => {
            tracing::debug!(
                response = text,
                fallback = FALLBACK_COMPLEXITY_SCORE,
                "No numeric complexity score in response, using fallback"
            );
            FALLBACK_COMPLEXITY_SCORE
        }
    }
}
