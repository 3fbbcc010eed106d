//! History length configuration parsing.

use anyhow::{Context, Result};

use super::MAX_HISTORY_LENGTH;

/// Parse a base history length from a string (environment or CLI).
///
/// Accepts positive integers. Values above [`MAX_HISTORY_LENGTH`] are
/// accepted: the floor then dominates the ceiling and the adaptive length is
/// pinned to the configured base.
///
/// # Examples
///
/// ```ignore
/// use recap::compaction::parse_base_history_length;
///
/// assert_eq!(parse_base_history_length("10")?, 10);
/// assert!(parse_base_history_length("0").is_err());
/// ```
pub fn parse_base_history_length(s: &str) -> Result<usize> {
    let s = s.trim();

    if s.is_empty() {
        anyhow::bail!("Base history length cannot be empty");
    }

    let length: usize = s
        .parse()
        .with_context(|| format!("Invalid base history length: {}", s))?;

    if length == 0 {
        anyhow::bail!("Base history length must be at least 1");
    }

    if length > MAX_HISTORY_LENGTH {
        tracing::debug!(
            length,
            ceiling = MAX_HISTORY_LENGTH,
            "Base history length exceeds ceiling; complexity will not affect retention"
        );
    }

    Ok(length)
}
