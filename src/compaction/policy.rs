//! Adaptive retention decisions.

use super::{COMPLEXITY_PER_EXCHANGE, DEFAULT_BASE_HISTORY_LENGTH, MAX_HISTORY_LENGTH};
use crate::errors::ConfigError;

/// Outcome of evaluating the policy against a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionDecision {
    /// Score the decision was derived from.
    pub complexity_score: u32,
    /// Exchange-count floor for this turn.
    pub adaptive_length: usize,
    /// Whether the transcript should be compacted now.
    pub compact: bool,
    /// Turns (not exchanges) kept after the summary turn.
    pub keep_turns: usize,
}

/// Decides how much history to keep from a complexity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Minimum number of exchanges before compaction is considered.
    base_history_length: usize,
}

impl RetentionPolicy {
    /// Create a policy with the given floor, which must be at least 1.
    pub fn new(base_history_length: usize) -> Result<Self, ConfigError> {
        if base_history_length == 0 {
            return Err(ConfigError::InvalidBaseHistoryLength(base_history_length));
        }
        Ok(Self {
            base_history_length,
        })
    }

    pub fn base_history_length(&self) -> usize {
        self.base_history_length
    }

    /// `max(base, min(ceiling, score / 5))` with floor division.
    pub fn adaptive_length(&self, complexity_score: u32) -> usize {
        let scaled = (complexity_score / COMPLEXITY_PER_EXCHANGE) as usize;
        self.base_history_length.max(scaled.min(MAX_HISTORY_LENGTH))
    }

    /// Compaction triggers once the transcript holds more turns than
    /// `adaptive_length` exchanges would produce.
    pub fn should_compact(&self, transcript_turns: usize, adaptive_length: usize) -> bool {
        transcript_turns > adaptive_length.saturating_mul(2)
    }

    /// Turns preserved after the summary. Counted in turns, so an odd value
    /// splits an exchange.
    pub fn tail_length(&self, adaptive_length: usize) -> usize {
        adaptive_length / 2
    }

    /// Evaluate the policy for a transcript of `transcript_turns` turns.
    pub fn evaluate(&self, complexity_score: u32, transcript_turns: usize) -> RetentionDecision {
        let adaptive_length = self.adaptive_length(complexity_score);
        RetentionDecision {
            complexity_score,
            adaptive_length,
            compact: self.should_compact(transcript_turns, adaptive_length),
            keep_turns: self.tail_length(adaptive_length),
        }
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            base_history_length: DEFAULT_BASE_HISTORY_LENGTH,
        }
    }
}
