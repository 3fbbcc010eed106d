//! Compaction records.

use chrono::{DateTime, Utc};

use super::RetentionDecision;

/// What a single compaction did to the transcript.
#[derive(Debug, Clone)]
pub struct CompactionRecord {
    /// When the compaction was applied.
    pub generated_at: DateTime<Utc>,
    /// Complexity score that sized the retained tail.
    pub complexity_score: u32,
    /// Adaptive length in effect.
    pub adaptive_length: usize,
    /// Transcript length in turns before compaction.
    pub turns_before: usize,
    /// Transcript length in turns after compaction, summary turn included.
    pub turns_after: usize,
    /// Characters of turn text before compaction.
    pub original_chars: usize,
    /// Characters in the summary turn.
    pub summary_chars: usize,
    /// The summary text placed at the head of the transcript.
    pub summary_text: String,
}

impl CompactionRecord {
    pub fn new(
        decision: &RetentionDecision,
        turns_before: usize,
        turns_after: usize,
        original_chars: usize,
        summary_text: &str,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            complexity_score: decision.complexity_score,
            adaptive_length: decision.adaptive_length,
            turns_before,
            turns_after,
            original_chars,
            summary_chars: summary_text.chars().count(),
            summary_text: summary_text.to_string(),
        }
    }

    /// Number of turns folded into the summary.
    pub fn turns_summarized(&self) -> usize {
        // turns_after includes the summary turn itself
        self.turns_before
            .saturating_sub(self.turns_after.saturating_sub(1))
    }

    /// Fraction of characters removed by the summary.
    pub fn compression_ratio(&self) -> f32 {
        if self.original_chars == 0 {
            return 1.0;
        }
        1.0 - (self.summary_chars as f32 / self.original_chars as f32)
    }

    /// Get a brief status for logging.
    pub fn status(&self) -> String {
        format!(
            "Compacted {} -> {} turns (complexity {}, adaptive length {}): {} -> {} chars",
            self.turns_before,
            self.turns_after,
            self.complexity_score,
            self.adaptive_length,
            self.original_chars,
            self.summary_chars,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decision() -> RetentionDecision {
        RetentionDecision {
            complexity_score: 30,
            adaptive_length: 10,
            compact: true,
            keep_turns: 5,
        }
    }

    #[test]
    fn test_record_counts() {
        let record = CompactionRecord::new(&decision(), 22, 6, 400, "short summary");

        assert_eq!(record.summary_chars, 13);
        assert_eq!(record.turns_summarized(), 17);
        assert_eq!(record.summary_text, "short summary");
    }

    #[test]
    fn test_compression_ratio() {
        let record = CompactionRecord::new(&decision(), 22, 6, 100, &"x".repeat(10));
        assert!((record.compression_ratio() - 0.9).abs() < 0.01);

        let empty = CompactionRecord::new(&decision(), 0, 1, 0, "");
        assert_eq!(empty.compression_ratio(), 1.0);
    }

    #[test]
    fn test_status() {
        let record = CompactionRecord::new(&decision(), 22, 6, 400, "s");
        let status = record.status();

        assert!(status.contains("22 -> 6 turns"));
        assert!(status.contains("complexity 30"));
        assert!(status.contains("400 -> 1 chars"));
    }
}
