//! Adaptive History Retention
//!
//! This module decides, after every exchange, whether a transcript should be
//! compacted and how much of its tail survives.
//!
//! ## Policy
//!
//! - **Complexity Estimate**: the completion service scores the conversation;
//!   the last purely numeric token of its reply is the score, otherwise
//!   [`FALLBACK_COMPLEXITY_SCORE`]
//! - **Adaptive Length**: `max(base, min(MAX_HISTORY_LENGTH, score / COMPLEXITY_PER_EXCHANGE))`
//! - **Trigger**: more than `adaptive * 2` turns recorded
//! - **Tail**: the last `adaptive / 2` turns are kept after the summary turn
//!
//! ## Usage
//!
//! ```ignore
//! use recap::compaction::{RetentionPolicy, resolve_complexity_score};
//!
//! let policy = RetentionPolicy::new(10)?;
//! let decision = policy.evaluate(resolve_complexity_score(&raw), transcript.len());
//! if decision.compact {
//!     transcript.compact(summary, decision.keep_turns);
//! }
//! ```

mod complexity;
mod config;
mod policy;
mod summary;

pub use complexity::{parse_complexity_score, resolve_complexity_score};
pub use config::parse_base_history_length;
pub use policy::{RetentionDecision, RetentionPolicy};
pub use summary::CompactionRecord;

/// Score used when the complexity estimate cannot be read.
pub const FALLBACK_COMPLEXITY_SCORE: u32 = 20;

/// Hard ceiling on the adaptive length, in exchanges.
pub const MAX_HISTORY_LENGTH: usize = 50;

/// Default floor on the adaptive length, in exchanges.
pub const DEFAULT_BASE_HISTORY_LENGTH: usize = 10;

/// Complexity points per retained exchange.
pub const COMPLEXITY_PER_EXCHANGE: u32 = 5;
