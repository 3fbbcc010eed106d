//! Typed error hierarchy for recap.
//!
//! Two enums cover the two failure domains:
//! - `CompletionError` — the text-completion capability could not produce text
//! - `ConfigError` — a conversation was configured with invalid parameters

use thiserror::Error;

/// Errors from a single call to the text-completion capability.
///
/// These never escape `ConversationManager::respond`; the service collapses
/// them to an empty string at the trait boundary.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Missing API credential: set {var}")]
    MissingCredential { var: String },

    #[error("Completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Completion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion response contained no choices")]
    EmptyChoices,
}

/// Errors from constructing a conversation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("base_history_length must be at least 1, got {0}")]
    InvalidBaseHistoryLength(usize),
}
