//! Text completion capability.
//!
//! The conversation core only needs three things from a language model: a
//! reply to a prompt, a summary of some text, and a complexity estimate of a
//! transcript. The latter two are fixed wrappers around the first, so an
//! implementation supplies [`TextCompletionService::try_complete`] and gets
//! the rest for free.
//!
//! Failures stop at this boundary: the provided methods log them and hand
//! back an empty string.

mod openai;

pub use openai::{API_KEY_ENV, OpenAiCompletionService, OpenAiSettings};

use async_trait::async_trait;

use crate::errors::CompletionError;

/// Abstraction over a text-completion backend.
/// Real implementation: `OpenAiCompletionService`.
#[async_trait]
pub trait TextCompletionService: Send + Sync {
    /// Produce text for `prompt`, reporting why it could not.
    async fn try_complete(&self, prompt: &str, model: &str) -> Result<String, CompletionError>;

    /// Produce text for `prompt`, or an empty string on failure.
    async fn complete(&self, prompt: &str, model: &str) -> String {
        match self.try_complete(prompt, model).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, model, "Completion failed");
                String::new()
            }
        }
    }

    /// Summarize `text`, or an empty string on failure.
    async fn summarize(&self, text: &str, model: &str) -> String {
        self.complete(&summary_prompt(text), model).await
    }

    /// Ask for a numeric complexity score of `history`. Returns raw text;
    /// reading the number out of it is the caller's job.
    async fn estimate_complexity(&self, history: &[String], model: &str) -> String {
        self.complete(&complexity_prompt(history), model).await
    }
}

/// Wrapper prompt used by [`TextCompletionService::summarize`].
pub fn summary_prompt(text: &str) -> String {
    format!("Summarize this conversation:\n{}", text)
}

/// Wrapper prompt used by [`TextCompletionService::estimate_complexity`].
pub fn complexity_prompt(history: &[String]) -> String {
    format!(
        "Assess the complexity of this conversation:\n{}\n\nComplexity Score:",
        history.join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records prompts and replies with a fixed result.
    struct Recording {
        result: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl Recording {
        fn ok(text: &str) -> Self {
            Self {
                result: Some(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                result: None,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextCompletionService for Recording {
        async fn try_complete(&self, prompt: &str, _model: &str) -> Result<String, CompletionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.result.clone().ok_or(CompletionError::EmptyChoices)
        }
    }

    #[test]
    fn test_summary_prompt() {
        assert_eq!(
            summary_prompt("User: hi Bot: hello"),
            "Summarize this conversation:\nUser: hi Bot: hello"
        );
    }

    #[test]
    fn test_complexity_prompt_space_joins_history() {
        let history = vec!["User: a".to_string(), "Bot: b".to_string()];
        assert_eq!(
            complexity_prompt(&history),
            "Assess the complexity of this conversation:\nUser: a Bot: b\n\nComplexity Score:"
        );
    }

    #[tokio::test]
    async fn test_complete_passes_text_through() {
        let service = Recording::ok("reply");
        assert_eq!(service.complete("prompt", "m").await, "reply");
    }

    #[tokio::test]
    async fn test_failures_become_empty_text() {
        let service = Recording::failing();

        assert_eq!(service.complete("p", "m").await, "");
        assert_eq!(service.summarize("t", "m").await, "");
        assert_eq!(service.estimate_complexity(&[], "m").await, "");
    }

    #[tokio::test]
    async fn test_wrappers_send_wrapped_prompts() {
        let service = Recording::ok("ok");
        service.summarize("text", "m").await;
        service
            .estimate_complexity(&["User: x".to_string()], "m")
            .await;

        let prompts = service.prompts.lock().unwrap();
        assert_eq!(prompts[0], "Summarize this conversation:\ntext");
        assert!(prompts[1].starts_with("Assess the complexity"));
        assert!(prompts[1].ends_with("Complexity Score:"));
    }
}
