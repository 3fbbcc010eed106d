//! Speaker-tagged conversation transcript.

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
    /// Synthetic turn standing in for a compacted prefix.
    Summary,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::User => write!(f, "User"),
            Speaker::Bot => write!(f, "Bot"),
            Speaker::Summary => write!(f, "Summary"),
        }
    }
}

/// One speaker-tagged unit of transcript text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Speaker::Bot, text)
    }

    pub fn summary(text: impl Into<String>) -> Self {
        Self::new(Speaker::Summary, text)
    }

    /// Render as `"<Speaker>: <text>"`.
    pub fn render(&self) -> String {
        format!("{}: {}", self.speaker, self.text)
    }
}

/// Ordered sequence of turns in conversation order.
///
/// Grows by whole exchanges and is only ever replaced wholesale by
/// [`Transcript::compact`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of Bot turns currently in the transcript.
    pub fn exchange_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.speaker == Speaker::Bot)
            .count()
    }

    /// Append one User turn followed by one Bot turn.
    pub fn push_exchange(&mut self, user_input: &str, reply: &str) {
        self.turns.push(Turn::user(user_input));
        self.turns.push(Turn::bot(reply));
    }

    /// Each turn rendered, in order.
    pub fn rendered_turns(&self) -> Vec<String> {
        self.turns.iter().map(Turn::render).collect()
    }

    /// Build the reply prompt for the next user input.
    ///
    /// Turns are joined by newlines, then the new user line and the bot cue
    /// follow on their own lines.
    pub fn render_prompt(&self, user_input: &str) -> String {
        format!(
            "{}\nUser: {}\nBot:",
            self.rendered_turns().join("\n"),
            user_input
        )
    }

    /// All turns rendered and joined by a single space. Turn boundaries are
    /// not recoverable from the result.
    pub fn flatten(&self) -> String {
        self.rendered_turns().join(" ")
    }

    /// Total characters across all turn texts.
    pub fn char_count(&self) -> usize {
        self.turns.iter().map(|t| t.text.chars().count()).sum()
    }

    /// Replace the whole transcript with a summary turn followed by the last
    /// `keep` turns. `keep` counts turns, so it can split an exchange.
    pub fn compact(&mut self, summary: String, keep: usize) {
        let start = self.turns.len().saturating_sub(keep);
        let mut compacted = Vec::with_capacity(keep.min(self.turns.len()) + 1);
        compacted.push(Turn::summary(summary));
        compacted.extend(self.turns.drain(start..));
        self.turns = compacted;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript_with(exchanges: usize) -> Transcript {
        let mut t = Transcript::new();
        for i in 1..=exchanges {
            t.push_exchange(&format!("q{}", i), &format!("a{}", i));
        }
        t
    }

    #[test]
    fn test_speaker_labels() {
        assert_eq!(Speaker::User.to_string(), "User");
        assert_eq!(Speaker::Bot.to_string(), "Bot");
        assert_eq!(Speaker::Summary.to_string(), "Summary");
    }

    #[test]
    fn test_push_exchange_appends_user_then_bot() {
        let mut t = Transcript::new();
        t.push_exchange("hello", "hi there");

        assert_eq!(t.len(), 2);
        assert_eq!(t.turns()[0], Turn::user("hello"));
        assert_eq!(t.turns()[1], Turn::bot("hi there"));
        assert_eq!(t.exchange_count(), 1);
    }

    #[test]
    fn test_render_prompt_empty_transcript() {
        let t = Transcript::new();
        assert_eq!(t.render_prompt("hi"), "\nUser: hi\nBot:");
    }

    #[test]
    fn test_render_prompt_with_history() {
        let t = transcript_with(1);
        assert_eq!(t.render_prompt("next"), "User: q1\nBot: a1\nUser: next\nBot:");
    }

    #[test]
    fn test_flatten_is_space_joined() {
        let t = transcript_with(2);
        assert_eq!(t.flatten(), "User: q1 Bot: a1 User: q2 Bot: a2");
    }

    #[test]
    fn test_compact_keeps_last_turns() {
        let mut t = transcript_with(3);
        t.compact("sum".to_string(), 3);

        assert_eq!(t.len(), 4);
        assert_eq!(t.turns()[0], Turn::summary("sum"));
        // Tail of three turns starts mid-exchange
        assert_eq!(t.turns()[1], Turn::bot("a2"));
        assert_eq!(t.turns()[3], Turn::bot("a3"));
    }

    #[test]
    fn test_compact_zero_keep_leaves_only_summary() {
        let mut t = transcript_with(2);
        t.compact(String::new(), 0);

        assert_eq!(t.turns(), &[Turn::summary("")]);
    }

    #[test]
    fn test_compact_keep_larger_than_transcript() {
        let mut t = transcript_with(1);
        t.compact("s".to_string(), 10);

        assert_eq!(t.len(), 3);
        assert_eq!(t.turns()[0].speaker, Speaker::Summary);
    }

    #[test]
    fn test_char_count() {
        let t = transcript_with(1);
        assert_eq!(t.char_count(), 4);
    }
}
