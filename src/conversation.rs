//! Conversation manager: one transcript, one retention policy.

use crate::compaction::{
    CompactionRecord, RetentionDecision, RetentionPolicy, resolve_complexity_score,
};
use crate::completion::TextCompletionService;
use crate::errors::ConfigError;
use crate::transcript::Transcript;

/// Where a manager is within a single `respond` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManagerState {
    #[default]
    Idle,
    AwaitingReply,
    AwaitingComplexity,
    AwaitingSummary,
}

/// What the retention policy decided for the most recent exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    pub complexity_score: u32,
    pub adaptive_length: usize,
    pub compacted: bool,
}

/// Owns a running transcript and compacts it after every exchange.
///
/// The manager:
/// 1. Builds the reply prompt from the transcript
/// 2. Records the exchange
/// 3. Asks the service how complex the conversation has become
/// 4. Summarizes and truncates when the transcript outgrows the adaptive length
///
/// `respond` takes `&mut self`, so a manager serves exactly one session at a
/// time. Independent sessions need independent managers.
pub struct ConversationManager<S: TextCompletionService> {
    service: S,
    model: String,
    policy: RetentionPolicy,
    transcript: Transcript,
    state: ManagerState,
    last_outcome: Option<TurnOutcome>,
    last_compaction: Option<CompactionRecord>,
    compaction_count: usize,
}

impl<S: TextCompletionService> ConversationManager<S> {
    /// Create a manager. `base_history_length` must be at least 1.
    pub fn new(
        service: S,
        model: impl Into<String>,
        base_history_length: usize,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            service,
            model: model.into(),
            policy: RetentionPolicy::new(base_history_length)?,
            transcript: Transcript::new(),
            state: ManagerState::Idle,
            last_outcome: None,
            last_compaction: None,
            compaction_count: 0,
        })
    }

    /// Create a manager with the default base history length.
    pub fn with_defaults(service: S, model: impl Into<String>) -> Self {
        Self {
            service,
            model: model.into(),
            policy: RetentionPolicy::default(),
            transcript: Transcript::new(),
            state: ManagerState::Idle,
            last_outcome: None,
            last_compaction: None,
            compaction_count: 0,
        }
    }

    /// Answer `user_input` and fold the exchange into the transcript.
    ///
    /// Never fails: a reply the service could not produce comes back as an
    /// empty string and is recorded as such.
    pub async fn respond(&mut self, user_input: &str) -> String {
        let prompt = self.transcript.render_prompt(user_input);

        self.transition(ManagerState::AwaitingReply);
        let reply = self.service.complete(&prompt, &self.model).await;

        self.transcript.push_exchange(user_input, &reply);
        self.apply_retention().await;

        self.transition(ManagerState::Idle);
        reply
    }

    /// Score the transcript and compact it if it has outgrown the adaptive
    /// length.
    async fn apply_retention(&mut self) {
        self.transition(ManagerState::AwaitingComplexity);
        let history = self.transcript.rendered_turns();
        let raw = self
            .service
            .estimate_complexity(&history, &self.model)
            .await;
        let score = resolve_complexity_score(&raw);

        let decision = self.policy.evaluate(score, self.transcript.len());
        tracing::debug!(
            complexity_score = decision.complexity_score,
            adaptive_length = decision.adaptive_length,
            turns = self.transcript.len(),
            compact = decision.compact,
            "Evaluated retention policy"
        );

        if decision.compact {
            self.compact(&decision).await;
        }

        self.last_outcome = Some(TurnOutcome {
            complexity_score: decision.complexity_score,
            adaptive_length: decision.adaptive_length,
            compacted: decision.compact,
        });
    }

    async fn compact(&mut self, decision: &RetentionDecision) {
        self.transition(ManagerState::AwaitingSummary);
        let flattened = self.transcript.flatten();
        let summary = self.service.summarize(&flattened, &self.model).await;

        let turns_before = self.transcript.len();
        let original_chars = self.transcript.char_count();
        // An empty summary still replaces the prefix
        self.transcript.compact(summary.clone(), decision.keep_turns);

        let record = CompactionRecord::new(
            decision,
            turns_before,
            self.transcript.len(),
            original_chars,
            &summary,
        );
        tracing::info!("{}", record.status());

        self.compaction_count += 1;
        self.last_compaction = Some(record);
    }

    fn transition(&mut self, next: ManagerState) {
        tracing::trace!(from = ?self.state, to = ?next, "Conversation state");
        self.state = next;
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> ManagerState {
        self.state
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_history_length(&self) -> usize {
        self.policy.base_history_length()
    }

    /// Number of Bot turns currently in the transcript.
    pub fn exchange_count(&self) -> usize {
        self.transcript.exchange_count()
    }

    pub fn last_outcome(&self) -> Option<&TurnOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn last_compaction(&self) -> Option<&CompactionRecord> {
        self.last_compaction.as_ref()
    }

    pub fn compaction_count(&self) -> usize {
        self.compaction_count
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

impl<S: TextCompletionService> std::fmt::Debug for ConversationManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationManager")
            .field("model", &self.model)
            .field("policy", &self.policy)
            .field("turns", &self.transcript.len())
            .field("state", &self.state)
            .field("compaction_count", &self.compaction_count)
            .finish()
    }
}
