pub mod compaction;
pub mod completion;
pub mod conversation;
pub mod errors;
pub mod recap_config;
pub mod transcript;

pub use conversation::{ConversationManager, ManagerState, TurnOutcome};
pub use transcript::{Speaker, Transcript, Turn};
