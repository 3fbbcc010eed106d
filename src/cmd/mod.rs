//! CLI command implementations.
//!
//! | Module   | Commands handled |
//! |----------|------------------|
//! | `chat`   | `Chat` (default) |
//! | `config` | `Config`         |

pub mod chat;
pub mod config;

pub use chat::cmd_chat;
pub use config::cmd_config;
