//! Interactive chat session — `recap chat`.

use anyhow::{Context, Result};
use console::style;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use recap::ConversationManager;
use recap::completion::{API_KEY_ENV, OpenAiCompletionService, TextCompletionService};
use recap::recap_config::RecapConfig;

use super::super::Cli;

pub async fn cmd_chat(project_dir: &std::path::Path, cli: &Cli) -> Result<()> {
    let config = RecapConfig::with_cli_args(
        project_dir.to_path_buf(),
        cli.model.clone(),
        cli.base_history_length,
    )?;

    let settings = config.openai_settings();
    if settings.api_key.is_none() {
        tracing::warn!("{} is not set; every reply will be empty", API_KEY_ENV);
    }

    let model = config.model_name();
    let base_history_length = config.base_history_length()?;
    tracing::debug!(%model, base_history_length, "Starting chat session");

    let service = OpenAiCompletionService::new(settings)?;
    let mut manager = ConversationManager::new(service, model, base_history_length)?;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_chat(&mut manager, stdin, &mut stdout).await?;

    tracing::debug!(
        exchanges = manager.exchange_count(),
        compactions = manager.compaction_count(),
        "Chat session ended"
    );
    Ok(())
}

/// Read lines from `input` until `exit` (any case) or end of input, printing
/// each reply to `output`.
pub async fn run_chat<S, R, W>(
    manager: &mut ConversationManager<S>,
    input: R,
    output: &mut W,
) -> Result<()>
where
    S: TextCompletionService,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(output, "Chat with the bot (type 'exit' to stop):")?;

    let mut lines = input.lines();
    loop {
        write!(output, "You: ")?;
        output.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            writeln!(output)?;
            break;
        };
        if line.eq_ignore_ascii_case("exit") {
            break;
        }

        let reply = manager.respond(&line).await;
        writeln!(output, "{} {}", style("Bot:").cyan().bold(), reply)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use recap::errors::CompletionError;

    /// Echoes the last user line back; scores every transcript as 30.
    struct Echo;

    #[async_trait]
    impl TextCompletionService for Echo {
        async fn try_complete(&self, prompt: &str, _model: &str) -> Result<String, CompletionError> {
            if prompt.starts_with("Assess the complexity") {
                return Ok("30".to_string());
            }
            if prompt.starts_with("Summarize") {
                return Ok("earlier chat".to_string());
            }
            let last_user = prompt
                .lines()
                .rev()
                .find_map(|l| l.strip_prefix("User: "))
                .unwrap_or_default();
            Ok(format!("echo {}", last_user))
        }
    }

    async fn run(input: &str, base: usize) -> (String, ConversationManager<Echo>) {
        let mut manager = ConversationManager::new(Echo, "m", base).unwrap();
        let mut out = Vec::new();
        run_chat(&mut manager, input.as_bytes(), &mut out)
            .await
            .unwrap();
        (String::from_utf8(out).unwrap(), manager)
    }

    #[tokio::test]
    async fn test_replies_until_exit() {
        let (out, manager) = run("hello\nhow are you\nEXIT\nignored\n", 10).await;

        assert!(out.starts_with("Chat with the bot (type 'exit' to stop):"));
        assert!(out.contains("echo hello"));
        assert!(out.contains("echo how are you"));
        assert!(!out.contains("ignored"));
        assert_eq!(manager.exchange_count(), 2);
    }

    #[tokio::test]
    async fn test_stops_at_end_of_input() {
        let (out, manager) = run("one\ntwo", 10).await;

        assert!(out.contains("echo two"));
        assert_eq!(manager.transcript().len(), 4);
    }

    #[tokio::test]
    async fn test_exit_must_match_whole_line() {
        let (out, manager) = run("exit now\nexit\n", 10).await;

        assert!(out.contains("echo exit now"));
        assert_eq!(manager.exchange_count(), 1);
    }

    #[tokio::test]
    async fn test_long_session_compacts() {
        let input: String = (1..=11).map(|i| format!("line {}\n", i)).collect();
        let (_, manager) = run(&input, 10).await;

        assert_eq!(manager.compaction_count(), 1);
        assert_eq!(manager.transcript().len(), 6);
        assert_eq!(manager.transcript().turns()[0].text, "earlier chat");
    }
}
