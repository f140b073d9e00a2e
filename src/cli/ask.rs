//! Assistant CLI command
//!
//! `kuberium ask "question"` sends one message. Without a message the command
//! reads questions from stdin until EOF or an empty line, keeping the
//! conversation history between turns.

use std::io::{self, BufRead, Write};
use std::time::Duration;

use tracing::debug;

use crate::assistant::{Assistant, Conversation, HttpAssistant};
use crate::config::Settings;
use crate::error::{KuberiumError, KuberiumResult};

/// Handle the ask command
///
/// `endpoint` overrides the one in settings.
pub fn handle_ask_command(
    settings: &Settings,
    endpoint: Option<String>,
    message: Option<String>,
) -> KuberiumResult<()> {
    let endpoint = endpoint
        .or_else(|| settings.assistant.endpoint.clone())
        .ok_or_else(|| {
            KuberiumError::Config(
                "No assistant endpoint configured. Set assistant.endpoint in config.json \
                 or KUBERIUM_ASSISTANT_URL"
                    .into(),
            )
        })?;

    let assistant = HttpAssistant::new(
        &endpoint,
        Duration::from_secs(settings.assistant.timeout_secs),
    )?;
    let mut conversation = Conversation::new(settings.assistant.history_limit);

    match message {
        Some(message) => {
            let reply = conversation.send(&assistant, &message)?;
            println!("{}", reply);
            Ok(())
        }
        None => chat_loop(&assistant, &mut conversation),
    }
}

fn chat_loop(assistant: &dyn Assistant, conversation: &mut Conversation) -> KuberiumResult<()> {
    println!("Ask about your finances. Empty line or Ctrl-D to quit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        if line.trim().is_empty() {
            break;
        }

        match conversation.send(assistant, &line) {
            Ok(reply) => println!("{}\n", reply),
            Err(e) if e.is_retryable() => {
                debug!(error = %e, "assistant turn failed");
                eprintln!("{}. Try again.", e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}
