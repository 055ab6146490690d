//! Chat in the terminal, printing the reply as it streams.
//!
//! Set SCW_API_KEY in your environment and run:
//!   cargo run -p streamchat --example terminal_chat
//!
//! Optional: SCW_BASE_URL for a project-scoped endpoint, STREAMCHAT_MODEL
//! for one of the offered model ids, RUST_LOG for diagnostics.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use streamchat::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Prints only the part of the reply not yet on screen.
#[derive(Default)]
struct TerminalSurface {
    shown: Mutex<String>,
}

impl RenderSurface for TerminalSurface {
    fn render(&self, conversation: &Conversation) {
        let mut shown = self.shown.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out = std::io::stdout().lock();

        let reply = if conversation.is_busy() {
            conversation.assistant_slot()
        } else {
            conversation.last().filter(|m| m.role == Role::Assistant)
        };

        match reply {
            None if conversation.is_busy() => {
                let _ = writeln!(out, "Waiting for response...");
            }
            None => {}
            Some(reply) => match reply.content.strip_prefix(shown.as_str()) {
                Some(rest) => {
                    let _ = write!(out, "{rest}");
                    shown.push_str(rest);
                }
                // Replaced wholesale, e.g. by the failure message.
                None => {
                    let _ = write!(out, "\n{}", reply.content);
                    shown.clone_from(&reply.content);
                }
            },
        }

        if !conversation.is_busy() {
            let _ = writeln!(out);
            shown.clear();
        }
        let _ = out.flush();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut client = OpenAiCompatible::from_env()?;
    if let Ok(url) = std::env::var("SCW_BASE_URL") {
        client = client.base_url(url);
    }

    let model = match std::env::var("STREAMCHAT_MODEL") {
        Ok(id) => id.parse::<Model>()?,
        Err(_) => Model::default(),
    };
    let params = RequestParameters::for_model(model);

    let session = ChatSession::new(client);
    let surface = TerminalSurface::default();

    println!("Model: {model}. Type a message, Ctrl-D to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match session.submit(&line, &params, &surface).await {
            Submission::Ignored(IgnoreReason::EmptyInput) => continue,
            Submission::Ignored(reason) => eprintln!("not sent: {reason:?}"),
            Submission::Completed { .. } | Submission::Failed => {}
        }
    }

    Ok(())
}
