//! Interactive session driver.
//!
//! Reads one line at a time, dispatches slash-commands locally, and hands
//! everything else to the agent, forwarding streamed fragments to the
//! output as they arrive. Generic over async reader/writer so tests can
//! script a whole session. Turn-level errors are classified for display and
//! never end the session; Ctrl-C cancels an in-flight turn, or ends the
//! session when pressed at the prompt.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::agent::{Agent, CancelToken, TurnOutcome};
use crate::error::Error;
use crate::model::ModelSession;
use crate::types::events::TurnEvent;
use crate::Result;

const PROMPT: &str = "you> ";

const HELP: &str = "\
commands:
  /help    show this help
  /clear   forget the conversation so far
  /status  show session state
  /quit    leave (also /exit, /q, Ctrl-C at the prompt)
anything else is sent to your wingman.";

pub struct Session<M: ModelSession> {
    agent: Agent<M>,
    cancel: CancelToken,
    /// Extra lines shown by /status, e.g. model id and backend URLs.
    status_extras: Vec<(&'static str, String)>,
}

impl<M: ModelSession> Session<M> {
    pub fn new(agent: Agent<M>) -> Self {
        Self {
            agent,
            cancel: CancelToken::new(),
            status_extras: Vec::new(),
        }
    }

    pub fn status_line(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.status_extras.push((key, value.into()));
        self
    }

    pub fn agent(&self) -> &Agent<M> {
        &self.agent
    }

    /// Drive the session until /quit, EOF or Ctrl-C at the prompt.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let line = tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => line,
                    None => break, // EOF behaves like /quit
                },
                _ = tokio::signal::ctrl_c() => break,
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(command) = line.strip_prefix('/') {
                if self.dispatch_command(command, &mut output).await? {
                    break;
                }
                continue;
            }

            self.user_turn(line, &mut output).await?;
        }

        output.write_all(b"bye.\n").await?;
        output.flush().await?;
        Ok(())
    }

    /// Returns true when the session should end.
    async fn dispatch_command<W>(&mut self, command: &str, output: &mut W) -> Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        match command.to_ascii_lowercase().as_str() {
            "help" => {
                output.write_all(HELP.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            "clear" => {
                self.agent.clear_history();
                output.write_all(b"conversation cleared.\n").await?;
            }
            "status" => {
                let mut report = format!("turns: {}\n", self.agent.history().len());
                for (key, value) in &self.status_extras {
                    report.push_str(&format!("{key}: {value}\n"));
                }
                output.write_all(report.as_bytes()).await?;
            }
            "quit" | "exit" | "q" => return Ok(true),
            other => {
                output
                    .write_all(format!("unknown command '/{other}' — try /help\n").as_bytes())
                    .await?;
            }
        }
        output.flush().await?;
        Ok(false)
    }

    async fn user_turn<W>(&mut self, line: &str, output: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        self.cancel.reset();
        let cancel = self.cancel.clone();

        // Fragments flow through a channel so they can be written while the
        // turn future is still being polled.
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut turn = Box::pin(self.agent.run_turn(line, &cancel, move |event| {
            let _ = tx.send(event);
        }));

        let outcome = loop {
            tokio::select! {
                result = &mut turn => break result,
                event = rx.recv() => {
                    if let Some(event) = event {
                        write_event(output, event).await?;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    cancel.cancel();
                }
            }
        };

        // The sender lives inside the turn future; drop it so the channel
        // closes, then drain whatever was still buffered.
        drop(turn);
        while let Some(event) = rx.recv().await {
            write_event(output, event).await?;
        }

        match outcome {
            Ok(TurnOutcome::Completed { .. }) => {
                output.write_all(b"\n\n").await?;
            }
            Ok(TurnOutcome::BudgetExhausted { .. }) => {
                output
                    .write_all(b"\n[stopped: too many tool calls this turn]\n\n")
                    .await?;
            }
            Ok(TurnOutcome::Cancelled) => {
                output.write_all(b"\n[cancelled]\n\n").await?;
            }
            Err(e) => {
                let display = classify(&e);
                tracing::error!(error = %e, "turn failed");
                output.write_all(format!("{display}\n\n").as_bytes()).await?;
            }
        }
        output.flush().await?;
        Ok(())
    }
}

async fn write_event<W>(output: &mut W, event: TurnEvent) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    match event {
        TurnEvent::Fragment(text) => {
            output.write_all(text.as_bytes()).await?;
        }
        TurnEvent::ToolRound(names) => {
            output
                .write_all(format!("  [using {}]\n", names.join(", ")).as_bytes())
                .await?;
        }
    }
    output.flush().await?;
    Ok(())
}

/// Three display buckets: unreachable backend, credential/configuration,
/// everything else. Classification affects only the message, never control
/// flow — the session always returns to the prompt.
fn classify(error: &Error) -> String {
    match error {
        Error::Remote {
            backend,
            status: None,
            ..
        } => format!("error: the {backend} backend is unreachable — is it running?"),
        Error::Configuration { message } | Error::Model { message } => {
            format!("error: model or credential problem — {message}")
        }
        other => format!("error: something unexpected went wrong — {other}"),
    }
}
