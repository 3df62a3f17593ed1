//! Session driver behavior with scripted input and a scripted model:
//! slash commands, error display and session lifetime.

mod common;

use common::{text_step, ScriptedModel};
use wingman::tools::ToolRegistry;
use wingman::{Agent, Session};

async fn drive(session: &mut Session<ScriptedModel>, input: &str) -> String {
    let mut output = Vec::new();
    session
        .run(input.as_bytes(), &mut output)
        .await
        .expect("session never fails on turn errors");
    String::from_utf8(output).expect("session output is utf-8")
}

fn session_with(steps: Vec<Vec<wingman::ModelEvent>>) -> Session<ScriptedModel> {
    let agent = Agent::new(ScriptedModel::new(steps), ToolRegistry::new());
    Session::new(agent)
}

#[tokio::test]
async fn quit_ends_the_session() {
    let mut session = session_with(vec![]);
    let output = drive(&mut session, "/quit\n").await;
    assert!(output.contains("bye."));
}

#[tokio::test]
async fn quit_is_case_insensitive_and_has_aliases() {
    for line in ["/QUIT\n", "/Exit\n", "/q\n"] {
        let mut session = session_with(vec![]);
        let output = drive(&mut session, line).await;
        assert!(output.contains("bye."), "{line:?} should end the session");
    }
}

#[tokio::test]
async fn eof_behaves_like_quit() {
    let mut session = session_with(vec![]);
    let output = drive(&mut session, "").await;
    assert!(output.contains("bye."));
}

#[tokio::test]
async fn turn_output_streams_and_status_reflects_history() {
    let mut session = session_with(vec![text_step("nice to meet you")])
        .status_line("model", "scripted-model");

    let output = drive(
        &mut session,
        "hello\n/status\n/clear\n/status\n/quit\n",
    )
    .await;

    assert!(output.contains("nice to meet you"));
    // One completed turn: user + assistant.
    assert!(output.contains("turns: 2"));
    assert!(output.contains("model: scripted-model"));
    assert!(output.contains("conversation cleared."));
    assert!(output.contains("turns: 0"));
}

#[tokio::test]
async fn help_lists_commands() {
    let mut session = session_with(vec![]);
    let output = drive(&mut session, "/help\n/quit\n").await;
    assert!(output.contains("/clear"));
    assert!(output.contains("/status"));
}

#[tokio::test]
async fn unknown_command_is_reported_locally() {
    let mut session = session_with(vec![]);
    let output = drive(&mut session, "/frobnicate\n/quit\n").await;
    assert!(output.contains("unknown command '/frobnicate'"));
}

#[tokio::test]
async fn a_failed_turn_does_not_end_the_session() {
    // Empty script: the model call itself fails.
    let mut session = session_with(vec![]);
    let output = drive(&mut session, "hi\n/quit\n").await;

    assert!(output.contains("model or credential problem"));
    assert!(output.contains("bye."));
}

#[tokio::test]
async fn blank_lines_are_ignored() {
    let mut session = session_with(vec![]);
    let output = drive(&mut session, "\n   \n/quit\n").await;
    // No error lines, just prompts and the goodbye.
    assert!(!output.contains("error:"));
    assert!(output.contains("bye."));
}
