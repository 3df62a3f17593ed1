//! End-to-end exercises of the tool-orchestration loop against a scripted
//! model: join barrier, round budget, cancellation and history recording.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use common::{text_step, tool_step, ScriptedModel};
use wingman::schema::{Field, InputSchema};
use wingman::tools::{RegisteredTool, ToolRegistry};
use wingman::types::message::{ContentBlock, MessageContent};
use wingman::{
    Agent, CancelToken, KnowledgeClient, KnowledgeTools, Role, TelegramBridge, TurnEvent,
    TurnOutcome,
};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Registry with a single side-effect-free tool that counts executions.
fn tally_registry(counter: Arc<AtomicUsize>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry
        .register(RegisteredTool::new(
            "tally",
            "Returns an execution counter.",
            InputSchema::new().field(Field::string("tag").required()),
            move |args| {
                let counter = counter.clone();
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({ "tag": args.get("tag").cloned(), "n": n }))
                }
            },
        ))
        .unwrap();
    registry
}

#[tokio::test]
async fn text_only_turn_completes_and_records_two_turns() {
    let model = ScriptedModel::new(vec![text_step("hi there")]);
    let mut agent = Agent::new(model, ToolRegistry::new());

    let mut fragments = String::new();
    let outcome = agent
        .run_turn("hello", &CancelToken::new(), |event| {
            if let TurnEvent::Fragment(text) = event {
                fragments.push_str(&text);
            }
        })
        .await
        .unwrap();

    assert!(matches!(outcome, TurnOutcome::Completed { ref text } if text == "hi there"));
    assert_eq!(fragments, "hi there");

    let turns = agent.history().snapshot();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].content, "hi there");
}

#[tokio::test]
async fn join_barrier_returns_all_results_before_the_next_step() {
    let counter = Arc::new(AtomicUsize::new(0));
    let model = ScriptedModel::new(vec![
        tool_step(vec![
            ("t1", "tally", json!({ "tag": "a" })),
            ("t2", "tally", json!({ "tag": "b" })),
            ("t3", "tally", json!({ "tag": "c" })),
        ]),
        text_step("done"),
    ]);
    let prompts = model.prompt_log();
    let mut agent = Agent::new(model, tally_registry(counter.clone()));

    let outcome = agent
        .run_turn("tally three tags", &CancelToken::new(), |_| {})
        .await
        .unwrap();

    assert!(matches!(outcome, TurnOutcome::Completed { .. }));
    assert_eq!(counter.load(Ordering::SeqCst), 3);

    // The second prompt must already carry all three results, matched by id.
    let prompts = prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    let second = &prompts[1];
    let last = second.messages.last().unwrap();
    assert_eq!(last.role, Role::User);
    let MessageContent::Blocks(blocks) = &last.content else {
        panic!("expected tool-result blocks, got plain text");
    };
    let mut ids: Vec<&str> = blocks
        .iter()
        .map(|b| match b {
            ContentBlock::ToolResult { tool_use_id, .. } => tool_use_id.as_str(),
            other => panic!("unexpected block in results message: {other:?}"),
        })
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["t1", "t2", "t3"]);
}

#[tokio::test]
async fn round_budget_caps_a_turn_at_ten_model_steps() {
    let counter = Arc::new(AtomicUsize::new(0));
    // 11 scripted tool steps; the last must never be requested.
    let steps: Vec<_> = (0..11)
        .map(|_| tool_step(vec![("t1", "tally", json!({ "tag": "x" }))]))
        .collect();
    let model = ScriptedModel::new(steps);
    let prompts = model.prompt_log();
    let mut agent = Agent::new(model, tally_registry(counter.clone()));

    let outcome = agent
        .run_turn("loop forever", &CancelToken::new(), |_| {})
        .await
        .unwrap();

    assert!(matches!(outcome, TurnOutcome::BudgetExhausted { .. }));
    assert_eq!(prompts.lock().unwrap().len(), 10);
    assert_eq!(counter.load(Ordering::SeqCst), 10);
    // Even a forced stop keeps the user/assistant pairing intact.
    assert_eq!(agent.history().len(), 2);
}

#[tokio::test]
async fn cancellation_leaves_only_the_user_turn() {
    let model = ScriptedModel::new(vec![text_step("should never be recorded")]);
    let mut agent = Agent::new(model, ToolRegistry::new());

    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = agent.run_turn("hello", &cancel, |_| {}).await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Cancelled));
    let turns = agent.history().snapshot();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].role, Role::User);
}

#[tokio::test]
async fn cancelling_mid_stream_stops_before_the_next_fragment() {
    let model = ScriptedModel::new(vec![vec![
        wingman::ModelEvent::TextDelta("first".into()),
        wingman::ModelEvent::TextDelta("second".into()),
        wingman::ModelEvent::Done {
            stop_reason: Some(wingman::StopReason::EndTurn),
        },
    ]]);
    let mut agent = Agent::new(model, ToolRegistry::new());

    let cancel = CancelToken::new();
    let from_callback = cancel.clone();
    let mut fragments = String::new();
    let outcome = agent
        .run_turn("hello", &cancel, |event| {
            if let TurnEvent::Fragment(text) = event {
                fragments.push_str(&text);
                from_callback.cancel();
            }
        })
        .await
        .unwrap();

    assert!(matches!(outcome, TurnOutcome::Cancelled));
    // The first fragment was already delivered; nothing after it may be.
    assert_eq!(fragments, "first");
    assert_eq!(agent.history().len(), 1);
}

#[tokio::test]
async fn cancelling_during_a_tool_round_discards_the_round_at_the_join() {
    let cancel = CancelToken::new();
    let from_handler = cancel.clone();
    let mut registry = ToolRegistry::new();
    registry
        .register(RegisteredTool::new(
            "interrupt",
            "Cancels the turn from inside a handler.",
            InputSchema::new(),
            move |_| {
                let from_handler = from_handler.clone();
                async move {
                    from_handler.cancel();
                    Ok(json!({ "ok": true }))
                }
            },
        ))
        .unwrap();

    let model = ScriptedModel::new(vec![
        tool_step(vec![("t1", "interrupt", json!({}))]),
        text_step("never reached"),
    ]);
    let prompts = model.prompt_log();
    let mut agent = Agent::new(model, registry);

    let outcome = agent.run_turn("hello", &cancel, |_| {}).await.unwrap();

    assert!(matches!(outcome, TurnOutcome::Cancelled));
    // The join-point check fires before the model is consulted again.
    assert_eq!(prompts.lock().unwrap().len(), 1);
    assert_eq!(agent.history().len(), 1);
}

#[tokio::test]
async fn model_failure_aborts_the_turn_but_keeps_the_user_turn() {
    // Empty script: the first advance fails.
    let model = ScriptedModel::new(vec![]);
    let mut agent = Agent::new(model, ToolRegistry::new());

    let result = agent.run_turn("hello", &CancelToken::new(), |_| {}).await;

    assert!(result.is_err());
    assert_eq!(agent.history().len(), 1);
}

#[tokio::test]
async fn bridge_backed_tool_round_flows_results_to_the_model() {
    let mut server = mockito::Server::new_async().await;
    let chats = server
        .mock("GET", "/chats")
        .match_query(mockito::Matcher::UrlEncoded("limit".into(), "2".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"chats":[{"id":1,"title":"alice"},{"id":2,"title":"bob"}]}"#)
        .create_async()
        .await;

    let bridge = Arc::new(TelegramBridge::new(server.url(), TIMEOUT).unwrap());
    let knowledge = Arc::new(KnowledgeClient::new(server.url(), None, TIMEOUT).unwrap());
    let registry =
        ToolRegistry::with_defaults(bridge, knowledge, KnowledgeTools::default()).unwrap();

    let model = ScriptedModel::new(vec![
        tool_step(vec![("t1", "get_chats", json!({ "limit": 2 }))]),
        text_step("you have two chats"),
    ]);
    let prompts = model.prompt_log();
    let mut agent = Agent::new(model, registry);

    let outcome = agent
        .run_turn("what chats do I have?", &CancelToken::new(), |_| {})
        .await
        .unwrap();

    chats.assert_async().await;
    assert!(matches!(outcome, TurnOutcome::Completed { ref text } if text == "you have two chats"));
    // Exactly one user and one assistant turn, tool traffic excluded.
    assert_eq!(agent.history().len(), 2);

    let prompts = prompts.lock().unwrap();
    let MessageContent::Blocks(blocks) = &prompts[1].messages.last().unwrap().content else {
        panic!("expected tool-result blocks");
    };
    let ContentBlock::ToolResult {
        content, is_error, ..
    } = &blocks[0]
    else {
        panic!("expected a tool result");
    };
    assert!(!is_error);
    assert_eq!(content["chats"][0]["title"], "alice");
}

#[tokio::test]
async fn unconfigured_knowledge_search_is_a_successful_result() {
    // Port 9 is discard; nothing should ever connect to it.
    let bridge = Arc::new(TelegramBridge::new("http://127.0.0.1:9", TIMEOUT).unwrap());
    let knowledge = Arc::new(KnowledgeClient::new("http://127.0.0.1:9", None, TIMEOUT).unwrap());
    let registry =
        ToolRegistry::with_defaults(bridge, knowledge, KnowledgeTools::default()).unwrap();

    let model = ScriptedModel::new(vec![
        tool_step(vec![("t1", "search_pickup_lines", json!({ "query": "opener" }))]),
        text_step("that search is not set up"),
    ]);
    let prompts = model.prompt_log();
    let mut agent = Agent::new(model, registry);

    let outcome = agent
        .run_turn("find me a line", &CancelToken::new(), |_| {})
        .await
        .unwrap();

    assert!(matches!(outcome, TurnOutcome::Completed { .. }));
    let prompts = prompts.lock().unwrap();
    let MessageContent::Blocks(blocks) = &prompts[1].messages.last().unwrap().content else {
        panic!("expected tool-result blocks");
    };
    let ContentBlock::ToolResult {
        content, is_error, ..
    } = &blocks[0]
    else {
        panic!("expected a tool result");
    };
    // Missing corpus id is a structured answer, not an error: the loop goes on.
    assert!(!is_error);
    assert_eq!(content["configured"], json!(false));
}
