use std::sync::Arc;
use std::time::Duration;

use vigilis::guardrails::NO_GUARDRAIL_REPLY;
use vigilis::{ChatRole, ClientError, Completion, GuardrailMode, GuardrailPath, GuardrailPipeline};

use crate::support::{MockClient, RecordingSink, WALL_RIDDLE};

fn pipeline(client: Arc<MockClient>, sink: Arc<RecordingSink>) -> GuardrailPipeline {
    GuardrailPipeline::new(client, sink, "mock-guardrail-model", Duration::from_secs(2))
}

fn never_cancelled() -> tokio::sync::watch::Receiver<bool> {
    let (_tx, rx) = tokio::sync::watch::channel(false);
    rx
}

#[tokio::test]
async fn fast_path_hit_skips_the_client_entirely() {
    let client = Arc::new(MockClient::answering("unused"));
    let sink = RecordingSink::new();
    let pipeline = pipeline(Arc::clone(&client), Arc::clone(&sink));

    let decision = pipeline
        .run(WALL_RIDDLE, GuardrailMode::Always, never_cancelled())
        .await
        .expect("riddle decides deterministically");

    assert_eq!(decision.llm_round_trips, 0);
    assert_eq!(client.calls_made(), 0);
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, GuardrailPath::Deterministic);
}

#[tokio::test]
async fn auto_mode_never_takes_the_model_pass() {
    let client = Arc::new(MockClient::answering("unused"));
    let sink = RecordingSink::new();
    let pipeline = pipeline(Arc::clone(&client), Arc::clone(&sink));

    let decision = pipeline
        .run("an ordinary question", GuardrailMode::Auto, never_cancelled())
        .await;

    assert!(decision.is_none());
    assert_eq!(client.calls_made(), 0, "auto is fast-path-only");
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, GuardrailPath::NoDecision);
    assert_eq!(entries[0].llm_round_trips, 0);
}

#[tokio::test]
async fn always_mode_takes_exactly_one_model_round_trip() {
    let client = Arc::new(MockClient::answering("Paris is the capital of France."));
    let sink = RecordingSink::new();
    let pipeline = pipeline(Arc::clone(&client), Arc::clone(&sink));

    let decision = pipeline
        .run(
            "What is the capital of France?",
            GuardrailMode::Always,
            never_cancelled(),
        )
        .await
        .expect("model pass decides");

    assert_eq!(decision.answer_text, "Paris is the capital of France.");
    assert_eq!(decision.llm_round_trips, 1);
    assert_eq!(client.calls_made(), 1);

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, GuardrailPath::Model);
    assert_eq!(entries[0].llm_round_trips, 1);
}

#[tokio::test]
async fn configured_model_name_reaches_the_client() {
    let client = Arc::new(MockClient::answering("Answer."));
    let sink = RecordingSink::new();
    let guardrails = vigilis::Guardrails::new(
        client.clone(),
        sink.clone(),
        &crate::support::test_config(),
    );

    guardrails
        .try_run(
            &vigilis::RoutingSignal::chat_only(0.9),
            "a plain question",
            GuardrailMode::Always,
        )
        .await;

    assert_eq!(client.seen_models(), ["mock-guardrail-model"]);
}

#[tokio::test]
async fn model_prompt_is_system_plus_user() {
    let client = Arc::new(MockClient::answering("Answer."));
    let sink = RecordingSink::new();
    let pipeline = pipeline(Arc::clone(&client), Arc::clone(&sink));

    pipeline
        .run("some question", GuardrailMode::Always, never_cancelled())
        .await;

    let calls = client.seen_messages();
    assert_eq!(calls.len(), 1);
    let messages = &calls[0];
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, ChatRole::System);
    assert!(messages[0].content.contains(NO_GUARDRAIL_REPLY));
    assert_eq!(messages[1].role, ChatRole::User);
    assert_eq!(messages[1].content, "some question");
}

#[tokio::test]
async fn sentinel_reply_maps_to_no_decision_with_one_round_trip() {
    let client = Arc::new(MockClient::answering(NO_GUARDRAIL_REPLY));
    let sink = RecordingSink::new();
    let pipeline = pipeline(Arc::clone(&client), Arc::clone(&sink));

    let decision = pipeline
        .run("open my email", GuardrailMode::Always, never_cancelled())
        .await;

    assert!(decision.is_none());
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, GuardrailPath::NoDecision);
    assert_eq!(entries[0].llm_round_trips, 1);
}

#[tokio::test]
async fn sentinel_reply_with_whitespace_still_declines() {
    let client = Arc::new(MockClient::answering("  NO_GUARDRAIL\n"));
    let sink = RecordingSink::new();
    let pipeline = pipeline(Arc::clone(&client), Arc::clone(&sink));

    let decision = pipeline
        .run("question", GuardrailMode::Always, never_cancelled())
        .await;
    assert!(decision.is_none());
}

#[tokio::test]
async fn client_failure_degrades_to_no_decision() {
    let client = Arc::new(MockClient::failing("connection refused"));
    let sink = RecordingSink::new();
    let pipeline = pipeline(Arc::clone(&client), Arc::clone(&sink));

    let decision = pipeline
        .run("question", GuardrailMode::Always, never_cancelled())
        .await;

    assert!(decision.is_none(), "failure never propagates to the caller");
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, GuardrailPath::Failure);
    assert_eq!(entries[0].llm_round_trips, 1);
    assert!(
        entries[0]
            .reason
            .as_deref()
            .is_some_and(|r| r.contains("connection refused"))
    );
}

#[tokio::test]
async fn incomplete_completion_is_a_failure_not_an_answer() {
    let client = Arc::new(MockClient::new(vec![Ok(Completion::truncated(
        "the answer is prob",
        "max_tokens",
    ))]));
    let sink = RecordingSink::new();
    let pipeline = pipeline(Arc::clone(&client), Arc::clone(&sink));

    let decision = pipeline
        .run("question", GuardrailMode::Always, never_cancelled())
        .await;

    assert!(decision.is_none());
    let entries = sink.entries();
    assert_eq!(entries[0].path, GuardrailPath::Failure);
    assert!(
        entries[0]
            .reason
            .as_deref()
            .is_some_and(|r| r.contains("max_tokens"))
    );
}

#[tokio::test]
async fn timeout_is_recorded_as_a_failure() {
    let client = Arc::new(crate::support::StallClient);
    let sink = RecordingSink::new();
    let pipeline = GuardrailPipeline::new(
        client,
        sink.clone(),
        "mock-guardrail-model",
        Duration::from_millis(50),
    );

    let decision = pipeline
        .run("question", GuardrailMode::Always, never_cancelled())
        .await;

    assert!(decision.is_none());
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, GuardrailPath::Failure);
    assert!(
        entries[0]
            .reason
            .as_deref()
            .is_some_and(|r| r.contains("timed out"))
    );
}

#[tokio::test]
async fn every_invocation_writes_exactly_one_entry() {
    let client = Arc::new(MockClient::new(vec![
        Ok(Completion::finished("Answer one.")),
        Err(ClientError::Transport {
            client: "mock".to_string(),
            message: "boom".to_string(),
        }),
        Ok(Completion::finished(NO_GUARDRAIL_REPLY)),
    ]));
    let sink = RecordingSink::new();
    let pipeline = pipeline(Arc::clone(&client), Arc::clone(&sink));

    pipeline.run(WALL_RIDDLE, GuardrailMode::Always, never_cancelled()).await;
    pipeline.run("q1", GuardrailMode::Always, never_cancelled()).await;
    pipeline.run("q2", GuardrailMode::Always, never_cancelled()).await;
    pipeline.run("q3", GuardrailMode::Always, never_cancelled()).await;
    pipeline.run("q4", GuardrailMode::Auto, never_cancelled()).await;

    let paths: Vec<GuardrailPath> = sink.entries().iter().map(|e| e.path).collect();
    assert_eq!(
        paths,
        [
            GuardrailPath::Deterministic,
            GuardrailPath::Model,
            GuardrailPath::Failure,
            GuardrailPath::NoDecision,
            GuardrailPath::NoDecision,
        ]
    );
}
