//! Turn-level behavior: transcript shape, alternation, failure semantics.
//!
//! Runs against in-test `ChatModel` doubles; no network involved.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use tandem_chat::prelude::*;

/// Records calls and replies with a fixed string, or fails every time.
struct ScriptedModel {
    name: &'static str,
    reply: Option<&'static str>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedModel {
    fn replying(name: &'static str, reply: &'static str) -> (Box<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = Box::new(Self {
            name,
            reply: Some(reply),
            calls: calls.clone(),
        });
        (model, calls)
    }

    fn failing(name: &'static str) -> (Box<Self>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = Box::new(Self {
            name,
            reply: None,
            calls: calls.clone(),
        });
        (model, calls)
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn generate_with_history(
        &self,
        _messages: &[ChatMessage],
        _system: Option<&str>,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Some(reply) => Ok(reply.to_string()),
            None => Err(LlmError::ApiError {
                code: 503,
                message: "scripted outage".to_string(),
            }),
        }
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: self.name.to_string(),
            organization: "test".to_string(),
            default_temperature: 0.7,
            max_output_tokens: 1024,
        }
    }
}

#[tokio::test]
async fn hello_turn_matches_the_contract() {
    // Empty state, active = openai, adapter returns "hi there".
    let (openai, _) = ScriptedModel::replying("openai", "hi there");
    let (gemini, _) = ScriptedModel::replying("gemini", "unused");
    let executor = TurnExecutor::new(openai, gemini);
    let mut conversation = Conversation::new();

    let reply = executor
        .execute_turn(&mut conversation, "hello")
        .await
        .unwrap();

    assert_eq!(reply.as_deref(), Some("hi there"));
    assert_eq!(
        conversation.messages(),
        &[ChatMessage::user("hello"), ChatMessage::assistant("hi there")]
    );
    assert_eq!(conversation.active_provider, ProviderId::Gemini);
}

#[tokio::test]
async fn n_turns_yield_2n_strictly_alternating_messages() {
    let (openai, openai_calls) = ScriptedModel::replying("openai", "a");
    let (gemini, gemini_calls) = ScriptedModel::replying("gemini", "b");
    let executor = TurnExecutor::new(openai, gemini);
    let mut conversation = Conversation::new();

    for i in 0..6 {
        executor
            .execute_turn(&mut conversation, &format!("turn {i}"))
            .await
            .unwrap();
    }

    assert_eq!(conversation.messages().len(), 12);
    for (i, message) in conversation.messages().iter().enumerate() {
        let expected = if i % 2 == 0 {
            MessageRole::User
        } else {
            MessageRole::Assistant
        };
        assert_eq!(message.role, expected, "message {i}");
    }
    // Alternation is content-independent: each adapter served half the turns.
    assert_eq!(openai_calls.load(Ordering::SeqCst), 3);
    assert_eq!(gemini_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn override_applies_to_next_turn_then_alternation_resumes() {
    let (openai, openai_calls) = ScriptedModel::replying("openai", "a");
    let (gemini, gemini_calls) = ScriptedModel::replying("gemini", "b");
    let executor = TurnExecutor::new(openai, gemini);
    let mut conversation = Conversation::new();

    conversation.set_active_provider(ProviderId::Gemini);
    executor.execute_turn(&mut conversation, "x").await.unwrap();
    assert_eq!(gemini_calls.load(Ordering::SeqCst), 1);
    assert_eq!(conversation.active_provider, ProviderId::OpenAi);

    executor.execute_turn(&mut conversation, "y").await.unwrap();
    assert_eq!(openai_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_turn_keeps_user_message_and_does_not_advance_provider() {
    let (openai, _) = ScriptedModel::failing("openai");
    let (gemini, gemini_calls) = ScriptedModel::replying("gemini", "unused");
    let executor = TurnExecutor::new(openai, gemini);
    let mut conversation = Conversation::new();

    let before = conversation.messages().len();
    let err = executor
        .execute_turn(&mut conversation, "hello")
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::ApiError { code: 503, .. }));
    assert_eq!(conversation.messages().len(), before + 1);
    assert_eq!(conversation.messages()[0], ChatMessage::user("hello"));
    assert_eq!(conversation.active_provider, ProviderId::OpenAi);
    assert_eq!(gemini_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn retrying_after_failure_uses_the_same_provider() {
    let (openai, _) = ScriptedModel::failing("openai");
    let (gemini, _) = ScriptedModel::replying("gemini", "unused");
    let executor = TurnExecutor::new(openai, gemini);
    let mut conversation = Conversation::new();

    // No automatic retry: the caller decides to try again, and the retry
    // still routes to the provider whose turn it was.
    assert!(executor.execute_turn(&mut conversation, "a").await.is_err());
    assert!(executor.execute_turn(&mut conversation, "b").await.is_err());
    assert_eq!(conversation.active_provider, ProviderId::OpenAi);
    assert_eq!(conversation.messages().len(), 2); // two committed user messages
}

#[tokio::test]
async fn missing_key_disables_one_provider_without_ending_the_session() {
    let (gemini, gemini_calls) = ScriptedModel::replying("gemini", "still here");
    let executor = TurnExecutor::new(
        Box::new(UnavailableModel::from_error(
            "OpenAI",
            LlmError::MissingApiKey("OpenAI API key is not set".to_string()),
        )),
        gemini,
    );
    let mut conversation = Conversation::new();

    // A turn routed at the unconfigured provider reports remediation and
    // leaves the transcript and rotation intact.
    let err = executor
        .execute_turn(&mut conversation, "hello")
        .await
        .unwrap_err();
    match err {
        LlmError::MissingApiKey(message) => assert!(message.contains("OPENAI") || message.contains("OpenAI")),
        other => panic!("expected MissingApiKey, got {other:?}"),
    }
    assert_eq!(conversation.messages().len(), 1);
    assert_eq!(conversation.active_provider, ProviderId::OpenAi);

    // Switching to the configured provider keeps the session going.
    conversation.set_active_provider(ProviderId::Gemini);
    let reply = executor
        .execute_turn(&mut conversation, "are you there?")
        .await
        .unwrap();
    assert_eq!(reply.as_deref(), Some("still here"));
    assert_eq!(gemini_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn whitespace_input_makes_no_call() {
    let (openai, openai_calls) = ScriptedModel::replying("openai", "a");
    let (gemini, gemini_calls) = ScriptedModel::replying("gemini", "b");
    let executor = TurnExecutor::new(openai, gemini);
    let mut conversation = Conversation::new();

    for input in ["", "   ", "\t", "\n\n"] {
        let reply = executor.execute_turn(&mut conversation, input).await.unwrap();
        assert!(reply.is_none());
    }

    assert!(conversation.messages().is_empty());
    assert_eq!(openai_calls.load(Ordering::SeqCst), 0);
    assert_eq!(gemini_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn system_instruction_reaches_the_adapter() {
    struct AssertingModel;

    #[async_trait]
    impl ChatModel for AssertingModel {
        async fn generate_with_history(
            &self,
            messages: &[ChatMessage],
            system: Option<&str>,
        ) -> Result<String, LlmError> {
            assert_eq!(system, Some("be terse"));
            assert_eq!(messages.last(), Some(&ChatMessage::user("hello")));
            Ok("ok".to_string())
        }

        fn model_info(&self) -> ModelInfo {
            ModelInfo {
                name: "assert".to_string(),
                organization: "test".to_string(),
                default_temperature: 0.7,
                max_output_tokens: 1024,
            }
        }
    }

    let executor = TurnExecutor::new(Box::new(AssertingModel), Box::new(AssertingModel));
    let mut conversation = Conversation::new();
    conversation.set_system_instruction(Some("be terse".to_string()));

    let reply = executor
        .execute_turn(&mut conversation, "hello")
        .await
        .unwrap();
    assert_eq!(reply.as_deref(), Some("ok"));
}
