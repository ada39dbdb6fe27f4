//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the core crate's ports: the file-backed
//! storage medium and the OpenAI-backed gateway adapters, one per AI
//! capability. Every gateway adapter validates its input, runs a single
//! JSON-mode chat completion per attempt, and goes through the shared
//! bounded-retry wrapper.

pub mod analysis_llm;
pub mod chat_llm;
pub mod guidance_llm;
pub mod storage;
pub mod summary_llm;

pub use analysis_llm::OpenAiAnalysisAdapter;
pub use chat_llm::OpenAiChatAdapter;
pub use guidance_llm::OpenAiGuidanceAdapter;
pub use storage::JsonFileStorage;
pub use summary_llm::OpenAiSummaryAdapter;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use legitmind_core::ports::{GatewayError, GatewayResult};

/// Runs one JSON-mode chat completion and returns the raw message content.
///
/// Transport and request-construction failures map to `InvocationFailed`;
/// a completion with no text content maps to `OutputInvalid`. Callers parse
/// the returned JSON into their typed output payload.
pub(crate) async fn complete_json(
    client: &Client<OpenAIConfig>,
    model: &str,
    system: &str,
    user: String,
) -> GatewayResult<String> {
    let messages = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(system)
            .build()
            .map_err(|e| GatewayError::InvocationFailed(e.to_string()))?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(user)
            .build()
            .map_err(|e| GatewayError::InvocationFailed(e.to_string()))?
            .into(),
    ];

    let request = CreateChatCompletionRequestArgs::default()
        .model(model)
        .messages(messages)
        .response_format(ResponseFormat::JsonObject)
        .n(1)
        .build()
        .map_err(|e| GatewayError::InvocationFailed(e.to_string()))?;

    let response = client
        .chat()
        .create(request)
        .await
        .map_err(|e: OpenAIError| GatewayError::InvocationFailed(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            GatewayError::OutputInvalid("model response contained no text content".to_string())
        })
}
