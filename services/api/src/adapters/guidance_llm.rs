//! services/api/src/adapters/guidance_llm.rs
//!
//! This module contains the adapter for the upload-guidance assistant.
//! It implements the `UploadGuidanceService` port from the `core` crate.

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use legitmind_core::ports::{GatewayError, GatewayResult, UploadGuidanceService};
use legitmind_core::retry::{call_with_retry, RetryPolicy};
use serde::Deserialize;

const SYSTEM_INSTRUCTIONS: &str = "You are a helpful assistant guiding the user through a document upload process. \
Respond with a JSON object of the form {\"answer\": \"...\"} and nothing else. \
Provide a concise and helpful answer to the user's question. \
The answer should be no more than two sentences.";

/// The schema-typed output expected from the model.
#[derive(Deserialize)]
struct AnswerPayload {
    answer: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `UploadGuidanceService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiGuidanceAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    retry: RetryPolicy,
}

impl OpenAiGuidanceAdapter {
    /// Creates a new `OpenAiGuidanceAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            model,
            retry,
        }
    }

    async fn request_answer(&self, question: &str) -> GatewayResult<String> {
        let user_input = format!("The user has the following question: {question}");
        let content =
            super::complete_json(&self.client, &self.model, SYSTEM_INSTRUCTIONS, user_input)
                .await?;
        let payload: AnswerPayload = serde_json::from_str(&content)
            .map_err(|e| GatewayError::OutputInvalid(e.to_string()))?;
        Ok(payload.answer)
    }
}

//=========================================================================================
// `UploadGuidanceService` Trait Implementation
//=========================================================================================

#[async_trait]
impl UploadGuidanceService for OpenAiGuidanceAdapter {
    async fn guidance(&self, question: &str) -> GatewayResult<String> {
        if question.trim().is_empty() {
            return Err(GatewayError::EmptyInput);
        }
        call_with_retry(&self.retry, || self.request_answer(question)).await
    }
}
