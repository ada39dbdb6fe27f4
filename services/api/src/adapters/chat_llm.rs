//! services/api/src/adapters/chat_llm.rs
//!
//! This module contains the adapter for chatting with a document.
//! It implements the `DocumentChatService` port from the `core` crate.

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use legitmind_core::ports::{DocumentChatService, GatewayError, GatewayResult};
use legitmind_core::retry::{call_with_retry, RetryPolicy};
use serde::Deserialize;

const SYSTEM_INSTRUCTIONS: &str = r#"You are a helpful legal assistant. Your task is to answer questions based on the provided document context.

IMPORTANT: You must identify the language of the user's question (e.g., English, Hindi, Tamil, etc.) and provide your answer in that same language.

Respond with a JSON object of the form {"answer": "..."} and nothing else. The answer must be clear, concise, and based on the document."#;

const USER_INPUT_TEMPLATE: &str = r#"Document Context:
---
{context}
---

User's Question:
"{question}"

Based on the document, provide a clear and concise answer to the user's question."#;

/// The schema-typed output expected from the model.
#[derive(Deserialize)]
struct AnswerPayload {
    answer: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `DocumentChatService` using an OpenAI-compatible LLM.
///
/// The answer-language-matches-question contract is carried by the prompt
/// instruction above; the adapter does not verify it independently.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    retry: RetryPolicy,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            model,
            retry,
        }
    }

    async fn request_answer(
        &self,
        document_context: &str,
        question: &str,
    ) -> GatewayResult<String> {
        let user_input = USER_INPUT_TEMPLATE
            .replace("{context}", document_context)
            .replace("{question}", question);
        let content =
            super::complete_json(&self.client, &self.model, SYSTEM_INSTRUCTIONS, user_input)
                .await?;
        let payload: AnswerPayload = serde_json::from_str(&content)
            .map_err(|e| GatewayError::OutputInvalid(e.to_string()))?;
        Ok(payload.answer)
    }
}

//=========================================================================================
// `DocumentChatService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentChatService for OpenAiChatAdapter {
    async fn chat(&self, document_context: &str, question: &str) -> GatewayResult<String> {
        if question.trim().is_empty() || document_context.trim().is_empty() {
            return Err(GatewayError::EmptyInput);
        }
        call_with_retry(&self.retry, || {
            self.request_answer(document_context, question)
        })
        .await
    }
}
