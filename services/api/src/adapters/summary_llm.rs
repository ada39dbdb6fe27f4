//! services/api/src/adapters/summary_llm.rs
//!
//! This module contains the adapter for the document-summarizing LLM.
//! It implements the `SummarizationService` port from the `core` crate.

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use legitmind_core::ports::{GatewayError, GatewayResult, SummarizationService};
use legitmind_core::retry::{call_with_retry, RetryPolicy};
use serde::Deserialize;

const SYSTEM_INSTRUCTIONS: &str = "You are an expert legal AI that summarizes documents. \
Respond with a JSON object of the form {\"summary\": \"...\"} and nothing else. \
The summary must be concise and focus on the key points and main arguments of the document.";

/// The schema-typed output expected from the model.
#[derive(Deserialize)]
struct SummaryPayload {
    summary: String,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummarizationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiSummaryAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    retry: RetryPolicy,
}

impl OpenAiSummaryAdapter {
    /// Creates a new `OpenAiSummaryAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            model,
            retry,
        }
    }

    async fn request_summary(&self, document_text: &str) -> GatewayResult<String> {
        let user_input = format!(
            "Summarize the following document, focusing on the key points and main arguments:\n\n{document_text}"
        );
        let content =
            super::complete_json(&self.client, &self.model, SYSTEM_INSTRUCTIONS, user_input)
                .await?;
        let payload: SummaryPayload = serde_json::from_str(&content)
            .map_err(|e| GatewayError::OutputInvalid(e.to_string()))?;
        Ok(payload.summary)
    }
}

//=========================================================================================
// `SummarizationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummarizationService for OpenAiSummaryAdapter {
    async fn summarize(&self, document_text: &str) -> GatewayResult<String> {
        if document_text.trim().is_empty() {
            return Err(GatewayError::EmptyInput);
        }
        call_with_retry(&self.retry, || self.request_summary(document_text)).await
    }
}
