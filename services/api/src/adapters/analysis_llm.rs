//! services/api/src/adapters/analysis_llm.rs
//!
//! This module contains the adapter for the document-analyzing LLM.
//! It implements the `DocumentAnalysisService` port from the `core` crate.

use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use legitmind_core::domain::AnalysisReport;
use legitmind_core::ports::{DocumentAnalysisService, GatewayError, GatewayResult};
use legitmind_core::retry::{call_with_retry, RetryPolicy};

const SYSTEM_INSTRUCTIONS: &str = r#"You are an expert legal AI. Analyze the document you are given and extract the following information:
- Key Clauses: Identify the most important clauses. For each, provide a short title and a one-sentence description.
- Obligations: Detail the specific obligations of each party involved.
- Risks: Identify any potential risks, red flags, or liabilities, categorizing their severity (Low, Medium, High) and suggesting mitigation strategies.

Respond with a JSON object of exactly this shape and nothing else:
{
  "clauses": [{"title": "...", "description": "..."}],
  "obligations": [{"party": "...", "description": "...", "dueDate": "optional"}],
  "risks": [{"level": "Low|Medium|High", "description": "...", "mitigation": "..."}]
}

A document with no clauses, obligations, or risks in a category gets an empty list for that category."#;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `DocumentAnalysisService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAnalysisAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    retry: RetryPolicy,
}

impl OpenAiAnalysisAdapter {
    /// Creates a new `OpenAiAnalysisAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            model,
            retry,
        }
    }

    async fn request_analysis(&self, document_text: &str) -> GatewayResult<AnalysisReport> {
        let user_input = format!("Analyze this document:\n---\n{document_text}\n---");
        let content =
            super::complete_json(&self.client, &self.model, SYSTEM_INSTRUCTIONS, user_input)
                .await?;
        serde_json::from_str(&content).map_err(|e| GatewayError::OutputInvalid(e.to_string()))
    }
}

//=========================================================================================
// `DocumentAnalysisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DocumentAnalysisService for OpenAiAnalysisAdapter {
    async fn analyze(&self, document_text: &str) -> GatewayResult<AnalysisReport> {
        if document_text.trim().is_empty() {
            return Err(GatewayError::EmptyInput);
        }
        call_with_retry(&self.retry, || self.request_analysis(document_text)).await
    }
}
