//! crates/legitmind_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like the LLM vendor
//! API or the on-disk storage medium.

use crate::domain::AnalysisReport;
use async_trait::async_trait;

//=========================================================================================
// Gateway Error and Result Types
//=========================================================================================

/// Errors produced by the AI Invocation Gateway.
///
/// Callers discriminate on these kinds: `EmptyInput` means "fix your input",
/// `InvocationFailed`/`OutputInvalid` mean "the service or model misbehaved",
/// and `Overloaded` is the terminal state after the retry budget is spent.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Document text is empty")]
    EmptyInput,
    #[error("Model invocation failed: {0}")]
    InvocationFailed(String),
    #[error("Model output failed validation: {0}")]
    OutputInvalid(String),
    #[error("The model is overloaded, please try again later")]
    Overloaded,
}

impl GatewayError {
    /// Whether a retry could plausibly succeed. Bad input never benefits
    /// from a retry; a flaky transport or a malformed completion might.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::InvocationFailed(_) | GatewayError::OutputInvalid(_)
        )
    }
}

/// A convenience type alias for `Result<T, GatewayError>`.
pub type GatewayResult<T> = Result<T, GatewayError>;

//=========================================================================================
// Store Error Types
//=========================================================================================

/// Errors produced by Document Store mutations.
///
/// Every store mutation returns a `Result` so that a failed write is surfaced
/// to the caller instead of being silently dropped.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage persist failed: {0}")]
    PersistFailed(String),
}

/// An error raised by the persistent key-value medium itself.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MediumError(pub String);

//=========================================================================================
// Storage Medium Port
//=========================================================================================

/// The persistent key-value medium backing the Document Store.
///
/// String-keyed get/set/remove with synchronous semantics; no transactions,
/// no multi-key atomicity. A missing key reads as `None`.
pub trait StorageMedium: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError>;
    fn set(&self, key: &str, value: &str) -> Result<(), MediumError>;
    fn remove(&self, key: &str) -> Result<(), MediumError>;
}

//=========================================================================================
// Gateway Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait SummarizationService: Send + Sync {
    /// Produces a concise summary of the given document text.
    async fn summarize(&self, document_text: &str) -> GatewayResult<String>;
}

#[async_trait]
pub trait DocumentAnalysisService: Send + Sync {
    /// Extracts key clauses, obligations, and risks from the given document
    /// text. An empty extraction is a valid result, not an error.
    async fn analyze(&self, document_text: &str) -> GatewayResult<AnalysisReport>;
}

#[async_trait]
pub trait DocumentChatService: Send + Sync {
    /// Answers a question based on the provided document context.
    ///
    /// The answer is asked to match the language of the question; this is a
    /// prompt instruction, not independently verified here.
    async fn chat(&self, document_context: &str, question: &str) -> GatewayResult<String>;
}

#[async_trait]
pub trait UploadGuidanceService: Send + Sync {
    /// Answers a short question about the document upload process,
    /// independent of any specific document.
    async fn guidance(&self, question: &str) -> GatewayResult<String>;
}
