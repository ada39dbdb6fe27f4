pub mod domain;
pub mod ports;
pub mod retry;
pub mod store;

pub use domain::{
    Analysis, AnalysisReport, ChatMessage, ChatRole, ChatSession, Clause, Document, DocumentKind,
    Obligation, Risk, RiskLevel, Summary,
};
pub use ports::{
    DocumentAnalysisService, DocumentChatService, GatewayError, GatewayResult, MediumError,
    StorageMedium, StoreError, SummarizationService, UploadGuidanceService,
};
pub use retry::{call_with_retry, RetryPolicy};
pub use store::{DocumentStore, MemoryStorage};
