//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use legitmind_core::ports::{
    DocumentAnalysisService, DocumentChatService, SummarizationService, UploadGuidanceService,
};
use legitmind_core::store::DocumentStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// The Document Store is constructed here with an explicit lifecycle (hydrate
/// at startup) and reached only through this state; nothing mutates stored
/// collections behind its back.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub config: Arc<Config>,
    pub summary_adapter: Arc<dyn SummarizationService>,
    pub analysis_adapter: Arc<dyn DocumentAnalysisService>,
    pub chat_adapter: Arc<dyn DocumentChatService>,
    pub guidance_adapter: Arc<dyn UploadGuidanceService>,
}
