//! crates/legitmind_core/src/store.rs
//!
//! The Document Store: durable CRUD over documents, summaries, analyses, and
//! chat sessions, backed by a string-keyed persistent medium. The store is an
//! explicit object constructed once at startup (hydrated from the medium) and
//! passed by reference to consumers; it is the sole mutator of all four
//! collections.

use crate::domain::{Analysis, ChatMessage, ChatSession, Document, Summary};
use crate::ports::{MediumError, StorageMedium, StoreError};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::warn;

const DOCUMENTS_KEY: &str = "documents";
const SUMMARIES_KEY: &str = "summaries";
const ANALYSES_KEY: &str = "analyses";
const CHATS_KEY: &str = "chats";

fn content_key(doc_id: &str) -> String {
    format!("doc-content-{doc_id}")
}

/// The in-memory image of the four persisted collections.
#[derive(Default)]
struct Collections {
    documents: Vec<Document>,
    summaries: Vec<Summary>,
    analyses: Vec<Analysis>,
    chats: Vec<ChatSession>,
}

/// Durable store for all document-derived state.
///
/// Every mutation goes through one write lock, so writes to the same chat
/// session are serialized in call order. Collections are persisted as whole
/// JSON blobs, one medium key per collection; raw document content lives
/// under its own per-document key.
pub struct DocumentStore {
    medium: Box<dyn StorageMedium>,
    state: RwLock<Collections>,
}

impl DocumentStore {
    /// Opens the store over the given medium, hydrating all collections.
    ///
    /// A missing or unreadable collection key hydrates as an empty
    /// collection with a warning; hydration itself never fails.
    pub fn open(medium: Box<dyn StorageMedium>) -> Self {
        let state = Collections {
            documents: hydrate(medium.as_ref(), DOCUMENTS_KEY),
            summaries: hydrate(medium.as_ref(), SUMMARIES_KEY),
            analyses: hydrate(medium.as_ref(), ANALYSES_KEY),
            chats: hydrate(medium.as_ref(), CHATS_KEY),
        };
        Self {
            medium,
            state: RwLock::new(state),
        }
    }

    //=====================================================================================
    // Documents
    //=====================================================================================

    /// Inserts a document record and, when content is present, persists the
    /// content under its own key.
    pub async fn add_document(
        &self,
        doc: Document,
        content: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if let Some(text) = content {
            self.medium
                .set(&content_key(&doc.id), text)
                .map_err(persist_err)?;
        }
        state.documents.push(doc);
        self.persist(DOCUMENTS_KEY, &state.documents)
    }

    /// Removes a document plus its content blob and every dependent summary,
    /// analysis, and chat session. A missing id is a silent no-op.
    pub async fn delete_document(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        if !state.documents.iter().any(|d| d.id == id) {
            return Ok(());
        }
        state.documents.retain(|d| d.id != id);
        state.summaries.retain(|s| s.doc_id != id);
        state.analyses.retain(|a| a.doc_id != id);
        state.chats.retain(|c| c.doc_id != id);
        self.medium.remove(&content_key(id)).map_err(persist_err)?;
        self.persist(DOCUMENTS_KEY, &state.documents)?;
        self.persist(SUMMARIES_KEY, &state.summaries)?;
        self.persist(ANALYSES_KEY, &state.analyses)?;
        self.persist(CHATS_KEY, &state.chats)
    }

    pub async fn get_document(&self, id: &str) -> Option<Document> {
        let state = self.state.read().await;
        state.documents.iter().find(|d| d.id == id).cloned()
    }

    /// Returns the raw text content for a document, or `None` when the
    /// content was never stored or was deleted. A medium read failure is
    /// logged and reported as absent rather than raised.
    pub async fn get_content(&self, id: &str) -> Option<String> {
        match self.medium.get(&content_key(id)) {
            Ok(content) => content,
            Err(e) => {
                warn!(doc_id = id, error = %e, "failed to read document content");
                None
            }
        }
    }

    /// Full document listing in insertion order.
    pub async fn list_documents(&self) -> Vec<Document> {
        self.state.read().await.documents.clone()
    }

    //=====================================================================================
    // Summaries and Analyses (replace semantics)
    //=====================================================================================

    /// Stores a summary, superseding any prior summary for the same
    /// document. The newest record sits at the front of the listing.
    pub async fn put_summary(&self, summary: Summary) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.summaries.retain(|s| s.doc_id != summary.doc_id);
        state.summaries.insert(0, summary);
        self.persist(SUMMARIES_KEY, &state.summaries)
    }

    pub async fn get_summary(&self, doc_id: &str) -> Option<Summary> {
        let state = self.state.read().await;
        state.summaries.iter().find(|s| s.doc_id == doc_id).cloned()
    }

    /// Summaries in most-recent-first order.
    pub async fn list_summaries(&self) -> Vec<Summary> {
        self.state.read().await.summaries.clone()
    }

    /// Stores an analysis with the same replace semantics as `put_summary`.
    pub async fn put_analysis(&self, analysis: Analysis) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.analyses.retain(|a| a.doc_id != analysis.doc_id);
        state.analyses.insert(0, analysis);
        self.persist(ANALYSES_KEY, &state.analyses)
    }

    pub async fn get_analysis(&self, doc_id: &str) -> Option<Analysis> {
        let state = self.state.read().await;
        state.analyses.iter().find(|a| a.doc_id == doc_id).cloned()
    }

    /// Analyses in most-recent-first order.
    pub async fn list_analyses(&self) -> Vec<Analysis> {
        self.state.read().await.analyses.clone()
    }

    //=====================================================================================
    // Chat Sessions (append-only)
    //=====================================================================================

    /// Appends a message to the document's chat session, creating the
    /// session on first append. Messages are strictly appended in call
    /// order; the write lock serializes concurrent appends for the same
    /// document. Returns the updated session.
    pub async fn append_chat_message(
        &self,
        doc_id: &str,
        doc_name: &str,
        message: ChatMessage,
    ) -> Result<ChatSession, StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let updated = match state.chats.iter_mut().find(|c| c.doc_id == doc_id) {
            Some(session) => {
                session.messages.push(message);
                session.last_updated = now;
                session.clone()
            }
            None => {
                let session = ChatSession {
                    doc_id: doc_id.to_string(),
                    doc_name: doc_name.to_string(),
                    messages: vec![message],
                    last_updated: now,
                };
                state.chats.push(session.clone());
                session
            }
        };
        self.persist(CHATS_KEY, &state.chats)?;
        Ok(updated)
    }

    /// Empties the message list of an existing session while keeping the
    /// session itself. An absent session is a no-op.
    pub async fn clear_chat(&self, doc_id: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let Some(session) = state.chats.iter_mut().find(|c| c.doc_id == doc_id) else {
            return Ok(());
        };
        session.messages.clear();
        session.last_updated = Utc::now();
        self.persist(CHATS_KEY, &state.chats)
    }

    pub async fn get_chat_session(&self, doc_id: &str) -> Option<ChatSession> {
        let state = self.state.read().await;
        state.chats.iter().find(|c| c.doc_id == doc_id).cloned()
    }

    pub async fn list_chats(&self) -> Vec<ChatSession> {
        self.state.read().await.chats.clone()
    }

    //=====================================================================================
    // Persistence helpers
    //=====================================================================================

    fn persist<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let blob = serde_json::to_string(value)
            .map_err(|e| StoreError::PersistFailed(e.to_string()))?;
        self.medium.set(key, &blob).map_err(persist_err)
    }
}

fn persist_err(e: MediumError) -> StoreError {
    StoreError::PersistFailed(e.to_string())
}

/// Best-effort read of one collection blob at startup.
fn hydrate<T: DeserializeOwned>(medium: &dyn StorageMedium, key: &str) -> Vec<T> {
    match medium.get(key) {
        Ok(Some(blob)) => match serde_json::from_str(&blob) {
            Ok(items) => items,
            Err(e) => {
                warn!(key, error = %e, "stored collection is corrupt, starting empty");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "failed to read stored collection, starting empty");
            Vec::new()
        }
    }
}

//=========================================================================================
// In-memory medium (tests and hermetic wiring)
//=========================================================================================

/// A `StorageMedium` held entirely in memory. Clones share the same
/// underlying map, which lets tests reopen a "fresh" store over the same
/// medium to exercise hydration.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageMedium for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| MediumError(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), MediumError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| MediumError(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), MediumError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| MediumError(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisReport, ChatRole, DocumentKind};
    use uuid::Uuid;

    fn doc(id: &str, name: &str) -> Document {
        Document {
            id: id.to_string(),
            name: name.to_string(),
            size: "1.0 KB".to_string(),
            kind: DocumentKind::Txt,
            uploaded_at: Utc::now(),
        }
    }

    fn summary(doc_id: &str, text: &str) -> Summary {
        Summary {
            id: Uuid::new_v4(),
            doc_id: doc_id.to_string(),
            doc_name: "lease.txt".to_string(),
            summary: text.to_string(),
            created_at: Utc::now(),
        }
    }

    fn analysis(doc_id: &str) -> Analysis {
        Analysis {
            id: Uuid::new_v4(),
            doc_id: doc_id.to_string(),
            doc_name: "lease.txt".to_string(),
            report: AnalysisReport::default(),
            created_at: Utc::now(),
        }
    }

    fn message(role: ChatRole, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn content_round_trips() {
        let store = DocumentStore::open(Box::new(MemoryStorage::new()));
        store
            .add_document(doc("d1", "hello.txt"), Some("Hello World"))
            .await
            .unwrap();
        assert_eq!(store.get_content("d1").await.as_deref(), Some("Hello World"));
    }

    #[tokio::test]
    async fn content_absent_when_never_stored() {
        let store = DocumentStore::open(Box::new(MemoryStorage::new()));
        store.add_document(doc("d1", "meta-only.pdf"), None).await.unwrap();
        assert!(store.get_content("d1").await.is_none());
    }

    #[tokio::test]
    async fn delete_cascades_to_all_dependents() {
        let store = DocumentStore::open(Box::new(MemoryStorage::new()));
        store
            .add_document(doc("d1", "lease.txt"), Some("body"))
            .await
            .unwrap();
        store.put_summary(summary("d1", "short")).await.unwrap();
        store.put_analysis(analysis("d1")).await.unwrap();
        store
            .append_chat_message("d1", "lease.txt", message(ChatRole::User, "hi"))
            .await
            .unwrap();

        store.delete_document("d1").await.unwrap();

        assert!(store.get_document("d1").await.is_none());
        assert!(store.get_content("d1").await.is_none());
        assert!(store.get_summary("d1").await.is_none());
        assert!(store.get_analysis("d1").await.is_none());
        assert!(store.get_chat_session("d1").await.is_none());
    }

    #[tokio::test]
    async fn delete_of_missing_document_is_a_noop() {
        let store = DocumentStore::open(Box::new(MemoryStorage::new()));
        store.delete_document("ghost").await.unwrap();
        assert!(store.list_documents().await.is_empty());
    }

    #[tokio::test]
    async fn put_summary_replaces_prior_summary() {
        let store = DocumentStore::open(Box::new(MemoryStorage::new()));
        store.add_document(doc("d1", "lease.txt"), None).await.unwrap();
        store.put_summary(summary("d1", "first")).await.unwrap();
        store.put_summary(summary("d1", "second")).await.unwrap();
        store.put_summary(summary("d1", "third")).await.unwrap();

        assert_eq!(store.get_summary("d1").await.unwrap().summary, "third");
        assert_eq!(store.list_summaries().await.len(), 1);
    }

    #[tokio::test]
    async fn newest_summary_lists_first() {
        let store = DocumentStore::open(Box::new(MemoryStorage::new()));
        store.put_summary(summary("d1", "one")).await.unwrap();
        store.put_summary(summary("d2", "two")).await.unwrap();
        let listed = store.list_summaries().await;
        assert_eq!(listed[0].doc_id, "d2");
        assert_eq!(listed[1].doc_id, "d1");
    }

    #[tokio::test]
    async fn put_analysis_replaces_prior_analysis() {
        let store = DocumentStore::open(Box::new(MemoryStorage::new()));
        let first = analysis("d1");
        let second = analysis("d1");
        let second_id = second.id;
        store.put_analysis(first).await.unwrap();
        store.put_analysis(second).await.unwrap();

        assert_eq!(store.get_analysis("d1").await.unwrap().id, second_id);
        assert_eq!(store.list_analyses().await.len(), 1);
    }

    #[tokio::test]
    async fn chat_appends_preserve_call_order() {
        let store = DocumentStore::open(Box::new(MemoryStorage::new()));
        for i in 0..5 {
            store
                .append_chat_message(
                    "d1",
                    "lease.txt",
                    message(ChatRole::User, &format!("q{i}")),
                )
                .await
                .unwrap();
        }
        let session = store.get_chat_session("d1").await.unwrap();
        assert_eq!(session.messages.len(), 5);
        let contents: Vec<_> = session.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["q0", "q1", "q2", "q3", "q4"]);
    }

    #[tokio::test]
    async fn clear_chat_keeps_session_identity() {
        let store = DocumentStore::open(Box::new(MemoryStorage::new()));
        store
            .append_chat_message("d1", "lease.txt", message(ChatRole::User, "hi"))
            .await
            .unwrap();
        store.clear_chat("d1").await.unwrap();

        let session = store.get_chat_session("d1").await.unwrap();
        assert!(session.messages.is_empty());
        assert_eq!(session.doc_id, "d1");
        assert_eq!(session.doc_name, "lease.txt");
    }

    #[tokio::test]
    async fn clear_chat_without_session_is_a_noop() {
        let store = DocumentStore::open(Box::new(MemoryStorage::new()));
        store.clear_chat("ghost").await.unwrap();
        assert!(store.get_chat_session("ghost").await.is_none());
    }

    #[tokio::test]
    async fn reopened_store_hydrates_persisted_state() {
        let medium = MemoryStorage::new();
        {
            let store = DocumentStore::open(Box::new(medium.clone()));
            store
                .add_document(doc("d1", "lease.txt"), Some("body"))
                .await
                .unwrap();
            store.put_summary(summary("d1", "short")).await.unwrap();
        }

        let reopened = DocumentStore::open(Box::new(medium));
        assert_eq!(reopened.list_documents().await.len(), 1);
        assert_eq!(reopened.get_summary("d1").await.unwrap().summary, "short");
        assert_eq!(reopened.get_content("d1").await.as_deref(), Some("body"));
    }

    #[tokio::test]
    async fn corrupt_collection_hydrates_empty() {
        let medium = MemoryStorage::new();
        medium.set("documents", "not json").unwrap();
        let store = DocumentStore::open(Box::new(medium));
        assert!(store.list_documents().await.is_empty());
    }

    /// A medium that rejects every write, as a full quota would.
    struct QuotaExceededStorage;

    impl StorageMedium for QuotaExceededStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, MediumError> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), MediumError> {
            Err(MediumError("quota exceeded".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<(), MediumError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn persist_failure_is_surfaced_to_the_caller() {
        let store = DocumentStore::open(Box::new(QuotaExceededStorage));
        let err = store
            .add_document(doc("d1", "lease.txt"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PersistFailed(_)));
    }
}
