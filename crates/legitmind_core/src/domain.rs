//! crates/legitmind_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs carry serde derives because the Document Store persists
//! whole collections as JSON blobs, but they are otherwise independent of
//! any storage medium or transport format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed set of accepted document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Maps a file extension to a document kind, defaulting to plain text.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => DocumentKind::Pdf,
            "docx" => DocumentKind::Docx,
            _ => DocumentKind::Txt,
        }
    }
}

/// Represents a text document uploaded by a user.
///
/// The id is client-generated from the upload timestamp and file name.
/// Raw text content is stored separately from this metadata record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    /// Human-readable size label, e.g. "12.4 KB".
    pub size: String,
    pub kind: DocumentKind,
    pub uploaded_at: DateTime<Utc>,
}

/// A generated summary of one document. At most one current summary exists
/// per document; re-summarizing replaces the previous record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub id: Uuid,
    pub doc_id: String,
    pub doc_name: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// A key clause identified in a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clause {
    pub title: String,
    pub description: String,
}

/// An obligation one party carries under the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obligation {
    pub party: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Severity level of an identified risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// A potential risk or red flag, with a suggested mitigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Risk {
    pub level: RiskLevel,
    pub description: String,
    pub mitigation: String,
}

/// The structured result of analyzing one document. Empty lists are valid
/// results; a document with no extractable obligations is not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub clauses: Vec<Clause>,
    pub obligations: Vec<Obligation>,
    pub risks: Vec<Risk>,
}

/// A stored analysis of one document. Same replace-on-recompute policy as
/// `Summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: Uuid,
    pub doc_id: String,
    pub doc_name: String,
    pub report: AnalysisReport,
    pub created_at: DateTime<Utc>,
}

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message within a document's chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// The ordered conversation transcript associated with one document.
/// Messages are append-only and never reordered; clearing a session
/// empties the message list but keeps the session itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub doc_id: String,
    pub doc_name: String,
    pub messages: Vec<ChatMessage>,
    pub last_updated: DateTime<Utc>,
}
