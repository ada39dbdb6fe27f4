//! services/api/src/web/protocol.rs
//!
//! Defines the request and response payloads exchanged between the browser
//! client and the API server, plus their conversions from the core domain
//! types. Field names stay camelCase on the wire.

use chrono::{DateTime, Utc};
use legitmind_core::domain::{
    Analysis, AnalysisReport, ChatMessage, ChatRole, ChatSession, Clause, Document, DocumentKind,
    Obligation, Risk, RiskLevel, Summary,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Document Payloads
//=========================================================================================

/// One uploaded document's metadata as returned by the API.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub id: String,
    pub name: String,
    /// Human-readable size label, e.g. "12.4 KB".
    pub size: String,
    /// One of "pdf", "docx", "txt".
    pub kind: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Document> for DocumentPayload {
    fn from(doc: Document) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            size: doc.size,
            kind: match doc.kind {
                DocumentKind::Pdf => "pdf".to_string(),
                DocumentKind::Docx => "docx".to_string(),
                DocumentKind::Txt => "txt".to_string(),
            },
            uploaded_at: doc.uploaded_at,
        }
    }
}

//=========================================================================================
// Summary and Analysis Payloads
//=========================================================================================

/// A stored document summary.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub id: Uuid,
    pub doc_id: String,
    pub doc_name: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl From<Summary> for SummaryPayload {
    fn from(s: Summary) -> Self {
        Self {
            id: s.id,
            doc_id: s.doc_id,
            doc_name: s.doc_name,
            summary: s.summary,
            created_at: s.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ClausePayload {
    pub title: String,
    pub description: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObligationPayload {
    pub party: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RiskPayload {
    /// One of "Low", "Medium", "High".
    pub level: String,
    pub description: String,
    pub mitigation: String,
}

/// The structured result of a document analysis.
#[derive(Serialize, ToSchema)]
pub struct AnalysisReportPayload {
    pub clauses: Vec<ClausePayload>,
    pub obligations: Vec<ObligationPayload>,
    pub risks: Vec<RiskPayload>,
}

impl From<AnalysisReport> for AnalysisReportPayload {
    fn from(report: AnalysisReport) -> Self {
        Self {
            clauses: report
                .clauses
                .into_iter()
                .map(|Clause { title, description }| ClausePayload { title, description })
                .collect(),
            obligations: report
                .obligations
                .into_iter()
                .map(
                    |Obligation {
                         party,
                         description,
                         due_date,
                     }| ObligationPayload {
                        party,
                        description,
                        due_date,
                    },
                )
                .collect(),
            risks: report
                .risks
                .into_iter()
                .map(
                    |Risk {
                         level,
                         description,
                         mitigation,
                     }| RiskPayload {
                        level: match level {
                            RiskLevel::Low => "Low".to_string(),
                            RiskLevel::Medium => "Medium".to_string(),
                            RiskLevel::High => "High".to_string(),
                        },
                        description,
                        mitigation,
                    },
                )
                .collect(),
        }
    }
}

/// A stored document analysis.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub id: Uuid,
    pub doc_id: String,
    pub doc_name: String,
    pub report: AnalysisReportPayload,
    pub created_at: DateTime<Utc>,
}

impl From<Analysis> for AnalysisPayload {
    fn from(a: Analysis) -> Self {
        Self {
            id: a.id,
            doc_id: a.doc_id,
            doc_name: a.doc_name,
            report: a.report.into(),
            created_at: a.created_at,
        }
    }
}

//=========================================================================================
// Chat Payloads
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ChatMessagePayload {
    /// One of "user", "assistant".
    pub role: String,
    pub content: String,
}

impl From<ChatMessage> for ChatMessagePayload {
    fn from(m: ChatMessage) -> Self {
        Self {
            role: match m.role {
                ChatRole::User => "user".to_string(),
                ChatRole::Assistant => "assistant".to_string(),
            },
            content: m.content,
        }
    }
}

/// One document's chat transcript.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionPayload {
    pub doc_id: String,
    pub doc_name: String,
    pub messages: Vec<ChatMessagePayload>,
    pub last_updated: DateTime<Utc>,
}

impl From<ChatSession> for ChatSessionPayload {
    fn from(session: ChatSession) -> Self {
        Self {
            doc_id: session.doc_id,
            doc_name: session.doc_name,
            messages: session.messages.into_iter().map(Into::into).collect(),
            last_updated: session.last_updated,
        }
    }
}

/// A question asked against one document's content.
#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    pub question: String,
}

/// The assistant's answer plus the updated transcript.
#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub answer: String,
    pub session: ChatSessionPayload,
}

//=========================================================================================
// Guidance Payloads
//=========================================================================================

/// A question about the upload process, unrelated to any stored document.
#[derive(Deserialize, ToSchema)]
pub struct GuidanceRequest {
    pub question: String,
}

#[derive(Serialize, ToSchema)]
pub struct GuidanceResponse {
    pub answer: String,
}
