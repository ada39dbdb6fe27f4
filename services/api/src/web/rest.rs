//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{
    AnalysisPayload, AnalysisReportPayload, ChatMessagePayload, ChatRequest, ChatResponse,
    ChatSessionPayload, ClausePayload, DocumentPayload, GuidanceRequest, GuidanceResponse,
    ObligationPayload, RiskPayload, SummaryPayload,
};
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use legitmind_core::domain::{Analysis, ChatMessage, ChatRole, Document, DocumentKind, Summary};
use legitmind_core::ports::{GatewayError, StoreError};
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        upload_document_handler,
        list_documents_handler,
        delete_document_handler,
        get_document_content_handler,
        summarize_document_handler,
        list_summaries_handler,
        analyze_document_handler,
        list_analyses_handler,
        chat_with_document_handler,
        clear_chat_handler,
        list_chats_handler,
        guidance_handler,
    ),
    components(
        schemas(
            DocumentPayload,
            SummaryPayload,
            AnalysisPayload,
            AnalysisReportPayload,
            ClausePayload,
            ObligationPayload,
            RiskPayload,
            ChatRequest,
            ChatResponse,
            ChatMessagePayload,
            ChatSessionPayload,
            GuidanceRequest,
            GuidanceResponse,
        )
    ),
    tags(
        (name = "LegitMind API", description = "API endpoints for the document management dashboard.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping Helpers
//=========================================================================================

fn gateway_error(e: GatewayError) -> (StatusCode, String) {
    let status = match &e {
        GatewayError::EmptyInput => StatusCode::BAD_REQUEST,
        GatewayError::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
        GatewayError::InvocationFailed(_) | GatewayError::OutputInvalid(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    (status, e.to_string())
}

fn store_error(e: StoreError) -> (StatusCode, String) {
    error!("store write failed: {e}");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn document_not_found(id: &str) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("Document {id} not found"),
    )
}

fn content_unavailable(id: &str) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("Document content unavailable for {id}"),
    )
}

//=========================================================================================
// Upload Helpers
//=========================================================================================

/// Formats a byte count as the human-readable size label stored with a
/// document, e.g. "12.4 KB".
fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    let bytes = bytes as f64;
    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{bytes:.0} B")
    }
}

fn extension_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}

//=========================================================================================
// Document Handlers
//=========================================================================================

/// Upload a document.
///
/// Accepts a multipart/form-data request with a single file part. The
/// document id is derived from the upload timestamp and the file name.
#[utoipa::path(
    post,
    path = "/documents",
    request_body(content_type = "multipart/form-data", description = "The document to upload."),
    responses(
        (status = 201, description = "Document stored successfully", body = DocumentPayload),
        (status = 400, description = "Bad request (e.g., missing file or non-UTF-8 content)"),
        (status = 500, description = "The document could not be persisted")
    )
)]
pub async fn upload_document_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (file_name, file_text) =
        if let Some(field) = multipart.next_field().await.map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read multipart data: {}", e),
            )
        })? {
            let name = field.file_name().unwrap_or("untitled.txt").to_string();
            let data = field.bytes().await.map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to read file bytes: {}", e),
                )
            })?;
            let text = String::from_utf8(data.to_vec()).map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Uploaded file is not valid UTF-8 text: {}", e),
                )
            })?;
            (name, text)
        } else {
            return Err((
                StatusCode::BAD_REQUEST,
                "Multipart form must include a file".to_string(),
            ));
        };

    let now = Utc::now();
    let doc = Document {
        id: format!("{}-{}", now.timestamp_millis(), file_name),
        name: file_name.clone(),
        size: format_size(file_text.len()),
        kind: DocumentKind::from_extension(extension_of(&file_name)),
        uploaded_at: now,
    };

    app_state
        .store
        .add_document(doc.clone(), Some(&file_text))
        .await
        .map_err(store_error)?;

    Ok((StatusCode::CREATED, Json(DocumentPayload::from(doc))))
}

/// List all documents in upload order.
#[utoipa::path(
    get,
    path = "/documents",
    responses(
        (status = 200, description = "All stored documents", body = [DocumentPayload])
    )
)]
pub async fn list_documents_handler(
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let documents: Vec<DocumentPayload> = app_state
        .store
        .list_documents()
        .await
        .into_iter()
        .map(Into::into)
        .collect();
    Json(documents)
}

/// Delete a document and everything derived from it.
///
/// Removes the metadata, the stored content, and any summary, analysis,
/// or chat session for the document. Deleting an unknown id succeeds.
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    params(("id" = String, Path, description = "The document id")),
    responses(
        (status = 204, description = "Document and dependents removed"),
        (status = 500, description = "The deletion could not be persisted")
    )
)]
pub async fn delete_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .store
        .delete_document(&id)
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fetch the raw text content of a document.
#[utoipa::path(
    get,
    path = "/documents/{id}/content",
    params(("id" = String, Path, description = "The document id")),
    responses(
        (status = 200, description = "The raw document text", body = String),
        (status = 404, description = "Content absent (never stored or deleted)")
    )
)]
pub async fn get_document_content_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.store.get_content(&id).await {
        Some(content) => Ok(content),
        None => Err(content_unavailable(&id)),
    }
}

//=========================================================================================
// Summary Handlers
//=========================================================================================

/// Summarize a document, replacing any prior summary.
#[utoipa::path(
    post,
    path = "/documents/{id}/summarize",
    params(("id" = String, Path, description = "The document id")),
    responses(
        (status = 200, description = "The stored summary", body = SummaryPayload),
        (status = 404, description = "Document or its content not found"),
        (status = 502, description = "The model call failed or returned an invalid shape"),
        (status = 503, description = "The model is overloaded"),
        (status = 500, description = "The summary could not be persisted")
    )
)]
pub async fn summarize_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let doc = app_state
        .store
        .get_document(&id)
        .await
        .ok_or_else(|| document_not_found(&id))?;
    let content = app_state
        .store
        .get_content(&id)
        .await
        .ok_or_else(|| content_unavailable(&id))?;

    let summary_text = app_state
        .summary_adapter
        .summarize(&content)
        .await
        .map_err(gateway_error)?;

    let summary = Summary {
        id: Uuid::new_v4(),
        doc_id: doc.id,
        doc_name: doc.name,
        summary: summary_text,
        created_at: Utc::now(),
    };
    app_state
        .store
        .put_summary(summary.clone())
        .await
        .map_err(store_error)?;

    Ok(Json(SummaryPayload::from(summary)))
}

/// List all summaries, most recent first.
#[utoipa::path(
    get,
    path = "/summaries",
    responses(
        (status = 200, description = "All stored summaries", body = [SummaryPayload])
    )
)]
pub async fn list_summaries_handler(
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let summaries: Vec<SummaryPayload> = app_state
        .store
        .list_summaries()
        .await
        .into_iter()
        .map(Into::into)
        .collect();
    Json(summaries)
}

//=========================================================================================
// Analysis Handlers
//=========================================================================================

/// Analyze a document for clauses, obligations, and risks, replacing any
/// prior analysis. An analysis with empty categories is a valid result.
#[utoipa::path(
    post,
    path = "/documents/{id}/analyze",
    params(("id" = String, Path, description = "The document id")),
    responses(
        (status = 200, description = "The stored analysis", body = AnalysisPayload),
        (status = 404, description = "Document or its content not found"),
        (status = 502, description = "The model call failed or returned an invalid shape"),
        (status = 503, description = "The model is overloaded"),
        (status = 500, description = "The analysis could not be persisted")
    )
)]
pub async fn analyze_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let doc = app_state
        .store
        .get_document(&id)
        .await
        .ok_or_else(|| document_not_found(&id))?;
    let content = app_state
        .store
        .get_content(&id)
        .await
        .ok_or_else(|| content_unavailable(&id))?;

    let report = app_state
        .analysis_adapter
        .analyze(&content)
        .await
        .map_err(gateway_error)?;

    let analysis = Analysis {
        id: Uuid::new_v4(),
        doc_id: doc.id,
        doc_name: doc.name,
        report,
        created_at: Utc::now(),
    };
    app_state
        .store
        .put_analysis(analysis.clone())
        .await
        .map_err(store_error)?;

    Ok(Json(AnalysisPayload::from(analysis)))
}

/// List all analyses, most recent first.
#[utoipa::path(
    get,
    path = "/analyses",
    responses(
        (status = 200, description = "All stored analyses", body = [AnalysisPayload])
    )
)]
pub async fn list_analyses_handler(
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let analyses: Vec<AnalysisPayload> = app_state
        .store
        .list_analyses()
        .await
        .into_iter()
        .map(Into::into)
        .collect();
    Json(analyses)
}

//=========================================================================================
// Chat Handlers
//=========================================================================================

/// Ask a question about a document.
///
/// The user message is appended to the document's chat session, the model is
/// called with the stored document content as context, and the assistant's
/// answer is appended and returned together with the updated transcript.
#[utoipa::path(
    post,
    path = "/documents/{id}/chat",
    params(("id" = String, Path, description = "The document id")),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The assistant's answer and updated transcript", body = ChatResponse),
        (status = 400, description = "The question is empty"),
        (status = 404, description = "Document or its content not found"),
        (status = 502, description = "The model call failed or returned an invalid shape"),
        (status = 503, description = "The model is overloaded"),
        (status = 500, description = "The transcript could not be persisted")
    )
)]
pub async fn chat_with_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let doc = app_state
        .store
        .get_document(&id)
        .await
        .ok_or_else(|| document_not_found(&id))?;
    let content = app_state
        .store
        .get_content(&id)
        .await
        .ok_or_else(|| content_unavailable(&id))?;

    app_state
        .store
        .append_chat_message(
            &doc.id,
            &doc.name,
            ChatMessage {
                role: ChatRole::User,
                content: request.question.clone(),
            },
        )
        .await
        .map_err(store_error)?;

    let answer = app_state
        .chat_adapter
        .chat(&content, &request.question)
        .await
        .map_err(gateway_error)?;

    let session = app_state
        .store
        .append_chat_message(
            &doc.id,
            &doc.name,
            ChatMessage {
                role: ChatRole::Assistant,
                content: answer.clone(),
            },
        )
        .await
        .map_err(store_error)?;

    Ok(Json(ChatResponse {
        answer,
        session: ChatSessionPayload::from(session),
    }))
}

/// Clear a document's chat transcript.
///
/// Empties the message list but keeps the session itself. Clearing a
/// document with no session succeeds.
#[utoipa::path(
    delete,
    path = "/documents/{id}/chat",
    params(("id" = String, Path, description = "The document id")),
    responses(
        (status = 204, description = "Transcript cleared"),
        (status = 500, description = "The cleared transcript could not be persisted")
    )
)]
pub async fn clear_chat_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    app_state
        .store
        .clear_chat(&id)
        .await
        .map_err(store_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List all chat sessions.
#[utoipa::path(
    get,
    path = "/chats",
    responses(
        (status = 200, description = "All chat sessions", body = [ChatSessionPayload])
    )
)]
pub async fn list_chats_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let chats: Vec<ChatSessionPayload> = app_state
        .store
        .list_chats()
        .await
        .into_iter()
        .map(Into::into)
        .collect();
    Json(chats)
}

//=========================================================================================
// Guidance Handler
//=========================================================================================

/// Ask a short question about the upload process.
#[utoipa::path(
    post,
    path = "/guidance",
    request_body = GuidanceRequest,
    responses(
        (status = 200, description = "A short guidance answer", body = GuidanceResponse),
        (status = 400, description = "The question is empty"),
        (status = 502, description = "The model call failed or returned an invalid shape"),
        (status = 503, description = "The model is overloaded")
    )
)]
pub async fn guidance_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<GuidanceRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let answer = app_state
        .guidance_adapter
        .guidance(&request.question)
        .await
        .map_err(gateway_error)?;
    Ok(Json(GuidanceResponse { answer }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_labels_match_expected_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(12_698), "12.4 KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.0 MB");
    }

    #[test]
    fn extension_parsing_handles_dots_and_none() {
        assert_eq!(extension_of("lease.final.pdf"), "pdf");
        assert_eq!(extension_of("notes"), "");
        assert_eq!(extension_of("report.DOCX"), "DOCX");
    }

    #[test]
    fn gateway_errors_map_to_distinct_statuses() {
        assert_eq!(
            gateway_error(GatewayError::EmptyInput).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            gateway_error(GatewayError::Overloaded).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            gateway_error(GatewayError::InvocationFailed("down".into())).0,
            StatusCode::BAD_GATEWAY
        );
    }
}
