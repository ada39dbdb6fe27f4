//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        JsonFileStorage, OpenAiAnalysisAdapter, OpenAiChatAdapter, OpenAiGuidanceAdapter,
        OpenAiSummaryAdapter,
    },
    config::Config,
    error::ApiError,
    web::{
        analyze_document_handler, chat_with_document_handler, clear_chat_handler,
        delete_document_handler, get_document_content_handler, guidance_handler,
        list_analyses_handler, list_chats_handler, list_documents_handler,
        list_summaries_handler, rest::ApiDoc, state::AppState, summarize_document_handler,
        upload_document_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{delete, get, post},
    Router,
};
use legitmind_core::retry::RetryPolicy;
use legitmind_core::store::DocumentStore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Document Store ---
    info!("Opening document store at {}", config.data_dir.display());
    let storage = JsonFileStorage::new(&config.data_dir)?;
    let store = Arc::new(DocumentStore::open(Box::new(storage)));
    info!(
        "Document store hydrated: {} documents",
        store.list_documents().await.len()
    );

    // --- 3. Initialize Gateway Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(&config.openai_api_key);
    let openai_client = Client::with_config(openai_config);
    let retry = RetryPolicy::new(config.retry_attempts, config.retry_delay);

    let summary_adapter = Arc::new(OpenAiSummaryAdapter::new(
        openai_client.clone(),
        config.summary_model.clone(),
        retry,
    ));
    let analysis_adapter = Arc::new(OpenAiAnalysisAdapter::new(
        openai_client.clone(),
        config.analysis_model.clone(),
        retry,
    ));
    let chat_adapter = Arc::new(OpenAiChatAdapter::new(
        openai_client.clone(),
        config.chat_model.clone(),
        retry,
    ));
    let guidance_adapter = Arc::new(OpenAiGuidanceAdapter::new(
        openai_client.clone(),
        config.guidance_model.clone(),
        retry,
    ));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        config: config.clone(),
        summary_adapter,
        analysis_adapter,
        chat_adapter,
        guidance_adapter,
    });

    let cors = CorsLayer::new()
        .allow_origin("http://localhost:3000".parse::<HeaderValue>().map_err(
            |e| ApiError::Internal(format!("Invalid CORS origin: {e}")),
        )?)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    let api_router = Router::new()
        .route("/documents", post(upload_document_handler).get(list_documents_handler))
        .route("/documents/{id}", delete(delete_document_handler))
        .route("/documents/{id}/content", get(get_document_content_handler))
        .route("/documents/{id}/summarize", post(summarize_document_handler))
        .route("/documents/{id}/analyze", post(analyze_document_handler))
        .route(
            "/documents/{id}/chat",
            post(chat_with_document_handler).delete(clear_chat_handler),
        )
        .route("/summaries", get(list_summaries_handler))
        .route("/analyses", get(list_analyses_handler))
        .route("/chats", get(list_chats_handler))
        .route("/guidance", post(guidance_handler))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
