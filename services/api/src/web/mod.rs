pub mod protocol;
pub mod rest;
pub mod state;

// Re-export the handlers to make them easily accessible to the binary
// that builds the web server router.
pub use rest::{
    analyze_document_handler, chat_with_document_handler, clear_chat_handler,
    delete_document_handler, get_document_content_handler, guidance_handler, list_analyses_handler,
    list_chats_handler, list_documents_handler, list_summaries_handler,
    summarize_document_handler, upload_document_handler,
};
