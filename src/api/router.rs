use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_book, add_member, borrow_book, get_book, get_member, list_books, list_loans,
    list_members, load_catalog, return_book, save_catalog, search_books,
};

/// Creates the API router with all catalog endpoints
///
/// Command endpoints (Write operations):
/// - POST /books, POST /members
/// - POST /loans - Borrow a book
/// - POST /loans/return - Return a book
/// - POST /catalog/save, POST /catalog/load
///
/// Query endpoints (Read operations):
/// - GET /books, GET /books/search, GET /books/:id
/// - GET /members, GET /members/:id
/// - GET /loans
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Books
        .route("/books", post(add_book).get(list_books))
        .route("/books/search", get(search_books))
        .route("/books/:id", get(get_book))
        // Members
        .route("/members", post(add_member).get(list_members))
        .route("/members/:id", get(get_member))
        // Loans
        .route("/loans", post(borrow_book).get(list_loans))
        .route("/loans/return", post(return_book))
        // Persistence
        .route("/catalog/save", post(save_catalog))
        .route("/catalog/load", post(load_catalog))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
