use crate::application::catalog::CatalogError;
use crate::ports::PersistenceError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
/// リクエスト自体の不備と、ハンドラー内部の失敗も扱う。
#[derive(Debug)]
pub enum ApiError {
    Catalog(CatalogError),
    BadRequest(String),
    Internal(String),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Catalog(err) => catalog_error_response(err),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("BAD_REQUEST", message)),
            )
                .into_response(),
            ApiError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                let body = Json(ErrorResponse::new("INTERNAL_ERROR", "Internal server error"));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

fn catalog_error_response(err: CatalogError) -> Response {
    let kind = err.kind().as_str();
    let status = match &err {
        // 409 Conflict - 既に登録済み
        CatalogError::DuplicateId { .. } => StatusCode::CONFLICT,

        // 404 Not Found - リクエストされたリソースが存在しない
        CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,

        // 422 Unprocessable Entity - ビジネスルール違反
        CatalogError::Unavailable(_)
        | CatalogError::LimitExceeded(_)
        | CatalogError::AlreadyBorrowed { .. }
        | CatalogError::NotBorrowed { .. } => StatusCode::UNPROCESSABLE_ENTITY,

        // 500 Internal Server Error - データ不整合
        CatalogError::LoanRecordMissing { .. } | CatalogError::InconsistentState(_) => {
            tracing::error!("Catalog inconsistency: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }

        CatalogError::Persistence(PersistenceError::SourceMissing { .. }) => {
            StatusCode::NOT_FOUND
        }
        CatalogError::Persistence(PersistenceError::Parse { .. })
        | CatalogError::Persistence(PersistenceError::Invalid(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CatalogError::Persistence(PersistenceError::Io { source, .. }) => {
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            tracing::error!("Persistence I/O error: {}", source);
            let body = Json(ErrorResponse::new(kind, "Failed to access catalog file"));
            return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
        }
    };

    let body = Json(ErrorResponse::new(kind, err.to_string()));
    (status, body).into_response()
}
