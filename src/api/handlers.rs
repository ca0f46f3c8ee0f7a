use crate::adapters::json_file::JsonFileCatalogStore;
use crate::application::catalog::CatalogService;
use crate::config::AppConfig;
use crate::domain::{BookId, MemberId};
use crate::ports::{CatalogStore, Clock};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{
    error::ApiError,
    types::{
        AddBookRequest, AddMemberRequest, BookResponse, CatalogStatsResponse, ListLoansQuery,
        LoanRequest, LoanResponse, MemberResponse, PersistRequest, SearchBooksQuery,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
///
/// 貸出・返却は書籍・会員・貸出の3レコードをまとめて更新するため、
/// カタログ全体を1つのロックで保護する。
pub struct AppState {
    pub catalog: Mutex<CatalogService>,
    pub clock: Arc<dyn Clock>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(catalog: CatalogService, clock: Arc<dyn Clock>, config: AppConfig) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            clock,
            config,
        }
    }

    /// リクエストで指定されたファイル、なければ既定ファイルの保存先
    ///
    /// 指定されたファイル名は既定ファイルのディレクトリ配下に限る。
    fn store_for(&self, body: &[u8]) -> Result<JsonFileCatalogStore, ApiError> {
        let request = PersistRequest::from_body(body).map_err(ApiError::BadRequest)?;

        let path = match request.filename() {
            Some(name) => self.config.resolve_data_file(name).ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "Invalid filename {:?}: use a relative name inside the data directory",
                    name
                ))
            })?,
            None => self.config.data_file.clone(),
        };
        Ok(JsonFileCatalogStore::new(path))
    }
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /books - 書籍を登録
///
/// 同じ書籍IDが登録済みの場合は409を返す。
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<BookResponse>), ApiError> {
    let book = state.catalog.lock().await.add_book(req.to_command())?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// POST /members - 会員を登録
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let member = state.catalog.lock().await.add_member(req.to_command())?;
    Ok((StatusCode::CREATED, Json(MemberResponse::from(member))))
}

/// POST /loans - 書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - 会員と書籍が存在すること
/// - 貸出可能な蔵書が残っていること
/// - 会員の貸出数が上限（3冊）未満であること
/// - 会員が同じ書籍を借りていないこと
pub async fn borrow_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoanRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let cmd = req.to_borrow_command(state.clock.today());
    let loan = state.catalog.lock().await.borrow_book(cmd)?;
    Ok((StatusCode::CREATED, Json(LoanResponse::from(loan))))
}

/// POST /loans/return - 書籍を返却
///
/// 強制されるビジネスルール:
/// - 会員が存在すること
/// - 会員がその書籍を借りていること
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoanRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let cmd = req.to_return_command(state.clock.today());
    let loan = state.catalog.lock().await.return_book(cmd)?;
    Ok(Json(LoanResponse::from(loan)))
}

/// POST /catalog/save - カタログをファイルに保存
///
/// ロック中に複製した状態を、ブロッキング用スレッドで書き込む。
pub async fn save_catalog(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CatalogStatsResponse>, ApiError> {
    let store = state.store_for(&body)?;
    let catalog = state.catalog.lock().await.clone();

    let location = store.location();
    let stats = tokio::task::spawn_blocking(move || catalog.save(&store))
        .await
        .map_err(|e| ApiError::Internal(format!("save task failed: {}", e)))??;
    Ok(Json(CatalogStatsResponse::new(location, stats)))
}

/// POST /catalog/load - ファイルからカタログを読み込む
///
/// ファイルがない・壊れている場合は現在の状態を保持したままエラーを返す。
/// ファイルの読み込みはロックの外で行い、反映だけをロック中に行う。
pub async fn load_catalog(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CatalogStatsResponse>, ApiError> {
    let store = state.store_for(&body)?;

    let location = store.location();
    let loaded = tokio::task::spawn_blocking(move || store.load())
        .await
        .map_err(|e| ApiError::Internal(format!("load task failed: {}", e)))?;

    let stats = state.catalog.lock().await.apply_loaded(&location, loaded)?;
    Ok(Json(CatalogStatsResponse::new(location, stats)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /books - 書籍一覧（登録順）
pub async fn list_books(State(state): State<Arc<AppState>>) -> Json<Vec<BookResponse>> {
    let books = state.catalog.lock().await.list_books();
    Json(books.into_iter().map(BookResponse::from).collect())
}

/// GET /books/search?keyword= - タイトル・著者で書籍を検索
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchBooksQuery>,
) -> Json<Vec<BookResponse>> {
    let catalog = state.catalog.lock().await;
    Json(
        catalog
            .search_books(query.keyword.trim())
            .map(BookResponse::from)
            .collect(),
    )
}

/// GET /books/:id - 書籍詳細
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> Result<Json<BookResponse>, QueryError> {
    let book_id = BookId::new(book_id);
    state
        .catalog
        .lock()
        .await
        .book(&book_id)
        .map(|book| Json(BookResponse::from(book)))
        .ok_or_else(|| QueryError::NotFound(format!("Book {} not found", book_id)))
}

/// GET /members - 会員一覧（登録順）
pub async fn list_members(State(state): State<Arc<AppState>>) -> Json<Vec<MemberResponse>> {
    let members = state.catalog.lock().await.list_members();
    Json(members.into_iter().map(MemberResponse::from).collect())
}

/// GET /members/:id - 会員詳細
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<String>,
) -> Result<Json<MemberResponse>, QueryError> {
    let member_id = MemberId::new(member_id);
    state
        .catalog
        .lock()
        .await
        .member(&member_id)
        .map(|member| Json(MemberResponse::from(member)))
        .ok_or_else(|| QueryError::NotFound(format!("Member {} not found", member_id)))
}

/// GET /loans - 貸出履歴
///
/// クエリパラメータ:
/// - status: ステータスでフィルタリング（borrowed, returned）（オプション）
pub async fn list_loans(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListLoansQuery>,
) -> Result<Json<Vec<LoanResponse>>, QueryError> {
    let status = query
        .status
        .as_deref()
        .map(super::types::parse_status_filter)
        .transpose()
        .map_err(QueryError::BadRequest)?;

    let loans = state.catalog.lock().await.list_loans();

    Ok(Json(
        loans
            .into_iter()
            .filter(|loan| status.is_none_or(|s| loan.status == s))
            .map(LoanResponse::from)
            .collect(),
    ))
}

// ============================================================================
// Error types
// ============================================================================

/// クエリハンドラー用のエラー型
#[derive(Debug)]
pub enum QueryError {
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            QueryError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            QueryError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
        };

        let body = Json(super::types::ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
