use crate::domain::{BookId, MemberId};
use crate::ports::PersistenceError;
use std::fmt;
use thiserror::Error;

/// エラーの対象となるエンティティ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Book,
    Member,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Book => "Book",
            EntityKind::Member => "Member",
        };
        f.write_str(name)
    }
}

/// カタログ管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 同じIDが既に登録されている
    #[error("{entity} with ID {id} already exists")]
    DuplicateId { entity: EntityKind, id: String },

    /// 会員・書籍が存在しない
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: String },

    /// 貸出可能な蔵書がない
    #[error("Book {0} is not available")]
    Unavailable(BookId),

    /// 貸出上限（3冊）に達している
    #[error("Member {0} has already borrowed the maximum of 3 books")]
    LimitExceeded(MemberId),

    /// 同じ書籍を既に借りている
    #[error("Member {member_id} has already borrowed book {book_id}")]
    AlreadyBorrowed { member_id: MemberId, book_id: BookId },

    /// 借りていない書籍を返却しようとした
    #[error("Member {member_id} has not borrowed book {book_id}")]
    NotBorrowed { member_id: MemberId, book_id: BookId },

    /// 会員の貸出中書籍にあるのに、対応する貸出中レコードがない
    #[error("No active loan record for member {member_id} and book {book_id}")]
    LoanRecordMissing { member_id: MemberId, book_id: BookId },

    /// 書籍側の冊数との矛盾、または貸出IDの払い出し不能
    #[error("Inconsistent catalog state: {0}")]
    InconsistentState(String),

    /// 保存・読み込みの失敗
    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

/// 表示層向けのエラー種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DuplicateId,
    NotFound,
    Unavailable,
    LimitExceeded,
    AlreadyBorrowed,
    NotBorrowed,
    LoanRecordMissing,
    InconsistentState,
    PersistenceFailure,
}

impl ErrorKind {
    /// 機械可読なエラーコード
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DuplicateId => "DUPLICATE_ID",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Unavailable => "UNAVAILABLE",
            ErrorKind::LimitExceeded => "LIMIT_EXCEEDED",
            ErrorKind::AlreadyBorrowed => "ALREADY_BORROWED",
            ErrorKind::NotBorrowed => "NOT_BORROWED",
            ErrorKind::LoanRecordMissing => "LOAN_RECORD_MISSING",
            ErrorKind::InconsistentState => "INCONSISTENT_STATE",
            ErrorKind::PersistenceFailure => "PERSISTENCE_FAILURE",
        }
    }
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::DuplicateId { .. } => ErrorKind::DuplicateId,
            CatalogError::NotFound { .. } => ErrorKind::NotFound,
            CatalogError::Unavailable(_) => ErrorKind::Unavailable,
            CatalogError::LimitExceeded(_) => ErrorKind::LimitExceeded,
            CatalogError::AlreadyBorrowed { .. } => ErrorKind::AlreadyBorrowed,
            CatalogError::NotBorrowed { .. } => ErrorKind::NotBorrowed,
            CatalogError::LoanRecordMissing { .. } => ErrorKind::LoanRecordMissing,
            CatalogError::InconsistentState(_) => ErrorKind::InconsistentState,
            CatalogError::Persistence(_) => ErrorKind::PersistenceFailure,
        }
    }

    pub(super) fn book_not_found(book_id: &BookId) -> Self {
        CatalogError::NotFound {
            entity: EntityKind::Book,
            id: book_id.to_string(),
        }
    }

    pub(super) fn member_not_found(member_id: &MemberId) -> Self {
        CatalogError::NotFound {
            entity: EntityKind::Member,
            id: member_id.to_string(),
        }
    }

    pub(super) fn invalid_data(message: impl Into<String>) -> Self {
        CatalogError::Persistence(PersistenceError::Invalid(message.into()))
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, CatalogError>;
