use super::{BorrowedBooksError, CopiesError};

/// 貸出（書籍側）のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LendCopyError {
    /// 貸出可能な蔵書がない
    NotAvailable,
}

impl From<CopiesError> for LendCopyError {
    fn from(_: CopiesError) -> Self {
        LendCopyError::NotAvailable
    }
}

/// 返却（書籍側）のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreCopyError {
    /// 全冊が既に返却済み
    AllCopiesOnShelf,
}

impl From<CopiesError> for RestoreCopyError {
    fn from(_: CopiesError) -> Self {
        RestoreCopyError::AllCopiesOnShelf
    }
}

/// 貸出（会員側）のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldBookError {
    /// 貸出上限（3冊）を超えた
    LimitExceeded,
    /// 同じ書籍を既に借りている
    AlreadyHeld,
}

/// 返却（会員側）のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseBookError {
    /// 借りていない書籍
    NotHeld,
}

impl From<BorrowedBooksError> for ReleaseBookError {
    fn from(_: BorrowedBooksError) -> Self {
        ReleaseBookError::NotHeld
    }
}

/// 返却（貸出記録側）のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnLoanError {
    /// 既に返却済み
    AlreadyReturned,
}
