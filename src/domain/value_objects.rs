use serde::{Deserialize, Serialize};
use std::fmt;

/// 会員1人あたりの最大貸出冊数
pub const MAX_BORROWED_BOOKS: usize = 3;

/// 貸出IDの接頭辞
pub const LOAN_ID_PREFIX: char = 'L';

/// 書籍ID - 登録時に呼び出し側が採番する
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 会員ID - 登録時に呼び出し側が採番する
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 貸出ID - `L` + 4桁ゼロ埋めの連番（例: `L0001`）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(String);

impl LoanId {
    /// 連番から貸出IDを生成する
    pub fn from_sequence(sequence: u32) -> Self {
        Self(format!("{LOAN_ID_PREFIX}{sequence:04}"))
    }

    /// 永続化データなど既存の文字列から復元する
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// IDに含まれる連番
    ///
    /// 書式に従わないIDの場合は`None`。
    pub fn sequence(&self) -> Option<u32> {
        let digits = self.0.strip_prefix(LOAN_ID_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 貸出カウンタ（次に採番する連番）
///
/// 不変条件：1以上、単調増加。一度払い出した番号は再利用しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoanCounter(u32);

impl LoanCounter {
    pub fn new() -> Self {
        Self(1)
    }

    /// 次の貸出IDと、進めたカウンタを返す
    ///
    /// 連番を使い切った場合は払い出さない。同じIDを二度返すことはない。
    pub fn issue(self) -> Result<(LoanId, Self), CounterError> {
        let next = self.0.checked_add(1).ok_or(CounterError::Exhausted)?;
        Ok((LoanId::from_sequence(self.0), Self(next)))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for LoanCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<u32> for LoanCounter {
    type Error = CounterError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            return Err(CounterError::Zero);
        }
        Ok(Self(value))
    }
}

/// 貸出カウンタのエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CounterError {
    /// 連番は1から始まる
    Zero,
    /// 連番を使い切った
    Exhausted,
}

/// 蔵書数のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopiesError {
    /// 貸出可能数が0
    NoneAvailable,
    /// 全冊が既に手元にある
    AllOnShelf,
    /// 貸出可能数が蔵書数を超えている
    AvailableExceedsStock,
}

/// 蔵書数と貸出可能数
///
/// 不変条件：`0 <= available <= stock`
/// 型システムでこの制約を強制し、範囲外の値を作成できないようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Copies {
    stock: u32,
    available: u32,
}

impl Copies {
    /// 新規登録（全冊貸出可能）
    pub fn new(stock: u32) -> Self {
        Self {
            stock,
            available: stock,
        }
    }

    /// 永続化データから復元する
    pub fn try_new(stock: u32, available: u32) -> Result<Self, CopiesError> {
        if available > stock {
            return Err(CopiesError::AvailableExceedsStock);
        }
        Ok(Self { stock, available })
    }

    /// 1冊貸し出す
    pub fn lend(self) -> Result<Self, CopiesError> {
        if self.available == 0 {
            return Err(CopiesError::NoneAvailable);
        }
        Ok(Self {
            available: self.available - 1,
            ..self
        })
    }

    /// 1冊戻す
    pub fn restore(self) -> Result<Self, CopiesError> {
        if self.available >= self.stock {
            return Err(CopiesError::AllOnShelf);
        }
        Ok(Self {
            available: self.available + 1,
            ..self
        })
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn available(&self) -> u32 {
        self.available
    }

    pub fn is_available(&self) -> bool {
        self.available > 0
    }
}

/// 貸出中書籍セットのエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowedBooksError {
    /// 上限（3冊）に達している
    LimitExceeded,
    /// 同じ書籍を既に借りている
    Duplicate(BookId),
    /// 借りていない書籍
    NotHeld(BookId),
}

/// 会員が現在借りている書籍IDの集合
///
/// 不変条件：
/// - 最大3冊
/// - 重複なし
/// - 追加順を保持する
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BorrowedBooks(Vec<BookId>);

impl BorrowedBooks {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 書籍を追加する
    ///
    /// 上限チェックは重複チェックより先に行う。
    pub fn add(&self, book_id: BookId) -> Result<Self, BorrowedBooksError> {
        if self.0.len() >= MAX_BORROWED_BOOKS {
            return Err(BorrowedBooksError::LimitExceeded);
        }
        if self.contains(&book_id) {
            return Err(BorrowedBooksError::Duplicate(book_id));
        }
        let mut books = self.0.clone();
        books.push(book_id);
        Ok(Self(books))
    }

    /// 書籍を取り除く
    pub fn remove(&self, book_id: &BookId) -> Result<Self, BorrowedBooksError> {
        if !self.contains(book_id) {
            return Err(BorrowedBooksError::NotHeld(book_id.clone()));
        }
        Ok(Self(self.0.iter().filter(|b| *b != book_id).cloned().collect()))
    }

    pub fn contains(&self, book_id: &BookId) -> bool {
        self.0.contains(book_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= MAX_BORROWED_BOOKS
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookId> {
        self.0.iter()
    }
}

impl TryFrom<Vec<BookId>> for BorrowedBooks {
    type Error = BorrowedBooksError;

    fn try_from(books: Vec<BookId>) -> Result<Self, Self::Error> {
        books
            .into_iter()
            .try_fold(Self::new(), |acc, book_id| acc.add(book_id))
    }
}
