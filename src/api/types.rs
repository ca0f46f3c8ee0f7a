use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::application::catalog::CatalogStats;
use crate::domain::{Book, BookId, Loan, LoanStatus, Member, MemberId, commands::*};

fn default_stock() -> u32 {
    1
}

/// 書籍登録リクエスト（POST /books）
///
/// `stock`省略時は1冊。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBookRequest {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    #[serde(default = "default_stock")]
    pub stock: u32,
}

impl AddBookRequest {
    pub fn to_command(&self) -> AddBook {
        AddBook {
            book_id: BookId::new(self.book_id.trim()),
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            year: self.year,
            stock: self.stock,
        }
    }
}

/// 会員登録リクエスト（POST /members）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub member_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl AddMemberRequest {
    pub fn to_command(&self) -> AddMember {
        AddMember {
            member_id: MemberId::new(self.member_id.trim()),
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
        }
    }
}

/// 貸出・返却リクエスト（POST /loans, POST /loans/return）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    pub member_id: String,
    pub book_id: String,
}

impl LoanRequest {
    pub fn to_borrow_command(&self, borrowed_on: NaiveDate) -> BorrowBook {
        BorrowBook {
            member_id: MemberId::new(self.member_id.trim()),
            book_id: BookId::new(self.book_id.trim()),
            borrowed_on,
        }
    }

    pub fn to_return_command(&self, returned_on: NaiveDate) -> ReturnBook {
        ReturnBook {
            member_id: MemberId::new(self.member_id.trim()),
            book_id: BookId::new(self.book_id.trim()),
            returned_on,
        }
    }
}

/// 保存・読み込みリクエスト（POST /catalog/save, POST /catalog/load）
///
/// `filename`省略時は設定の既定ファイルを使う。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistRequest {
    pub filename: Option<String>,
}

impl PersistRequest {
    /// リクエストボディを解釈する
    ///
    /// 空のボディは既定値として扱う。JSONとして解釈できないボディはエラー。
    pub fn from_body(body: &[u8]) -> Result<Self, String> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| format!("Invalid request body: {}", e))
    }

    /// 空白を除いたファイル名（未指定・空文字は`None`）
    pub fn filename(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// 書籍検索のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct SearchBooksQuery {
    #[serde(default)]
    pub keyword: String,
}

/// 貸出一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListLoansQuery {
    /// ステータスでフィルタリング（borrowed, returned）
    pub status: Option<String>,
}

/// 書籍レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub stock: u32,
    pub available: u32,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            stock: book.stock(),
            available: book.available(),
            book_id: book.book_id.to_string(),
            title: book.title,
            author: book.author,
            year: book.year,
        }
    }
}

/// 会員レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberResponse {
    pub member_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub borrowed_books: Vec<String>,
    pub borrowed_count: usize,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            borrowed_books: member.borrowed_books.iter().map(|b| b.to_string()).collect(),
            borrowed_count: member.borrowed_books.len(),
            member_id: member.member_id.to_string(),
            name: member.name,
            address: member.address,
            phone: member.phone,
        }
    }
}

/// 貸出レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanResponse {
    pub loan_id: String,
    pub member_id: String,
    pub book_id: String,
    pub loan_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: String,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            loan_id: loan.loan_id.to_string(),
            member_id: loan.member_id.to_string(),
            book_id: loan.book_id.to_string(),
            loan_date: loan.loan_date,
            return_date: loan.return_date,
            status: loan.status.as_str().to_string(),
        }
    }
}

/// 保存・読み込み結果レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatsResponse {
    pub location: String,
    pub books: usize,
    pub members: usize,
    pub loans: usize,
    pub active_loans: usize,
    pub loan_counter: u32,
}

impl CatalogStatsResponse {
    pub fn new(location: String, stats: CatalogStats) -> Self {
        Self {
            location,
            books: stats.books,
            members: stats.members,
            loans: stats.loans,
            active_loans: stats.active_loans,
            loan_counter: stats.loan_counter,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// ステータスクエリパラメータのパースとバリデーション
pub fn parse_status_filter(status: &str) -> Result<LoanStatus, String> {
    status.parse::<LoanStatus>()
}
