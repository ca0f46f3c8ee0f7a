use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookBorrowed, BookId, BookReturned, LoanId, MemberId, ReturnLoanError};

/// 貸出ステータス
///
/// 状態遷移は Borrowed → Returned の一方向のみ。Returnedは終端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// 貸出中
    Borrowed,
    /// 返却済み
    Returned,
}

impl LoanStatus {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Borrowed => "borrowed",
            LoanStatus::Returned => "returned",
        }
    }

    pub fn is_returned(&self) -> bool {
        matches!(self, LoanStatus::Returned)
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "borrowed" => Ok(LoanStatus::Borrowed),
            "returned" => Ok(LoanStatus::Returned),
            _ => Err(format!("Invalid loan status: {}", s)),
        }
    }
}

/// Loan集約 - 1冊の書籍の1回の貸出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    // 識別子
    pub loan_id: LoanId,

    // 他の集約への参照（IDのみ）
    pub member_id: MemberId,
    pub book_id: BookId,

    // 貸出管理の責務
    pub loan_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub status: LoanStatus,
}

impl Loan {
    /// 貸出中（未返却）か
    pub fn is_active(&self) -> bool {
        !self.status.is_returned()
    }

    /// 指定した会員・書籍の貸出中レコードか
    pub fn is_active_for(&self, member_id: &MemberId, book_id: &BookId) -> bool {
        self.is_active() && &self.member_id == member_id && &self.book_id == book_id
    }
}

/// 純粋関数：書籍を貸し出す
///
/// ビジネスルール：
/// - 状態はBorrowed
/// - 返却日は未設定
///
/// 副作用なし。新しいLoanとイベントを返す。
/// 会員・書籍の存在確認や冊数チェックはアプリケーション層で行う。
pub fn borrow_book(
    loan_id: LoanId,
    member_id: MemberId,
    book_id: BookId,
    loan_date: NaiveDate,
) -> (Loan, BookBorrowed) {
    let event = BookBorrowed {
        loan_id: loan_id.clone(),
        member_id: member_id.clone(),
        book_id: book_id.clone(),
        loan_date,
    };

    let loan = Loan {
        loan_id,
        member_id,
        book_id,
        loan_date,
        return_date: None,
        status: LoanStatus::Borrowed,
    };

    (loan, event)
}

/// 純粋関数：書籍を返却する
///
/// ビジネスルール：
/// - 返却済みの貸出は再度返却できない
///
/// 副作用なし。新しいLoanとイベントを返す。
pub fn return_book(
    loan: &Loan,
    return_date: NaiveDate,
) -> Result<(Loan, BookReturned), ReturnLoanError> {
    // バリデーション：既に返却済みは不可
    if loan.status.is_returned() {
        return Err(ReturnLoanError::AlreadyReturned);
    }

    let new_loan = Loan {
        return_date: Some(return_date),
        status: LoanStatus::Returned,
        ..loan.clone()
    };

    let event = BookReturned {
        loan_id: loan.loan_id.clone(),
        member_id: loan.member_id.clone(),
        book_id: loan.book_id.clone(),
        return_date,
    };

    Ok((new_loan, event))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // TDD: borrow_book() のテスト
    #[test]
    fn test_borrow_book_creates_active_loan() {
        let loaned_on = date(2024, 3, 1);
        let (loan, event) = borrow_book(
            LoanId::from_sequence(1),
            MemberId::new("M001"),
            BookId::new("B001"),
            loaned_on,
        );

        assert_eq!(loan.loan_id.value(), "L0001");
        assert_eq!(loan.status, LoanStatus::Borrowed);
        assert_eq!(loan.return_date, None);
        assert_eq!(loan.loan_date, loaned_on);
        assert!(loan.is_active());

        // イベントの検証
        assert_eq!(event.loan_id, loan.loan_id);
        assert_eq!(event.member_id, loan.member_id);
        assert_eq!(event.book_id, loan.book_id);
        assert_eq!(event.loan_date, loaned_on);
    }

    // TDD: return_book() のテスト
    #[test]
    fn test_return_book_success() {
        let (loan, _) = borrow_book(
            LoanId::from_sequence(1),
            MemberId::new("M001"),
            BookId::new("B001"),
            date(2024, 3, 1),
        );

        let (returned, event) = return_book(&loan, date(2024, 3, 8)).unwrap();

        assert_eq!(returned.status, LoanStatus::Returned);
        assert_eq!(returned.return_date, Some(date(2024, 3, 8)));
        assert_eq!(returned.loan_date, loan.loan_date);
        assert!(!returned.is_active());
        assert_eq!(event.loan_id, loan.loan_id);
        assert_eq!(event.return_date, date(2024, 3, 8));
    }

    #[test]
    fn test_return_book_fails_when_already_returned() {
        let (loan, _) = borrow_book(
            LoanId::from_sequence(1),
            MemberId::new("M001"),
            BookId::new("B001"),
            date(2024, 3, 1),
        );
        let (loan, _) = return_book(&loan, date(2024, 3, 2)).unwrap();

        let result = return_book(&loan, date(2024, 3, 3));
        assert_eq!(result.unwrap_err(), ReturnLoanError::AlreadyReturned);
    }

    #[test]
    fn test_is_active_for_matches_member_and_book() {
        let (loan, _) = borrow_book(
            LoanId::from_sequence(1),
            MemberId::new("M001"),
            BookId::new("B001"),
            date(2024, 3, 1),
        );

        assert!(loan.is_active_for(&MemberId::new("M001"), &BookId::new("B001")));
        assert!(!loan.is_active_for(&MemberId::new("M002"), &BookId::new("B001")));
        assert!(!loan.is_active_for(&MemberId::new("M001"), &BookId::new("B002")));
    }

    #[test]
    fn test_loan_status_round_trips_through_str() {
        assert_eq!("borrowed".parse::<LoanStatus>(), Ok(LoanStatus::Borrowed));
        assert_eq!(LoanStatus::Returned.as_str(), "returned");
        assert!("overdue".parse::<LoanStatus>().is_err());
    }
}
