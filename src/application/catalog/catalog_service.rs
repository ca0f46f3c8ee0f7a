use crate::domain::{
    self, BookId, BorrowedBooks, Copies, DomainEvent, HoldBookError, Loan, LoanCounter, LoanStatus,
    MemberId, commands::*,
};
use crate::domain::{Book, Member};
use crate::ports::*;
use std::collections::{HashMap, HashSet};

use super::errors::{CatalogError, EntityKind, Result};

/// カタログ全体の件数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub books: usize,
    pub members: usize,
    pub loans: usize,
    pub active_loans: usize,
    pub loan_counter: u32,
}

/// カタログサービス
///
/// 書籍・会員・貸出の3つのコレクションと貸出カウンタを単独で所有し、
/// 貸出・返却のビジネスルールをすべてここで強制する。
///
/// 外部には複製したスナップショットのみを返す。
/// 変更操作は`&mut self`を要求するため、同時に複数の変更が走ることはない。
/// サーバーで共有する場合はサービス全体を1つのロックで保護すること。
///
/// 各操作は検証をすべて終えてから状態を書き換える。
/// エラー時に一部だけ更新された状態は残らない。
#[derive(Debug, Clone, Default)]
pub struct CatalogService {
    books: Vec<Book>,
    members: Vec<Member>,
    loans: Vec<Loan>,
    book_index: HashMap<BookId, usize>,
    member_index: HashMap<MemberId, usize>,
    loan_counter: LoanCounter,
}

impl CatalogService {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // コマンド
    // ========================================================================

    /// 書籍を登録する
    ///
    /// ビジネスルール：
    /// - 書籍IDが未登録であること
    /// - 登録直後は全冊貸出可能
    pub fn add_book(&mut self, cmd: AddBook) -> Result<Book> {
        if self.book_index.contains_key(&cmd.book_id) {
            return Err(CatalogError::DuplicateId {
                entity: EntityKind::Book,
                id: cmd.book_id.to_string(),
            });
        }

        let (book, event) =
            domain::book::register_book(cmd.book_id, cmd.title, cmd.author, cmd.year, cmd.stock);

        self.book_index.insert(book.book_id.clone(), self.books.len());
        self.books.push(book.clone());
        record(DomainEvent::BookAdded(event));

        Ok(book)
    }

    /// 会員を登録する
    ///
    /// ビジネスルール：
    /// - 会員IDが未登録であること
    pub fn add_member(&mut self, cmd: AddMember) -> Result<Member> {
        if self.member_index.contains_key(&cmd.member_id) {
            return Err(CatalogError::DuplicateId {
                entity: EntityKind::Member,
                id: cmd.member_id.to_string(),
            });
        }

        let (member, event) =
            domain::member::register_member(cmd.member_id, cmd.name, cmd.address, cmd.phone);

        self.member_index
            .insert(member.member_id.clone(), self.members.len());
        self.members.push(member.clone());
        record(DomainEvent::MemberRegistered(event));

        Ok(member)
    }

    /// 書籍を貸し出す
    ///
    /// ビジネスルール（この順に検査する）：
    /// - 会員が存在すること
    /// - 書籍が存在すること
    /// - 貸出可能な蔵書が残っていること
    /// - 会員の貸出中の冊数が3冊未満であること
    /// - 会員が同じ書籍を借りていないこと
    ///
    /// 成功時は書籍・会員・貸出の3レコードと貸出カウンタをまとめて更新する。
    pub fn borrow_book(&mut self, cmd: BorrowBook) -> Result<Loan> {
        let member_pos = self.member_position(&cmd.member_id)?;
        let book_pos = self.book_position(&cmd.book_id)?;

        // 1. 書籍側：蔵書を1冊減らす
        let lent_book = domain::book::lend_copy(&self.books[book_pos])
            .map_err(|_| CatalogError::Unavailable(cmd.book_id.clone()))?;

        // 2. 会員側：貸出中書籍に追加する
        let holding_member = domain::member::hold_book(&self.members[member_pos], cmd.book_id.clone())
            .map_err(|e| match e {
                HoldBookError::LimitExceeded => CatalogError::LimitExceeded(cmd.member_id.clone()),
                HoldBookError::AlreadyHeld => CatalogError::AlreadyBorrowed {
                    member_id: cmd.member_id.clone(),
                    book_id: cmd.book_id.clone(),
                },
            })?;

        // 3. 貸出レコードを作成する
        let (loan_id, next_counter) = self.loan_counter.issue().map_err(|_| {
            CatalogError::InconsistentState(format!(
                "loan counter {} has no loan IDs left",
                self.loan_counter.value()
            ))
        })?;
        let (loan, event) =
            domain::loan::borrow_book(loan_id, cmd.member_id, cmd.book_id, cmd.borrowed_on);

        // 4. すべての検証が済んだので状態を更新する
        self.books[book_pos] = lent_book;
        self.members[member_pos] = holding_member;
        self.loans.push(loan.clone());
        self.loan_counter = next_counter;
        record(DomainEvent::BookBorrowed(event));

        Ok(loan)
    }

    /// 書籍を返却する
    ///
    /// ビジネスルール：
    /// - 会員が存在すること
    /// - 会員がその書籍を借りていること
    /// - 会員・書籍に対応する貸出中レコードがあること
    ///
    /// 貸出中レコードが見つからない場合はデータ不整合として
    /// `LoanRecordMissing`を返し、状態は変更しない。
    pub fn return_book(&mut self, cmd: ReturnBook) -> Result<Loan> {
        let member_pos = self.member_position(&cmd.member_id)?;

        // 1. 会員側：貸出中書籍から取り除く
        let released_member = domain::member::release_book(&self.members[member_pos], &cmd.book_id)
            .map_err(|_| CatalogError::NotBorrowed {
                member_id: cmd.member_id.clone(),
                book_id: cmd.book_id.clone(),
            })?;

        // 2. 対応する貸出中レコードを探す
        let loan_pos = self
            .loans
            .iter()
            .position(|loan| loan.is_active_for(&cmd.member_id, &cmd.book_id))
            .ok_or_else(|| CatalogError::LoanRecordMissing {
                member_id: cmd.member_id.clone(),
                book_id: cmd.book_id.clone(),
            })?;

        let (returned_loan, event) = domain::loan::return_book(&self.loans[loan_pos], cmd.returned_on)
            .map_err(|e| CatalogError::InconsistentState(format!("{:?}", e)))?;

        // 3. 書籍側：蔵書を1冊戻す
        let book_pos = self.book_position(&cmd.book_id)?;
        let restored_book = domain::book::restore_copy(&self.books[book_pos]).map_err(|_| {
            CatalogError::InconsistentState(format!(
                "all copies of book {} are already on the shelf",
                cmd.book_id
            ))
        })?;

        // 4. すべての検証が済んだので状態を更新する
        self.members[member_pos] = released_member;
        self.loans[loan_pos] = returned_loan.clone();
        self.books[book_pos] = restored_book;
        record(DomainEvent::BookReturned(event));

        Ok(returned_loan)
    }

    // ========================================================================
    // クエリ
    // ========================================================================

    /// タイトルまたは著者にキーワードを含む書籍を検索する
    ///
    /// 大文字小文字は区別しない。登録順に返す。
    /// 結果は呼び出しのたびに走査し直す。
    pub fn search_books<'a>(&'a self, keyword: &str) -> impl Iterator<Item = Book> + use<'a> {
        let keyword = keyword.to_lowercase();
        self.books
            .iter()
            .filter(move |book| book.matches_keyword(&keyword))
            .cloned()
    }

    /// 全書籍（登録順）
    pub fn list_books(&self) -> Vec<Book> {
        self.books.clone()
    }

    /// 全会員（登録順）
    pub fn list_members(&self) -> Vec<Member> {
        self.members.clone()
    }

    /// 全貸出履歴（貸出順）
    pub fn list_loans(&self) -> Vec<Loan> {
        self.loans.clone()
    }

    /// 貸出中の貸出（貸出順）
    pub fn active_loans(&self) -> Vec<Loan> {
        self.loans
            .iter()
            .filter(|loan| loan.is_active())
            .cloned()
            .collect()
    }

    pub fn book(&self, book_id: &BookId) -> Option<Book> {
        self.book_index
            .get(book_id)
            .map(|&pos| self.books[pos].clone())
    }

    pub fn member(&self, member_id: &MemberId) -> Option<Member> {
        self.member_index
            .get(member_id)
            .map(|&pos| self.members[pos].clone())
    }

    pub fn loan(&self, loan_id: &domain::LoanId) -> Option<Loan> {
        self.loans
            .iter()
            .find(|loan| &loan.loan_id == loan_id)
            .cloned()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            books: self.books.len(),
            members: self.members.len(),
            loans: self.loans.len(),
            active_loans: self.loans.iter().filter(|loan| loan.is_active()).count(),
            loan_counter: self.loan_counter.value(),
        }
    }

    // ========================================================================
    // 永続化
    // ========================================================================

    /// 現在の状態をスナップショットに変換する
    pub fn to_snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            books: self.books.iter().map(build_book_record).collect(),
            members: self.members.iter().map(build_member_record).collect(),
            loans: self.loans.iter().map(build_loan_record).collect(),
            loan_counter: self.loan_counter.value(),
        }
    }

    /// スナップショットから状態を置き換える
    ///
    /// スナップショット全体を検証してから一度に置き換える。
    /// 検証に失敗した場合、現在の状態はそのまま残る。
    pub fn restore(&mut self, snapshot: CatalogSnapshot) -> Result<()> {
        *self = Self::from_snapshot(snapshot)?;
        Ok(())
    }

    /// スナップショットから新しいサービスを構築する
    ///
    /// 検証内容：
    /// - 各コレクション内でIDが重複していないこと
    /// - `available <= stock`
    /// - 会員の貸出中書籍は3冊以内・重複なし・登録済みの書籍であること
    /// - 貸出の会員・書籍が登録済みであること
    /// - 貸出ステータスと返却日が一致していること
    /// - 貸出カウンタが既存の貸出IDを再発行しないこと
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self> {
        let mut service = Self::new();

        for record in snapshot.books {
            if service.book_index.contains_key(&record.book_id) {
                return Err(CatalogError::invalid_data(format!(
                    "duplicate book {}",
                    record.book_id
                )));
            }
            let copies = Copies::try_new(record.stock, record.available).map_err(|_| {
                CatalogError::invalid_data(format!(
                    "book {} has {} available but only {} in stock",
                    record.book_id, record.available, record.stock
                ))
            })?;
            service
                .book_index
                .insert(record.book_id.clone(), service.books.len());
            service.books.push(Book {
                book_id: record.book_id,
                title: record.title,
                author: record.author,
                year: record.year,
                copies,
            });
        }

        for record in snapshot.members {
            if service.member_index.contains_key(&record.member_id) {
                return Err(CatalogError::invalid_data(format!(
                    "duplicate member {}",
                    record.member_id
                )));
            }
            if let Some(unknown) = record
                .borrowed_books
                .iter()
                .find(|book_id| !service.book_index.contains_key(*book_id))
            {
                return Err(CatalogError::invalid_data(format!(
                    "member {} holds unknown book {}",
                    record.member_id, unknown
                )));
            }
            let borrowed_books = BorrowedBooks::try_from(record.borrowed_books).map_err(|e| {
                CatalogError::invalid_data(format!(
                    "member {} has invalid borrowed books: {:?}",
                    record.member_id, e
                ))
            })?;
            service
                .member_index
                .insert(record.member_id.clone(), service.members.len());
            service.members.push(Member {
                member_id: record.member_id,
                name: record.name,
                address: record.address,
                phone: record.phone,
                borrowed_books,
            });
        }

        let loan_counter = LoanCounter::try_from(snapshot.loan_counter)
            .map_err(|_| CatalogError::invalid_data("loan counter must start at 1"))?;

        let mut loan_ids = HashSet::new();
        for record in snapshot.loans {
            if !loan_ids.insert(record.loan_id.clone()) {
                return Err(CatalogError::invalid_data(format!(
                    "duplicate loan {}",
                    record.loan_id
                )));
            }
            if !service.member_index.contains_key(&record.member_id) {
                return Err(CatalogError::invalid_data(format!(
                    "loan {} references unknown member {}",
                    record.loan_id, record.member_id
                )));
            }
            if !service.book_index.contains_key(&record.book_id) {
                return Err(CatalogError::invalid_data(format!(
                    "loan {} references unknown book {}",
                    record.loan_id, record.book_id
                )));
            }
            if record
                .loan_id
                .sequence()
                .is_some_and(|sequence| sequence >= loan_counter.value())
            {
                return Err(CatalogError::invalid_data(format!(
                    "loan counter {} would reissue loan {}",
                    loan_counter.value(),
                    record.loan_id
                )));
            }

            let derived_status = match record.return_date {
                Some(_) => LoanStatus::Returned,
                None => LoanStatus::Borrowed,
            };
            if record.status.is_some_and(|status| status != derived_status) {
                return Err(CatalogError::invalid_data(format!(
                    "loan {} status does not match its return date",
                    record.loan_id
                )));
            }

            service.loans.push(Loan {
                loan_id: record.loan_id,
                member_id: record.member_id,
                book_id: record.book_id,
                loan_date: record.loan_date,
                return_date: record.return_date,
                status: derived_status,
            });
        }
        service.loan_counter = loan_counter;

        Ok(service)
    }

    /// カタログを保存先に書き込む
    pub fn save(&self, store: &dyn CatalogStore) -> Result<CatalogStats> {
        store.save(&self.to_snapshot())?;

        let stats = self.stats();
        tracing::info!(
            location = %store.location(),
            books = stats.books,
            members = stats.members,
            loans = stats.loans,
            "Catalog saved"
        );
        Ok(stats)
    }

    /// 保存先からカタログを読み込む
    ///
    /// 読み込み元がない、または読み込みに失敗した場合は
    /// 現在の状態を保持したまま`Persistence`エラーを返す（プロセスは継続できる）。
    pub fn load(&mut self, store: &dyn CatalogStore) -> Result<CatalogStats> {
        let loaded = store.load();
        self.apply_loaded(&store.location(), loaded)
    }

    /// 読み込み結果を反映する
    ///
    /// ファイルの読み込みをロックの外で済ませる呼び出し元向け。
    /// エラー時の扱いは`load`と同じ。
    pub fn apply_loaded(
        &mut self,
        location: &str,
        loaded: std::result::Result<CatalogSnapshot, PersistenceError>,
    ) -> Result<CatalogStats> {
        let snapshot = loaded.inspect_err(|e| {
            if e.is_source_missing() {
                tracing::warn!(location = %location, "Catalog source not found, keeping current state");
            } else {
                tracing::error!(location = %location, error = %e, "Failed to load catalog");
            }
        })?;

        self.restore(snapshot)?;

        let stats = self.stats();
        tracing::info!(
            location = %location,
            books = stats.books,
            members = stats.members,
            loans = stats.loans,
            "Catalog loaded"
        );
        Ok(stats)
    }

    // ========================================================================
    // 内部ヘルパー
    // ========================================================================

    fn book_position(&self, book_id: &BookId) -> Result<usize> {
        self.book_index
            .get(book_id)
            .copied()
            .ok_or_else(|| CatalogError::book_not_found(book_id))
    }

    fn member_position(&self, member_id: &MemberId) -> Result<usize> {
        self.member_index
            .get(member_id)
            .copied()
            .ok_or_else(|| CatalogError::member_not_found(member_id))
    }
}

/// 状態変更をログに残す
fn record(event: DomainEvent) {
    match &event {
        DomainEvent::BookAdded(e) => {
            tracing::info!(book_id = %e.book_id, title = %e.title, stock = e.stock, "Book added")
        }
        DomainEvent::MemberRegistered(e) => {
            tracing::info!(member_id = %e.member_id, name = %e.name, "Member registered")
        }
        DomainEvent::BookBorrowed(e) => tracing::info!(
            loan_id = %e.loan_id,
            member_id = %e.member_id,
            book_id = %e.book_id,
            loan_date = %e.loan_date,
            "Book borrowed"
        ),
        DomainEvent::BookReturned(e) => tracing::info!(
            loan_id = %e.loan_id,
            member_id = %e.member_id,
            book_id = %e.book_id,
            return_date = %e.return_date,
            "Book returned"
        ),
    }
}

fn build_book_record(book: &Book) -> BookRecord {
    BookRecord {
        book_id: book.book_id.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        year: book.year,
        stock: book.stock(),
        available: book.available(),
    }
}

fn build_member_record(member: &Member) -> MemberRecord {
    MemberRecord {
        member_id: member.member_id.clone(),
        name: member.name.clone(),
        address: member.address.clone(),
        phone: member.phone.clone(),
        borrowed_books: member.borrowed_books.iter().cloned().collect(),
    }
}

fn build_loan_record(loan: &Loan) -> LoanRecord {
    LoanRecord {
        loan_id: loan.loan_id.clone(),
        member_id: loan.member_id.clone(),
        book_id: loan.book_id.clone(),
        loan_date: loan.loan_date,
        return_date: loan.return_date,
        status: Some(loan.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoanId;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn book_record(id: &str, stock: u32, available: u32) -> BookRecord {
        BookRecord {
            book_id: BookId::new(id),
            title: "T".to_string(),
            author: "A".to_string(),
            year: 2020,
            stock,
            available,
        }
    }

    fn member_record(id: &str, borrowed: &[&str]) -> MemberRecord {
        MemberRecord {
            member_id: MemberId::new(id),
            name: "N".to_string(),
            address: "Addr".to_string(),
            phone: "000".to_string(),
            borrowed_books: borrowed.iter().map(|b| BookId::new(*b)).collect(),
        }
    }

    fn loan_record(id: &str, member: &str, book: &str) -> LoanRecord {
        LoanRecord {
            loan_id: LoanId::from_string(id),
            member_id: MemberId::new(member),
            book_id: BookId::new(book),
            loan_date: date(2024, 1, 1),
            return_date: None,
            status: Some(LoanStatus::Borrowed),
        }
    }

    #[test]
    fn test_from_snapshot_rejects_available_over_stock() {
        let snapshot = CatalogSnapshot {
            books: vec![book_record("B1", 1, 2)],
            ..Default::default()
        };

        let result = CatalogService::from_snapshot(snapshot);
        assert!(matches!(
            result,
            Err(CatalogError::Persistence(PersistenceError::Invalid(_)))
        ));
    }

    #[test]
    fn test_from_snapshot_rejects_unknown_borrowed_book() {
        let snapshot = CatalogSnapshot {
            members: vec![member_record("M1", &["B9"])],
            ..Default::default()
        };

        assert!(CatalogService::from_snapshot(snapshot).is_err());
    }

    #[test]
    fn test_from_snapshot_rejects_counter_reusing_loan_id() {
        let snapshot = CatalogSnapshot {
            books: vec![book_record("B1", 1, 0)],
            members: vec![member_record("M1", &["B1"])],
            loans: vec![loan_record("L0003", "M1", "B1")],
            loan_counter: 3,
        };

        assert!(CatalogService::from_snapshot(snapshot).is_err());
    }

    #[test]
    fn test_from_snapshot_rejects_status_mismatch() {
        let mut loan = loan_record("L0001", "M1", "B1");
        loan.return_date = Some(date(2024, 1, 2));

        let snapshot = CatalogSnapshot {
            books: vec![book_record("B1", 1, 1)],
            members: vec![member_record("M1", &[])],
            loans: vec![loan],
            loan_counter: 2,
        };

        assert!(CatalogService::from_snapshot(snapshot).is_err());
    }

    #[test]
    fn test_from_snapshot_derives_status_when_absent() {
        let mut loan = loan_record("L0001", "M1", "B1");
        loan.return_date = Some(date(2024, 1, 2));
        loan.status = None;

        let snapshot = CatalogSnapshot {
            books: vec![book_record("B1", 1, 1)],
            members: vec![member_record("M1", &[])],
            loans: vec![loan],
            loan_counter: 2,
        };

        let service = CatalogService::from_snapshot(snapshot).unwrap();
        let loan = service.loan(&LoanId::from_string("L0001")).unwrap();
        assert_eq!(loan.status, LoanStatus::Returned);
    }

    #[test]
    fn test_restore_failure_keeps_current_state() {
        let mut service = CatalogService::new();
        service
            .add_book(AddBook {
                book_id: BookId::new("B1"),
                title: "T".to_string(),
                author: "A".to_string(),
                year: 2020,
                stock: 2,
            })
            .unwrap();

        let broken = CatalogSnapshot {
            books: vec![book_record("B2", 1, 1), book_record("B2", 1, 1)],
            ..Default::default()
        };

        assert!(service.restore(broken).is_err());
        assert_eq!(service.stats().books, 1);
        assert!(service.book(&BookId::new("B1")).is_some());
    }
}
