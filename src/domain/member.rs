use super::{
    BookId, BorrowedBooks, BorrowedBooksError, HoldBookError, MemberId, MemberRegistered,
    ReleaseBookError,
};

/// Member集約 - 貸出を受ける会員
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub borrowed_books: BorrowedBooks,
}

/// 純粋関数：会員を登録する
pub fn register_member(
    member_id: MemberId,
    name: String,
    address: String,
    phone: String,
) -> (Member, MemberRegistered) {
    let event = MemberRegistered {
        member_id: member_id.clone(),
        name: name.clone(),
    };

    let member = Member {
        member_id,
        name,
        address,
        phone,
        borrowed_books: BorrowedBooks::new(),
    };

    (member, event)
}

/// 純粋関数：会員の貸出中書籍に追加する
///
/// ビジネスルール：
/// - 貸出中は3冊まで
/// - 同じ書籍を重複して借りることはできない
pub fn hold_book(member: &Member, book_id: BookId) -> Result<Member, HoldBookError> {
    let borrowed_books = member.borrowed_books.add(book_id).map_err(|e| match e {
        BorrowedBooksError::Duplicate(_) => HoldBookError::AlreadyHeld,
        _ => HoldBookError::LimitExceeded,
    })?;

    Ok(Member {
        borrowed_books,
        ..member.clone()
    })
}

/// 純粋関数：会員の貸出中書籍から取り除く
pub fn release_book(member: &Member, book_id: &BookId) -> Result<Member, ReleaseBookError> {
    let borrowed_books = member.borrowed_books.remove(book_id)?;
    Ok(Member {
        borrowed_books,
        ..member.clone()
    })
}
