use super::{BookAdded, BookId, Copies, LendCopyError, RestoreCopyError};

/// Book集約 - カタログ上の1タイトル（複数冊の蔵書を持つ）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub copies: Copies,
}

impl Book {
    pub fn stock(&self) -> u32 {
        self.copies.stock()
    }

    pub fn available(&self) -> u32 {
        self.copies.available()
    }

    /// タイトルまたは著者にキーワードを含むか（大文字小文字を区別しない）
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.title.to_lowercase().contains(&keyword)
            || self.author.to_lowercase().contains(&keyword)
    }
}

/// 純粋関数：書籍を登録する
///
/// 登録直後は全冊が貸出可能。
pub fn register_book(
    book_id: BookId,
    title: String,
    author: String,
    year: i32,
    stock: u32,
) -> (Book, BookAdded) {
    let event = BookAdded {
        book_id: book_id.clone(),
        title: title.clone(),
        stock,
    };

    let book = Book {
        book_id,
        title,
        author,
        year,
        copies: Copies::new(stock),
    };

    (book, event)
}

/// 純粋関数：蔵書を1冊貸し出す
pub fn lend_copy(book: &Book) -> Result<Book, LendCopyError> {
    let copies = book.copies.lend()?;
    Ok(Book {
        copies,
        ..book.clone()
    })
}

/// 純粋関数：蔵書を1冊戻す
pub fn restore_copy(book: &Book) -> Result<Book, RestoreCopyError> {
    let copies = book.copies.restore()?;
    Ok(Book {
        copies,
        ..book.clone()
    })
}
