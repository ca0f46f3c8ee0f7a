use crate::domain::{BookId, MemberId, commands::*};

use super::catalog_service::CatalogService;
use super::errors::Result;

/// 初期表示用のサンプル書籍（ID, タイトル, 著者, 出版年, 蔵書数）
const SAMPLE_BOOKS: [(&str, &str, &str, i32, u32); 3] = [
    ("B001", "Python Programming", "John Smith", 2023, 3),
    ("B002", "Data Science Handbook", "Jane Doe", 2022, 2),
    ("B003", "Machine Learning Basics", "Bob Johnson", 2024, 1),
];

/// 初期表示用のサンプル会員（ID, 氏名, 住所, 電話番号）
const SAMPLE_MEMBERS: [(&str, &str, &str, &str); 2] = [
    ("M001", "Ahmad Rizki", "123 Main Street", "081234567890"),
    ("M002", "Siti Nurhaliza", "456 Oak Avenue", "081298765432"),
];

impl CatalogService {
    /// サンプルの書籍と会員を登録する
    ///
    /// 既に同じIDが登録されている場合は`DuplicateId`で止まる。
    pub fn seed_sample_data(&mut self) -> Result<()> {
        for (book_id, title, author, year, stock) in SAMPLE_BOOKS {
            self.add_book(AddBook {
                book_id: BookId::new(book_id),
                title: title.to_string(),
                author: author.to_string(),
                year,
                stock,
            })?;
        }

        for (member_id, name, address, phone) in SAMPLE_MEMBERS {
            self.add_member(AddMember {
                member_id: MemberId::new(member_id),
                name: name.to_string(),
                address: address.to_string(),
                phone: phone.to_string(),
            })?;
        }

        Ok(())
    }
}
