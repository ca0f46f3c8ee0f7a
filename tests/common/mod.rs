#![allow(dead_code)]

use chrono::NaiveDate;
use library_circulation::application::catalog::CatalogService;
use library_circulation::domain::commands::*;
use library_circulation::domain::{BookId, MemberId};

/// テスト用の日付
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn add_book_cmd(id: &str, title: &str, author: &str, stock: u32) -> AddBook {
    AddBook {
        book_id: BookId::new(id),
        title: title.to_string(),
        author: author.to_string(),
        year: 2020,
        stock,
    }
}

pub fn add_member_cmd(id: &str, name: &str) -> AddMember {
    AddMember {
        member_id: MemberId::new(id),
        name: name.to_string(),
        address: "123 Main Street".to_string(),
        phone: "081234567890".to_string(),
    }
}

pub fn borrow_cmd(member: &str, book: &str, on: NaiveDate) -> BorrowBook {
    BorrowBook {
        member_id: MemberId::new(member),
        book_id: BookId::new(book),
        borrowed_on: on,
    }
}

pub fn return_cmd(member: &str, book: &str, on: NaiveDate) -> ReturnBook {
    ReturnBook {
        member_id: MemberId::new(member),
        book_id: BookId::new(book),
        returned_on: on,
    }
}

/// 書籍4タイトル・会員2名を登録済みのサービス
///
/// - B1: 蔵書2冊
/// - B2, B3, B4: 蔵書1冊
/// - M1, M2
pub fn setup_catalog() -> CatalogService {
    let mut service = CatalogService::new();
    service
        .add_book(add_book_cmd("B1", "The Rust Book", "Klabnik", 2))
        .unwrap();
    service
        .add_book(add_book_cmd("B2", "Programming Rust", "Blandy", 1))
        .unwrap();
    service
        .add_book(add_book_cmd("B3", "Rust in Action", "McNamara", 1))
        .unwrap();
    service
        .add_book(add_book_cmd("B4", "Zero To Production", "Palmieri", 1))
        .unwrap();
    service.add_member(add_member_cmd("M1", "Ahmad Rizki")).unwrap();
    service
        .add_member(add_member_cmd("M2", "Siti Nurhaliza"))
        .unwrap();
    service
}
