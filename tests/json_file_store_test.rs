use library_circulation::adapters::json_file::JsonFileCatalogStore;
use library_circulation::application::catalog::{CatalogError, CatalogService, ErrorKind};
use library_circulation::domain::{BookId, MemberId};
use library_circulation::ports::*;
use std::fs;

mod common;

use common::*;

#[test]
fn test_save_and_load_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileCatalogStore::new(dir.path().join("library.json"));

    let mut service = setup_catalog();
    service
        .borrow_book(borrow_cmd("M1", "B1", date(2024, 5, 1)))
        .unwrap();
    service
        .borrow_book(borrow_cmd("M1", "B2", date(2024, 5, 2)))
        .unwrap();
    service
        .return_book(return_cmd("M1", "B2", date(2024, 5, 6)))
        .unwrap();
    service.save(&store).unwrap();

    let mut reloaded = CatalogService::new();
    let stats = reloaded.load(&store).unwrap();

    assert_eq!(stats.books, 4);
    assert_eq!(stats.members, 2);
    assert_eq!(stats.loans, 2);
    assert_eq!(stats.active_loans, 1);
    assert_eq!(stats.loan_counter, 3);
    assert_eq!(reloaded.to_snapshot(), service.to_snapshot());
}

#[test]
fn test_saved_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let store = JsonFileCatalogStore::new(&path);

    let mut service = setup_catalog();
    service
        .borrow_book(borrow_cmd("M2", "B3", date(2024, 1, 5)))
        .unwrap();
    service.save(&store).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(json["loan_counter"], 2);
    assert_eq!(json["books"]["B3"]["stock"], 1);
    assert_eq!(json["books"]["B3"]["available"], 0);
    assert_eq!(json["members"]["M2"]["borrowed_books"], serde_json::json!(["B3"]));
    assert_eq!(json["loans"]["L0001"]["loan_id"], "L0001");
    assert_eq!(json["loans"]["L0001"]["loan_date"], "2024-01-05");
    assert_eq!(json["loans"]["L0001"]["return_date"], serde_json::Value::Null);
    assert_eq!(json["loans"]["L0001"]["status"], "borrowed");
}

#[test]
fn test_load_missing_file_starts_empty_with_notice() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileCatalogStore::new(dir.path().join("does-not-exist.json"));

    let mut service = CatalogService::new();
    let err = service.load(&store).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    assert!(matches!(
        err,
        CatalogError::Persistence(PersistenceError::SourceMissing { .. })
    ));
    assert_eq!(service.stats().books, 0);
    assert!(service.list_loans().is_empty());
}

#[test]
fn test_load_malformed_file_keeps_prior_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    fs::write(&path, "{ this is not json").unwrap();
    let store = JsonFileCatalogStore::new(&path);

    let mut service = setup_catalog();
    let err = service.load(&store).unwrap_err();

    assert!(matches!(
        err,
        CatalogError::Persistence(PersistenceError::Parse { .. })
    ));
    assert_eq!(service.stats().books, 4);
}

#[test]
fn test_load_with_missing_required_field_fails_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    fs::write(
        &path,
        r#"{
            "books": {
                "B1": {"book_id": "B1", "title": "T", "author": "A", "year": 2020, "stock": 1, "available": 1}
            },
            "members": {
                "M1": {"member_id": "M1", "name": "N", "address": "Addr"}
            },
            "loan_counter": 1
        }"#,
    )
    .unwrap();
    let store = JsonFileCatalogStore::new(&path);

    let mut service = CatalogService::new();
    assert!(service.load(&store).is_err());

    // 一部だけ読み込まれた状態にはならない
    assert!(service.book(&BookId::new("B1")).is_none());
    assert_eq!(service.stats().books, 0);
}

#[test]
fn test_load_file_written_by_hand_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    fs::write(
        &path,
        r#"{
            "books": {
                "B001": {"book_id": "B001", "title": "Python Programming", "author": "John Smith",
                         "year": 2023, "stock": 3, "available": 2}
            },
            "members": {
                "M001": {"member_id": "M001", "name": "Ahmad Rizki", "address": "123 Main Street",
                         "phone": "081234567890", "borrowed_books": ["B001"]},
                "M002": {"member_id": "M002", "name": "Siti Nurhaliza", "address": "456 Oak Avenue",
                         "phone": "081298765432"}
            },
            "loans": {
                "L0001": {"loan_id": "L0001", "member_id": "M001", "book_id": "B001",
                          "loan_date": "2024-02-01", "return_date": null, "status": "borrowed"}
            },
            "loan_counter": 2
        }"#,
    )
    .unwrap();
    let store = JsonFileCatalogStore::new(&path);

    let mut service = CatalogService::new();
    service.load(&store).unwrap();

    assert!(
        service
            .member(&MemberId::new("M002"))
            .unwrap()
            .borrowed_books
            .is_empty()
    );

    // 読み込んだ貸出をそのまま返却できる
    let returned = service
        .return_book(return_cmd("M001", "B001", date(2024, 2, 10)))
        .unwrap();
    assert_eq!(returned.loan_id.value(), "L0001");
    assert_eq!(service.book(&BookId::new("B001")).unwrap().available(), 3);
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("library.json");
    let store = JsonFileCatalogStore::new(&path);

    setup_catalog().save(&store).unwrap();

    assert!(path.exists());
    assert_eq!(store.location(), path.display().to_string());
}
