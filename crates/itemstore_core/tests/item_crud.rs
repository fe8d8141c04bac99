use itemstore_core::db::migrations::latest_version;
use itemstore_core::db::{open_db, open_db_in_memory, DbError};
use itemstore_core::{
    Item, ItemRepository, ItemSearchCond, ItemService, ItemUpdate, ItemValidationError, NewItem,
    RepoError, SqliteItemRepository,
};
use rusqlite::Connection;

#[test]
fn save_and_find_by_id_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let new_item = NewItem::new("itemA", Some(10_000), Some(10));
    let id = repo.save(&new_item).unwrap();

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, Item::from_new(id, new_item));
}

#[test]
fn save_preserves_null_price_and_quantity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let id = repo.save(&NewItem::new("mystery", None, None)).unwrap();

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.price, None);
    assert_eq!(loaded.quantity, None);
}

#[test]
fn save_assigns_distinct_identifiers_for_duplicate_names() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let first = repo.save(&NewItem::new("twin", Some(1), Some(1))).unwrap();
    let second = repo.save(&NewItem::new("twin", Some(1), Some(1))).unwrap();

    assert_ne!(first, second);
    assert!(first > 0 && second > 0);
}

#[test]
fn find_by_id_on_unknown_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    repo.save(&NewItem::new("only", Some(1), Some(1))).unwrap();

    assert!(repo.find_by_id(9_999).unwrap().is_none());
    assert!(repo.find_by_id(0).unwrap().is_none());
    assert!(repo.find_by_id(-1).unwrap().is_none());
}

#[test]
fn update_overwrites_all_fields_and_keeps_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let id = repo.save(&NewItem::new("item1", Some(10_000), Some(10))).unwrap();
    repo.update(id, &ItemUpdate::new("item2", Some(20_000), Some(30)))
        .unwrap();

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(
        loaded,
        Item {
            id,
            name: "item2".to_string(),
            price: Some(20_000),
            quantity: Some(30),
        }
    );
}

#[test]
fn update_can_clear_price_and_quantity() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let id = repo.save(&NewItem::new("item1", Some(10), Some(1))).unwrap();
    repo.update(id, &ItemUpdate::new("item1", None, None)).unwrap();

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.price, None);
    assert_eq!(loaded.quantity, None);
}

#[test]
fn update_with_identical_values_still_succeeds() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let id = repo.save(&NewItem::new("same", Some(5), Some(5))).unwrap();
    repo.update(id, &ItemUpdate::new("same", Some(5), Some(5)))
        .unwrap();
}

#[test]
fn update_not_found_returns_not_found_and_leaves_store_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let id = repo.save(&NewItem::new("keep", Some(1), Some(2))).unwrap();
    let before = repo.find_all(&ItemSearchCond::default()).unwrap();

    let err = repo
        .update(id + 100, &ItemUpdate::new("ghost", Some(3), Some(4)))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id + 100));
    assert_eq!(err.to_string(), format!("item not found: {}", id + 100));

    let after = repo.find_all(&ItemSearchCond::default()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn over_long_name_is_rejected_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let err = repo
        .save(&NewItem::new("elevenchars", Some(1), Some(1)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ItemValidationError::NameTooLong {
            chars: 11,
            max_chars: 10
        })
    ));

    let id = repo.save(&NewItem::new("tenchars!!", Some(1), Some(1))).unwrap();
    let err = repo
        .update(id, &ItemUpdate::new("elevenchars", Some(1), Some(1)))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.find_by_id(id).unwrap().unwrap().name, "tenchars!!");
}

#[test]
fn name_with_nul_is_measured_like_on_read() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    let kept = repo.save(&NewItem::new("apple pie", Some(100), None)).unwrap();

    // SQLite's length() stops at NUL, so the schema check alone would let this in.
    let err = repo
        .save(&NewItem::new("a\0bbbbbbbbbbbbbbb", Some(1), None))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = repo
        .update(kept, &ItemUpdate::new("a\0bbbbbbbbbbbbbbb", Some(1), None))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let short = NewItem::new("a\0b", Some(5), None);
    let id = repo.save(&short).unwrap();
    assert_eq!(repo.find_by_id(id).unwrap(), Some(Item::from_new(id, short)));

    let all = repo.find_all(&ItemSearchCond::default()).unwrap();
    assert_eq!(all.len(), 2);
    let found = repo.find_all(&ItemSearchCond::by_name("apple")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, kept);
}

#[test]
fn name_limit_counts_characters_not_bytes() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let name = "crèmebrûlé";
    let id = repo.save(&NewItem::new(name, Some(1), None)).unwrap();
    assert_eq!(repo.find_by_id(id).unwrap().unwrap().name, name);
}

#[test]
fn identifiers_are_not_reused_after_row_removal() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let first = repo.save(&NewItem::new("first", None, None)).unwrap();
    conn.execute("DELETE FROM items WHERE id = ?1;", [first])
        .unwrap();

    let second = repo.save(&NewItem::new("second", None, None)).unwrap();
    assert!(second > first);
}

#[test]
fn rolled_back_transaction_discards_writes() {
    let mut conn = open_db_in_memory().unwrap();

    {
        let tx = conn.transaction().unwrap();
        let repo = SqliteItemRepository::try_new(&tx).unwrap();
        repo.save(&NewItem::new("draft", Some(1), Some(1))).unwrap();
        assert_eq!(repo.find_all(&ItemSearchCond::default()).unwrap().len(), 1);
        tx.rollback().unwrap();
    }

    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    assert!(repo.find_all(&ItemSearchCond::default()).unwrap().is_empty());
}

#[test]
fn committed_transaction_keeps_all_writes() {
    let mut conn = open_db_in_memory().unwrap();

    let id = {
        let tx = conn.transaction().unwrap();
        let id = {
            let repo = SqliteItemRepository::try_new(&tx).unwrap();
            let id = repo.save(&NewItem::new("batch", Some(1), Some(1))).unwrap();
            repo.update(id, &ItemUpdate::new("batch2", Some(2), Some(2)))
                .unwrap();
            id
        };
        tx.commit().unwrap();
        id
    };

    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    assert_eq!(repo.find_by_id(id).unwrap().unwrap().name, "batch2");
}

#[test]
fn items_survive_reopening_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("items.db");

    let id = {
        let conn = open_db(&path).unwrap();
        let repo = SqliteItemRepository::try_new(&conn).unwrap();
        repo.save(&NewItem::new("durable", Some(7), Some(3))).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded.name, "durable");
}

#[test]
fn find_by_id_rejects_invalid_persisted_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    let id = repo.save(&NewItem::new("ok", None, None)).unwrap();

    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE items SET item_name = 'much too long name' WHERE id = ?1;",
        [id],
    )
    .unwrap();

    let err = repo.find_by_id(id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    let service = ItemService::new(repo);

    let created = service
        .register_item(NewItem::new("service", Some(300), Some(3)))
        .unwrap();
    assert_eq!(service.get_item(created.id).unwrap(), Some(created.clone()));

    let updated = service
        .update_item(created.id, &ItemUpdate::new("renamed", Some(400), None))
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(service.get_item(created.id).unwrap(), Some(updated));

    let err = service
        .update_item(created.id + 1, &ItemUpdate::new("x", None, None))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    let found = service
        .search_items(&ItemSearchCond::by_name("ren"))
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteItemRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_items_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("items"))
    ));
}

#[test]
fn repository_rejects_connection_missing_quantity_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_name TEXT NOT NULL,
            price INTEGER
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "items",
            column: "quantity"
        })
    ));
}
