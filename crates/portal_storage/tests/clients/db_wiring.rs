#![forbid(unsafe_code)]

use portal_kernel_contracts::client::{ClientId, ClientPriority, ClientRecord};
use portal_kernel_contracts::household::HouseholdId;
use portal_kernel_contracts::MonotonicTimeNs;
use portal_storage::demo_seed::demo_store;
use portal_storage::portal_store::{PortalStore, StorageError};
use portal_storage::repo::ClientTablesRepo;

fn client(id: &str) -> ClientId {
    ClientId::new(id).unwrap()
}

fn record(first: &str, last: &str, email: &str) -> ClientRecord {
    let mut r = ClientRecord::empty();
    r.legal_first = first.to_string();
    r.legal_last = last.to_string();
    r.email = email.to_string();
    r
}

#[test]
fn at_clients_db_01_insert_rejects_duplicate_id() {
    let mut s = PortalStore::new_in_memory();
    s.insert_client_row(
        client("c1"),
        ClientRecord::empty(),
        ClientPriority::A,
        0,
        None,
        MonotonicTimeNs(1),
    )
    .unwrap();
    let err = s
        .insert_client_row(
            client("c1"),
            ClientRecord::empty(),
            ClientPriority::B,
            0,
            None,
            MonotonicTimeNs(2),
        )
        .unwrap_err();
    assert!(matches!(err, StorageError::DuplicateKey { table: "clients", .. }));
}

#[test]
fn at_clients_db_02_household_foreign_key_is_enforced() {
    let mut s = PortalStore::new_in_memory();
    let err = s
        .insert_client_row(
            client("c1"),
            ClientRecord::empty(),
            ClientPriority::A,
            0,
            Some(HouseholdId(7)),
            MonotonicTimeNs(1),
        )
        .unwrap_err();
    assert!(matches!(err, StorageError::ForeignKeyViolation { .. }));
    assert!(s.get_client_row(&client("c1")).is_none());
}

#[test]
fn at_clients_db_03_last_write_wins() {
    let mut s = PortalStore::new_in_memory();
    let id = s
        .create_client_row(ClientRecord::empty(), ClientPriority::C, 0, MonotonicTimeNs(1))
        .unwrap();
    s.update_client_record_row(&id, record("Ann", "Lee", "ann@x.com"), MonotonicTimeNs(2))
        .unwrap();
    let rev = s
        .update_client_record_row(&id, record("Ann", "Lee-Park", "ann@x.com"), MonotonicTimeNs(3))
        .unwrap();
    let row = s.get_client_row(&id).unwrap();
    assert_eq!(rev, 3);
    assert_eq!(row.record.legal_last, "Lee-Park");
    assert_eq!(row.completion, 25);
}

#[test]
fn at_clients_db_04_same_record_has_same_digest() {
    let mut s = PortalStore::new_in_memory();
    let a = s
        .create_client_row(record("A", "B", ""), ClientPriority::A, 0, MonotonicTimeNs(1))
        .unwrap();
    let b = s
        .create_client_row(record("A", "B", ""), ClientPriority::B, 10, MonotonicTimeNs(9))
        .unwrap();
    assert_eq!(
        s.get_client_row(&a).unwrap().record_digest,
        s.get_client_row(&b).unwrap().record_digest
    );
}

#[test]
fn at_clients_db_05_search_over_demo_rows() {
    let s = demo_store(MonotonicTimeNs(1)).unwrap();
    let names: Vec<String> = s
        .client_rows_matching("john")
        .into_iter()
        .map(|r| r.display_name())
        .collect();
    assert_eq!(names, vec!["John Smith", "Sarah Johnson"]);
    assert_eq!(s.client_rows_matching("EXAMPLE.COM").len(), 4);
    assert_eq!(s.client_rows_all().len(), 4);
}

#[test]
fn at_clients_db_06_delete_then_get_is_none() {
    let mut s = demo_store(MonotonicTimeNs(1)).unwrap();
    let removed = s.delete_client_row(&client("4")).unwrap();
    assert_eq!(removed.display_name(), "Emily Davis");
    assert!(s.get_client_row(&client("4")).is_none());
    assert!(matches!(
        s.delete_client_row(&client("4")),
        Err(StorageError::NotFound { .. })
    ));
}
