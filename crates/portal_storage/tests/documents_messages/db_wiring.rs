#![forbid(unsafe_code)]

use portal_kernel_contracts::client::ClientId;
use portal_kernel_contracts::document::{DocumentId, DocumentRecord};
use portal_kernel_contracts::message::MessageId;
use portal_kernel_contracts::MonotonicTimeNs;
use portal_storage::demo_seed::demo_store;
use portal_storage::portal_store::StorageError;
use portal_storage::repo::DocumentMessageTablesRepo;

#[test]
fn at_docs_db_01_search_by_name_client_or_type() {
    let s = demo_store(MonotonicTimeNs(1)).unwrap();
    assert_eq!(s.document_rows_matching("w9").len(), 1);
    assert_eq!(s.document_rows_matching("michael").len(), 1);
    assert_eq!(s.document_rows_matching("tax form").len(), 1);
    assert_eq!(s.document_rows_matching(".pdf").len(), 3);
}

#[test]
fn at_docs_db_02_client_foreign_key_is_enforced() {
    let mut s = demo_store(MonotonicTimeNs(1)).unwrap();
    let next = s.next_document_id();
    assert_eq!(next, DocumentId(4));
    let doc = DocumentRecord::v1(
        next,
        "Passport.pdf",
        "ID Document",
        1024,
        "You",
        "2024-02-01",
        Some(ClientId::new("99").unwrap()),
        None,
    )
    .unwrap();
    assert!(matches!(
        s.insert_document_row(doc),
        Err(StorageError::ForeignKeyViolation { .. })
    ));
}

#[test]
fn at_docs_db_03_delete_document() {
    let mut s = demo_store(MonotonicTimeNs(1)).unwrap();
    let removed = s.delete_document_row(DocumentId(2)).unwrap();
    assert_eq!(removed.name, "W9_Form.pdf");
    assert!(s.document(DocumentId(2)).is_none());
}

#[test]
fn at_msgs_db_01_search_by_sender_or_subject() {
    let s = demo_store(MonotonicTimeNs(1)).unwrap();
    assert_eq!(s.message_rows_matching("sarah").len(), 1);
    assert_eq!(s.message_rows_matching("allocation").len(), 1);
    assert_eq!(s.message_rows_matching("").len(), 3);
}

#[test]
fn at_msgs_db_02_mark_read() {
    let mut s = demo_store(MonotonicTimeNs(1)).unwrap();
    assert_eq!(s.unread_message_row_count(), 1);
    s.mark_message_row_read(MessageId(1)).unwrap();
    assert_eq!(s.unread_message_row_count(), 0);
    assert!(matches!(
        s.mark_message_row_read(MessageId(42)),
        Err(StorageError::NotFound { .. })
    ));
}

#[test]
fn at_docs_db_04_lookup_and_next_id() {
    let s = demo_store(MonotonicTimeNs(1)).unwrap();
    assert_eq!(s.next_document_row_id(), DocumentId(4));
    assert!(s.get_document_row(DocumentId(1)).is_some());
    assert!(s.get_document_row(DocumentId(4)).is_none());
}
