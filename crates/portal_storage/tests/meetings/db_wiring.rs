#![forbid(unsafe_code)]

use portal_kernel_contracts::meeting::{MeetingDraft, MeetingId, MeetingKind, MeetingStatus};
use portal_kernel_contracts::MonotonicTimeNs;
use portal_storage::demo_seed::demo_store;
use portal_storage::portal_store::{PortalStore, StorageError};
use portal_storage::repo::MeetingTablesRepo;

fn draft(client: &str) -> MeetingDraft {
    MeetingDraft {
        title: "Planning Session".to_string(),
        client: client.to_string(),
        date: "2024-02-01".to_string(),
        time: "09:30".to_string(),
        duration_min: 90,
        kind: MeetingKind::Planning,
        notes: String::new(),
    }
}

#[test]
fn at_meetings_db_01_schedule_takes_max_plus_one() {
    let mut s = demo_store(MonotonicTimeNs(1)).unwrap();
    s.delete_meeting_row(MeetingId(1)).unwrap();
    let id = s.schedule_meeting_row(draft("Emily Davis")).unwrap();
    assert_eq!(id, MeetingId(3));
    let rows = s.meeting_rows();
    let new = rows.iter().find(|m| m.meeting_id == id).unwrap();
    assert_eq!(new.status, MeetingStatus::Scheduled);
}

#[test]
fn at_meetings_db_02_first_meeting_is_one() {
    let mut s = PortalStore::new_in_memory();
    assert_eq!(s.schedule_meeting_row(draft("Ann Lee")).unwrap(), MeetingId(1));
}

#[test]
fn at_meetings_db_03_update_keeps_status() {
    let mut s = demo_store(MonotonicTimeNs(1)).unwrap();
    s.update_meeting_row(MeetingId(2), draft("Sarah Johnson")).unwrap();
    let m = s.meeting(MeetingId(2)).unwrap();
    assert_eq!(m.status, MeetingStatus::Completed);
    assert_eq!(m.draft.duration_min, 90);
}

#[test]
fn at_meetings_db_04_invalid_duration_rejected() {
    let mut s = PortalStore::new_in_memory();
    let mut d = draft("Ann Lee");
    d.duration_min = 15;
    assert!(matches!(
        s.schedule_meeting_row(d),
        Err(StorageError::ContractViolation(_))
    ));
    assert!(s.meeting_rows().is_empty());
}
