#![forbid(unsafe_code)]

use portal_kernel_contracts::client::ClientId;
use portal_kernel_contracts::household::{HouseholdId, HouseholdRecord};
use portal_kernel_contracts::MonotonicTimeNs;
use portal_storage::demo_seed::demo_store;
use portal_storage::portal_store::{PortalStore, StorageError};
use portal_storage::repo::{ClientTablesRepo, HouseholdTablesRepo};
use rust_decimal::Decimal;

#[test]
fn at_households_db_01_search_matches_name_or_member() {
    let s = demo_store(MonotonicTimeNs(1)).unwrap();
    let by_member: Vec<&str> = s
        .household_rows_matching("lisa")
        .into_iter()
        .map(|h| h.name.as_str())
        .collect();
    assert_eq!(by_member, vec!["Brown Estate"]);
    assert_eq!(s.household_rows_matching("trust").len(), 1);
    assert_eq!(s.household_rows_matching("").len(), 3);
}

#[test]
fn at_households_db_02_stats() {
    let s = demo_store(MonotonicTimeNs(1)).unwrap();
    let stats = s.household_stats_row();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.total_aum_usd, 4_200_000);
    assert_eq!(stats.average_size, Decimal::new(30, 1));
}

#[test]
fn at_households_db_03_empty_stats() {
    let s = PortalStore::new_in_memory();
    let stats = s.household_stats_row();
    assert_eq!(stats.count, 0);
    assert_eq!(stats.average_size, Decimal::ZERO);
}

#[test]
fn at_households_db_04_delete_detaches_clients() {
    let mut s = demo_store(MonotonicTimeNs(1)).unwrap();
    let removed = s.delete_household_row(HouseholdId(1)).unwrap();
    assert_eq!(removed.name, "Smith Family Trust");
    let john = s.get_client_row(&ClientId::new("1").unwrap()).unwrap();
    assert_eq!(john.household_id, None);
    assert!(matches!(
        s.delete_household_row(HouseholdId(1)),
        Err(StorageError::NotFound { .. })
    ));
}

#[test]
fn at_households_db_05_duplicate_household_rejected() {
    let mut s = demo_store(MonotonicTimeNs(1)).unwrap();
    let dup = HouseholdRecord::v1(HouseholdId(2), "Another", vec![], 0).unwrap();
    assert!(matches!(
        s.insert_household_row(dup),
        Err(StorageError::DuplicateKey { table: "households", .. })
    ));
}

#[test]
fn at_households_db_06_assign_client_household() {
    let mut s = demo_store(MonotonicTimeNs(1)).unwrap();
    assert_eq!(
        s.get_household_row(HouseholdId(2)).unwrap().name,
        "Johnson Retirement Accounts"
    );
    let emily = ClientId::new("4").unwrap();
    s.assign_client_household_row(&emily, Some(HouseholdId(2))).unwrap();
    assert_eq!(s.get_client_row(&emily).unwrap().household_id, Some(HouseholdId(2)));
    assert!(matches!(
        s.assign_client_household_row(&emily, Some(HouseholdId(9))),
        Err(StorageError::ForeignKeyViolation { .. })
    ));
    s.assign_client_household_row(&emily, None).unwrap();
    assert_eq!(s.get_client_row(&emily).unwrap().household_id, None);
}
