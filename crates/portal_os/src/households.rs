#![forbid(unsafe_code)]

use portal_engines::visibility;
use portal_kernel_contracts::household::{HouseholdId, HouseholdRecord};
use portal_kernel_contracts::notification::Notification;
use portal_kernel_contracts::role::{PortalRole, PortalScreen};
use portal_storage::portal_store::HouseholdStats;
use portal_storage::repo::HouseholdTablesRepo;

use crate::notices;
use crate::ports::PortError;

#[derive(Debug, Clone, Default)]
pub struct HouseholdsView {
    query: String,
}

impl HouseholdsView {
    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn visible<'a, R: HouseholdTablesRepo>(&self, repo: &'a R) -> Vec<&'a HouseholdRecord> {
        repo.household_rows_matching(&self.query)
    }

    pub fn stats<R: HouseholdTablesRepo>(&self, repo: &R) -> HouseholdStats {
        repo.household_stats_row()
    }
}

pub fn delete_household<R: HouseholdTablesRepo>(
    repo: &mut R,
    role: PortalRole,
    id: HouseholdId,
) -> Notification {
    if !visibility::screen_allowed(role, PortalScreen::Households) {
        return notices::not_permitted("delete households");
    }
    match repo.delete_household_row(id) {
        Ok(removed) => notices::household_deleted(&removed.name),
        Err(e) => notices::port_failure(&PortError::from(e)),
    }
}
