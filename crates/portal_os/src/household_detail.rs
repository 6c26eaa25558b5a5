#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use portal_engines::completion::{percent_of, CompletionEngine};
use portal_engines::visibility;
use portal_kernel_contracts::client::ClientId;
use portal_kernel_contracts::household::{HouseholdId, HouseholdRecord};
use portal_kernel_contracts::notification::Notification;
use portal_kernel_contracts::role::{PortalRole, PortalScreen};
use portal_kernel_contracts::MonotonicTimeNs;
use portal_storage::portal_store::ClientRow;
use portal_storage::repo::{ClientTablesRepo, HouseholdTablesRepo};
use serde::Serialize;
use tracing::info;

use crate::client_list::{ClientListItem, ListError};
use crate::commands::{CommandBatch, PortalCommand};
use crate::config::PortalConfig;
use crate::notices;
use crate::ports::{CrmTarget, PortError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HouseholdSummary {
    pub member_count: usize,
    pub combined_aum_usd: u64,
    /// Rounded half-up; 0 for a household without client rows.
    pub average_completion: u8,
}

/// One household's member screen. The selection belongs to this view.
#[derive(Debug, Clone)]
pub struct HouseholdDetailView {
    household_id: HouseholdId,
    selected: BTreeSet<ClientId>,
    completion: CompletionEngine,
}

impl HouseholdDetailView {
    pub fn new(household_id: HouseholdId, config: &PortalConfig) -> Self {
        Self {
            household_id,
            selected: BTreeSet::new(),
            completion: CompletionEngine::new(config.completion),
        }
    }

    pub fn household_id(&self) -> HouseholdId {
        self.household_id
    }

    pub fn household<'a, R: HouseholdTablesRepo>(&self, repo: &'a R) -> Option<&'a HouseholdRecord> {
        repo.get_household_row(self.household_id)
    }

    fn member_rows<'a, R: ClientTablesRepo>(&self, repo: &'a R) -> Vec<&'a ClientRow> {
        let mut rows: Vec<&ClientRow> = repo
            .client_rows_all()
            .into_iter()
            .filter(|row| row.household_id == Some(self.household_id))
            .collect();
        rows.sort_by(|a, b| a.display_name().cmp(&b.display_name()));
        rows
    }

    /// Client rows assigned to this household, by name.
    pub fn members<R: ClientTablesRepo>(&self, repo: &R) -> Vec<ClientListItem> {
        self.member_rows(repo)
            .into_iter()
            .map(|row| ClientListItem {
                client_id: row.client_id.clone(),
                name: row.display_name(),
                email: row.record.email.clone(),
                phone: row.record.mobile.clone(),
                priority: row.priority,
                aum_usd: row.aum_usd,
                completion: self.completion.percent(&row.record),
                selected: self.selected.contains(&row.client_id),
            })
            .collect()
    }

    pub fn summary<R: ClientTablesRepo>(&self, repo: &R) -> HouseholdSummary {
        let members = self.members(repo);
        let combined_aum_usd = members
            .iter()
            .fold(0u64, |acc, m| acc.saturating_add(m.aum_usd));
        let sum: usize = members.iter().map(|m| usize::from(m.completion)).sum();
        let average_completion = if members.is_empty() {
            0
        } else {
            percent_of(sum, members.len() * 100)
        };
        HouseholdSummary {
            member_count: members.len(),
            combined_aum_usd,
            average_completion,
        }
    }

    pub fn toggle(&mut self, client_id: &ClientId) {
        if !self.selected.remove(client_id) {
            self.selected.insert(client_id.clone());
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn export_selected(&self, target: CrmTarget) -> Result<CommandBatch, ListError> {
        if self.selected.is_empty() {
            return Err(ListError::NothingSelected);
        }
        let ids: Vec<ClientId> = self.selected.iter().cloned().collect();
        Ok(CommandBatch {
            on_success: notices::household_export_started(ids.len()),
            commands: vec![PortalCommand::ExportRecords { ids, target }],
        })
    }

    fn member<'a, R: ClientTablesRepo>(
        &self,
        repo: &'a R,
        client_id: &ClientId,
    ) -> Result<&'a ClientRow, PortError> {
        repo.get_client_row(client_id)
            .filter(|row| row.household_id == Some(self.household_id))
            .ok_or_else(|| {
                PortError::NotFound(format!(
                    "client {client_id} in household {}",
                    self.household_id.0
                ))
            })
    }

    /// Detaches the client from this household; the client row stays.
    pub fn remove_member<R: ClientTablesRepo>(
        &mut self,
        repo: &mut R,
        role: PortalRole,
        client_id: &ClientId,
    ) -> Notification {
        if !visibility::screen_allowed(role, PortalScreen::HouseholdDetail) {
            return notices::not_permitted("change household members");
        }
        let name = match self.member(&*repo, client_id) {
            Ok(row) => row.display_name(),
            Err(e) => return notices::port_failure(&e),
        };
        match repo.assign_client_household_row(client_id, None) {
            Ok(()) => {
                self.selected.remove(client_id);
                info!(client_id = %client_id, household_id = self.household_id.0, "member removed");
                notices::client_removed(&name)
            }
            Err(e) => notices::port_failure(&PortError::from(e)),
        }
    }

    /// Copies the member's profile and priority into a new client row in the
    /// same household. AUM is not copied.
    pub fn duplicate_client<R: ClientTablesRepo>(
        &self,
        repo: &mut R,
        role: PortalRole,
        client_id: &ClientId,
        now: MonotonicTimeNs,
    ) -> (Option<ClientId>, Notification) {
        if !visibility::screen_allowed(role, PortalScreen::HouseholdDetail) {
            return (None, notices::not_permitted("duplicate clients"));
        }
        let (record, priority, name) = match self.member(&*repo, client_id) {
            Ok(row) => (row.record.clone(), row.priority, row.display_name()),
            Err(e) => return (None, notices::port_failure(&e)),
        };
        let created = repo
            .create_client_row(record, priority, 0, now)
            .and_then(|id| {
                repo.assign_client_household_row(&id, Some(self.household_id))?;
                Ok(id)
            });
        match created {
            Ok(id) => (Some(id), notices::client_duplicated(&name)),
            Err(e) => (None, notices::port_failure(&PortError::from(e))),
        }
    }

    /// Batch that notifies the member to review their profile.
    pub fn send_to_client<R: ClientTablesRepo>(
        &self,
        repo: &R,
        client_id: &ClientId,
    ) -> Result<CommandBatch, PortError> {
        let row = self.member(repo, client_id)?;
        Ok(CommandBatch {
            on_success: notices::profile_update_sent(&row.display_name()),
            commands: vec![PortalCommand::NotifyClient {
                record: row.record.clone(),
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use portal_storage::demo_seed::demo_store;

    use super::*;

    fn id(s: &str) -> ClientId {
        ClientId::new(s).unwrap()
    }

    fn smith_view() -> HouseholdDetailView {
        HouseholdDetailView::new(HouseholdId(1), &PortalConfig::mvp_v1())
    }

    #[test]
    fn at_household_detail_01_members_and_summary() {
        let store = demo_store(MonotonicTimeNs(1)).unwrap();
        let v = smith_view();
        assert_eq!(v.household(&store).unwrap().name, "Smith Family Trust");
        let names: Vec<String> = v.members(&store).into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["John Smith"]);
        let s = v.summary(&store);
        assert_eq!(s.member_count, 1);
        assert_eq!(s.combined_aum_usd, 500_000);
        assert_eq!(s.average_completion, 92);

        let empty = HouseholdDetailView::new(HouseholdId(9), &PortalConfig::mvp_v1());
        assert!(empty.household(&store).is_none());
        assert_eq!(empty.summary(&store).average_completion, 0);
    }

    #[test]
    fn at_household_detail_02_remove_member_detaches_the_client() {
        let mut store = demo_store(MonotonicTimeNs(1)).unwrap();
        let mut v = smith_view();
        v.toggle(&id("1"));
        let n = v.remove_member(&mut store, PortalRole::Advisor, &id("1"));
        assert!(n.is_failure());
        assert_eq!(n.title, "Client Removed");
        assert_eq!(
            n.description,
            "John Smith has been removed from the household."
        );
        assert_eq!(store.client_row(&id("1")).unwrap().household_id, None);
        assert_eq!(v.selected_count(), 0);
        assert!(v.members(&store).is_empty());

        let again = v.remove_member(&mut store, PortalRole::Advisor, &id("1"));
        assert_eq!(again.title, "Not Found");
    }

    #[test]
    fn at_household_detail_03_clients_cannot_change_members() {
        let mut store = demo_store(MonotonicTimeNs(1)).unwrap();
        let mut v = smith_view();
        let n = v.remove_member(&mut store, PortalRole::Client, &id("1"));
        assert_eq!(n.title, "Not Permitted");
        let (created, n) = v.duplicate_client(&mut store, PortalRole::Client, &id("1"), MonotonicTimeNs(2));
        assert_eq!(created, None);
        assert_eq!(n.title, "Not Permitted");
        assert_eq!(store.client_rows().count(), 4);
    }

    #[test]
    fn at_household_detail_04_duplicate_joins_the_same_household() {
        let mut store = demo_store(MonotonicTimeNs(1)).unwrap();
        let v = smith_view();
        let (created, n) =
            v.duplicate_client(&mut store, PortalRole::Assistant, &id("1"), MonotonicTimeNs(2));
        assert_eq!(n.title, "Client Duplicated");
        assert_eq!(n.description, "John Smith has been duplicated.");
        let created = created.unwrap();
        let row = store.client_row(&created).unwrap();
        assert_eq!(row.household_id, Some(HouseholdId(1)));
        assert_eq!(row.aum_usd, 0);
        assert_eq!(v.members(&store).len(), 2);

        // Emily Davis has no household.
        let (none, n) =
            v.duplicate_client(&mut store, PortalRole::Advisor, &id("4"), MonotonicTimeNs(3));
        assert_eq!(none, None);
        assert_eq!(n.title, "Not Found");
    }

    #[test]
    fn at_household_detail_05_send_and_export_batches() {
        let store = demo_store(MonotonicTimeNs(1)).unwrap();
        let mut v = smith_view();
        let batch = v.send_to_client(&store, &id("1")).unwrap();
        assert_eq!(batch.on_success.title, "Message Sent");
        assert_eq!(
            batch.on_success.description,
            "Profile update notification sent to John Smith."
        );
        assert!(matches!(batch.commands[..], [PortalCommand::NotifyClient { .. }]));
        assert!(matches!(
            v.send_to_client(&store, &id("2")),
            Err(PortError::NotFound(_))
        ));

        assert_eq!(v.export_selected(CrmTarget::Redtail), Err(ListError::NothingSelected));
        v.toggle(&id("1"));
        let batch = v.export_selected(CrmTarget::Redtail).unwrap();
        assert_eq!(batch.on_success.title, "Export Started");
        assert_eq!(
            batch.on_success.description,
            "Exporting data for 1 selected clients."
        );
    }
}
