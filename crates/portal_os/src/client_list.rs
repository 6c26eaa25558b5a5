#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use portal_engines::completion::CompletionEngine;
use portal_kernel_contracts::client::{ClientId, ClientPriority};
use portal_storage::portal_store::ClientRow;
use portal_storage::repo::ClientTablesRepo;
use serde::Serialize;
use thiserror::Error;

use crate::commands::{CommandBatch, PortalCommand};
use crate::config::PortalConfig;
use crate::notices;
use crate::ports::CrmTarget;
use crate::session::PortalSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientSort {
    /// A before B before C, then by name.
    #[default]
    Priority,
    /// Highest completion first, then by name.
    Completion,
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("no clients are selected")]
    NothingSelected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientListItem {
    pub client_id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub priority: ClientPriority,
    pub aum_usd: u64,
    pub completion: u8,
    pub selected: bool,
}

/// One client list screen: query, sort order and a selection private to
/// this view instance. Completion is scored with the same engine the form
/// uses, so gating on validity applies to list and form alike.
#[derive(Debug, Clone)]
pub struct ClientListView {
    query: String,
    sort: ClientSort,
    selected: BTreeSet<ClientId>,
    max_results: usize,
    completion: CompletionEngine,
    seen_navigation: u64,
}

impl ClientListView {
    pub fn new(config: &PortalConfig) -> Self {
        Self {
            query: String::new(),
            sort: ClientSort::default(),
            selected: BTreeSet::new(),
            max_results: config.search_max_results,
            completion: CompletionEngine::new(config.completion),
            seen_navigation: 0,
        }
    }

    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort_by(&mut self, sort: ClientSort) {
        self.sort = sort;
    }

    fn filtered<'a, R: ClientTablesRepo>(&self, repo: &'a R) -> Vec<(&'a ClientRow, u8)> {
        let mut rows: Vec<(&ClientRow, u8)> = repo
            .client_rows_matching(&self.query)
            .into_iter()
            .map(|row| (row, self.completion.percent(&row.record)))
            .collect();
        let by_name = |a: &ClientRow, b: &ClientRow| a.display_name().cmp(&b.display_name());
        match self.sort {
            ClientSort::Priority => rows.sort_by(|(a, _), (b, _)| {
                a.priority.cmp(&b.priority).then_with(|| by_name(*a, *b))
            }),
            ClientSort::Completion => rows.sort_by(|(a, pa), (b, pb)| {
                pb.cmp(pa).then_with(|| by_name(*a, *b))
            }),
            ClientSort::Name => rows.sort_by(|(a, _), (b, _)| by_name(*a, *b)),
        }
        rows.truncate(self.max_results);
        rows
    }

    pub fn items<R: ClientTablesRepo>(&self, repo: &R) -> Vec<ClientListItem> {
        self.filtered(repo)
            .into_iter()
            .map(|(row, completion)| ClientListItem {
                client_id: row.client_id.clone(),
                name: row.display_name(),
                email: row.record.email.clone(),
                phone: row.record.mobile.clone(),
                priority: row.priority,
                aum_usd: row.aum_usd,
                completion,
                selected: self.selected.contains(&row.client_id),
            })
            .collect()
    }

    pub fn toggle(&mut self, client_id: &ClientId) {
        if !self.selected.remove(client_id) {
            self.selected.insert(client_id.clone());
        }
    }

    /// Adds `client_id` to the selection; selecting twice is a no-op.
    pub fn select(&mut self, client_id: &ClientId) {
        self.selected.insert(client_id.clone());
    }

    /// Clears the selection when it is exactly the visible rows, otherwise
    /// replaces it with the visible rows.
    pub fn toggle_select_all<R: ClientTablesRepo>(&mut self, repo: &R) {
        let visible: BTreeSet<ClientId> = self
            .filtered(repo)
            .into_iter()
            .map(|(r, _)| r.client_id.clone())
            .collect();
        if !visible.is_empty() && visible == self.selected {
            self.selected.clear();
        } else {
            self.selected = visible;
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = &ClientId> {
        self.selected.iter()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Selection does not survive leaving the screen.
    pub fn on_navigate(&mut self) {
        self.clear_selection();
    }

    /// Drops the selection if `session` navigated since the last sync.
    pub fn sync_with_session(&mut self, session: &PortalSession) {
        let seen = session.navigation_count();
        if seen != self.seen_navigation {
            self.seen_navigation = seen;
            self.on_navigate();
        }
    }

    pub fn export_selected(&self, target: CrmTarget) -> Result<CommandBatch, ListError> {
        if self.selected.is_empty() {
            return Err(ListError::NothingSelected);
        }
        let ids: Vec<ClientId> = self.selected.iter().cloned().collect();
        Ok(CommandBatch {
            on_success: notices::export_started(ids.len(), target),
            commands: vec![PortalCommand::ExportRecords { ids, target }],
        })
    }
}

#[cfg(test)]
mod tests {
    use portal_engines::completion::CompletionConfig;
    use portal_kernel_contracts::role::{PortalRole, PortalScreen};
    use portal_kernel_contracts::MonotonicTimeNs;
    use portal_storage::demo_seed::demo_store;

    use super::*;

    fn id(s: &str) -> ClientId {
        ClientId::new(s).unwrap()
    }

    #[test]
    fn at_list_01_priority_sort_then_name() {
        let store = demo_store(MonotonicTimeNs(1)).unwrap();
        let v = ClientListView::new(&PortalConfig::mvp_v1());
        let names: Vec<String> = v.items(&store).into_iter().map(|i| i.name).collect();
        assert_eq!(
            names,
            vec!["John Smith", "Michael Brown", "Sarah Johnson", "Emily Davis"]
        );
    }

    #[test]
    fn at_list_02_completion_sort_descending() {
        let store = demo_store(MonotonicTimeNs(1)).unwrap();
        let mut v = ClientListView::new(&PortalConfig::mvp_v1());
        v.sort_by(ClientSort::Completion);
        let pct: Vec<u8> = v.items(&store).into_iter().map(|i| i.completion).collect();
        assert_eq!(pct, vec![92, 83, 75, 42]);
    }

    #[test]
    fn at_list_03_select_all_toggles_over_filtered_rows() {
        let store = demo_store(MonotonicTimeNs(1)).unwrap();
        let mut v = ClientListView::new(&PortalConfig::mvp_v1());
        v.search("john");
        v.toggle_select_all(&store);
        assert_eq!(v.selected_count(), 2);
        v.toggle_select_all(&store);
        assert_eq!(v.selected_count(), 0);

        v.toggle(&id("1"));
        v.toggle_select_all(&store);
        assert_eq!(v.selected_count(), 2);
    }

    #[test]
    fn at_list_07_select_all_replaces_selection_with_visible_rows() {
        let store = demo_store(MonotonicTimeNs(1)).unwrap();
        let mut v = ClientListView::new(&PortalConfig::mvp_v1());
        v.toggle(&id("4"));
        v.search("john");
        v.toggle_select_all(&store);
        let selected: Vec<&str> = v.selected().map(|c| c.as_str()).collect();
        assert_eq!(selected, vec!["1", "2"]);

        // A superset of the visible rows is not "all selected".
        v.toggle(&id("4"));
        v.toggle_select_all(&store);
        assert_eq!(v.selected_count(), 2);
        v.toggle_select_all(&store);
        assert_eq!(v.selected_count(), 0);
    }

    #[test]
    fn at_list_08_select_is_idempotent() {
        let mut v = ClientListView::new(&PortalConfig::mvp_v1());
        v.select(&id("1"));
        v.select(&id("1"));
        v.select(&id("3"));
        assert_eq!(v.selected_count(), 2);
    }

    #[test]
    fn at_list_09_session_navigation_drops_selection() {
        let mut session = PortalSession::new();
        session.select_role(PortalRole::Advisor).unwrap();
        let mut v = ClientListView::new(&PortalConfig::mvp_v1());
        v.sync_with_session(&session);
        v.select(&id("2"));
        v.sync_with_session(&session);
        assert_eq!(v.selected_count(), 1);

        session.navigate(PortalScreen::Documents).unwrap();
        v.sync_with_session(&session);
        assert_eq!(v.selected_count(), 0);
    }

    #[test]
    fn at_list_10_gated_completion_matches_the_form_engine() {
        let mut store = demo_store(MonotonicTimeNs(1)).unwrap();
        let mut record = store.client_row(&id("1")).unwrap().record.clone();
        record.email = "not-an-email".to_string();
        store
            .update_client_record(&id("1"), record.clone(), MonotonicTimeNs(2))
            .unwrap();

        let mut config = PortalConfig::mvp_v1();
        config.completion = CompletionConfig {
            gate_on_validity: true,
        };
        let gated = CompletionEngine::new(config.completion).percent(&record);
        let v = ClientListView::new(&config);
        let items = v.items(&store);
        let john = items.iter().find(|i| i.client_id == id("1")).unwrap();
        assert_eq!(john.completion, gated);
        assert!(gated < 92);
        let ungated = ClientListView::new(&PortalConfig::mvp_v1()).items(&store);
        assert_eq!(ungated[0].completion, 92);
    }

    #[test]
    fn at_list_04_selection_is_per_view_and_cleared_on_navigation() {
        let store = demo_store(MonotonicTimeNs(1)).unwrap();
        let mut a = ClientListView::new(&PortalConfig::mvp_v1());
        let b = ClientListView::new(&PortalConfig::mvp_v1());
        a.toggle(&id("3"));
        assert!(a.items(&store).iter().any(|i| i.selected));
        assert!(!b.items(&store).iter().any(|i| i.selected));
        a.on_navigate();
        assert_eq!(a.selected_count(), 0);
    }

    #[test]
    fn at_list_05_export_requires_selection() {
        let mut v = ClientListView::new(&PortalConfig::mvp_v1());
        assert_eq!(
            v.export_selected(CrmTarget::Wealthbox),
            Err(ListError::NothingSelected)
        );
        v.toggle(&id("2"));
        v.toggle(&id("4"));
        let batch = v.export_selected(CrmTarget::Salesforce).unwrap();
        assert_eq!(
            batch.commands,
            vec![PortalCommand::ExportRecords {
                ids: vec![id("2"), id("4")],
                target: CrmTarget::Salesforce,
            }]
        );
        assert!(batch.on_success.description.contains("Salesforce"));
    }

    #[test]
    fn at_list_06_result_cap() {
        let store = demo_store(MonotonicTimeNs(1)).unwrap();
        let mut config = PortalConfig::mvp_v1();
        config.search_max_results = 2;
        let v = ClientListView::new(&config);
        assert_eq!(v.items(&store).len(), 2);
    }
}
