#![forbid(unsafe_code)]

use portal_kernel_contracts::message::{MessageDraft, MessageRecord};
use portal_kernel_contracts::notification::Notification;
use portal_kernel_contracts::role::PortalRole;
use portal_storage::repo::{ClientTablesRepo, DocumentMessageTablesRepo};
use tracing::info;

use crate::notices;

pub const ADVISOR_RECIPIENTS: [&str; 2] = ["David Wilson - Advisor", "Lisa Chen - Senior Advisor"];

#[derive(Debug, Clone, Default)]
pub struct MessagesView {
    query: String,
}

impl MessagesView {
    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn visible<'a, R: DocumentMessageTablesRepo>(&self, repo: &'a R) -> Vec<&'a MessageRecord> {
        repo.message_rows_matching(&self.query)
    }
}

/// Who `role` may write to: clients write to their advisors, staff write to
/// clients.
pub fn recipients<R: ClientTablesRepo>(role: PortalRole, repo: &R) -> Vec<String> {
    match role {
        PortalRole::Client => ADVISOR_RECIPIENTS.iter().map(|s| s.to_string()).collect(),
        PortalRole::Advisor | PortalRole::Assistant => repo
            .client_rows_all()
            .into_iter()
            .map(|r| r.display_name())
            .filter(|n| !n.is_empty())
            .collect(),
        PortalRole::Unknown => Vec::new(),
    }
}

/// Composer state for one outgoing message. Sending only raises a toast;
/// there is no delivery channel behind it.
#[derive(Debug, Clone, Default)]
pub struct MessageComposer {
    pub draft: MessageDraft,
}

impl MessageComposer {
    pub fn with_recipient(to: &str) -> Self {
        Self {
            draft: MessageDraft {
                to: to.to_string(),
                ..MessageDraft::default()
            },
        }
    }

    /// On success the draft is cleared for the next message.
    pub fn send(&mut self) -> Notification {
        if !self.draft.is_complete() {
            return notices::missing_information();
        }
        let to = std::mem::take(&mut self.draft).to;
        info!(to = %to, "message sent");
        notices::message_sent(&to)
    }
}

#[cfg(test)]
mod tests {
    use portal_kernel_contracts::MonotonicTimeNs;
    use portal_storage::demo_seed::demo_store;

    use super::*;

    #[test]
    fn at_messages_01_composer_requires_all_fields() {
        let mut c = MessageComposer::with_recipient("John Smith");
        c.draft.subject = "Docs".to_string();
        let n = c.send();
        assert_eq!(n.title, "Missing Information");
        assert_eq!(c.draft.to, "John Smith");
        c.draft.body = "Please upload your W9.".to_string();
        let n = c.send();
        assert_eq!(n.description, "Message sent to John Smith");
        assert_eq!(c.draft, MessageDraft::default());
    }

    #[test]
    fn at_messages_02_recipients_depend_on_role() {
        let store = demo_store(MonotonicTimeNs(1)).unwrap();
        assert_eq!(recipients(PortalRole::Client, &store).len(), 2);
        let staff = recipients(PortalRole::Assistant, &store);
        assert!(staff.contains(&"Emily Davis".to_string()));
        assert!(recipients(PortalRole::Unknown, &store).is_empty());
    }
}
