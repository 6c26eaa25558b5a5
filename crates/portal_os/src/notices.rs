#![forbid(unsafe_code)]

//! User-visible toast texts, one constructor per portal action.

use portal_kernel_contracts::notification::{Notification, NotificationKind};

use crate::ports::{CrmTarget, PortError};

fn toast(kind: NotificationKind, title: &str, description: String) -> Notification {
    Notification {
        kind,
        title: title.to_string(),
        description,
    }
}

fn ok(title: &str, description: impl Into<String>) -> Notification {
    toast(NotificationKind::Success, title, description.into())
}

fn fail(title: &str, description: impl Into<String>) -> Notification {
    toast(NotificationKind::Failure, title, description.into())
}

pub fn profile_saved() -> Notification {
    ok(
        "Profile Saved",
        "Your client profile has been saved successfully.",
    )
}

/// `sender_is_client` picks who the description says was notified.
pub fn profile_saved_and_sent(sender_is_client: bool) -> Notification {
    let description = if sender_is_client {
        "Your profile has been saved and your advisor has been notified."
    } else {
        "The profile has been saved and the client has been notified."
    };
    ok("Profile Saved & Sent", description)
}

pub fn export_started(count: usize, target: CrmTarget) -> Notification {
    ok(
        "Export Started",
        format!(
            "Client data export to {} has been initiated for {count} selected clients.",
            target.as_str()
        ),
    )
}

pub fn household_deleted(name: &str) -> Notification {
    ok("Household Deleted", format!("{name} has been removed."))
}

pub fn household_export_started(count: usize) -> Notification {
    ok(
        "Export Started",
        format!("Exporting data for {count} selected clients."),
    )
}

/// Shown with the destructive variant.
pub fn client_removed(name: &str) -> Notification {
    fail(
        "Client Removed",
        format!("{name} has been removed from the household."),
    )
}

pub fn client_duplicated(name: &str) -> Notification {
    ok("Client Duplicated", format!("{name} has been duplicated."))
}

pub fn profile_update_sent(name: &str) -> Notification {
    ok(
        "Message Sent",
        format!("Profile update notification sent to {name}."),
    )
}

pub fn document_uploaded(name: &str) -> Notification {
    ok("Document Uploaded", format!("{name} has been uploaded."))
}

pub fn download_started(name: &str) -> Notification {
    ok("Download Started", format!("Downloading {name}..."))
}

pub fn document_deleted(name: &str) -> Notification {
    ok("Document Deleted", format!("{name} has been removed."))
}

pub fn message_sent(to: &str) -> Notification {
    ok("Message Sent", format!("Message sent to {to}"))
}

pub fn missing_information() -> Notification {
    fail("Missing Information", "Please fill in all required fields.")
}

pub fn meeting_scheduled(client: &str) -> Notification {
    ok(
        "Meeting Scheduled",
        format!("Meeting with {client} has been scheduled. Email notification sent."),
    )
}

pub fn meeting_updated(client: &str) -> Notification {
    ok(
        "Meeting Updated",
        format!("Meeting with {client} has been updated. Email notification sent."),
    )
}

pub fn meeting_cancelled(client: &str) -> Notification {
    ok(
        "Meeting Cancelled",
        format!("Meeting with {client} has been cancelled. Email notification sent."),
    )
}

pub fn not_permitted(action: &str) -> Notification {
    fail(
        "Not Permitted",
        format!("Your role is not allowed to {action}."),
    )
}

/// Failure toast titled with the error kind.
pub fn port_failure(err: &PortError) -> Notification {
    fail(err.kind_title(), err.to_string())
}

#[cfg(test)]
mod tests {
    use portal_kernel_contracts::Validate;

    use super::*;

    #[test]
    fn at_notices_01_every_toast_is_contract_valid() {
        let all = [
            profile_saved(),
            profile_saved_and_sent(true),
            profile_saved_and_sent(false),
            export_started(3, CrmTarget::Redtail),
            household_deleted("Brown Estate"),
            household_export_started(2),
            client_removed("Jane Smith"),
            client_duplicated("Jane Smith"),
            profile_update_sent("Jane Smith"),
            document_uploaded("W9_Form.pdf"),
            download_started("W9_Form.pdf"),
            document_deleted("W9_Form.pdf"),
            message_sent("John Smith"),
            missing_information(),
            meeting_scheduled("John Smith"),
            meeting_updated("John Smith"),
            meeting_cancelled("John Smith"),
            not_permitted("delete this document"),
            port_failure(&PortError::StorageUnavailable),
        ];
        for n in all {
            assert!(n.validate().is_ok(), "{n:?}");
        }
    }

    #[test]
    fn at_notices_02_failure_toast_names_the_kind() {
        let n = port_failure(&PortError::ExportFailed("crm timeout".to_string()));
        assert!(n.is_failure());
        assert_eq!(n.title, "Export Failed");
        assert!(n.description.contains("crm timeout"));
    }
}
