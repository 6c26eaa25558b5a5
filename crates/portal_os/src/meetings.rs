#![forbid(unsafe_code)]

use portal_kernel_contracts::meeting::{MeetingDraft, MeetingId};
use portal_kernel_contracts::notification::Notification;
use portal_storage::repo::MeetingTablesRepo;

use crate::notices;
use crate::ports::PortError;

pub fn schedule_meeting<R: MeetingTablesRepo>(
    repo: &mut R,
    draft: MeetingDraft,
) -> (Option<MeetingId>, Notification) {
    let client = draft.client.clone();
    match repo.schedule_meeting_row(draft) {
        Ok(id) => (Some(id), notices::meeting_scheduled(&client)),
        Err(e) => (None, notices::port_failure(&PortError::from(e))),
    }
}

pub fn update_meeting<R: MeetingTablesRepo>(
    repo: &mut R,
    id: MeetingId,
    draft: MeetingDraft,
) -> Notification {
    let client = draft.client.clone();
    match repo.update_meeting_row(id, draft) {
        Ok(()) => notices::meeting_updated(&client),
        Err(e) => notices::port_failure(&PortError::from(e)),
    }
}

/// Cancelling removes the meeting.
pub fn cancel_meeting<R: MeetingTablesRepo>(repo: &mut R, id: MeetingId) -> Notification {
    match repo.delete_meeting_row(id) {
        Ok(removed) => notices::meeting_cancelled(&removed.draft.client),
        Err(e) => notices::port_failure(&PortError::from(e)),
    }
}
