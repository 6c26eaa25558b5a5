#![forbid(unsafe_code)]

use portal_kernel_contracts::client::{ClientId, ClientRecord};
use portal_kernel_contracts::document::{DocumentId, DocumentRecord};
use portal_kernel_contracts::notification::Notification;

use crate::ports::CrmTarget;

/// Side effect requested by a controller or view. Only the dispatcher
/// executes these.
#[derive(Debug, Clone, PartialEq)]
pub enum PortalCommand {
    SaveRecord {
        client_id: Option<ClientId>,
        record: ClientRecord,
    },
    NotifyClient {
        record: ClientRecord,
    },
    ExportRecords {
        ids: Vec<ClientId>,
        target: CrmTarget,
    },
    /// `document.storage_ref` is filled in by the dispatcher after upload.
    UploadDocument {
        client_id: ClientId,
        document: DocumentRecord,
        blob: Vec<u8>,
    },
    DownloadDocument {
        document_id: DocumentId,
    },
}

impl PortalCommand {
    pub fn name(&self) -> &'static str {
        match self {
            PortalCommand::SaveRecord { .. } => "save_record",
            PortalCommand::NotifyClient { .. } => "notify_client",
            PortalCommand::ExportRecords { .. } => "export_records",
            PortalCommand::UploadDocument { .. } => "upload_document",
            PortalCommand::DownloadDocument { .. } => "download_document",
        }
    }
}

/// Commands for one user action, executed in order, plus the toast shown if
/// all of them succeed.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandBatch {
    pub commands: Vec<PortalCommand>,
    pub on_success: Notification,
}
