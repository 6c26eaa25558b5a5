#![forbid(unsafe_code)]

use portal_engines::visibility;
use portal_kernel_contracts::client::ClientId;
use portal_kernel_contracts::document::{DocumentId, DocumentRecord};
use portal_kernel_contracts::notification::Notification;
use portal_kernel_contracts::role::PortalRole;
use portal_kernel_contracts::ContractViolation;
use portal_storage::repo::{ClientTablesRepo, DocumentMessageTablesRepo};

use crate::commands::{CommandBatch, PortalCommand};
use crate::notices;
use crate::ports::PortError;

/// Uploader name recorded for documents a client uploads themselves.
pub const SELF_UPLOADER: &str = "You";

#[derive(Debug, Clone, Default)]
pub struct DocumentsView {
    query: String,
}

impl DocumentsView {
    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn visible<'a, R: DocumentMessageTablesRepo>(&self, repo: &'a R) -> Vec<&'a DocumentRecord> {
        repo.document_rows_matching(&self.query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub client_id: ClientId,
    pub name: String,
    pub doc_type: String,
    pub upload_date: String,
    pub blob: Vec<u8>,
}

/// Builds the upload batch. Client uploads are recorded as uploaded by
/// [`SELF_UPLOADER`], which later lets the same client delete them.
pub fn upload_batch<R: ClientTablesRepo + DocumentMessageTablesRepo>(
    repo: &R,
    role: PortalRole,
    uploader_name: &str,
    req: UploadRequest,
) -> Result<CommandBatch, ContractViolation> {
    let uploaded_by = if role == PortalRole::Client {
        SELF_UPLOADER
    } else {
        uploader_name
    };
    let client_name = repo
        .get_client_row(&req.client_id)
        .map(|row| row.display_name())
        .filter(|n| !n.is_empty());
    let document = DocumentRecord::v1(
        repo.next_document_row_id(),
        req.name,
        req.doc_type,
        req.blob.len() as u64,
        uploaded_by,
        req.upload_date,
        Some(req.client_id.clone()),
        client_name,
    )?;
    Ok(CommandBatch {
        on_success: notices::document_uploaded(&document.name),
        commands: vec![PortalCommand::UploadDocument {
            client_id: req.client_id,
            document,
            blob: req.blob,
        }],
    })
}

pub fn download_batch<R: DocumentMessageTablesRepo>(
    repo: &R,
    id: DocumentId,
) -> Result<CommandBatch, PortError> {
    let doc = repo
        .get_document_row(id)
        .ok_or_else(|| PortError::NotFound(format!("document {}", id.0)))?;
    Ok(CommandBatch {
        on_success: notices::download_started(&doc.name),
        commands: vec![PortalCommand::DownloadDocument { document_id: id }],
    })
}

pub fn delete_document<R: DocumentMessageTablesRepo>(
    repo: &mut R,
    role: PortalRole,
    id: DocumentId,
) -> Notification {
    let Some(doc) = repo.get_document_row(id) else {
        return notices::port_failure(&PortError::NotFound(format!("document {}", id.0)));
    };
    if !visibility::can_delete_document(role, doc.uploaded_by == SELF_UPLOADER) {
        return notices::not_permitted("delete this document");
    }
    match repo.delete_document_row(id) {
        Ok(removed) => notices::document_deleted(&removed.name),
        Err(e) => notices::port_failure(&PortError::from(e)),
    }
}
