#![forbid(unsafe_code)]

//! External ports and their in-memory loopbacks.
//!
//! Loopbacks record every call and can be switched into a failing mode so
//! failure notifications are testable.

use std::collections::BTreeMap;

use portal_kernel_contracts::client::{ClientId, ClientPriority, ClientRecord};
use portal_kernel_contracts::document::{DocumentId, DocumentRecord, DocumentRef};
use portal_kernel_contracts::MonotonicTimeNs;
use portal_storage::portal_store::{PortalStore, StorageError};
use portal_storage::repo::{ClientTablesRepo, DocumentMessageTablesRepo};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    #[error("validation failed: {0}")]
    ValidationFailed(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage is unavailable")]
    StorageUnavailable,
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
    #[error("export failed: {0}")]
    ExportFailed(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
}

impl PortError {
    pub fn kind_title(&self) -> &'static str {
        match self {
            PortError::ValidationFailed(_) => "Validation Failed",
            PortError::NotFound(_) => "Not Found",
            PortError::StorageUnavailable => "Storage Unavailable",
            PortError::DeliveryFailed(_) => "Delivery Failed",
            PortError::ExportFailed(_) => "Export Failed",
            PortError::UploadFailed(_) => "Upload Failed",
        }
    }
}

impl From<StorageError> for PortError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { table, key } => PortError::NotFound(format!("{table}/{key}")),
            other => PortError::ValidationFailed(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CrmTarget {
    Wealthbox,
    Redtail,
    Salesforce,
}

impl CrmTarget {
    pub const ALL: [CrmTarget; 3] = [CrmTarget::Wealthbox, CrmTarget::Redtail, CrmTarget::Salesforce];

    pub fn as_str(self) -> &'static str {
        match self {
            CrmTarget::Wealthbox => "Wealthbox",
            CrmTarget::Redtail => "Redtail",
            CrmTarget::Salesforce => "Salesforce",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

pub trait RecordPersistence {
    fn load_record(&self, client_id: &ClientId) -> Result<ClientRecord, PortError>;
    /// Creates a row when `client_id` is `None`; returns the id written.
    fn save_record(
        &mut self,
        client_id: Option<&ClientId>,
        record: &ClientRecord,
    ) -> Result<ClientId, PortError>;
    fn record_document(&mut self, document: DocumentRecord) -> Result<(), PortError>;
    /// Blob handle of a stored document; `None` when it has no uploaded file.
    fn document_ref(&self, document_id: DocumentId) -> Result<Option<DocumentRef>, PortError>;
}

pub trait ClientNotifier {
    fn notify_client(&mut self, record: &ClientRecord) -> Result<(), PortError>;
}

pub trait CrmExporter {
    fn export_records(&mut self, ids: &[ClientId], target: CrmTarget) -> Result<(), PortError>;
}

pub trait DocumentStorage {
    fn upload_document(&mut self, client_id: &ClientId, blob: &[u8]) -> Result<DocumentRef, PortError>;
    fn download_document(&self, document_ref: &DocumentRef) -> Result<Vec<u8>, PortError>;
}

/// Persistence loopback over any repo with client and document tables;
/// the in-memory portal store by default.
#[derive(Debug, Clone)]
pub struct StorePersistence<R = PortalStore> {
    store: R,
    clock_ns: u64,
    failure: Option<PortError>,
}

impl<R> StorePersistence<R> {
    pub fn new(store: R) -> Self {
        Self {
            store,
            clock_ns: 0,
            failure: None,
        }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut R {
        &mut self.store
    }

    /// Every following write fails with `err` until cleared with `None`.
    pub fn set_failure(&mut self, err: Option<PortError>) {
        self.failure = err;
    }

    fn tick(&mut self) -> MonotonicTimeNs {
        self.clock_ns += 1;
        MonotonicTimeNs(self.clock_ns)
    }

    fn check_failure(&self) -> Result<(), PortError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl<R: ClientTablesRepo + DocumentMessageTablesRepo> RecordPersistence for StorePersistence<R> {
    fn load_record(&self, client_id: &ClientId) -> Result<ClientRecord, PortError> {
        self.store
            .get_client_row(client_id)
            .map(|row| row.record.clone())
            .ok_or_else(|| PortError::NotFound(format!("client {client_id}")))
    }

    fn save_record(
        &mut self,
        client_id: Option<&ClientId>,
        record: &ClientRecord,
    ) -> Result<ClientId, PortError> {
        self.check_failure()?;
        let now = self.tick();
        match client_id {
            Some(id) => {
                self.store.update_client_record_row(id, record.clone(), now)?;
                Ok(id.clone())
            }
            None => Ok(self
                .store
                .create_client_row(record.clone(), ClientPriority::C, 0, now)?),
        }
    }

    fn record_document(&mut self, document: DocumentRecord) -> Result<(), PortError> {
        self.check_failure()?;
        self.store.insert_document_row(document)?;
        Ok(())
    }

    fn document_ref(&self, document_id: DocumentId) -> Result<Option<DocumentRef>, PortError> {
        self.store
            .get_document_row(document_id)
            .map(|d| d.storage_ref.clone())
            .ok_or_else(|| PortError::NotFound(format!("document {}", document_id.0)))
    }
}

/// Notifier loopback: records the email of every client it was asked to notify.
#[derive(Debug, Clone, Default)]
pub struct LoopbackNotifier {
    pub sent: Vec<String>,
    failure: Option<PortError>,
}

impl LoopbackNotifier {
    pub fn set_failure(&mut self, err: Option<PortError>) {
        self.failure = err;
    }
}

impl ClientNotifier for LoopbackNotifier {
    fn notify_client(&mut self, record: &ClientRecord) -> Result<(), PortError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        debug!(email = %record.email, "client notification recorded");
        self.sent.push(record.email.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoopbackExporter {
    pub exports: Vec<(CrmTarget, Vec<ClientId>)>,
    failure: Option<PortError>,
}

impl LoopbackExporter {
    pub fn set_failure(&mut self, err: Option<PortError>) {
        self.failure = err;
    }
}

impl CrmExporter for LoopbackExporter {
    fn export_records(&mut self, ids: &[ClientId], target: CrmTarget) -> Result<(), PortError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.exports.push((target, ids.to_vec()));
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoopbackDocumentStorage {
    blobs: BTreeMap<DocumentRef, Vec<u8>>,
    next_seq: u64,
    failure: Option<PortError>,
}

impl LoopbackDocumentStorage {
    pub fn set_failure(&mut self, err: Option<PortError>) {
        self.failure = err;
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }
}

impl DocumentStorage for LoopbackDocumentStorage {
    fn upload_document(&mut self, client_id: &ClientId, blob: &[u8]) -> Result<DocumentRef, PortError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.next_seq += 1;
        let r = DocumentRef::new(format!("blob_{}_{:06}", client_id.as_str(), self.next_seq))
            .map_err(|v| PortError::UploadFailed(v.to_string()))?;
        self.blobs.insert(r.clone(), blob.to_vec());
        Ok(r)
    }

    fn download_document(&self, document_ref: &DocumentRef) -> Result<Vec<u8>, PortError> {
        self.blobs
            .get(document_ref)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("document {}", document_ref.as_str())))
    }
}
