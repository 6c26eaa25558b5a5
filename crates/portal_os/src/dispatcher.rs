#![forbid(unsafe_code)]

use portal_kernel_contracts::client::ClientId;
use portal_kernel_contracts::notification::Notification;
use tracing::{info, warn};

use crate::commands::{CommandBatch, PortalCommand};
use crate::notices;
use crate::ports::{
    ClientNotifier, CrmExporter, DocumentStorage, LoopbackDocumentStorage, LoopbackExporter,
    LoopbackNotifier, PortError, RecordPersistence, StorePersistence,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    /// Exactly one toast per batch.
    pub notification: Notification,
    /// Id written by the last successful `SaveRecord`.
    pub saved_client_id: Option<ClientId>,
    /// Bytes returned by a successful `DownloadDocument`.
    pub downloaded: Option<Vec<u8>>,
}

impl DispatchOutcome {
    pub fn succeeded(&self) -> bool {
        !self.notification.is_failure()
    }
}

/// The only component that calls ports.
#[derive(Debug, Clone)]
pub struct CommandDispatcher<P, N, X, D> {
    persistence: P,
    notifier: N,
    exporter: X,
    documents: D,
}

pub type LoopbackDispatcher =
    CommandDispatcher<StorePersistence, LoopbackNotifier, LoopbackExporter, LoopbackDocumentStorage>;

impl LoopbackDispatcher {
    pub fn loopback(persistence: StorePersistence) -> Self {
        Self::new(
            persistence,
            LoopbackNotifier::default(),
            LoopbackExporter::default(),
            LoopbackDocumentStorage::default(),
        )
    }
}

impl<P, N, X, D> CommandDispatcher<P, N, X, D>
where
    P: RecordPersistence,
    N: ClientNotifier,
    X: CrmExporter,
    D: DocumentStorage,
{
    pub fn new(persistence: P, notifier: N, exporter: X, documents: D) -> Self {
        Self {
            persistence,
            notifier,
            exporter,
            documents,
        }
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn exporter_mut(&mut self) -> &mut X {
        &mut self.exporter
    }

    pub fn documents_mut(&mut self) -> &mut D {
        &mut self.documents
    }

    /// Runs the batch in order and stops at the first failure. Success yields
    /// `batch.on_success`; a failure yields one toast naming its kind.
    pub fn execute(&mut self, batch: CommandBatch) -> DispatchOutcome {
        let mut outcome = DispatchOutcome {
            notification: batch.on_success,
            saved_client_id: None,
            downloaded: None,
        };
        for command in batch.commands {
            let name = command.name();
            if let Err(err) = self.run(command, &mut outcome) {
                warn!(command = name, error = %err, "command failed");
                outcome.notification = notices::port_failure(&err);
                return outcome;
            }
            info!(command = name, "command executed");
        }
        outcome
    }

    fn run(&mut self, command: PortalCommand, outcome: &mut DispatchOutcome) -> Result<(), PortError> {
        match command {
            PortalCommand::SaveRecord { client_id, record } => {
                let id = self.persistence.save_record(client_id.as_ref(), &record)?;
                outcome.saved_client_id = Some(id);
            }
            PortalCommand::NotifyClient { record } => {
                self.notifier.notify_client(&record)?;
            }
            PortalCommand::ExportRecords { ids, target } => {
                if ids.is_empty() {
                    return Err(PortError::ExportFailed("no clients selected".to_string()));
                }
                self.exporter.export_records(&ids, target)?;
            }
            PortalCommand::UploadDocument {
                client_id,
                mut document,
                blob,
            } => {
                let r = self.documents.upload_document(&client_id, &blob)?;
                document.storage_ref = Some(r);
                self.persistence.record_document(document)?;
            }
            PortalCommand::DownloadDocument { document_id } => {
                let r = self
                    .persistence
                    .document_ref(document_id)?
                    .ok_or_else(|| PortError::NotFound(format!("stored blob for document {}", document_id.0)))?;
                outcome.downloaded = Some(self.documents.download_document(&r)?);
            }
        }
        Ok(())
    }
}
