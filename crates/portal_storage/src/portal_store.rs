#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use portal_engines::completion::{CompletionConfig, CompletionEngine};
use portal_engines::search::TextQuery;
use portal_kernel_contracts::client::{ClientId, ClientPriority, ClientRecord};
use portal_kernel_contracts::document::{DocumentId, DocumentRecord};
use portal_kernel_contracts::household::{HouseholdId, HouseholdRecord};
use portal_kernel_contracts::meeting::{MeetingDraft, MeetingId, MeetingRecord, MeetingStatus};
use portal_kernel_contracts::message::{MessageId, MessageRecord};
use portal_kernel_contracts::{ContractViolation, MonotonicTimeNs, Validate};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("foreign key violation on {table}: {key}")]
    ForeignKeyViolation { table: &'static str, key: String },
    #[error("duplicate key in {table}: {key}")]
    DuplicateKey { table: &'static str, key: String },
    #[error("no row in {table} for {key}")]
    NotFound { table: &'static str, key: String },
    #[error("{table}: encoding failed: {reason}")]
    Encoding { table: &'static str, reason: String },
    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),
}

/// One row of the `clients` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientRow {
    pub client_id: ClientId,
    pub record: ClientRecord,
    pub priority: ClientPriority,
    pub aum_usd: u64,
    pub household_id: Option<HouseholdId>,
    pub created_at: MonotonicTimeNs,
    pub updated_at: MonotonicTimeNs,
    /// Starts at 1, bumped on every record write.
    pub revision: u64,
    /// SHA-256 of the record's JSON encoding, lowercase hex.
    pub record_digest: String,
    /// Completion under the store's completion config, recomputed on every
    /// write and on reconfiguration.
    pub completion: u8,
}

impl ClientRow {
    pub fn display_name(&self) -> String {
        self.record.display_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseholdStats {
    pub count: usize,
    pub total_aum_usd: u64,
    /// Mean member count, one decimal place.
    pub average_size: Decimal,
}

fn record_digest(record: &ClientRecord) -> Result<String, StorageError> {
    let bytes = serde_json::to_vec(record).map_err(|e| StorageError::Encoding {
        table: "clients.record",
        reason: e.to_string(),
    })?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// In-memory portal tables. Rows live for the lifetime of the store.
#[derive(Debug, Clone)]
pub struct PortalStore {
    clients: BTreeMap<ClientId, ClientRow>,
    next_client_seq: u64,
    households: BTreeMap<HouseholdId, HouseholdRecord>,
    documents: BTreeMap<DocumentId, DocumentRecord>,
    messages: BTreeMap<MessageId, MessageRecord>,
    meetings: BTreeMap<MeetingId, MeetingRecord>,
    completion: CompletionEngine,
}

impl PortalStore {
    pub fn new_in_memory() -> Self {
        Self {
            clients: BTreeMap::new(),
            next_client_seq: 1,
            households: BTreeMap::new(),
            documents: BTreeMap::new(),
            messages: BTreeMap::new(),
            meetings: BTreeMap::new(),
            completion: CompletionEngine::new(CompletionConfig::mvp_v1()),
        }
    }

    pub fn completion_config(&self) -> CompletionConfig {
        self.completion.config()
    }

    /// Switches the completion rules and recomputes every cached row.
    pub fn set_completion_config(&mut self, config: CompletionConfig) {
        self.completion = CompletionEngine::new(config);
        for row in self.clients.values_mut() {
            row.completion = self.completion.percent(&row.record);
        }
        info!(
            gate_on_validity = config.gate_on_validity,
            rows = self.clients.len(),
            "completion config applied"
        );
    }

    // ---- clients ----

    pub fn insert_client(
        &mut self,
        client_id: ClientId,
        record: ClientRecord,
        priority: ClientPriority,
        aum_usd: u64,
        household_id: Option<HouseholdId>,
        now: MonotonicTimeNs,
    ) -> Result<(), StorageError> {
        client_id.validate()?;
        record.validate()?;
        if self.clients.contains_key(&client_id) {
            return Err(StorageError::DuplicateKey {
                table: "clients",
                key: client_id.as_str().to_string(),
            });
        }
        if let Some(h) = household_id {
            self.require_household(h, "clients.household_id")?;
        }
        let row = ClientRow {
            record_digest: record_digest(&record)?,
            completion: self.completion.percent(&record),
            client_id: client_id.clone(),
            record,
            priority,
            aum_usd,
            household_id,
            created_at: now,
            updated_at: now,
            revision: 1,
        };
        info!(
            client_id = %client_id,
            completion = row.completion,
            "client row inserted"
        );
        self.clients.insert(client_id, row);
        Ok(())
    }

    /// Inserts under the next free numeric id.
    pub fn create_client(
        &mut self,
        record: ClientRecord,
        priority: ClientPriority,
        aum_usd: u64,
        now: MonotonicTimeNs,
    ) -> Result<ClientId, StorageError> {
        let client_id = loop {
            let candidate = ClientId::new(self.next_client_seq.to_string())?;
            self.next_client_seq += 1;
            if !self.clients.contains_key(&candidate) {
                break candidate;
            }
        };
        self.insert_client(client_id.clone(), record, priority, aum_usd, None, now)?;
        Ok(client_id)
    }

    /// Replaces the stored record. Last write wins; returns the new revision.
    pub fn update_client_record(
        &mut self,
        client_id: &ClientId,
        record: ClientRecord,
        now: MonotonicTimeNs,
    ) -> Result<u64, StorageError> {
        record.validate()?;
        let digest = record_digest(&record)?;
        let row = self
            .clients
            .get_mut(client_id)
            .ok_or_else(|| StorageError::NotFound {
                table: "clients",
                key: client_id.as_str().to_string(),
            })?;
        row.completion = self.completion.percent(&record);
        row.record = record;
        row.record_digest = digest;
        row.updated_at = now;
        row.revision += 1;
        debug!(
            client_id = %client_id,
            revision = row.revision,
            completion = row.completion,
            "client record updated"
        );
        Ok(row.revision)
    }

    pub fn assign_client_household(
        &mut self,
        client_id: &ClientId,
        household_id: Option<HouseholdId>,
    ) -> Result<(), StorageError> {
        if let Some(h) = household_id {
            self.require_household(h, "clients.household_id")?;
        }
        let row = self
            .clients
            .get_mut(client_id)
            .ok_or_else(|| StorageError::NotFound {
                table: "clients",
                key: client_id.as_str().to_string(),
            })?;
        row.household_id = household_id;
        Ok(())
    }

    pub fn client_row(&self, client_id: &ClientId) -> Option<&ClientRow> {
        self.clients.get(client_id)
    }

    pub fn client_rows(&self) -> impl Iterator<Item = &ClientRow> {
        self.clients.values()
    }

    pub fn delete_client(&mut self, client_id: &ClientId) -> Result<ClientRow, StorageError> {
        let row = self
            .clients
            .remove(client_id)
            .ok_or_else(|| StorageError::NotFound {
                table: "clients",
                key: client_id.as_str().to_string(),
            })?;
        info!(client_id = %client_id, "client row deleted");
        Ok(row)
    }

    /// Case-insensitive substring match on display name, preferred name or
    /// email. An empty query returns every row.
    pub fn search_clients(&self, query: &str) -> Vec<&ClientRow> {
        let q = TextQuery::new(query);
        self.clients
            .values()
            .filter(|row| {
                let name = row.display_name();
                q.matches_any([
                    name.as_str(),
                    row.record.preferred_name.as_str(),
                    row.record.email.as_str(),
                ])
            })
            .collect()
    }

    // ---- households ----

    fn require_household(&self, id: HouseholdId, table: &'static str) -> Result<(), StorageError> {
        if self.households.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::ForeignKeyViolation {
                table,
                key: id.0.to_string(),
            })
        }
    }

    pub fn insert_household(&mut self, record: HouseholdRecord) -> Result<(), StorageError> {
        record.validate()?;
        if self.households.contains_key(&record.household_id) {
            return Err(StorageError::DuplicateKey {
                table: "households",
                key: record.household_id.0.to_string(),
            });
        }
        info!(household_id = record.household_id.0, name = %record.name, "household inserted");
        self.households.insert(record.household_id, record);
        Ok(())
    }

    pub fn household(&self, id: HouseholdId) -> Option<&HouseholdRecord> {
        self.households.get(&id)
    }

    pub fn households(&self) -> impl Iterator<Item = &HouseholdRecord> {
        self.households.values()
    }

    /// Matches the household name or any member name.
    pub fn search_households(&self, query: &str) -> Vec<&HouseholdRecord> {
        let q = TextQuery::new(query);
        self.households
            .values()
            .filter(|h| {
                q.matches(&h.name) || h.members.iter().any(|m| q.matches(m))
            })
            .collect()
    }

    /// Removes the household and detaches any client rows pointing at it.
    pub fn delete_household(&mut self, id: HouseholdId) -> Result<HouseholdRecord, StorageError> {
        let removed = self
            .households
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound {
                table: "households",
                key: id.0.to_string(),
            })?;
        for row in self.clients.values_mut() {
            if row.household_id == Some(id) {
                row.household_id = None;
            }
        }
        info!(household_id = id.0, "household deleted");
        Ok(removed)
    }

    pub fn household_stats(&self) -> HouseholdStats {
        let count = self.households.len();
        let total_aum_usd = self.households.values().map(|h| h.total_aum_usd).sum();
        let members: usize = self.households.values().map(|h| h.member_count()).sum();
        let average_size = if count == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(members as u64) / Decimal::from(count as u64)).round_dp(1)
        };
        HouseholdStats {
            count,
            total_aum_usd,
            average_size,
        }
    }

    // ---- documents ----

    pub fn next_document_id(&self) -> DocumentId {
        DocumentId(self.documents.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    pub fn insert_document(&mut self, record: DocumentRecord) -> Result<(), StorageError> {
        record.validate()?;
        if self.documents.contains_key(&record.document_id) {
            return Err(StorageError::DuplicateKey {
                table: "documents",
                key: record.document_id.0.to_string(),
            });
        }
        if let Some(client_id) = &record.client_id {
            if !self.clients.contains_key(client_id) {
                return Err(StorageError::ForeignKeyViolation {
                    table: "documents.client_id",
                    key: client_id.as_str().to_string(),
                });
            }
        }
        info!(document_id = record.document_id.0, name = %record.name, "document inserted");
        self.documents.insert(record.document_id, record);
        Ok(())
    }

    pub fn document(&self, id: DocumentId) -> Option<&DocumentRecord> {
        self.documents.get(&id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.documents.values()
    }

    /// Matches document name, client name or type label.
    pub fn search_documents(&self, query: &str) -> Vec<&DocumentRecord> {
        let q = TextQuery::new(query);
        self.documents
            .values()
            .filter(|d| {
                q.matches_any([
                    d.name.as_str(),
                    d.client_name.as_deref().unwrap_or(""),
                    d.doc_type.as_str(),
                ])
            })
            .collect()
    }

    pub fn delete_document(&mut self, id: DocumentId) -> Result<DocumentRecord, StorageError> {
        let removed = self
            .documents
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound {
                table: "documents",
                key: id.0.to_string(),
            })?;
        info!(document_id = id.0, "document deleted");
        Ok(removed)
    }

    // ---- messages ----

    pub fn next_message_id(&self) -> MessageId {
        MessageId(self.messages.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    pub fn insert_message(&mut self, record: MessageRecord) -> Result<(), StorageError> {
        record.validate()?;
        if self.messages.contains_key(&record.message_id) {
            return Err(StorageError::DuplicateKey {
                table: "messages",
                key: record.message_id.0.to_string(),
            });
        }
        debug!(message_id = record.message_id.0, "message inserted");
        self.messages.insert(record.message_id, record);
        Ok(())
    }

    pub fn messages(&self) -> impl Iterator<Item = &MessageRecord> {
        self.messages.values()
    }

    /// Matches sender or subject.
    pub fn search_messages(&self, query: &str) -> Vec<&MessageRecord> {
        let q = TextQuery::new(query);
        self.messages
            .values()
            .filter(|m| q.matches_any([m.from.as_str(), m.subject.as_str()]))
            .collect()
    }

    pub fn mark_message_read(&mut self, id: MessageId) -> Result<(), StorageError> {
        let m = self
            .messages
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound {
                table: "messages",
                key: id.0.to_string(),
            })?;
        m.read = true;
        Ok(())
    }

    pub fn unread_message_count(&self) -> usize {
        self.messages.values().filter(|m| !m.read).count()
    }

    // ---- meetings ----

    pub fn insert_meeting(&mut self, record: MeetingRecord) -> Result<(), StorageError> {
        record.validate()?;
        if self.meetings.contains_key(&record.meeting_id) {
            return Err(StorageError::DuplicateKey {
                table: "meetings",
                key: record.meeting_id.0.to_string(),
            });
        }
        self.meetings.insert(record.meeting_id, record);
        Ok(())
    }

    /// New meetings take `max(id) + 1` and start out scheduled.
    pub fn schedule_meeting(&mut self, draft: MeetingDraft) -> Result<MeetingId, StorageError> {
        let meeting_id = MeetingId(self.meetings.keys().next_back().map_or(1, |id| id.0 + 1));
        self.insert_meeting(MeetingRecord {
            meeting_id,
            draft,
            status: MeetingStatus::Scheduled,
        })?;
        info!(meeting_id = meeting_id.0, "meeting scheduled");
        Ok(meeting_id)
    }

    /// Replaces the editable part of a meeting; status is kept.
    pub fn update_meeting(&mut self, id: MeetingId, draft: MeetingDraft) -> Result<(), StorageError> {
        draft.validate()?;
        let m = self
            .meetings
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound {
                table: "meetings",
                key: id.0.to_string(),
            })?;
        m.draft = draft;
        info!(meeting_id = id.0, "meeting updated");
        Ok(())
    }

    pub fn delete_meeting(&mut self, id: MeetingId) -> Result<MeetingRecord, StorageError> {
        let removed = self
            .meetings
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound {
                table: "meetings",
                key: id.0.to_string(),
            })?;
        info!(meeting_id = id.0, "meeting removed");
        Ok(removed)
    }

    pub fn meeting(&self, id: MeetingId) -> Option<&MeetingRecord> {
        self.meetings.get(&id)
    }

    pub fn meetings(&self) -> impl Iterator<Item = &MeetingRecord> {
        self.meetings.values()
    }
}
