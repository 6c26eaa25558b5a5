#![forbid(unsafe_code)]

use portal_kernel_contracts::client::{ClientId, ClientPriority, ClientRecord};
use portal_kernel_contracts::document::{DocumentId, DocumentRecord};
use portal_kernel_contracts::household::{HouseholdId, HouseholdRecord};
use portal_kernel_contracts::meeting::{MeetingDraft, MeetingId, MeetingRecord};
use portal_kernel_contracts::message::{MessageId, MessageRecord};
use portal_kernel_contracts::MonotonicTimeNs;

use crate::portal_store::{ClientRow, HouseholdStats, PortalStore, StorageError};

/// Typed repository interface for the `clients` table.
pub trait ClientTablesRepo {
    fn insert_client_row(
        &mut self,
        client_id: ClientId,
        record: ClientRecord,
        priority: ClientPriority,
        aum_usd: u64,
        household_id: Option<HouseholdId>,
        now: MonotonicTimeNs,
    ) -> Result<(), StorageError>;
    fn create_client_row(
        &mut self,
        record: ClientRecord,
        priority: ClientPriority,
        aum_usd: u64,
        now: MonotonicTimeNs,
    ) -> Result<ClientId, StorageError>;
    fn update_client_record_row(
        &mut self,
        client_id: &ClientId,
        record: ClientRecord,
        now: MonotonicTimeNs,
    ) -> Result<u64, StorageError>;
    fn delete_client_row(&mut self, client_id: &ClientId) -> Result<ClientRow, StorageError>;
    fn assign_client_household_row(
        &mut self,
        client_id: &ClientId,
        household_id: Option<HouseholdId>,
    ) -> Result<(), StorageError>;
    fn get_client_row(&self, client_id: &ClientId) -> Option<&ClientRow>;
    fn client_rows_all(&self) -> Vec<&ClientRow>;
    fn client_rows_matching(&self, query: &str) -> Vec<&ClientRow>;
}

/// Typed repository interface for the `households` table.
pub trait HouseholdTablesRepo {
    fn insert_household_row(&mut self, record: HouseholdRecord) -> Result<(), StorageError>;
    fn delete_household_row(&mut self, id: HouseholdId) -> Result<HouseholdRecord, StorageError>;
    fn get_household_row(&self, id: HouseholdId) -> Option<&HouseholdRecord>;
    fn household_rows_matching(&self, query: &str) -> Vec<&HouseholdRecord>;
    fn household_stats_row(&self) -> HouseholdStats;
}

/// Typed repository interface for the `documents` and `messages` tables.
pub trait DocumentMessageTablesRepo {
    fn insert_document_row(&mut self, record: DocumentRecord) -> Result<(), StorageError>;
    fn delete_document_row(&mut self, id: DocumentId) -> Result<DocumentRecord, StorageError>;
    fn get_document_row(&self, id: DocumentId) -> Option<&DocumentRecord>;
    fn next_document_row_id(&self) -> DocumentId;
    fn document_rows_matching(&self, query: &str) -> Vec<&DocumentRecord>;
    fn insert_message_row(&mut self, record: MessageRecord) -> Result<(), StorageError>;
    fn mark_message_row_read(&mut self, id: MessageId) -> Result<(), StorageError>;
    fn message_rows_matching(&self, query: &str) -> Vec<&MessageRecord>;
    fn unread_message_row_count(&self) -> usize;
}

/// Typed repository interface for the `meetings` table.
pub trait MeetingTablesRepo {
    fn schedule_meeting_row(&mut self, draft: MeetingDraft) -> Result<MeetingId, StorageError>;
    fn update_meeting_row(&mut self, id: MeetingId, draft: MeetingDraft) -> Result<(), StorageError>;
    fn delete_meeting_row(&mut self, id: MeetingId) -> Result<MeetingRecord, StorageError>;
    fn meeting_rows(&self) -> Vec<&MeetingRecord>;
}

impl ClientTablesRepo for PortalStore {
    fn insert_client_row(
        &mut self,
        client_id: ClientId,
        record: ClientRecord,
        priority: ClientPriority,
        aum_usd: u64,
        household_id: Option<HouseholdId>,
        now: MonotonicTimeNs,
    ) -> Result<(), StorageError> {
        self.insert_client(client_id, record, priority, aum_usd, household_id, now)
    }

    fn create_client_row(
        &mut self,
        record: ClientRecord,
        priority: ClientPriority,
        aum_usd: u64,
        now: MonotonicTimeNs,
    ) -> Result<ClientId, StorageError> {
        self.create_client(record, priority, aum_usd, now)
    }

    fn update_client_record_row(
        &mut self,
        client_id: &ClientId,
        record: ClientRecord,
        now: MonotonicTimeNs,
    ) -> Result<u64, StorageError> {
        self.update_client_record(client_id, record, now)
    }

    fn delete_client_row(&mut self, client_id: &ClientId) -> Result<ClientRow, StorageError> {
        self.delete_client(client_id)
    }

    fn assign_client_household_row(
        &mut self,
        client_id: &ClientId,
        household_id: Option<HouseholdId>,
    ) -> Result<(), StorageError> {
        self.assign_client_household(client_id, household_id)
    }

    fn get_client_row(&self, client_id: &ClientId) -> Option<&ClientRow> {
        self.client_row(client_id)
    }

    fn client_rows_all(&self) -> Vec<&ClientRow> {
        self.client_rows().collect()
    }

    fn client_rows_matching(&self, query: &str) -> Vec<&ClientRow> {
        self.search_clients(query)
    }
}

impl HouseholdTablesRepo for PortalStore {
    fn insert_household_row(&mut self, record: HouseholdRecord) -> Result<(), StorageError> {
        self.insert_household(record)
    }

    fn delete_household_row(&mut self, id: HouseholdId) -> Result<HouseholdRecord, StorageError> {
        self.delete_household(id)
    }

    fn get_household_row(&self, id: HouseholdId) -> Option<&HouseholdRecord> {
        self.household(id)
    }

    fn household_rows_matching(&self, query: &str) -> Vec<&HouseholdRecord> {
        self.search_households(query)
    }

    fn household_stats_row(&self) -> HouseholdStats {
        self.household_stats()
    }
}

impl DocumentMessageTablesRepo for PortalStore {
    fn insert_document_row(&mut self, record: DocumentRecord) -> Result<(), StorageError> {
        self.insert_document(record)
    }

    fn delete_document_row(&mut self, id: DocumentId) -> Result<DocumentRecord, StorageError> {
        self.delete_document(id)
    }

    fn get_document_row(&self, id: DocumentId) -> Option<&DocumentRecord> {
        self.document(id)
    }

    fn next_document_row_id(&self) -> DocumentId {
        self.next_document_id()
    }

    fn document_rows_matching(&self, query: &str) -> Vec<&DocumentRecord> {
        self.search_documents(query)
    }

    fn insert_message_row(&mut self, record: MessageRecord) -> Result<(), StorageError> {
        self.insert_message(record)
    }

    fn mark_message_row_read(&mut self, id: MessageId) -> Result<(), StorageError> {
        self.mark_message_read(id)
    }

    fn message_rows_matching(&self, query: &str) -> Vec<&MessageRecord> {
        self.search_messages(query)
    }

    fn unread_message_row_count(&self) -> usize {
        self.unread_message_count()
    }
}

impl MeetingTablesRepo for PortalStore {
    fn schedule_meeting_row(&mut self, draft: MeetingDraft) -> Result<MeetingId, StorageError> {
        self.schedule_meeting(draft)
    }

    fn update_meeting_row(&mut self, id: MeetingId, draft: MeetingDraft) -> Result<(), StorageError> {
        self.update_meeting(id, draft)
    }

    fn delete_meeting_row(&mut self, id: MeetingId) -> Result<MeetingRecord, StorageError> {
        self.delete_meeting(id)
    }

    fn meeting_rows(&self) -> Vec<&MeetingRecord> {
        self.meetings().collect()
    }
}
