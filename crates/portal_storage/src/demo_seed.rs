#![forbid(unsafe_code)]

//! Demo rows the portal starts with.

use portal_kernel_contracts::client::{ClientId, ClientPriority, ClientRecord};
use portal_kernel_contracts::document::{DocumentId, DocumentRecord};
use portal_kernel_contracts::household::{HouseholdId, HouseholdRecord};
use portal_kernel_contracts::meeting::{
    MeetingDraft, MeetingId, MeetingKind, MeetingRecord, MeetingStatus,
};
use portal_kernel_contracts::message::{MessageId, MessageKind, MessageRecord};
use portal_kernel_contracts::MonotonicTimeNs;
use tracing::info;

use crate::portal_store::{PortalStore, StorageError};

struct DemoClient {
    id: &'static str,
    first: &'static str,
    last: &'static str,
    email: &'static str,
    mobile: &'static str,
    priority: ClientPriority,
    aum_usd: u64,
    household: u64,
    /// Required fields beyond name, email and mobile, as (street, city, state,
    /// zip, ssn, dob, citizenship, employment status). Blank means unfilled.
    rest: [&'static str; 8],
}

const DEMO_CLIENTS: [DemoClient; 4] = [
    DemoClient {
        id: "1",
        first: "John",
        last: "Smith",
        email: "john@example.com",
        mobile: "(555) 123-4567",
        priority: ClientPriority::A,
        aum_usd: 500_000,
        household: 1,
        rest: ["12 Elm St", "Springfield", "IL", "62701", "123-45-6789", "1968-04-12", "US", ""],
    },
    DemoClient {
        id: "2",
        first: "Sarah",
        last: "Johnson",
        email: "sarah@example.com",
        mobile: "(555) 234-5678",
        priority: ClientPriority::B,
        aum_usd: 250_000,
        household: 2,
        rest: ["48 Oak Ave", "Madison", "WI", "53703", "", "", "US", ""],
    },
    DemoClient {
        id: "3",
        first: "Michael",
        last: "Brown",
        email: "michael@example.com",
        mobile: "(555) 345-6789",
        priority: ClientPriority::A,
        aum_usd: 750_000,
        household: 3,
        rest: ["7 Harbor Rd", "Portland", "ME", "04101", "", "1959-11-03", "", "Retired"],
    },
    DemoClient {
        id: "4",
        first: "Emily",
        last: "Davis",
        email: "emily@example.com",
        mobile: "(555) 456-7890",
        priority: ClientPriority::C,
        aum_usd: 150_000,
        household: 0,
        rest: ["", "Austin", "", "", "", "", "", ""],
    },
];

fn demo_record(c: &DemoClient) -> ClientRecord {
    let mut r = ClientRecord::empty();
    r.legal_first = c.first.to_string();
    r.legal_last = c.last.to_string();
    r.email = c.email.to_string();
    r.mobile = c.mobile.to_string();
    let [street, city, state, zip, ssn, dob, citizenship, employment] = c.rest;
    r.residential_street = street.to_string();
    r.residential_city = city.to_string();
    r.residential_state = state.to_string();
    r.residential_zip = zip.to_string();
    r.ssn = ssn.to_string();
    r.dob = dob.to_string();
    r.citizenship = citizenship.to_string();
    r.employment_status = employment.to_string();
    r
}

fn demo_households() -> Result<Vec<HouseholdRecord>, StorageError> {
    let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    Ok(vec![
        HouseholdRecord::v1(
            HouseholdId(1),
            "Smith Family Trust",
            names(&["John Smith", "Jane Smith", "Smith Jr. Trust"]),
            1_250_000,
        )?,
        HouseholdRecord::v1(
            HouseholdId(2),
            "Johnson Retirement Accounts",
            names(&["Sarah Johnson", "Mark Johnson"]),
            850_000,
        )?,
        HouseholdRecord::v1(
            HouseholdId(3),
            "Brown Estate",
            names(&["Michael Brown", "Lisa Brown", "Brown Family LLC", "Brown Foundation"]),
            2_100_000,
        )?,
    ])
}

fn demo_documents() -> Result<Vec<DocumentRecord>, StorageError> {
    const MB_TENTHS: u64 = 1024 * 1024 / 10;
    Ok(vec![
        DocumentRecord::v1(
            DocumentId(1),
            "Driver_License_Front.pdf",
            "ID Document",
            23 * MB_TENTHS,
            "John Smith",
            "2024-01-15",
            Some(ClientId::new("1")?),
            Some("John Smith".to_string()),
        )?,
        DocumentRecord::v1(
            DocumentId(2),
            "W9_Form.pdf",
            "Tax Form",
            11 * MB_TENTHS,
            "Sarah Johnson",
            "2024-01-14",
            Some(ClientId::new("2")?),
            Some("Sarah Johnson".to_string()),
        )?,
        DocumentRecord::v1(
            DocumentId(3),
            "Bank_Statement.pdf",
            "Financial",
            37 * MB_TENTHS,
            "Michael Brown",
            "2024-01-13",
            Some(ClientId::new("3")?),
            Some("Michael Brown".to_string()),
        )?,
    ])
}

fn demo_messages() -> Vec<MessageRecord> {
    let msg = |id: u64, from: &str, to: &str, subject: &str, preview: &str, ts: &str, read: bool, kind| {
        MessageRecord {
            message_id: MessageId(id),
            from: from.to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            preview: preview.to_string(),
            timestamp: ts.to_string(),
            read,
            kind,
        }
    };
    vec![
        msg(
            1,
            "John Smith",
            "David Wilson",
            "Question about investment allocation",
            "Hi David, I wanted to ask about the recommended allocation for my portfolio...",
            "2024-01-15 10:30 AM",
            false,
            MessageKind::Message,
        ),
        msg(
            2,
            "Sarah Johnson",
            "David Wilson",
            "Meeting Request",
            "Could we schedule a call to discuss my retirement planning?",
            "2024-01-14 2:15 PM",
            true,
            MessageKind::MeetingRequest,
        ),
        msg(
            3,
            "Michael Brown",
            "Lisa Chen",
            "Document upload confirmation",
            "I've uploaded the requested documents to my profile...",
            "2024-01-13 4:45 PM",
            true,
            MessageKind::Message,
        ),
    ]
}

fn demo_meetings() -> Vec<MeetingRecord> {
    vec![
        MeetingRecord {
            meeting_id: MeetingId(1),
            draft: MeetingDraft {
                title: "Initial Consultation".to_string(),
                client: "John Smith".to_string(),
                date: "2024-01-15".to_string(),
                time: "10:00".to_string(),
                duration_min: 60,
                kind: MeetingKind::Consultation,
                notes: "Discuss investment goals and risk tolerance".to_string(),
            },
            status: MeetingStatus::Scheduled,
        },
        MeetingRecord {
            meeting_id: MeetingId(2),
            draft: MeetingDraft {
                title: "Portfolio Review".to_string(),
                client: "Sarah Johnson".to_string(),
                date: "2024-01-16".to_string(),
                time: "14:00".to_string(),
                duration_min: 45,
                kind: MeetingKind::Review,
                notes: "Quarterly portfolio review completed".to_string(),
            },
            status: MeetingStatus::Completed,
        },
    ]
}

/// Store preloaded with the demo clients, households, documents, messages
/// and meetings.
pub fn demo_store(now: MonotonicTimeNs) -> Result<PortalStore, StorageError> {
    let mut store = PortalStore::new_in_memory();
    for h in demo_households()? {
        store.insert_household(h)?;
    }
    for c in &DEMO_CLIENTS {
        let household = (c.household != 0).then_some(HouseholdId(c.household));
        store.insert_client(
            ClientId::new(c.id)?,
            demo_record(c),
            c.priority,
            c.aum_usd,
            household,
            now,
        )?;
    }
    for d in demo_documents()? {
        store.insert_document(d)?;
    }
    for m in demo_messages() {
        store.insert_message(m)?;
    }
    for m in demo_meetings() {
        store.insert_meeting(m)?;
    }
    info!(clients = DEMO_CLIENTS.len(), "demo store seeded");
    Ok(store)
}
