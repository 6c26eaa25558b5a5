#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::{validate_opt_text, validate_text};
use crate::{ContractViolation, Validate};

pub const MEETING_DURATIONS_MIN: [u16; 5] = [30, 45, 60, 90, 120];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeetingId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingKind {
    Consultation,
    Review,
    Planning,
    Followup,
    Other,
}

impl MeetingKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "consultation" => Some(MeetingKind::Consultation),
            "review" => Some(MeetingKind::Review),
            "planning" => Some(MeetingKind::Planning),
            "followup" | "follow-up" => Some(MeetingKind::Followup),
            "other" => Some(MeetingKind::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
}

/// Editable part of a meeting, as entered on the scheduling form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingDraft {
    pub title: String,
    pub client: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, 24-hour
    pub time: String,
    pub duration_min: u16,
    pub kind: MeetingKind,
    pub notes: String,
}

impl Validate for MeetingDraft {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("meeting_draft.title", &self.title, 128)?;
        validate_text("meeting_draft.client", &self.client, 128)?;
        validate_text("meeting_draft.date", &self.date, 10)?;
        validate_text("meeting_draft.time", &self.time, 5)?;
        if !MEETING_DURATIONS_MIN.contains(&self.duration_min) {
            return Err(ContractViolation::InvalidValue {
                field: "meeting_draft.duration_min",
                reason: "must be one of 30, 45, 60, 90, 120",
            });
        }
        validate_opt_text("meeting_draft.notes", &self.notes, 2048)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub meeting_id: MeetingId,
    #[serde(flatten)]
    pub draft: MeetingDraft,
    pub status: MeetingStatus,
}

impl Validate for MeetingRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.meeting_id.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "meeting_record.meeting_id",
                reason: "must be > 0",
            });
        }
        self.draft.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> MeetingDraft {
        MeetingDraft {
            title: "Initial Consultation".into(),
            client: "John Smith".into(),
            date: "2024-01-15".into(),
            time: "10:00".into(),
            duration_min: 60,
            kind: MeetingKind::Consultation,
            notes: String::new(),
        }
    }

    #[test]
    fn at_meeting_01_duration_must_be_offered_slot() {
        assert!(draft().validate().is_ok());
        let mut d = draft();
        d.duration_min = 50;
        assert!(d.validate().is_err());
    }

    #[test]
    fn at_meeting_02_kind_parse_accepts_both_followup_spellings() {
        assert_eq!(MeetingKind::parse("followup"), Some(MeetingKind::Followup));
        assert_eq!(MeetingKind::parse("Follow-up"), Some(MeetingKind::Followup));
        assert_eq!(MeetingKind::parse("lunch"), None);
    }
}
