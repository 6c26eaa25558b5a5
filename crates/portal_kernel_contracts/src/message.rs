#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::validate_text;
use crate::{ContractViolation, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    MeetingRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub message_id: MessageId,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub preview: String,
    pub timestamp: String,
    pub read: bool,
    pub kind: MessageKind,
}

impl Validate for MessageRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.message_id.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "message_record.message_id",
                reason: "must be > 0",
            });
        }
        validate_text("message_record.from", &self.from, 128)?;
        validate_text("message_record.to", &self.to, 128)?;
        validate_text("message_record.subject", &self.subject, 256)?;
        Ok(())
    }
}

/// Outgoing message as typed into the composer. Fields may be blank; the
/// composer checks them before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MessageDraft {
    pub fn is_complete(&self) -> bool {
        !self.to.trim().is_empty() && !self.subject.trim().is_empty() && !self.body.trim().is_empty()
    }
}

impl Validate for MessageDraft {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("message_draft.to", &self.to, 128)?;
        validate_text("message_draft.subject", &self.subject, 256)?;
        validate_text("message_draft.body", &self.body, 8192)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_message_01_draft_completeness() {
        let mut d = MessageDraft {
            to: "John Smith".into(),
            subject: "Docs".into(),
            body: "".into(),
        };
        assert!(!d.is_complete());
        assert!(d.validate().is_err());
        d.body = "Please upload your W9.".into();
        assert!(d.is_complete());
        assert!(d.validate().is_ok());
    }
}
