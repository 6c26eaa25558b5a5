#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::validate_text;
use crate::{ContractViolation, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Failure,
}

/// User-visible toast raised once per completed user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn v1(
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ContractViolation> {
        let n = Self {
            kind,
            title: title.into(),
            description: description.into(),
        };
        n.validate()?;
        Ok(n)
    }

    pub fn success(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ContractViolation> {
        Self::v1(NotificationKind::Success, title, description)
    }

    pub fn failure(
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ContractViolation> {
        Self::v1(NotificationKind::Failure, title, description)
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NotificationKind::Failure
    }
}

impl Validate for Notification {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_text("notification.title", &self.title, 96)?;
        validate_text("notification.description", &self.description, 512)?;
        Ok(())
    }
}
