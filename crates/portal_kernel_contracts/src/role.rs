#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Portal user role. Names outside the three known roles parse to
/// `Unknown`, which every policy treats as the most restrictive role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalRole {
    Advisor,
    Assistant,
    Client,
    Unknown,
}

impl PortalRole {
    pub const KNOWN: [PortalRole; 3] = [PortalRole::Advisor, PortalRole::Assistant, PortalRole::Client];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "advisor" => PortalRole::Advisor,
            "assistant" => PortalRole::Assistant,
            "client" => PortalRole::Client,
            _ => PortalRole::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PortalRole::Advisor => "advisor",
            PortalRole::Assistant => "assistant",
            PortalRole::Client => "client",
            PortalRole::Unknown => "unknown",
        }
    }

    pub fn is_staff(self) -> bool {
        matches!(self, PortalRole::Advisor | PortalRole::Assistant)
    }
}

impl std::fmt::Display for PortalRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalScreen {
    Dashboard,
    ClientManagement,
    Households,
    HouseholdDetail,
    Documents,
    Messages,
    Meetings,
    Settings,
    ClientProfile,
    ClientDashboard,
}

impl PortalScreen {
    pub const ALL: [PortalScreen; 10] = [
        PortalScreen::Dashboard,
        PortalScreen::ClientManagement,
        PortalScreen::Households,
        PortalScreen::HouseholdDetail,
        PortalScreen::Documents,
        PortalScreen::Messages,
        PortalScreen::Meetings,
        PortalScreen::Settings,
        PortalScreen::ClientProfile,
        PortalScreen::ClientDashboard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PortalScreen::Dashboard => "dashboard",
            PortalScreen::ClientManagement => "clients",
            PortalScreen::Households => "households",
            PortalScreen::HouseholdDetail => "household_detail",
            PortalScreen::Documents => "documents",
            PortalScreen::Messages => "messages",
            PortalScreen::Meetings => "meetings",
            PortalScreen::Settings => "settings",
            PortalScreen::ClientProfile => "client_profile",
            PortalScreen::ClientDashboard => "client_dashboard",
        }
    }
}
