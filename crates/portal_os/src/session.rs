#![forbid(unsafe_code)]

use portal_engines::visibility;
use portal_kernel_contracts::role::{PortalRole, PortalScreen};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    /// A client picked their role but has not accepted the terms yet.
    AwaitingTerms { role: PortalRole },
    Active { role: PortalRole },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TermsAcknowledgement {
    pub has_read_terms: bool,
    pub has_read_privacy: bool,
}

impl TermsAcknowledgement {
    pub fn is_complete(&self) -> bool {
        self.has_read_terms && self.has_read_privacy
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("role '{0}' cannot sign in")]
    UnknownRole(PortalRole),
    #[error("a role is already active; log out first")]
    AlreadyActive,
    #[error("no terms are pending acceptance")]
    NotAwaitingTerms,
    #[error("both the terms of service and the privacy policy must be acknowledged")]
    TermsNotAcknowledged,
    #[error("no active session")]
    NotSignedIn,
}

/// Per-user session context: role, terms gate and current screen.
#[derive(Debug, Clone)]
pub struct PortalSession {
    state: SessionState,
    terms_accepted: bool,
    screen: Option<PortalScreen>,
    navigation_count: u64,
}

impl Default for PortalSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PortalSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::SignedOut,
            terms_accepted: false,
            screen: None,
            navigation_count: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Role of an active session; `None` while signed out or awaiting terms.
    pub fn role(&self) -> Option<PortalRole> {
        match self.state {
            SessionState::Active { role } => Some(role),
            _ => None,
        }
    }

    pub fn active_role(&self) -> Result<PortalRole, SessionError> {
        self.role().ok_or(SessionError::NotSignedIn)
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn current_screen(&self) -> Option<PortalScreen> {
        self.screen
    }

    /// Bumped on every navigation; `ClientListView::sync_with_session` compares
    /// it to drop stale selections.
    pub fn navigation_count(&self) -> u64 {
        self.navigation_count
    }

    pub fn select_role(&mut self, role: PortalRole) -> Result<SessionState, SessionError> {
        if role == PortalRole::Unknown {
            return Err(SessionError::UnknownRole(role));
        }
        if matches!(self.state, SessionState::Active { .. }) {
            return Err(SessionError::AlreadyActive);
        }
        if role == PortalRole::Client && !self.terms_accepted {
            self.state = SessionState::AwaitingTerms { role };
            info!(role = %role, "terms gate shown");
        } else {
            self.activate(role);
        }
        Ok(self.state)
    }

    pub fn accept_terms(&mut self, ack: TermsAcknowledgement) -> Result<SessionState, SessionError> {
        let SessionState::AwaitingTerms { role } = self.state else {
            return Err(SessionError::NotAwaitingTerms);
        };
        if !ack.is_complete() {
            return Err(SessionError::TermsNotAcknowledged);
        }
        self.terms_accepted = true;
        self.activate(role);
        Ok(self.state)
    }

    pub fn decline_terms(&mut self) -> Result<SessionState, SessionError> {
        if !matches!(self.state, SessionState::AwaitingTerms { .. }) {
            return Err(SessionError::NotAwaitingTerms);
        }
        self.state = SessionState::SignedOut;
        self.screen = None;
        info!("terms declined");
        Ok(self.state)
    }

    /// Signs out and forgets any earlier terms acceptance.
    pub fn logout(&mut self) {
        self.state = SessionState::SignedOut;
        self.terms_accepted = false;
        self.screen = None;
        self.navigation_count += 1;
        info!("session logged out");
    }

    /// Moves to `requested`, or to the role's home screen when the role may
    /// not open it.
    pub fn navigate(&mut self, requested: PortalScreen) -> Result<PortalScreen, SessionError> {
        let role = self.active_role()?;
        let screen = visibility::resolve_screen(role, requested).ok_or(SessionError::NotSignedIn)?;
        self.screen = Some(screen);
        self.navigation_count += 1;
        Ok(screen)
    }

    fn activate(&mut self, role: PortalRole) {
        self.state = SessionState::Active { role };
        self.screen = visibility::home_screen(role);
        self.navigation_count += 1;
        info!(role = %role, "session active");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTH: TermsAcknowledgement = TermsAcknowledgement {
        has_read_terms: true,
        has_read_privacy: true,
    };

    #[test]
    fn at_session_01_staff_roles_activate_immediately() {
        let mut s = PortalSession::new();
        assert_eq!(
            s.select_role(PortalRole::Assistant).unwrap(),
            SessionState::Active {
                role: PortalRole::Assistant
            }
        );
        assert_eq!(s.current_screen(), Some(PortalScreen::Dashboard));
    }

    #[test]
    fn at_session_02_client_waits_for_both_acknowledgements() {
        let mut s = PortalSession::new();
        s.select_role(PortalRole::Client).unwrap();
        assert_eq!(s.role(), None);
        let partial = TermsAcknowledgement {
            has_read_terms: true,
            has_read_privacy: false,
        };
        assert_eq!(s.accept_terms(partial), Err(SessionError::TermsNotAcknowledged));
        assert_eq!(s.role(), None);
        s.accept_terms(BOTH).unwrap();
        assert_eq!(s.role(), Some(PortalRole::Client));
        assert_eq!(s.current_screen(), Some(PortalScreen::ClientDashboard));
    }

    #[test]
    fn at_session_03_decline_signs_out() {
        let mut s = PortalSession::new();
        s.select_role(PortalRole::Client).unwrap();
        assert_eq!(s.decline_terms().unwrap(), SessionState::SignedOut);
        assert_eq!(s.decline_terms(), Err(SessionError::NotAwaitingTerms));
    }

    #[test]
    fn at_session_04_logout_clears_terms() {
        let mut s = PortalSession::new();
        s.select_role(PortalRole::Client).unwrap();
        s.accept_terms(BOTH).unwrap();
        s.logout();
        assert!(!s.terms_accepted());
        assert!(matches!(
            s.select_role(PortalRole::Client).unwrap(),
            SessionState::AwaitingTerms { .. }
        ));
    }

    #[test]
    fn at_session_05_unknown_role_is_refused() {
        let mut s = PortalSession::new();
        assert_eq!(
            s.select_role(PortalRole::parse("auditor")),
            Err(SessionError::UnknownRole(PortalRole::Unknown))
        );
        assert_eq!(s.state(), SessionState::SignedOut);
    }

    #[test]
    fn at_session_06_client_navigation_redirects_home() {
        let mut s = PortalSession::new();
        assert_eq!(s.navigate(PortalScreen::Dashboard), Err(SessionError::NotSignedIn));
        s.select_role(PortalRole::Client).unwrap();
        s.accept_terms(BOTH).unwrap();
        assert_eq!(
            s.navigate(PortalScreen::Households).unwrap(),
            PortalScreen::ClientDashboard
        );
        assert_eq!(s.navigate(PortalScreen::Documents).unwrap(), PortalScreen::Documents);
    }
}
