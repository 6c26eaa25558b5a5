#![forbid(unsafe_code)]

//! Role-visibility policy.
//!
//! Every role-dependent decision in the portal is answered here: how a
//! field is shown to a role, whether it can be edited, which screens a role
//! may open, and which record actions a role may take. Callers never branch
//! on the role themselves.

use portal_kernel_contracts::client::{ClientRecord, FieldValue};
use portal_kernel_contracts::client_schema::ClientField;
use portal_kernel_contracts::role::{PortalRole, PortalScreen};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub visible: bool,
    pub editable: bool,
    pub masked: bool,
}

impl FieldView {
    const PLAIN_EDIT: FieldView = FieldView {
        visible: true,
        editable: true,
        masked: false,
    };
    const MASKED_EDIT: FieldView = FieldView {
        visible: true,
        editable: true,
        masked: true,
    };
    const PLAIN_READ: FieldView = FieldView {
        visible: true,
        editable: false,
        masked: false,
    };
    const MASKED_READ: FieldView = FieldView {
        visible: true,
        editable: false,
        masked: true,
    };
}

#[derive(Debug, Clone, Copy)]
struct RolePolicyRow {
    role: PortalRole,
    ordinary: FieldView,
    sensitive: FieldView,
    home: Option<PortalScreen>,
    screens: &'static [PortalScreen],
    delete_any_document: bool,
    delete_own_document: bool,
}

const STAFF_SCREENS: &[PortalScreen] = &[
    PortalScreen::Dashboard,
    PortalScreen::ClientManagement,
    PortalScreen::Households,
    PortalScreen::HouseholdDetail,
    PortalScreen::Documents,
    PortalScreen::Messages,
    PortalScreen::Meetings,
    PortalScreen::Settings,
    PortalScreen::ClientProfile,
];

const CLIENT_SCREENS: &[PortalScreen] = &[
    PortalScreen::ClientDashboard,
    PortalScreen::ClientProfile,
    PortalScreen::Documents,
    PortalScreen::Messages,
    PortalScreen::Settings,
];

const POLICY: [RolePolicyRow; 4] = [
    RolePolicyRow {
        role: PortalRole::Advisor,
        ordinary: FieldView::PLAIN_EDIT,
        sensitive: FieldView::PLAIN_EDIT,
        home: Some(PortalScreen::Dashboard),
        screens: STAFF_SCREENS,
        delete_any_document: true,
        delete_own_document: true,
    },
    RolePolicyRow {
        role: PortalRole::Assistant,
        ordinary: FieldView::PLAIN_EDIT,
        sensitive: FieldView::PLAIN_EDIT,
        home: Some(PortalScreen::Dashboard),
        screens: STAFF_SCREENS,
        delete_any_document: false,
        delete_own_document: false,
    },
    RolePolicyRow {
        role: PortalRole::Client,
        ordinary: FieldView::PLAIN_EDIT,
        sensitive: FieldView::MASKED_EDIT,
        home: Some(PortalScreen::ClientDashboard),
        screens: CLIENT_SCREENS,
        delete_any_document: false,
        delete_own_document: true,
    },
    RolePolicyRow {
        role: PortalRole::Unknown,
        ordinary: FieldView::PLAIN_READ,
        sensitive: FieldView::MASKED_READ,
        home: None,
        screens: &[],
        delete_any_document: false,
        delete_own_document: false,
    },
];

fn row(role: PortalRole) -> &'static RolePolicyRow {
    // Rows are declared in `PortalRole` variant order.
    &POLICY[role as usize]
}

/// How `field` is shown to `role`, ignoring record state.
pub fn field_view(role: PortalRole, field: ClientField) -> FieldView {
    let r = row(role);
    if field.is_sensitive() {
        r.sensitive
    } else {
        r.ordinary
    }
}

/// Role view with record-state rules layered on: mailing fields are read-only
/// while the mailing address mirrors the residential one.
pub fn field_view_for_record(role: PortalRole, field: ClientField, record: &ClientRecord) -> FieldView {
    let mut view = field_view(role, field);
    if field.is_mailing() && record.mailing_is_same {
        view.editable = false;
    }
    view
}

pub fn screen_allowed(role: PortalRole, screen: PortalScreen) -> bool {
    row(role).screens.contains(&screen)
}

pub fn home_screen(role: PortalRole) -> Option<PortalScreen> {
    row(role).home
}

/// Screen actually shown for a navigation request: the request itself when
/// allowed, else the role's home. `None` for roles with no reachable screen.
pub fn resolve_screen(role: PortalRole, requested: PortalScreen) -> Option<PortalScreen> {
    if screen_allowed(role, requested) {
        Some(requested)
    } else {
        home_screen(role)
    }
}

pub fn can_delete_document(role: PortalRole, uploaded_by_self: bool) -> bool {
    let r = row(role);
    r.delete_any_document || (uploaded_by_self && r.delete_own_document)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityConfig {
    pub mask_width: u8,
}

impl VisibilityConfig {
    pub fn mvp_v1() -> Self {
        Self { mask_width: 8 }
    }
}

/// Renders field values for display through the policy table.
#[derive(Debug, Clone)]
pub struct FieldRenderer {
    mask: String,
}

impl FieldRenderer {
    pub fn new(config: VisibilityConfig) -> Self {
        Self {
            mask: "\u{2022}".repeat(usize::from(config.mask_width.max(1))),
        }
    }

    /// Masked values render as a fixed-width mask, independent of the value's
    /// length. Blank values render blank so the form can still show that the
    /// field is unfilled.
    pub fn render(&self, role: PortalRole, field: ClientField, value: &FieldValue) -> String {
        let view = field_view(role, field);
        if !view.visible {
            return String::new();
        }
        if view.masked {
            return if value.is_present() {
                self.mask.clone()
            } else {
                String::new()
            };
        }
        value.display()
    }

    pub fn render_field(&self, role: PortalRole, record: &ClientRecord, field: ClientField) -> String {
        self.render(role, field, &record.get(field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_visibility_01_policy_rows_match_role_order() {
        for (i, r) in POLICY.iter().enumerate() {
            assert_eq!(r.role as usize, i);
        }
    }

    #[test]
    fn at_visibility_02_client_sees_sensitive_fields_masked() {
        for f in [ClientField::Ssn, ClientField::AccountNumber] {
            assert!(field_view(PortalRole::Client, f).masked);
            assert!(!field_view(PortalRole::Advisor, f).masked);
            assert!(!field_view(PortalRole::Assistant, f).masked);
        }
        assert!(!field_view(PortalRole::Client, ClientField::RoutingNumber).masked);
    }

    #[test]
    fn at_visibility_03_unknown_role_is_most_restrictive() {
        for f in ClientField::all() {
            let v = field_view(PortalRole::Unknown, f);
            assert!(!v.editable);
            assert_eq!(v.masked, f.is_sensitive());
        }
        assert_eq!(resolve_screen(PortalRole::Unknown, PortalScreen::Dashboard), None);
    }

    #[test]
    fn at_visibility_04_mask_hides_content_and_length() {
        let r = FieldRenderer::new(VisibilityConfig::mvp_v1());
        let short = r.render(PortalRole::Client, ClientField::Ssn, &FieldValue::text("1"));
        let long = r.render(
            PortalRole::Client,
            ClientField::Ssn,
            &FieldValue::text("123-45-6789"),
        );
        assert_eq!(short, long);
        assert!(!long.contains('1'));
        assert_eq!(
            r.render(PortalRole::Advisor, ClientField::Ssn, &FieldValue::text("123-45-6789")),
            "123-45-6789"
        );
        assert_eq!(r.render(PortalRole::Client, ClientField::Ssn, &FieldValue::text("")), "");
    }

    #[test]
    fn at_visibility_05_mailing_fields_locked_while_mirrored() {
        let mut rec = ClientRecord::empty();
        assert!(!field_view_for_record(PortalRole::Advisor, ClientField::MailingCity, &rec).editable);
        assert!(field_view_for_record(PortalRole::Advisor, ClientField::ResidentialCity, &rec).editable);
        rec.mailing_is_same = false;
        assert!(field_view_for_record(PortalRole::Advisor, ClientField::MailingCity, &rec).editable);
    }

    #[test]
    fn at_visibility_06_client_cannot_reach_staff_screens() {
        for s in [
            PortalScreen::Dashboard,
            PortalScreen::ClientManagement,
            PortalScreen::Households,
            PortalScreen::Meetings,
        ] {
            assert!(!screen_allowed(PortalRole::Client, s));
            assert_eq!(
                resolve_screen(PortalRole::Client, s),
                Some(PortalScreen::ClientDashboard)
            );
        }
        assert_eq!(
            resolve_screen(PortalRole::Assistant, PortalScreen::ClientDashboard),
            Some(PortalScreen::Dashboard)
        );
    }

    #[test]
    fn at_visibility_07_document_delete_rights() {
        assert!(can_delete_document(PortalRole::Advisor, false));
        assert!(!can_delete_document(PortalRole::Assistant, true));
        assert!(can_delete_document(PortalRole::Client, true));
        assert!(!can_delete_document(PortalRole::Client, false));
    }
}
