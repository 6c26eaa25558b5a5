#![forbid(unsafe_code)]

use portal_engines::completion::{CompletionEngine, CompletionReport};
use portal_engines::field_format::{self, FormatIssue};
use portal_engines::visibility::{self, FieldRenderer, FieldView};
use portal_kernel_contracts::client::{ClientId, ClientRecord, FieldValue, PostalAddress};
use portal_kernel_contracts::client_schema::{ClientField, FieldSection, FieldValueKind};
use portal_kernel_contracts::notification::Notification;
use portal_kernel_contracts::role::PortalRole;
use portal_kernel_contracts::ContractViolation;
use thiserror::Error;
use tracing::debug;

use crate::commands::{CommandBatch, PortalCommand};
use crate::config::PortalConfig;
use crate::notices;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{field} is not editable")]
    NotEditable { field: ClientField },
    #[error("{field} expects a {expected:?} value, got {got:?}")]
    WrongKind {
        field: ClientField,
        expected: FieldValueKind,
        got: FieldValueKind,
    },
    #[error("{0}")]
    Invalid(#[from] ContractViolation),
    #[error("role '{0}' cannot save profiles")]
    ReadOnlyRole(PortalRole),
}

impl FormError {
    /// Failure toast for a refused form action.
    pub fn notification(&self) -> Notification {
        match self {
            FormError::NotEditable { field } => {
                notices::not_permitted(&format!("edit {}", field.spec().label))
            }
            FormError::ReadOnlyRole(_) => notices::not_permitted("save client profiles"),
            FormError::WrongKind { .. } | FormError::Invalid(_) => notices::port_failure(
                &crate::ports::PortError::ValidationFailed(self.to_string()),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldEdit {
    pub completion: u8,
    /// Advisory only; the value was stored regardless.
    pub warning: Option<FormatIssue>,
}

/// Edits one client record on behalf of one role.
#[derive(Debug, Clone)]
pub struct ClientFormController {
    role: PortalRole,
    client_id: Option<ClientId>,
    record: ClientRecord,
    section: FieldSection,
    completion: u8,
    engine: CompletionEngine,
    renderer: FieldRenderer,
}

impl ClientFormController {
    pub fn new_client(role: PortalRole, config: &PortalConfig) -> Self {
        Self::open(role, None, ClientRecord::empty(), config)
    }

    pub fn open(
        role: PortalRole,
        client_id: Option<ClientId>,
        record: ClientRecord,
        config: &PortalConfig,
    ) -> Self {
        let engine = CompletionEngine::new(config.completion);
        let completion = engine.percent(&record);
        Self {
            role,
            client_id,
            record,
            section: FieldSection::Profile,
            completion,
            engine,
            renderer: FieldRenderer::new(config.visibility),
        }
    }

    pub fn role(&self) -> PortalRole {
        self.role
    }

    pub fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    pub fn record(&self) -> &ClientRecord {
        &self.record
    }

    pub fn completion(&self) -> u8 {
        self.completion
    }

    pub fn completion_report(&self) -> CompletionReport {
        self.engine.report(&self.record)
    }

    pub fn format_issues(&self) -> Vec<FormatIssue> {
        field_format::check_record(&self.record)
    }

    pub fn active_section(&self) -> FieldSection {
        self.section
    }

    pub fn select_section(&mut self, section: FieldSection) {
        self.section = section;
    }

    pub fn view(&self, field: ClientField) -> FieldView {
        visibility::field_view_for_record(self.role, field, &self.record)
    }

    /// Display text of a field for this form's role.
    pub fn render(&self, field: ClientField) -> String {
        self.renderer.render_field(self.role, &self.record, field)
    }

    pub fn set_field(&mut self, field: ClientField, value: FieldValue) -> Result<FieldEdit, FormError> {
        if !self.view(field).editable {
            return Err(FormError::NotEditable { field });
        }
        let expected = field.spec().field_type.value_kind();
        if value.kind() != expected {
            return Err(FormError::WrongKind {
                field,
                expected,
                got: value.kind(),
            });
        }
        let warning = match &value {
            FieldValue::Text(s) => field_format::check_text(field, s),
            _ => None,
        };
        self.record.set(field, value)?;
        self.completion = self.engine.percent(&self.record);
        debug!(
            field = field.name(),
            completion = self.completion,
            warned = warning.is_some(),
            "form field set"
        );
        Ok(FieldEdit {
            completion: self.completion,
            warning,
        })
    }

    /// Flipping to `false` exposes whatever mailing fields were stored
    /// before; nothing is copied or cleared.
    pub fn toggle_mailing_is_same(&mut self, same: bool) -> Result<FieldEdit, FormError> {
        self.set_field(ClientField::MailingIsSame, FieldValue::Flag(same))
    }

    pub fn effective_mailing_address(&self) -> PostalAddress {
        self.record.effective_mailing_address()
    }

    pub fn save(&self) -> Result<CommandBatch, FormError> {
        self.ensure_can_save()?;
        Ok(CommandBatch {
            commands: vec![self.save_command()],
            on_success: notices::profile_saved(),
        })
    }

    pub fn save_and_send(&self) -> Result<CommandBatch, FormError> {
        self.ensure_can_save()?;
        Ok(CommandBatch {
            commands: vec![
                self.save_command(),
                PortalCommand::NotifyClient {
                    record: self.record.clone(),
                },
            ],
            on_success: notices::profile_saved_and_sent(self.role == PortalRole::Client),
        })
    }

    /// Binds a new-client form to the id the first save produced, so later
    /// saves update the same row.
    pub fn mark_saved(&mut self, client_id: ClientId) {
        self.client_id = Some(client_id);
    }

    fn ensure_can_save(&self) -> Result<(), FormError> {
        if ClientField::all().any(|f| visibility::field_view(self.role, f).editable) {
            Ok(())
        } else {
            Err(FormError::ReadOnlyRole(self.role))
        }
    }

    fn save_command(&self) -> PortalCommand {
        PortalCommand::SaveRecord {
            client_id: self.client_id.clone(),
            record: self.record.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn form(role: PortalRole) -> ClientFormController {
        ClientFormController::new_client(role, &PortalConfig::mvp_v1())
    }

    #[test]
    fn at_form_01_ann_lee_scores_seventeen() {
        let mut f = form(PortalRole::Advisor);
        assert_eq!(f.completion(), 0);
        f.set_field(ClientField::LegalFirst, FieldValue::text("Ann")).unwrap();
        let edit = f.set_field(ClientField::LegalLast, FieldValue::text("Lee")).unwrap();
        assert_eq!(edit.completion, 17);
    }

    #[test]
    fn at_form_02_wrong_kind_is_rejected_and_record_untouched() {
        let mut f = form(PortalRole::Advisor);
        let err = f
            .set_field(ClientField::LegalFirst, FieldValue::Flag(true))
            .unwrap_err();
        assert!(matches!(err, FormError::WrongKind { .. }));
        assert_eq!(f.record(), &ClientRecord::empty());
    }

    #[test]
    fn at_form_03_malformed_value_is_kept_with_warning() {
        let mut f = form(PortalRole::Assistant);
        let edit = f.set_field(ClientField::Email, FieldValue::text("not-an-email")).unwrap();
        assert!(edit.warning.is_some());
        assert_eq!(f.record().email, "not-an-email");
        assert_eq!(edit.completion, 8);
    }

    #[test]
    fn at_form_04_mailing_fields_locked_until_toggle() {
        let mut f = form(PortalRole::Client);
        assert!(matches!(
            f.set_field(ClientField::MailingStreet, FieldValue::text("PO Box 1")),
            Err(FormError::NotEditable { .. })
        ));
        f.toggle_mailing_is_same(false).unwrap();
        f.set_field(ClientField::MailingStreet, FieldValue::text("PO Box 1")).unwrap();
        f.toggle_mailing_is_same(true).unwrap();
        f.set_field(ClientField::ResidentialStreet, FieldValue::text("9 Elm St")).unwrap();
        assert_eq!(f.effective_mailing_address().street, "9 Elm St");
        f.toggle_mailing_is_same(false).unwrap();
        assert_eq!(f.effective_mailing_address().street, "PO Box 1");
    }

    #[test]
    fn at_form_05_client_render_masks_sensitive_fields() {
        let mut advisor = form(PortalRole::Advisor);
        advisor.set_field(ClientField::Ssn, FieldValue::text("123-45-6789")).unwrap();
        advisor
            .set_field(ClientField::AccountNumber, FieldValue::text("000123456789"))
            .unwrap();
        assert_eq!(advisor.render(ClientField::Ssn), "123-45-6789");

        let client = ClientFormController::open(
            PortalRole::Client,
            None,
            advisor.record().clone(),
            &PortalConfig::mvp_v1(),
        );
        for f in [ClientField::Ssn, ClientField::AccountNumber] {
            let shown = client.render(f);
            assert!(!shown.is_empty());
            assert!(!shown.chars().any(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn at_form_06_save_and_send_emits_save_then_notify() {
        let mut f = form(PortalRole::Advisor);
        f.set_field(ClientField::AdvisoryFee, FieldValue::Fee(Decimal::new(1, 0)))
            .unwrap();
        let batch = f.save_and_send().unwrap();
        assert_eq!(batch.commands.len(), 2);
        assert_eq!(batch.commands[0].name(), "save_record");
        assert_eq!(batch.commands[1].name(), "notify_client");
        assert_eq!(batch.on_success.title, "Profile Saved & Sent");
        assert_eq!(f.save().unwrap().commands.len(), 1);
    }

    #[test]
    fn at_form_07_unknown_role_cannot_edit_or_save() {
        let mut f = form(PortalRole::Unknown);
        assert!(matches!(
            f.set_field(ClientField::Notes, FieldValue::text("hi")),
            Err(FormError::NotEditable { .. })
        ));
        let err = f.save().unwrap_err();
        assert!(err.notification().is_failure());
    }

    #[test]
    fn at_form_08_sections_are_freely_selectable() {
        let mut f = form(PortalRole::Client);
        assert_eq!(f.active_section(), FieldSection::Profile);
        f.select_section(FieldSection::Notes);
        f.select_section(FieldSection::Banking);
        assert_eq!(f.active_section(), FieldSection::Banking);
    }
}
