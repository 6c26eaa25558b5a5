#![forbid(unsafe_code)]

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client_schema::{ClientField, FieldValueKind};
use crate::common::{string_id, validate_opt_text};
use crate::{ContractViolation, SchemaVersion, Validate};

pub const CLIENT_RECORD_CONTRACT_VERSION: SchemaVersion = SchemaVersion(1);

const MAX_TEXT_FIELD_CHARS: usize = 256;
const MAX_NOTES_CHARS: usize = 4096;
const MAX_TAG_CHARS: usize = 64;
const MAX_TAGS: usize = 16;
const MAX_DEPENDENTS: u32 = 99;

string_id!(ClientId, "client_id", 64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClientPriority {
    A,
    B,
    C,
}

impl ClientPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientPriority::A => "A",
            ClientPriority::B => "B",
            ClientPriority::C => "C",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(ClientPriority::A),
            "B" => Some(ClientPriority::B),
            "C" => Some(ClientPriority::C),
            _ => None,
        }
    }
}

/// One typed value read from or written to a client-record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Tags(BTreeSet<String>),
    Count(u32),
    Fee(Decimal),
}

impl FieldValue {
    pub fn text(v: impl Into<String>) -> Self {
        FieldValue::Text(v.into())
    }

    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Tags(tags.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> FieldValueKind {
        match self {
            FieldValue::Text(_) => FieldValueKind::Text,
            FieldValue::Flag(_) => FieldValueKind::Flag,
            FieldValue::Tags(_) => FieldValueKind::Tags,
            FieldValue::Count(_) => FieldValueKind::Count,
            FieldValue::Fee(_) => FieldValueKind::Fee,
        }
    }

    /// Non-empty after trimming for text, non-empty for tag sets, always for
    /// scalar typed values.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Tags(t) => !t.is_empty(),
            FieldValue::Flag(_) | FieldValue::Count(_) | FieldValue::Fee(_) => true,
        }
    }

    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Flag(b) => b.to_string(),
            FieldValue::Tags(t) => t.iter().cloned().collect::<Vec<_>>().join(", "),
            FieldValue::Count(n) => n.to_string(),
            FieldValue::Fee(d) => d.normalize().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub unit: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Full onboarding data for one prospective or existing client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientRecord {
    // Profile
    pub legal_first: String,
    pub legal_middle: String,
    pub legal_last: String,
    pub suffix: String,
    pub preferred_name: String,
    pub email: String,
    pub mobile: String,
    pub sms_opt_in: bool,
    pub alt_phone: String,
    pub residential_street: String,
    pub residential_unit: String,
    pub residential_city: String,
    pub residential_state: String,
    pub residential_zip: String,
    pub mailing_is_same: bool,
    pub mailing_street: String,
    pub mailing_unit: String,
    pub mailing_city: String,
    pub mailing_state: String,
    pub mailing_zip: String,
    pub ssn: String,
    pub dob: String,
    pub birth_place: String,
    pub citizenship: String,
    pub country: String,
    pub tax_id: String,
    pub visa_type: String,
    pub marital_status: String,
    pub dependents: u32,

    // Employment
    pub employment_status: String,
    pub employer: String,
    pub occupation: String,
    pub industry: String,
    pub annual_income: String,
    pub net_worth: String,
    pub liquid_net_worth: String,
    pub source_of_funds: BTreeSet<String>,

    // Banking
    pub bank_name: String,
    pub routing_number: String,
    pub account_number: String,
    pub account_type: String,
    pub funding_method: String,
    pub recurring_contribution: bool,

    // Advisory
    pub advisory_program: String,
    pub advisory_fee: Decimal,
    #[serde(rename = "estimatedAUM")]
    pub estimated_aum: String,

    // Notes
    pub notes: String,
}

impl Default for ClientRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl ClientRecord {
    /// Blank record as opened by a new-client form.
    pub fn empty() -> Self {
        Self {
            legal_first: String::new(),
            legal_middle: String::new(),
            legal_last: String::new(),
            suffix: String::new(),
            preferred_name: String::new(),
            email: String::new(),
            mobile: String::new(),
            sms_opt_in: false,
            alt_phone: String::new(),
            residential_street: String::new(),
            residential_unit: String::new(),
            residential_city: String::new(),
            residential_state: String::new(),
            residential_zip: String::new(),
            mailing_is_same: true,
            mailing_street: String::new(),
            mailing_unit: String::new(),
            mailing_city: String::new(),
            mailing_state: String::new(),
            mailing_zip: String::new(),
            ssn: String::new(),
            dob: String::new(),
            birth_place: String::new(),
            citizenship: String::new(),
            country: String::new(),
            tax_id: String::new(),
            visa_type: String::new(),
            marital_status: String::new(),
            dependents: 0,
            employment_status: String::new(),
            employer: String::new(),
            occupation: String::new(),
            industry: String::new(),
            annual_income: String::new(),
            net_worth: String::new(),
            liquid_net_worth: String::new(),
            source_of_funds: BTreeSet::new(),
            bank_name: String::new(),
            routing_number: String::new(),
            account_number: String::new(),
            account_type: String::new(),
            funding_method: String::new(),
            recurring_contribution: false,
            advisory_program: String::new(),
            advisory_fee: Decimal::ZERO,
            estimated_aum: String::new(),
            notes: String::new(),
        }
    }

    /// "First Last" from the legal name, collapsed when either part is blank.
    pub fn display_name(&self) -> String {
        [self.legal_first.trim(), self.legal_last.trim()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn residential_address(&self) -> PostalAddress {
        PostalAddress {
            street: self.residential_street.clone(),
            unit: self.residential_unit.clone(),
            city: self.residential_city.clone(),
            state: self.residential_state.clone(),
            zip: self.residential_zip.clone(),
        }
    }

    /// Stored mailing fields, regardless of `mailing_is_same`.
    pub fn stored_mailing_address(&self) -> PostalAddress {
        PostalAddress {
            street: self.mailing_street.clone(),
            unit: self.mailing_unit.clone(),
            city: self.mailing_city.clone(),
            state: self.mailing_state.clone(),
            zip: self.mailing_zip.clone(),
        }
    }

    /// Address mail actually goes to: residential while `mailing_is_same`.
    pub fn effective_mailing_address(&self) -> PostalAddress {
        if self.mailing_is_same {
            self.residential_address()
        } else {
            self.stored_mailing_address()
        }
    }

    fn text_ref(&self, field: ClientField) -> Option<&String> {
        use ClientField as F;
        Some(match field {
            F::LegalFirst => &self.legal_first,
            F::LegalMiddle => &self.legal_middle,
            F::LegalLast => &self.legal_last,
            F::Suffix => &self.suffix,
            F::PreferredName => &self.preferred_name,
            F::Email => &self.email,
            F::Mobile => &self.mobile,
            F::AltPhone => &self.alt_phone,
            F::ResidentialStreet => &self.residential_street,
            F::ResidentialUnit => &self.residential_unit,
            F::ResidentialCity => &self.residential_city,
            F::ResidentialState => &self.residential_state,
            F::ResidentialZip => &self.residential_zip,
            F::MailingStreet => &self.mailing_street,
            F::MailingUnit => &self.mailing_unit,
            F::MailingCity => &self.mailing_city,
            F::MailingState => &self.mailing_state,
            F::MailingZip => &self.mailing_zip,
            F::Ssn => &self.ssn,
            F::Dob => &self.dob,
            F::BirthPlace => &self.birth_place,
            F::Citizenship => &self.citizenship,
            F::Country => &self.country,
            F::TaxId => &self.tax_id,
            F::VisaType => &self.visa_type,
            F::MaritalStatus => &self.marital_status,
            F::EmploymentStatus => &self.employment_status,
            F::Employer => &self.employer,
            F::Occupation => &self.occupation,
            F::Industry => &self.industry,
            F::AnnualIncome => &self.annual_income,
            F::NetWorth => &self.net_worth,
            F::LiquidNetWorth => &self.liquid_net_worth,
            F::BankName => &self.bank_name,
            F::RoutingNumber => &self.routing_number,
            F::AccountNumber => &self.account_number,
            F::AccountType => &self.account_type,
            F::FundingMethod => &self.funding_method,
            F::AdvisoryProgram => &self.advisory_program,
            F::EstimatedAum => &self.estimated_aum,
            F::Notes => &self.notes,
            F::SmsOptIn
            | F::MailingIsSame
            | F::RecurringContribution
            | F::Dependents
            | F::SourceOfFunds
            | F::AdvisoryFee => return None,
        })
    }

    fn text_mut(&mut self, field: ClientField) -> Option<&mut String> {
        use ClientField as F;
        Some(match field {
            F::LegalFirst => &mut self.legal_first,
            F::LegalMiddle => &mut self.legal_middle,
            F::LegalLast => &mut self.legal_last,
            F::Suffix => &mut self.suffix,
            F::PreferredName => &mut self.preferred_name,
            F::Email => &mut self.email,
            F::Mobile => &mut self.mobile,
            F::AltPhone => &mut self.alt_phone,
            F::ResidentialStreet => &mut self.residential_street,
            F::ResidentialUnit => &mut self.residential_unit,
            F::ResidentialCity => &mut self.residential_city,
            F::ResidentialState => &mut self.residential_state,
            F::ResidentialZip => &mut self.residential_zip,
            F::MailingStreet => &mut self.mailing_street,
            F::MailingUnit => &mut self.mailing_unit,
            F::MailingCity => &mut self.mailing_city,
            F::MailingState => &mut self.mailing_state,
            F::MailingZip => &mut self.mailing_zip,
            F::Ssn => &mut self.ssn,
            F::Dob => &mut self.dob,
            F::BirthPlace => &mut self.birth_place,
            F::Citizenship => &mut self.citizenship,
            F::Country => &mut self.country,
            F::TaxId => &mut self.tax_id,
            F::VisaType => &mut self.visa_type,
            F::MaritalStatus => &mut self.marital_status,
            F::EmploymentStatus => &mut self.employment_status,
            F::Employer => &mut self.employer,
            F::Occupation => &mut self.occupation,
            F::Industry => &mut self.industry,
            F::AnnualIncome => &mut self.annual_income,
            F::NetWorth => &mut self.net_worth,
            F::LiquidNetWorth => &mut self.liquid_net_worth,
            F::BankName => &mut self.bank_name,
            F::RoutingNumber => &mut self.routing_number,
            F::AccountNumber => &mut self.account_number,
            F::AccountType => &mut self.account_type,
            F::FundingMethod => &mut self.funding_method,
            F::AdvisoryProgram => &mut self.advisory_program,
            F::EstimatedAum => &mut self.estimated_aum,
            F::Notes => &mut self.notes,
            F::SmsOptIn
            | F::MailingIsSame
            | F::RecurringContribution
            | F::Dependents
            | F::SourceOfFunds
            | F::AdvisoryFee => return None,
        })
    }

    fn flag_mut(&mut self, field: ClientField) -> Option<&mut bool> {
        match field {
            ClientField::SmsOptIn => Some(&mut self.sms_opt_in),
            ClientField::MailingIsSame => Some(&mut self.mailing_is_same),
            ClientField::RecurringContribution => Some(&mut self.recurring_contribution),
            _ => None,
        }
    }

    /// Text content of a text-kind field; `None` for typed fields.
    pub fn text(&self, field: ClientField) -> Option<&str> {
        self.text_ref(field).map(String::as_str)
    }

    pub fn get(&self, field: ClientField) -> FieldValue {
        if let Some(s) = self.text_ref(field) {
            return FieldValue::Text(s.clone());
        }
        match field {
            ClientField::SmsOptIn => FieldValue::Flag(self.sms_opt_in),
            ClientField::MailingIsSame => FieldValue::Flag(self.mailing_is_same),
            ClientField::RecurringContribution => FieldValue::Flag(self.recurring_contribution),
            ClientField::Dependents => FieldValue::Count(self.dependents),
            ClientField::SourceOfFunds => FieldValue::Tags(self.source_of_funds.clone()),
            ClientField::AdvisoryFee => FieldValue::Fee(self.advisory_fee),
            // Every remaining field is text-kind and handled above.
            _ => FieldValue::Text(String::new()),
        }
    }

    pub fn is_present(&self, field: ClientField) -> bool {
        match self.text_ref(field) {
            Some(s) => !s.trim().is_empty(),
            None => self.get(field).is_present(),
        }
    }

    /// Writes one field. The value kind must match the field type; content
    /// is otherwise accepted as-is.
    pub fn set(&mut self, field: ClientField, value: FieldValue) -> Result<(), ContractViolation> {
        let expected = field.spec().field_type.value_kind();
        if value.kind() != expected {
            return Err(ContractViolation::InvalidValue {
                field: "client_record.set",
                reason: "value kind does not match field type",
            });
        }
        match value {
            FieldValue::Text(s) => {
                let limit = if field == ClientField::Notes {
                    MAX_NOTES_CHARS
                } else {
                    MAX_TEXT_FIELD_CHARS
                };
                validate_opt_text("client_record.text_field", &s, limit)?;
                if let Some(slot) = self.text_mut(field) {
                    *slot = s;
                }
            }
            FieldValue::Flag(b) => {
                if let Some(slot) = self.flag_mut(field) {
                    *slot = b;
                }
            }
            FieldValue::Tags(tags) => {
                let normalized = normalize_tags(tags)?;
                self.source_of_funds = normalized;
            }
            FieldValue::Count(n) => {
                if n > MAX_DEPENDENTS {
                    return Err(ContractViolation::InvalidValue {
                        field: "client_record.dependents",
                        reason: "must be <= 99",
                    });
                }
                self.dependents = n;
            }
            FieldValue::Fee(fee) => {
                validate_fee(fee)?;
                self.advisory_fee = fee;
            }
        }
        Ok(())
    }
}

fn normalize_tags(tags: BTreeSet<String>) -> Result<BTreeSet<String>, ContractViolation> {
    let out: BTreeSet<String> = tags
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if out.len() > MAX_TAGS {
        return Err(ContractViolation::InvalidValue {
            field: "client_record.source_of_funds",
            reason: "must contain <= 16 tags",
        });
    }
    if out.iter().any(|t| t.chars().count() > MAX_TAG_CHARS) {
        return Err(ContractViolation::InvalidValue {
            field: "client_record.source_of_funds",
            reason: "tag must be <= 64 chars",
        });
    }
    Ok(out)
}

fn validate_fee(fee: Decimal) -> Result<(), ContractViolation> {
    if fee.is_sign_negative() && !fee.is_zero() {
        return Err(ContractViolation::InvalidValue {
            field: "client_record.advisory_fee",
            reason: "must be >= 0",
        });
    }
    if fee > Decimal::ONE_HUNDRED {
        return Err(ContractViolation::InvalidValue {
            field: "client_record.advisory_fee",
            reason: "must be <= 100",
        });
    }
    Ok(())
}

impl Validate for ClientRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        for field in ClientField::all() {
            if let Some(s) = self.text_ref(field) {
                let limit = if field == ClientField::Notes {
                    MAX_NOTES_CHARS
                } else {
                    MAX_TEXT_FIELD_CHARS
                };
                validate_opt_text("client_record.text_field", s, limit)?;
            }
        }
        if self.dependents > MAX_DEPENDENTS {
            return Err(ContractViolation::InvalidValue {
                field: "client_record.dependents",
                reason: "must be <= 99",
            });
        }
        validate_fee(self.advisory_fee)?;
        if self.source_of_funds.len() > MAX_TAGS {
            return Err(ContractViolation::InvalidValue {
                field: "client_record.source_of_funds",
                reason: "must contain <= 16 tags",
            });
        }
        if self
            .source_of_funds
            .iter()
            .any(|t| t.trim().is_empty() || t.chars().count() > MAX_TAG_CHARS)
        {
            return Err(ContractViolation::InvalidValue {
                field: "client_record.source_of_funds",
                reason: "tags must be non-empty and <= 64 chars",
            });
        }
        Ok(())
    }
}
