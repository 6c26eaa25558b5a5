#![forbid(unsafe_code)]

//! Static declaration of every client-record field.
//!
//! Each field carries its stable wire name (the camelCase key the portal
//! screens use), its semantic type, the form section it lives in, and
//! whether it counts toward completion or holds sensitive data.

use serde::{Deserialize, Serialize};

use crate::ContractViolation;

pub const SUFFIX_VALUES: &[&str] = &["Jr", "Sr", "II", "III"];
pub const CITIZENSHIP_VALUES: &[&str] = &["US", "Non-US"];
pub const EMPLOYMENT_STATUS_VALUES: &[&str] =
    &["Employed", "Self-Employed", "Unemployed", "Student", "Retired"];
pub const ANNUAL_INCOME_BANDS: &[&str] =
    &["<50k", "50k-100k", "100k-250k", "250k-500k", "500k+"];
pub const NET_WORTH_BANDS: &[&str] = &["<100k", "100k-500k", "500k-1M", "1M-5M", "5M+"];
pub const LIQUID_NET_WORTH_BANDS: &[&str] = &["<50k", "50k-250k", "250k-500k", "500k-1M", "1M+"];
pub const ACCOUNT_TYPE_VALUES: &[&str] = &["Checking", "Savings"];
pub const ADVISORY_PROGRAM_VALUES: &[&str] = &["Growth", "Conservative", "Income", "Balanced"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldSection {
    Profile,
    Employment,
    Banking,
    Advisory,
    Notes,
}

impl FieldSection {
    pub const ALL: [FieldSection; 5] = [
        FieldSection::Profile,
        FieldSection::Employment,
        FieldSection::Banking,
        FieldSection::Advisory,
        FieldSection::Notes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldSection::Profile => "profile",
            FieldSection::Employment => "employment",
            FieldSection::Banking => "banking",
            FieldSection::Advisory => "advisory",
            FieldSection::Notes => "notes",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Shape hint for free-text fields; drives format checks only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextFormat {
    Free,
    Email,
    Phone,
    PostalCode,
    TaxIdentifier,
    RoutingNumber,
    AccountNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text(TextFormat),
    Enum(&'static [&'static str]),
    Date,
    CurrencyBand(&'static [&'static str]),
    Boolean,
    TagList,
    Count,
    FeePercent,
}

impl FieldType {
    /// Kind of value a field of this type stores.
    pub fn value_kind(self) -> FieldValueKind {
        match self {
            FieldType::Text(_) | FieldType::Enum(_) | FieldType::Date | FieldType::CurrencyBand(_) => {
                FieldValueKind::Text
            }
            FieldType::Boolean => FieldValueKind::Flag,
            FieldType::TagList => FieldValueKind::Tags,
            FieldType::Count => FieldValueKind::Count,
            FieldType::FeePercent => FieldValueKind::Fee,
        }
    }

    pub fn allowed_values(self) -> Option<&'static [&'static str]> {
        match self {
            FieldType::Enum(v) | FieldType::CurrencyBand(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldValueKind {
    Text,
    Flag,
    Tags,
    Count,
    Fee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientField {
    LegalFirst,
    LegalMiddle,
    LegalLast,
    Suffix,
    PreferredName,
    Email,
    Mobile,
    SmsOptIn,
    AltPhone,
    ResidentialStreet,
    ResidentialUnit,
    ResidentialCity,
    ResidentialState,
    ResidentialZip,
    MailingIsSame,
    MailingStreet,
    MailingUnit,
    MailingCity,
    MailingState,
    MailingZip,
    Ssn,
    Dob,
    BirthPlace,
    Citizenship,
    Country,
    TaxId,
    VisaType,
    MaritalStatus,
    Dependents,
    EmploymentStatus,
    Employer,
    Occupation,
    Industry,
    AnnualIncome,
    NetWorth,
    LiquidNetWorth,
    SourceOfFunds,
    BankName,
    RoutingNumber,
    AccountNumber,
    AccountType,
    FundingMethod,
    RecurringContribution,
    AdvisoryProgram,
    AdvisoryFee,
    #[serde(rename = "estimatedAUM")]
    EstimatedAum,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: ClientField,
    pub name: &'static str,
    pub label: &'static str,
    pub field_type: FieldType,
    pub section: FieldSection,
    pub required: bool,
    pub sensitive: bool,
}

const fn spec(
    field: ClientField,
    name: &'static str,
    label: &'static str,
    field_type: FieldType,
    section: FieldSection,
) -> FieldSpec {
    FieldSpec {
        field,
        name,
        label,
        field_type,
        section,
        required: false,
        sensitive: false,
    }
}

const fn required(mut s: FieldSpec) -> FieldSpec {
    s.required = true;
    s
}

const fn sensitive(mut s: FieldSpec) -> FieldSpec {
    s.sensitive = true;
    s
}

use ClientField as F;
use FieldSection as S;
use FieldType as T;
use TextFormat as X;

#[rustfmt::skip]
pub const FIELD_SPECS: [FieldSpec; 47] = [
    required(spec(F::LegalFirst, "legalFirst", "Legal First Name", T::Text(X::Free), S::Profile)),
    spec(F::LegalMiddle, "legalMiddle", "Middle Name", T::Text(X::Free), S::Profile),
    required(spec(F::LegalLast, "legalLast", "Legal Last Name", T::Text(X::Free), S::Profile)),
    spec(F::Suffix, "suffix", "Suffix", T::Enum(SUFFIX_VALUES), S::Profile),
    spec(F::PreferredName, "preferredName", "Preferred Name", T::Text(X::Free), S::Profile),
    required(spec(F::Email, "email", "Email Address", T::Text(X::Email), S::Profile)),
    required(spec(F::Mobile, "mobile", "Mobile Phone", T::Text(X::Phone), S::Profile)),
    spec(F::SmsOptIn, "smsOptIn", "SMS Opt-In", T::Boolean, S::Profile),
    spec(F::AltPhone, "altPhone", "Alternate Phone", T::Text(X::Phone), S::Profile),
    required(spec(F::ResidentialStreet, "residentialStreet", "Street Address", T::Text(X::Free), S::Profile)),
    spec(F::ResidentialUnit, "residentialUnit", "Unit", T::Text(X::Free), S::Profile),
    required(spec(F::ResidentialCity, "residentialCity", "City", T::Text(X::Free), S::Profile)),
    required(spec(F::ResidentialState, "residentialState", "State", T::Text(X::Free), S::Profile)),
    required(spec(F::ResidentialZip, "residentialZip", "ZIP Code", T::Text(X::PostalCode), S::Profile)),
    spec(F::MailingIsSame, "mailingIsSame", "Mailing Same As Residential", T::Boolean, S::Profile),
    spec(F::MailingStreet, "mailingStreet", "Mailing Street", T::Text(X::Free), S::Profile),
    spec(F::MailingUnit, "mailingUnit", "Mailing Unit", T::Text(X::Free), S::Profile),
    spec(F::MailingCity, "mailingCity", "Mailing City", T::Text(X::Free), S::Profile),
    spec(F::MailingState, "mailingState", "Mailing State", T::Text(X::Free), S::Profile),
    spec(F::MailingZip, "mailingZip", "Mailing ZIP Code", T::Text(X::PostalCode), S::Profile),
    required(sensitive(spec(F::Ssn, "ssn", "SSN/ITIN", T::Text(X::TaxIdentifier), S::Profile))),
    required(spec(F::Dob, "dob", "Date of Birth", T::Date, S::Profile)),
    spec(F::BirthPlace, "birthPlace", "Place of Birth", T::Text(X::Free), S::Profile),
    required(spec(F::Citizenship, "citizenship", "Citizenship", T::Enum(CITIZENSHIP_VALUES), S::Profile)),
    spec(F::Country, "country", "Country", T::Text(X::Free), S::Profile),
    spec(F::TaxId, "taxId", "Tax ID", T::Text(X::Free), S::Profile),
    spec(F::VisaType, "visaType", "Visa Type", T::Text(X::Free), S::Profile),
    spec(F::MaritalStatus, "maritalStatus", "Marital Status", T::Text(X::Free), S::Profile),
    spec(F::Dependents, "dependents", "Dependents", T::Count, S::Profile),
    required(spec(F::EmploymentStatus, "employmentStatus", "Employment Status", T::Enum(EMPLOYMENT_STATUS_VALUES), S::Employment)),
    spec(F::Employer, "employer", "Employer", T::Text(X::Free), S::Employment),
    spec(F::Occupation, "occupation", "Occupation", T::Text(X::Free), S::Employment),
    spec(F::Industry, "industry", "Industry", T::Text(X::Free), S::Employment),
    spec(F::AnnualIncome, "annualIncome", "Annual Income", T::CurrencyBand(ANNUAL_INCOME_BANDS), S::Employment),
    spec(F::NetWorth, "netWorth", "Net Worth", T::CurrencyBand(NET_WORTH_BANDS), S::Employment),
    spec(F::LiquidNetWorth, "liquidNetWorth", "Liquid Net Worth", T::CurrencyBand(LIQUID_NET_WORTH_BANDS), S::Employment),
    spec(F::SourceOfFunds, "sourceOfFunds", "Source of Funds", T::TagList, S::Employment),
    spec(F::BankName, "bankName", "Bank Name", T::Text(X::Free), S::Banking),
    spec(F::RoutingNumber, "routingNumber", "Routing Number", T::Text(X::RoutingNumber), S::Banking),
    sensitive(spec(F::AccountNumber, "accountNumber", "Account Number", T::Text(X::AccountNumber), S::Banking)),
    spec(F::AccountType, "accountType", "Account Type", T::Enum(ACCOUNT_TYPE_VALUES), S::Banking),
    spec(F::FundingMethod, "fundingMethod", "Funding Method", T::Text(X::Free), S::Banking),
    spec(F::RecurringContribution, "recurringContribution", "Recurring Contribution", T::Boolean, S::Banking),
    spec(F::AdvisoryProgram, "advisoryProgram", "Advisory Program", T::Enum(ADVISORY_PROGRAM_VALUES), S::Advisory),
    spec(F::AdvisoryFee, "advisoryFee", "Advisory Fee (%)", T::FeePercent, S::Advisory),
    spec(F::EstimatedAum, "estimatedAUM", "Estimated AUM", T::Text(X::Free), S::Advisory),
    spec(F::Notes, "notes", "Internal Notes", T::Text(X::Free), S::Notes),
];

/// Fields scored by the completion engine, in display order.
pub const REQUIRED_FIELDS: [ClientField; 12] = [
    ClientField::LegalFirst,
    ClientField::LegalLast,
    ClientField::Email,
    ClientField::Mobile,
    ClientField::ResidentialStreet,
    ClientField::ResidentialCity,
    ClientField::ResidentialState,
    ClientField::ResidentialZip,
    ClientField::Ssn,
    ClientField::Dob,
    ClientField::Citizenship,
    ClientField::EmploymentStatus,
];

pub const MAILING_FIELDS: [ClientField; 5] = [
    ClientField::MailingStreet,
    ClientField::MailingUnit,
    ClientField::MailingCity,
    ClientField::MailingState,
    ClientField::MailingZip,
];

impl ClientField {
    pub fn all() -> impl Iterator<Item = ClientField> {
        FIELD_SPECS.iter().map(|s| s.field)
    }

    pub fn spec(self) -> &'static FieldSpec {
        // FIELD_SPECS is declared in variant order.
        &FIELD_SPECS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn is_required(self) -> bool {
        self.spec().required
    }

    pub fn is_sensitive(self) -> bool {
        self.spec().sensitive
    }

    pub fn is_mailing(self) -> bool {
        MAILING_FIELDS.contains(&self)
    }

    pub fn section(self) -> FieldSection {
        self.spec().section
    }

    pub fn parse(raw: &str) -> Result<Self, ContractViolation> {
        let raw = raw.trim();
        FIELD_SPECS
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(raw))
            .map(|s| s.field)
            .ok_or(ContractViolation::InvalidValue {
                field: "client_field.name",
                reason: "unknown client field",
            })
    }

    pub fn in_section(section: FieldSection) -> impl Iterator<Item = ClientField> {
        FIELD_SPECS
            .iter()
            .filter(move |s| s.section == section)
            .map(|s| s.field)
    }
}

impl std::fmt::Display for ClientField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
