#![forbid(unsafe_code)]

//! Advisory format checks for client-record fields.
//!
//! Issues never block an edit. Blank values are not checked here; missing
//! data is the completion engine's concern.

use chrono::{Datelike, NaiveDate};
use portal_kernel_contracts::client::ClientRecord;
use portal_kernel_contracts::client_schema::{ClientField, FieldType, TextFormat};
use portal_kernel_contracts::ReasonCodeId;
use serde::Serialize;

pub mod reason_codes {
    use portal_kernel_contracts::ReasonCodeId;

    pub const FORMAT_EMAIL_INVALID: ReasonCodeId = ReasonCodeId(0x464D_0001);
    pub const FORMAT_PHONE_INVALID: ReasonCodeId = ReasonCodeId(0x464D_0002);
    pub const FORMAT_POSTAL_CODE_INVALID: ReasonCodeId = ReasonCodeId(0x464D_0003);
    pub const FORMAT_TAX_ID_INVALID: ReasonCodeId = ReasonCodeId(0x464D_0004);
    pub const FORMAT_ROUTING_NUMBER_INVALID: ReasonCodeId = ReasonCodeId(0x464D_0005);
    pub const FORMAT_ACCOUNT_NUMBER_INVALID: ReasonCodeId = ReasonCodeId(0x464D_0006);
    pub const FORMAT_DATE_INVALID: ReasonCodeId = ReasonCodeId(0x464D_0007);
    pub const FORMAT_VALUE_NOT_ALLOWED: ReasonCodeId = ReasonCodeId(0x464D_0008);
}

const MIN_BIRTH_YEAR: i32 = 1900;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatIssue {
    pub field: ClientField,
    #[serde(skip)]
    pub reason_code: ReasonCodeId,
    pub message: &'static str,
}

/// Checks one text value against its field's declared shape. `None` when the
/// value is blank, well-formed, or the field carries no shape.
pub fn check_text(field: ClientField, value: &str) -> Option<FormatIssue> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    let (ok, reason_code, message) = match field.spec().field_type {
        FieldType::Text(TextFormat::Free) => return None,
        FieldType::Text(TextFormat::Email) => (
            is_email(v),
            reason_codes::FORMAT_EMAIL_INVALID,
            "not a valid email address",
        ),
        FieldType::Text(TextFormat::Phone) => (
            is_phone(v),
            reason_codes::FORMAT_PHONE_INVALID,
            "phone number must have 10 to 15 digits",
        ),
        FieldType::Text(TextFormat::PostalCode) => (
            is_zip(v),
            reason_codes::FORMAT_POSTAL_CODE_INVALID,
            "ZIP code must be 12345 or 12345-6789",
        ),
        FieldType::Text(TextFormat::TaxIdentifier) => (
            is_tax_identifier(v),
            reason_codes::FORMAT_TAX_ID_INVALID,
            "SSN/ITIN must have 9 digits",
        ),
        FieldType::Text(TextFormat::RoutingNumber) => (
            is_routing_number(v),
            reason_codes::FORMAT_ROUTING_NUMBER_INVALID,
            "routing number must be 9 digits with a valid checksum",
        ),
        FieldType::Text(TextFormat::AccountNumber) => (
            is_account_number(v),
            reason_codes::FORMAT_ACCOUNT_NUMBER_INVALID,
            "account number must have 4 to 17 digits",
        ),
        FieldType::Date => (
            is_birth_date(v),
            reason_codes::FORMAT_DATE_INVALID,
            "date must be YYYY-MM-DD",
        ),
        FieldType::Enum(allowed) | FieldType::CurrencyBand(allowed) => (
            allowed.contains(&v),
            reason_codes::FORMAT_VALUE_NOT_ALLOWED,
            "value is not one of the allowed options",
        ),
        FieldType::Boolean | FieldType::TagList | FieldType::Count | FieldType::FeePercent => {
            return None
        }
    };
    if ok {
        None
    } else {
        Some(FormatIssue {
            field,
            reason_code,
            message,
        })
    }
}

/// All format issues on a record, in field order.
pub fn check_record(record: &ClientRecord) -> Vec<FormatIssue> {
    ClientField::all()
        .filter_map(|f| record.text(f).and_then(|v| check_text(f, v)))
        .collect()
}

fn is_email(v: &str) -> bool {
    if v.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = v.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}

fn digits_only(v: &str, separators: &[char]) -> Option<String> {
    let mut out = String::with_capacity(v.len());
    for c in v.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if !separators.contains(&c) {
            return None;
        }
    }
    Some(out)
}

fn is_phone(v: &str) -> bool {
    digits_only(v, &[' ', '-', '(', ')', '+', '.'])
        .is_some_and(|d| (10..=15).contains(&d.len()))
}

fn is_zip(v: &str) -> bool {
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    match v.split_once('-') {
        Some((a, b)) => a.len() == 5 && b.len() == 4 && all_digits(a) && all_digits(b),
        None => v.len() == 5 && all_digits(v),
    }
}

fn is_tax_identifier(v: &str) -> bool {
    digits_only(v, &['-', ' ']).is_some_and(|d| d.len() == 9)
}

/// ABA routing numbers: nine digits, weights 3-7-1 summing to a multiple of 10.
fn is_routing_number(v: &str) -> bool {
    if v.len() != 9 || !v.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = v
        .bytes()
        .zip([3u32, 7, 1].iter().cycle())
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();
    sum % 10 == 0
}

fn is_account_number(v: &str) -> bool {
    digits_only(v, &[' ', '-']).is_some_and(|d| (4..=17).contains(&d.len()))
}

fn is_birth_date(v: &str) -> bool {
    NaiveDate::parse_from_str(v, "%Y-%m-%d").is_ok_and(|d| d.year() >= MIN_BIRTH_YEAR)
}
