#![forbid(unsafe_code)]

use portal_kernel_contracts::client::ClientRecord;
use portal_kernel_contracts::client_schema::{ClientField, FieldSection, REQUIRED_FIELDS};
use serde::Serialize;

use crate::field_format;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionConfig {
    /// When set, a required field whose value fails its format check counts
    /// as missing.
    pub gate_on_validity: bool,
}

impl CompletionConfig {
    pub fn mvp_v1() -> Self {
        Self {
            gate_on_validity: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionStatus {
    pub section: FieldSection,
    pub required: u8,
    pub completed: u8,
}

impl SectionStatus {
    /// Sections without required fields are always complete.
    pub fn is_complete(&self) -> bool {
        self.completed == self.required
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionReport {
    pub percent: u8,
    pub completed: Vec<ClientField>,
    pub missing: Vec<ClientField>,
    /// Present but malformed required fields. Only counted as missing when
    /// `gate_on_validity` is set.
    pub invalid: Vec<ClientField>,
    pub sections: Vec<SectionStatus>,
}

/// Presence-only completion percentage over the 12 required fields.
pub fn compute_completion(record: &ClientRecord) -> u8 {
    let completed = REQUIRED_FIELDS
        .iter()
        .filter(|f| record.is_present(**f))
        .count();
    percent_of(completed, REQUIRED_FIELDS.len())
}

/// Round-half-up of `100 * completed / total` in integer arithmetic.
pub fn percent_of(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let completed = completed.min(total);
    ((100 * completed + total / 2) / total) as u8
}

#[derive(Debug, Clone)]
pub struct CompletionEngine {
    config: CompletionConfig,
}

impl CompletionEngine {
    pub fn new(config: CompletionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> CompletionConfig {
        self.config
    }

    pub fn percent(&self, record: &ClientRecord) -> u8 {
        if self.config.gate_on_validity {
            self.report(record).percent
        } else {
            compute_completion(record)
        }
    }

    pub fn report(&self, record: &ClientRecord) -> CompletionReport {
        let mut completed = Vec::new();
        let mut missing = Vec::new();
        let mut invalid = Vec::new();
        for field in REQUIRED_FIELDS {
            if !record.is_present(field) {
                missing.push(field);
                continue;
            }
            let malformed = record
                .text(field)
                .and_then(|v| field_format::check_text(field, v))
                .is_some();
            if malformed {
                invalid.push(field);
                if self.config.gate_on_validity {
                    missing.push(field);
                    continue;
                }
            }
            completed.push(field);
        }

        let sections = FieldSection::ALL
            .into_iter()
            .map(|section| {
                let required = REQUIRED_FIELDS
                    .iter()
                    .filter(|f| f.section() == section)
                    .count() as u8;
                let done = completed.iter().filter(|f| f.section() == section).count() as u8;
                SectionStatus {
                    section,
                    required,
                    completed: done,
                }
            })
            .collect();

        CompletionReport {
            percent: percent_of(completed.len(), REQUIRED_FIELDS.len()),
            completed,
            missing,
            invalid,
            sections,
        }
    }
}
