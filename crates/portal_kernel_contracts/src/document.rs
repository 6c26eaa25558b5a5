#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::client::ClientId;
use crate::common::{validate_id, validate_text};
use crate::{ContractViolation, Validate};

pub const MAX_DOCUMENT_BYTES: u64 = 25 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl Validate for DocumentId {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "document_id",
                reason: "must be > 0",
            });
        }
        Ok(())
    }
}

/// Opaque handle returned by document storage for a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentRef(String);

impl DocumentRef {
    pub fn new(r: impl Into<String>) -> Result<Self, ContractViolation> {
        let v = Self(r.into());
        v.validate()?;
        Ok(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Validate for DocumentRef {
    fn validate(&self) -> Result<(), ContractViolation> {
        validate_id("document_ref", &self.0, 128)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub document_id: DocumentId,
    pub name: String,
    pub doc_type: String,
    pub size_bytes: u64,
    pub uploaded_by: String,
    pub upload_date: String,
    pub client_id: Option<ClientId>,
    pub client_name: Option<String>,
    pub storage_ref: Option<DocumentRef>,
}

impl DocumentRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn v1(
        document_id: DocumentId,
        name: impl Into<String>,
        doc_type: impl Into<String>,
        size_bytes: u64,
        uploaded_by: impl Into<String>,
        upload_date: impl Into<String>,
        client_id: Option<ClientId>,
        client_name: Option<String>,
    ) -> Result<Self, ContractViolation> {
        let r = Self {
            document_id,
            name: name.into(),
            doc_type: doc_type.into(),
            size_bytes,
            uploaded_by: uploaded_by.into(),
            upload_date: upload_date.into(),
            client_id,
            client_name,
            storage_ref: None,
        };
        r.validate()?;
        Ok(r)
    }

    /// "2.3 MB" style size label.
    pub fn size_label(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = 1024 * 1024;
        if self.size_bytes >= MB {
            format!("{:.1} MB", self.size_bytes as f64 / MB as f64)
        } else if self.size_bytes >= KB {
            format!("{:.1} KB", self.size_bytes as f64 / KB as f64)
        } else {
            format!("{} B", self.size_bytes)
        }
    }
}

impl Validate for DocumentRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.document_id.validate()?;
        validate_text("document_record.name", &self.name, 255)?;
        validate_text("document_record.doc_type", &self.doc_type, 64)?;
        validate_text("document_record.uploaded_by", &self.uploaded_by, 128)?;
        validate_id("document_record.upload_date", &self.upload_date, 32)?;
        if self.size_bytes > MAX_DOCUMENT_BYTES {
            return Err(ContractViolation::InvalidValue {
                field: "document_record.size_bytes",
                reason: "must be <= 25 MiB",
            });
        }
        if let Some(id) = &self.client_id {
            id.validate()?;
        }
        if let Some(name) = &self.client_name {
            validate_text("document_record.client_name", name, 128)?;
        }
        if let Some(r) = &self.storage_ref {
            r.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_document_01_size_label() {
        let mut d = DocumentRecord::v1(
            DocumentId(1),
            "W9_Form.pdf",
            "Tax Form",
            1_153_434,
            "Sarah Johnson",
            "2024-01-14",
            None,
            None,
        )
        .unwrap();
        assert_eq!(d.size_label(), "1.1 MB");
        d.size_bytes = 2048;
        assert_eq!(d.size_label(), "2.0 KB");
    }

    #[test]
    fn at_document_02_oversize_rejected() {
        assert!(DocumentRecord::v1(
            DocumentId(1),
            "big.pdf",
            "Financial",
            MAX_DOCUMENT_BYTES + 1,
            "You",
            "2024-01-14",
            None,
            None,
        )
        .is_err());
    }
}
