#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::common::validate_text;
use crate::{ContractViolation, Validate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HouseholdId(pub u64);

impl Validate for HouseholdId {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.0 == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "household_id",
                reason: "must be > 0",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdRecord {
    pub household_id: HouseholdId,
    pub name: String,
    pub members: Vec<String>,
    #[serde(rename = "totalAUM")]
    pub total_aum_usd: u64,
}

impl HouseholdRecord {
    pub fn v1(
        household_id: HouseholdId,
        name: impl Into<String>,
        members: Vec<String>,
        total_aum_usd: u64,
    ) -> Result<Self, ContractViolation> {
        let r = Self {
            household_id,
            name: name.into(),
            members,
            total_aum_usd,
        };
        r.validate()?;
        Ok(r)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl Validate for HouseholdRecord {
    fn validate(&self) -> Result<(), ContractViolation> {
        self.household_id.validate()?;
        validate_text("household_record.name", &self.name, 128)?;
        if self.members.len() > 64 {
            return Err(ContractViolation::InvalidValue {
                field: "household_record.members",
                reason: "must be <= 64",
            });
        }
        for m in &self.members {
            validate_text("household_record.members", m, 128)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_household_01_rejects_blank_member() {
        assert!(HouseholdRecord::v1(HouseholdId(1), "Brown Estate", vec![" ".into()], 0).is_err());
        assert!(HouseholdRecord::v1(HouseholdId(0), "Brown Estate", vec![], 0).is_err());
        let ok = HouseholdRecord::v1(
            HouseholdId(1),
            "Brown Estate",
            vec!["Michael Brown".into(), "Lisa Brown".into()],
            2_100_000,
        )
        .unwrap();
        assert_eq!(ok.member_count(), 2);
    }
}
