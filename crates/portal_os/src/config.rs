#![forbid(unsafe_code)]

use std::env;

use portal_engines::completion::CompletionConfig;
use portal_engines::visibility::VisibilityConfig;
use portal_kernel_contracts::{ContractViolation, Validate};

pub const ENV_COMPLETION_GATES_ON_VALIDITY: &str = "PORTAL_COMPLETION_GATES_ON_VALIDITY";
pub const ENV_SEARCH_MAX_RESULTS: &str = "PORTAL_SEARCH_MAX_RESULTS";
pub const ENV_NEEDS_ATTENTION_BELOW: &str = "PORTAL_NEEDS_ATTENTION_BELOW";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortalConfig {
    pub completion: CompletionConfig,
    pub visibility: VisibilityConfig,
    /// Upper bound on rows a list view returns for one query.
    pub search_max_results: usize,
    /// Clients whose completion is strictly below this need attention.
    pub needs_attention_below: u8,
}

impl PortalConfig {
    pub fn mvp_v1() -> Self {
        Self {
            completion: CompletionConfig::mvp_v1(),
            visibility: VisibilityConfig::mvp_v1(),
            search_max_results: 500,
            needs_attention_below: 80,
        }
    }

    pub fn from_env() -> Result<Self, ContractViolation> {
        Self::from_env_map(|k| env::var(k).ok())
    }

    /// `mvp_v1()` with overrides read through `lookup`. Unset or blank keys
    /// keep their defaults; malformed values are rejected.
    pub fn from_env_map<F>(lookup: F) -> Result<Self, ContractViolation>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::mvp_v1();
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(raw) = read(ENV_COMPLETION_GATES_ON_VALIDITY) {
            config.completion.gate_on_validity = parse_flag(&raw).ok_or(
                ContractViolation::InvalidValue {
                    field: "portal_config.completion_gates_on_validity",
                    reason: "must be one of true, false, 1, 0",
                },
            )?;
        }
        if let Some(raw) = read(ENV_SEARCH_MAX_RESULTS) {
            config.search_max_results =
                raw.parse::<usize>()
                    .map_err(|_| ContractViolation::InvalidValue {
                        field: "portal_config.search_max_results",
                        reason: "must be a positive integer",
                    })?;
        }
        if let Some(raw) = read(ENV_NEEDS_ATTENTION_BELOW) {
            config.needs_attention_below =
                raw.parse::<u8>()
                    .map_err(|_| ContractViolation::InvalidValue {
                        field: "portal_config.needs_attention_below",
                        reason: "must be an integer percentage",
                    })?;
        }
        config.validate()?;
        Ok(config)
    }
}

impl Validate for PortalConfig {
    fn validate(&self) -> Result<(), ContractViolation> {
        if self.search_max_results == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "portal_config.search_max_results",
                reason: "must be > 0",
            });
        }
        if self.needs_attention_below > 100 {
            return Err(ContractViolation::InvalidRange {
                field: "portal_config.needs_attention_below",
                min: 0.0,
                max: 100.0,
                got: f64::from(self.needs_attention_below),
            });
        }
        if self.visibility.mask_width == 0 {
            return Err(ContractViolation::InvalidValue {
                field: "portal_config.visibility.mask_width",
                reason: "must be > 0",
            });
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
