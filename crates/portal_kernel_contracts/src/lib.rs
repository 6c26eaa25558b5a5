#![forbid(unsafe_code)]

pub mod client;
pub mod client_schema;
pub mod common;
pub mod document;
pub mod household;
pub mod meeting;
pub mod message;
pub mod notification;
pub mod role;

pub use common::{ContractViolation, MonotonicTimeNs, ReasonCodeId, SchemaVersion, Validate};
