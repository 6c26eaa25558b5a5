#![forbid(unsafe_code)]

pub mod completion;
pub mod field_format;
pub mod search;
pub mod visibility;
