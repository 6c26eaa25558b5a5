#![forbid(unsafe_code)]

pub mod demo_seed;
pub mod portal_store;
pub mod repo;
