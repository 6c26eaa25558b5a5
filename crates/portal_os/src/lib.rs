#![forbid(unsafe_code)]

pub mod client_form;
pub mod client_list;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod dispatcher;
pub mod documents;
pub mod household_detail;
pub mod households;
pub mod meetings;
pub mod messages;
pub mod notices;
pub mod ports;
pub mod session;
