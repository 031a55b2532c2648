//! Async client for the NetLogger XML data service
//! (<http://www.netlogger.org/api/>).
//!
//! Fetches active nets, past nets and checkin rosters, and lifts the XML rows
//! into the typed records of `netlogger-common`.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod parser;

pub use client::{CheckinEndpoint, FetchOutcome, NetLoggerClient, NoDataReason};
pub use config::ClientConfig;
pub use error::NetLoggerError;
pub use netlogger_common::{CheckinRecord, FieldError, Frequency, NetRecord, RawFields};
