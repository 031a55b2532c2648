//! Shared record types for the NetLogger XML data service.
//!
//! Net and checkin rows arrive as open-ended XML leaf maps. Known columns are
//! lifted into typed fields here; everything else rides along in `extra`.

pub mod error;
pub mod normalize;
pub mod types;

pub use error::FieldError;
pub use normalize::{normalize, normalize_frequency, parse_timestamp, TIMESTAMP_FORMAT};
pub use types::{CheckinRecord, Frequency, NetRecord, RawFields};
