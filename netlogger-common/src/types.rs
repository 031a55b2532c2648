//! NetLogger record types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Leaf tag → text content, exactly as extracted from the XML payload
pub type RawFields = BTreeMap<String, String>;

/// Frequency column of a net row.
///
/// The server accepts free text here ("3.985MHz", "146.520 FM", "Simplex"),
/// so only values that survive letter stripping as a float become `Mhz`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Frequency {
    Mhz(f64),
    /// Letter-stripped text that still was not a number
    Raw(String),
}

impl Frequency {
    pub fn as_mhz(&self) -> Option<f64> {
        match self {
            Frequency::Mhz(mhz) => Some(*mhz),
            Frequency::Raw(_) => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Mhz(mhz) => write!(f, "{} MHz", mhz),
            Frequency::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

/// One active or past net session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetRecord {
    /// Logging server hosting the net, e.g. "NETLOGGER"
    pub server: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_name: Option<String>,

    #[serde(rename = "NetID", default, skip_serializing_if = "Option::is_none")]
    pub net_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,

    /// When the net was opened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,

    /// Past nets only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<NaiveDateTime>,

    /// Past nets only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<NaiveDateTime>,

    /// Every other column the server sent (Logger, Mode, Band, SubscriberCount, ...)
    #[serde(flatten)]
    pub extra: RawFields,
}

impl NetRecord {
    /// Look up a column that has no typed field
    pub fn extra_field(&self, tag: &str) -> Option<&str> {
        self.extra.get(tag).map(String::as_str)
    }

    /// Whether the net has been closed (only past nets carry `ClosedAt`)
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

/// One station's checkin to a net.
///
/// Columns are kept verbatim; nothing is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckinRecord {
    pub fields: RawFields,
}

impl CheckinRecord {
    pub fn new(fields: RawFields) -> Self {
        Self { fields }
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields.get(tag).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn serial_no(&self) -> Option<&str> {
        self.get("SerialNo")
    }

    pub fn callsign(&self) -> Option<&str> {
        self.get("Callsign")
    }

    pub fn first_name(&self) -> Option<&str> {
        self.get("FirstName")
    }

    pub fn city_country(&self) -> Option<&str> {
        self.get("CityCountry")
    }

    pub fn state(&self) -> Option<&str> {
        self.get("State")
    }

    pub fn status(&self) -> Option<&str> {
        self.get("Status")
    }

    pub fn remarks(&self) -> Option<&str> {
        self.get("Remarks")
    }

    pub fn grid(&self) -> Option<&str> {
        self.get("Grid")
    }
}
