//! Field cleanup for net rows
//!
//! The NetLogger service returns every column as text. `Frequency` is free
//! text typed by net control; `Date`, `LastActivity` and `ClosedAt` use a
//! fixed `YYYY-MM-DD HH:MM:SS` layout with no offset.

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::FieldError;
use crate::types::{Frequency, NetRecord, RawFields};

/// Wire format of every NetLogger timestamp column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static LETTERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]").unwrap());

/// Best-effort MHz value of a frequency column.
///
/// Letters ("MHz", "LSB", "FM") are dropped before parsing. When the rest is
/// still not a float, the stripped text is kept as [`Frequency::Raw`].
pub fn normalize_frequency(raw: &str) -> Frequency {
    let digits = LETTERS.replace_all(raw, "");
    let digits = digits.trim();

    match digits.parse::<f64>() {
        Ok(mhz) if mhz.is_finite() => Frequency::Mhz(mhz),
        _ => Frequency::Raw(digits.to_string()),
    }
}

/// Parse a `YYYY-MM-DD HH:MM:SS` column
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, FieldError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| FieldError::Timestamp {
        field,
        value: value.to_string(),
        source,
    })
}

fn take_timestamp(
    fields: &mut RawFields,
    field: &'static str,
) -> Result<Option<NaiveDateTime>, FieldError> {
    fields
        .remove(field)
        .map(|value| parse_timestamp(field, &value))
        .transpose()
}

/// Lift the raw leaf map of one `Net` element into a [`NetRecord`].
///
/// The map must carry `Server`. Absent columns stay absent; a timestamp
/// column that does not match [`TIMESTAMP_FORMAT`] fails the whole record.
pub fn normalize(mut fields: RawFields) -> Result<NetRecord, FieldError> {
    let server = fields.remove("Server").ok_or(FieldError::MissingServer)?;

    let frequency = fields.remove("Frequency").map(|raw| normalize_frequency(&raw));
    let date = take_timestamp(&mut fields, "Date")?;
    let last_activity = take_timestamp(&mut fields, "LastActivity")?;
    let closed_at = take_timestamp(&mut fields, "ClosedAt")?;

    Ok(NetRecord {
        server,
        net_name: fields.remove("NetName"),
        net_id: fields.remove("NetID"),
        frequency,
        date,
        last_activity,
        closed_at,
        extra: fields,
    })
}
