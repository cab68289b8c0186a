//! Fixed-schema view over a decoded stats row.

use serde::Serialize;

use crate::parser::Record;

pub const TYPE_COLUMN: &str = "Type";
pub const NAME_COLUMN: &str = "Name";
pub const REQUEST_COUNT_COLUMN: &str = "Request Count";
pub const MEDIAN_COLUMN: &str = "Median Response Time";
pub const P50_COLUMN: &str = "50%";
pub const P95_COLUMN: &str = "95%";

/// Columns a stats export must carry. The median may come from either
/// [`MEDIAN_COLUMN`] or [`P50_COLUMN`].
const REQUIRED_COLUMNS: &[&str] = &[TYPE_COLUMN, NAME_COLUMN, REQUEST_COUNT_COLUMN, P95_COLUMN];

/// Latency and volume figures for one tested operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationStats {
    pub method: String,
    pub name: String,
    pub request_count: u64,
    pub median_ms: u64,
    pub p95_ms: u64,
}

impl OperationStats {
    /// Builds the typed view of `record`. Missing text columns become empty
    /// strings and numeric columns go through [`coerce_or_zero`].
    pub fn from_record(record: &Record) -> Self {
        let median_ms = match coerce_or_zero(record.get(MEDIAN_COLUMN)) {
            0 => coerce_or_zero(record.get(P50_COLUMN)),
            median => median,
        };

        OperationStats {
            method: record.get(TYPE_COLUMN).unwrap_or_default().to_string(),
            name: record.get(NAME_COLUMN).unwrap_or_default().to_string(),
            request_count: coerce_or_zero(record.get(REQUEST_COUNT_COLUMN)),
            median_ms,
            p95_ms: coerce_or_zero(record.get(P95_COLUMN)),
        }
    }
}

/// Parses the leading integer of `raw`: optional whitespace, an optional
/// sign, then at least one ASCII digit. Anything after the digits is ignored.
///
/// Returns `None` when there are no leading digits, the value is negative,
/// or it does not fit in a `u64`.
pub fn parse_leading_int(raw: &str) -> Option<u64> {
    let s = raw.trim_start();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return None;
    }

    let value: u64 = digits.parse().ok()?;
    if negative && value != 0 {
        return None;
    }
    Some(value)
}

/// Numeric coercion used for every metric column: absent or unparseable
/// values count as zero.
pub fn coerce_or_zero(raw: Option<&str>) -> u64 {
    raw.and_then(parse_leading_int).unwrap_or(0)
}

/// Lists the expected columns that `record` does not carry.
pub fn missing_columns(record: &Record) -> Vec<&'static str> {
    let mut missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| record.get(column).is_none())
        .collect();

    if record.get(MEDIAN_COLUMN).is_none() && record.get(P50_COLUMN).is_none() {
        missing.push(MEDIAN_COLUMN);
    }

    missing
}
