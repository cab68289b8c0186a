//! Decoder for Locust-style `*_stats.csv` exports.
//!
//! The format handled here is deliberately narrower than RFC 4180: a double
//! quote only toggles quoted mode and is never emitted, and there is no
//! escaping. Rows whose field count differs from the header are dropped.

use tracing::debug;

use crate::error::{MetricsError, Result};

/// One decoded data row: column name to raw value, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Sets `column` to `value`. A repeated column keeps its first position
    /// and takes the later value.
    pub fn insert(&mut self, column: &str, value: String) {
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Record {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut record = Record::default();
        for (column, value) in iter {
            record.insert(column, value.to_string());
        }
        record
    }
}

const BOM: char = '\u{FEFF}';

/// Trims whitespace and byte-order marks from both ends.
fn trim_field(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == BOM)
}

/// Splits a single line into trimmed fields.
///
/// A `"` flips quoted mode; commas inside quotes are literal.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(trim_field(&current).to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(trim_field(&current).to_string());

    fields
}

/// Decodes the full text of a stats export into records.
///
/// `source_id` is only used for error reporting.
///
/// # Errors
///
/// Returns [`MetricsError::MalformedInput`] if the text has fewer than two
/// lines after trimming.
pub fn parse_volume_stats(source_id: &str, content: &str) -> Result<Vec<Record>> {
    let content = trim_field(content);
    let lines: Vec<&str> = content.split('\n').collect();

    if lines.len() < 2 {
        return Err(MetricsError::MalformedInput {
            source_id: source_id.to_string(),
            lines: if content.is_empty() { 0 } else { lines.len() },
        });
    }

    let headers = parse_line(lines[0]);
    let mut records = Vec::with_capacity(lines.len() - 1);
    let mut dropped = 0usize;

    for line in &lines[1..] {
        let values = parse_line(line);
        if values.len() != headers.len() {
            dropped += 1;
            continue;
        }

        let mut record = Record::default();
        for (header, value) in headers.iter().zip(values) {
            record.insert(header, value);
        }
        records.push(record);
    }

    debug!(
        source = source_id,
        columns = headers.len(),
        rows = records.len(),
        dropped,
        "Decoded stats table"
    );

    Ok(records)
}
