use serde::Serialize;
use std::fmt;

/// Sentinel name Locust uses for its totals row.
pub const AGGREGATED_ROW_NAME: &str = "Aggregated";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Read,
    Write,
    Excluded,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Read => "read",
            Category::Write => "write",
            Category::Excluded => "excluded",
        })
    }
}

/// Assigns an operation to a category from its HTTP method and name.
///
/// Name rules are checked first: empty names, the totals row, and any name
/// containing `token` are excluded regardless of method. The method match
/// is case-insensitive.
pub fn categorize(method: &str, name: &str) -> Category {
    if name.is_empty() || name == AGGREGATED_ROW_NAME || name.contains("token") {
        return Category::Excluded;
    }

    match method.to_ascii_uppercase().as_str() {
        "GET" => Category::Read,
        "POST" | "PUT" | "DELETE" => Category::Write,
        _ => Category::Excluded,
    }
}
