use chrono::NaiveDate;

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d").ok())
}

/// `2025-01-01` → `1 Jan 2025`. Unparseable input is shown as given.
pub fn short_date(value: &str) -> String {
    parse_date(value)
        .map(|date| date.format("%-d %b %Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// `2025-01-01` → `Wednesday 1 January 2025`.
pub fn long_date(value: &str) -> String {
    parse_date(value)
        .map(|date| date.format("%A %-d %B %Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
