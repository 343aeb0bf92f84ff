use chrono::DateTime;

/// Format an ISO-8601 date for display: "Feb 06, 2026"
pub fn format_date(date: Option<&str>) -> String {
    match date {
        Some(date) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
                dt.format("%b %d, %Y").to_string()
            } else {
                // Fall back to the YYYY-MM-DD prefix
                date.chars().take(10).collect()
            }
        }
        None => "TBD".to_string(),
    }
}

/// Format an ISO-8601 timestamp for display: "Feb 06, 2026 @ 07:00 PM"
pub fn format_datetime(date: Option<&str>) -> String {
    match date {
        Some(date) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
                dt.format("%b %d, %Y @ %I:%M %p").to_string()
            } else {
                date.chars().take(16).collect()
            }
        }
        None => "TBD".to_string(),
    }
}

/// The value if present and non-blank, otherwise `placeholder`.
pub fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => placeholder,
    }
}
