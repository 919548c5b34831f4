//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Keeps only the date portion of a backend ISO-8601 timestamp.
///
/// The backend serializes naive UTC timestamps (`2025-10-10T12:34:56.789`);
/// list views only show the date.
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn date_only(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(split_date(&value.to_string()))
}

fn split_date(value: &str) -> String {
    value
        .split_once('T')
        .map_or_else(|| value.to_string(), |(date, _)| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_date_splits_timestamp() {
        assert_eq!(split_date("2025-10-10T12:34:56.789"), "2025-10-10");
    }

    #[test]
    fn test_split_date_passes_through_plain_dates() {
        assert_eq!(split_date("2025-10-10"), "2025-10-10");
    }
}
