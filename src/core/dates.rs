//! Flexible date parsing for the upstream export's mixed encodings.
//!
//! Three encodings occur in the wild: ISO (`2024-03-15`), day-first
//! (`15/03/2024`), and a datetime form (`2024/03/15 10:30:00`). Anything
//! else cannot be bucketed; dated outputs skip such records while
//! date-agnostic summaries still count them.

use chrono::NaiveDate;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Parse a raw date string from any of the supported encodings.
///
/// A datetime suffix (space- or `T`-separated) is ignored. Returns `None`
/// for anything unparseable, with a debug-level diagnostic; callers decide
/// whether to skip the record or bucket it under the unknown key.
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let date_part = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .split('T')
        .next()
        .unwrap_or(trimmed);

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date);
        }
    }

    log::debug!("skipping unparseable date {raw:?}");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_flexible_date("2024-03-15"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn parses_day_first_dates() {
        assert_eq!(parse_flexible_date("15/03/2024"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn parses_datetime_form_by_dropping_the_time() {
        assert_eq!(
            parse_flexible_date("2024/03/15 10:30:00"),
            Some(date(2024, 3, 15))
        );
        assert_eq!(
            parse_flexible_date("2024-03-15T10:30:00"),
            Some(date(2024, 3, 15))
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_flexible_date("  2024-03-15 "), Some(date(2024, 3, 15)));
    }

    #[test]
    fn rejects_garbage_and_empty_input() {
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("   "), None);
        assert_eq!(parse_flexible_date("not a date"), None);
        assert_eq!(parse_flexible_date("31/02/2024"), None);
        assert_eq!(parse_flexible_date("2024-13-01"), None);
    }

    #[test]
    fn year_position_disambiguates_slash_formats() {
        // Day-first when the year is last, year-first otherwise.
        assert_eq!(parse_flexible_date("03/04/2024"), Some(date(2024, 4, 3)));
        assert_eq!(parse_flexible_date("2024/04/03"), Some(date(2024, 4, 3)));
    }
}
