//! Day-first date parsing

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

// Two-digit year formats come first: `%Y` would happily read "23" as year 23.
const DAY_FIRST_FORMATS: [&str; 7] = [
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
];

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

/// Parse a day-first date, ignoring any time-of-day suffix
///
/// Accepts `dd/mm/yyyy`, `dd-mm-yyyy`, `dd.mm.yyyy`, their two-digit-year
/// variants and ISO `yyyy-mm-dd`. A trailing time (`15/03/2023 10:30` or
/// `2023-03-15T10:30:00`) is dropped.
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let date_part = raw
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()?;
    if date_part.is_empty() {
        return None;
    }

    DAY_FIRST_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Parse a day-first date together with its optional time of day
///
/// A missing time reads as midnight; a time part that is present but
/// unparsable makes the whole value invalid.
pub fn parse_day_first_datetime(raw: &str) -> Option<NaiveDateTime> {
    let date = parse_day_first(raw)?;
    let time_part = raw
        .trim()
        .splitn(2, |c: char| c.is_whitespace() || c == 'T')
        .nth(1)
        .map(str::trim)
        .unwrap_or_default();
    if time_part.is_empty() {
        return Some(date.and_time(NaiveTime::MIN));
    }

    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time_part, format).ok())
        .map(|time| date.and_time(time))
}
