//! Calendar helpers for monthly forecast horizons

use chrono::{Datelike, NaiveDate};

/// Last day of the given month
pub fn end_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Whether `date` is the last day of its month
pub fn is_month_end(date: NaiveDate) -> bool {
    end_of_month(date.year(), date.month()) == Some(date)
}

/// The next `count` month-end dates strictly after `after`
///
/// A date in the middle of March yields March 31 first; March 31 itself
/// yields April 30 first.
pub fn month_ends_after(after: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let (mut year, mut month) = (after.year(), after.month());
    if is_month_end(after) {
        (year, month) = next_month(year, month);
    }

    let mut dates = Vec::with_capacity(count);
    while dates.len() < count {
        match end_of_month(year, month) {
            Some(date) => dates.push(date),
            None => break,
        }
        (year, month) = next_month(year, month);
    }
    dates
}

/// Days elapsed since 1970-01-01
pub fn days_since_epoch(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days() as f64
}

/// Inverse of [`days_since_epoch`], rounding to the nearest day
pub fn date_from_days(days: f64) -> Option<NaiveDate> {
    if !days.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    epoch.checked_add_signed(chrono::Duration::try_days(days.round() as i64)?)
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_of_month() {
        assert_eq!(end_of_month(2024, 2), Some(date(2024, 2, 29)));
        assert_eq!(end_of_month(2023, 2), Some(date(2023, 2, 28)));
        assert_eq!(end_of_month(2023, 12), Some(date(2023, 12, 31)));
        assert_eq!(end_of_month(2023, 4), Some(date(2023, 4, 30)));
    }

    #[test]
    fn test_month_ends_after_mid_month() {
        let dates = month_ends_after(date(2023, 3, 15), 3);
        assert_eq!(dates, vec![date(2023, 3, 31), date(2023, 4, 30), date(2023, 5, 31)]);
    }

    #[test]
    fn test_month_ends_after_month_end() {
        let dates = month_ends_after(date(2023, 11, 30), 6);
        assert_eq!(
            dates,
            vec![
                date(2023, 12, 31),
                date(2024, 1, 31),
                date(2024, 2, 29),
                date(2024, 3, 31),
                date(2024, 4, 30),
                date(2024, 5, 31),
            ]
        );
        assert!(dates.iter().all(|d| *d > date(2023, 11, 30)));
    }

    #[test]
    fn test_days_since_epoch() {
        assert_eq!(days_since_epoch(date(1970, 1, 1)), 0.0);
        assert_eq!(days_since_epoch(date(1970, 1, 11)), 10.0);
        assert_eq!(days_since_epoch(date(1969, 12, 31)), -1.0);
    }

    #[test]
    fn test_date_from_days() {
        assert_eq!(date_from_days(0.0), Some(date(1970, 1, 1)));
        assert_eq!(date_from_days(days_since_epoch(date(2024, 2, 29)) + 0.4), Some(date(2024, 2, 29)));
        assert_eq!(date_from_days(f64::NAN), None);
    }
}
