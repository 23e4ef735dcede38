use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::RoverManifest;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// True for `YYYY-MM-DD` shaped strings. Does not check the calendar.
pub fn is_iso_date(s: &str) -> bool {
    ISO_DATE.is_match(s)
}

/// Check a requested earth date against today and the rover's photo range.
/// Checked in order: future, before landing, after the last photo day.
/// Returns the message to send back to the client on failure.
pub fn validate_earth_date(
    date: &str,
    manifest: &RoverManifest,
    today: NaiveDate,
) -> Result<(), String> {
    let requested = parse_day(date)
        .ok_or_else(|| format!("Invalid date {date}. Please use YYYY-MM-DD format."))?;

    if requested > today {
        return Err(format!(
            "Cannot fetch photos for future dates. The requested date {date} is in the future."
        ));
    }

    if parse_day(&manifest.landing_date).is_some_and(|landing| requested < landing) {
        return Err(format!(
            "No photos available before {}. The {} rover landed on {}.",
            manifest.landing_date, manifest.name, manifest.landing_date
        ));
    }

    if parse_day(&manifest.max_date).is_some_and(|max| requested > max) {
        return Err(format!(
            "No photos available after {}. The last photo from {} was taken on {}.",
            manifest.max_date, manifest.name, manifest.max_date
        ));
    }

    Ok(())
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> RoverManifest {
        RoverManifest {
            name: "Curiosity".to_string(),
            landing_date: "2012-08-06".to_string(),
            max_date: "2023-12-31".to_string(),
            total_photos: 1000,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn future_date_is_rejected() {
        let err = validate_earth_date("2999-01-01", &manifest(), today()).unwrap_err();
        assert!(err.contains("future"), "{err}");
    }

    #[test]
    fn date_before_landing_is_rejected() {
        let err = validate_earth_date("2010-01-01", &manifest(), today()).unwrap_err();
        assert!(err.contains("before"), "{err}");
        assert!(err.contains("Curiosity rover landed on 2012-08-06"), "{err}");
    }

    #[test]
    fn date_after_last_photo_is_rejected() {
        let err = validate_earth_date("2024-01-01", &manifest(), today()).unwrap_err();
        assert!(err.contains("after"), "{err}");
    }

    #[test]
    fn date_in_range_is_valid() {
        assert!(validate_earth_date("2015-05-01", &manifest(), today()).is_ok());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        assert!(validate_earth_date("2012-08-06", &manifest(), today()).is_ok());
        assert!(validate_earth_date("2023-12-31", &manifest(), today()).is_ok());
    }

    #[test]
    fn today_is_not_future() {
        let mut m = manifest();
        m.max_date = "2026-10-16".to_string();
        assert!(validate_earth_date("2026-10-16", &m, today()).is_ok());
    }

    #[test]
    fn impossible_calendar_date_is_rejected() {
        assert!(is_iso_date("2021-02-30"));
        assert!(validate_earth_date("2021-02-30", &manifest(), today()).is_err());
    }

    #[test]
    fn iso_shape() {
        assert!(is_iso_date("2023-12-25"));
        assert!(!is_iso_date("2023-12-5"));
        assert!(!is_iso_date("12/25/2023"));
        assert!(!is_iso_date("2023-12-25T00:00:00Z"));
    }
}
