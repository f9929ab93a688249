use chrono::{DateTime, Duration, NaiveDate, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Start (inclusive) of the UTC day `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
}

/// The `days` calendar days ending with `today`, oldest first.
pub fn trailing_days(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days as i64)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect()
}

pub fn month_day_label(date: NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_days_end_today_oldest_first() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let days = trailing_days(today, 7);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
        assert_eq!(days[6], today);
        assert_eq!(month_day_label(days[0]), "02-24");
    }

    #[test]
    fn start_of_day_is_midnight_utc() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(start_of_day(day).to_rfc3339(), "2025-01-05T00:00:00+00:00");
    }
}
