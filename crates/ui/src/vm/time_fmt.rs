use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[must_use]
pub fn format_optional_datetime(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "--".to_string(), format_datetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_minutes_in_utc() {
        let value = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 59).unwrap();
        assert_eq!(format_datetime(value), "2024-03-09 14:05 UTC");
        assert_eq!(format_optional_datetime(None), "--");
    }
}
