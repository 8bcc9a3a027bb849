//! Serde helpers for day keys. Dates travel as "YYYY-MM-DD"; the sheet backend
//! sometimes hands back a full timestamp, in which case the date prefix is used.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Serialize NaiveDate as "YYYY-MM-DD". Used with #[serde(with = "crate::date")].
pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    date.format(DATE_FORMAT).to_string().serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_day(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid day key: {:?}", s)))
}

/// Parse a day key, accepting "YYYY-MM-DD" optionally followed by a time part.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(d);
    }
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
}

pub fn format_day(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_plain() {
        assert_eq!(parse_day("2024-05-01"), NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn parse_day_with_time_suffix() {
        assert_eq!(
            parse_day("2024-05-01T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
    }

    #[test]
    fn parse_day_garbage() {
        assert_eq!(parse_day("yesterday"), None);
        assert_eq!(parse_day(""), None);
        assert_eq!(parse_day("2024-13-01"), None);
    }
}
