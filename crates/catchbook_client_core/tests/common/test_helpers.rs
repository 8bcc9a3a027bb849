//! Shared helpers for integration tests: dates and sample day records.

use catchbook_client_core::{DayRecord, ExpenseLine, SaleLine};
use chrono::NaiveDate;

/// 2024-05-`d`.
pub fn may(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).expect("valid date")
}

/// The worked example: 10 kg at 500, 2.5 kg at 800, ice for 1000.
pub fn sample_day(date: NaiveDate) -> DayRecord {
    DayRecord::new(
        date,
        vec![SaleLine::new(10.0, 500.0), SaleLine::new(2.5, 800.0)],
        vec![ExpenseLine::new("ice", 1000.0)],
    )
}

/// One sale of `kg` at 100 per kg.
pub fn kg_day(date: NaiveDate, kg: f64) -> DayRecord {
    DayRecord::new(date, vec![SaleLine::new(kg, 100.0)], vec![])
}
