//! CSV export of the saved days. Every cell is quoted; lines are kept as JSON.

use crate::date::format_day;
use crate::error::Result;
use crate::models::DayRecord;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

pub const CSV_HEADER: [&str; 8] = [
    "Date",
    "Sales(JSON)",
    "Expenses(JSON)",
    "TotalKg",
    "TotalSales",
    "TotalExpenses",
    "Profit",
    "Earnings15",
];

pub fn write_csv<W: Write>(days: &[DayRecord], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for day in days {
        wtr.write_record([
            format_day(day.date),
            serde_json::to_string(&day.sales)?,
            serde_json::to_string(&day.expenses)?,
            day.total_kg.to_string(),
            day.total_sales.to_string(),
            day.total_expenses.to_string(),
            day.profit.to_string(),
            day.earnings15.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(days: &[DayRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(days, &mut buf)?;
    // csv output of String cells is always valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseLine, SaleLine};
    use chrono::NaiveDate;

    #[test]
    fn empty_collection_is_just_the_header() {
        let csv = to_csv_string(&[]).unwrap();
        assert_eq!(
            csv,
            "\"Date\",\"Sales(JSON)\",\"Expenses(JSON)\",\"TotalKg\",\"TotalSales\",\"TotalExpenses\",\"Profit\",\"Earnings15\"\n"
        );
    }

    #[test]
    fn rows_quote_every_cell_and_double_inner_quotes() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut expense = ExpenseLine::new("ice \"big\"", 1000.0);
        expense.id = "e1".into();
        let record = DayRecord::new(
            date,
            vec![SaleLine::with_id("s1".into(), 10.0, 500.0)],
            vec![expense],
        );
        let csv = to_csv_string(&[record]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            concat!(
                r#""2024-05-01","#,
                r#""[{""id"":""s1"",""kg"":10.0,""price"":500.0,""total"":5000.0}]","#,
                r#""[{""id"":""e1"",""category"":""ice \""big\"""",""amount"":1000.0}]","#,
                r#""10","5000","1000","4000","750""#
            )
        );
    }

    #[test]
    fn one_sided_days_export_plain_zeros() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let sales_only = DayRecord::new(date, vec![SaleLine::new(10.0, 500.0)], vec![]);
        let expenses_only = DayRecord::new(date, vec![], vec![ExpenseLine::new("ice", 100.0)]);
        let csv = to_csv_string(&[sales_only, expenses_only]).unwrap();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert!(rows[0].ends_with(r#""10","5000","0","5000","750""#), "{}", rows[0]);
        assert!(rows[1].ends_with(r#""0","0","100","-100","0""#), "{}", rows[1]);
        assert!(!csv.contains("\"-0\""));
    }
}
