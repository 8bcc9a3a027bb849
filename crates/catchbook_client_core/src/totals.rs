//! Derived figures for a day and for a whole period. Pure functions over the
//! line lists; callers recompute after every change instead of patching totals.

use crate::amount::finite_or_zero;
use crate::models::{DayRecord, ExpenseLine, SaleLine};
use serde::{Deserialize, Serialize};

/// Share of revenue paid out as earnings, regardless of expenses.
pub const EARNINGS_RATE: f64 = 0.15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_kg: f64,
    pub total_sales: f64,
    pub total_expenses: f64,
    pub profit: f64,
    pub earnings15: f64,
}

impl Totals {
    fn from_sums(total_kg: f64, total_sales: f64, total_expenses: f64) -> Self {
        Self {
            total_kg: finite_or_zero(total_kg),
            total_sales: finite_or_zero(total_sales),
            total_expenses: finite_or_zero(total_expenses),
            profit: finite_or_zero(total_sales - total_expenses),
            earnings15: finite_or_zero(total_sales * EARNINGS_RATE),
        }
    }
}

pub fn aggregate(sales: &[SaleLine], expenses: &[ExpenseLine]) -> Totals {
    let total_kg = sum(sales.iter().map(|s| s.kg()));
    let total_sales = sum(sales.iter().map(|s| finite_or_zero(s.kg() * s.price())));
    let total_expenses = sum(expenses.iter().map(|e| e.amount));
    Totals::from_sums(total_kg, total_sales, total_expenses)
}

/// Period figures over already saved days. Weight, revenue and expenses are
/// summed from the stored day totals; profit and earnings are derived from
/// those sums.
pub fn period_totals(days: &[DayRecord]) -> Totals {
    let total_kg = sum(days.iter().map(|d| d.total_kg));
    let total_sales = sum(days.iter().map(|d| d.total_sales));
    let total_expenses = sum(days.iter().map(|d| d.total_expenses));
    Totals::from_sums(total_kg, total_sales, total_expenses)
}

// Folds from +0.0; an empty f64 `sum()` is -0.0.
fn sum(values: impl Iterator<Item = f64>) -> f64 {
    values.map(finite_or_zero).fold(0.0, |acc, x| acc + x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::parse_amount;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn sample_sales() -> Vec<SaleLine> {
        vec![SaleLine::new(10.0, 500.0), SaleLine::new(2.5, 800.0)]
    }

    #[test]
    fn worked_example() {
        let totals = aggregate(&sample_sales(), &[ExpenseLine::new("ice", 1000.0)]);
        assert_eq!(
            totals,
            Totals {
                total_kg: 12.5,
                total_sales: 7000.0,
                total_expenses: 1000.0,
                profit: 6000.0,
                earnings15: 1050.0,
            }
        );
    }

    #[test]
    fn empty_lists_give_zero_totals() {
        assert_eq!(aggregate(&[], &[]), Totals::default());
    }

    #[test]
    fn revenue_is_sum_of_kg_times_price_with_coerced_text() {
        let sales = vec![
            SaleLine::new(parse_amount("3kg"), parse_amount("120")),
            SaleLine::new(parse_amount("abc"), parse_amount("500")),
            SaleLine::new(parse_amount("1.5"), parse_amount("")),
            SaleLine::new(parse_amount("4"), parse_amount("250 per kg")),
        ];
        let expected: f64 = sales.iter().map(|s| s.kg() * s.price()).sum();
        let totals = aggregate(&sales, &[]);
        assert_eq!(totals.total_sales, expected);
        assert_eq!(totals.total_sales, 1360.0);
        assert_eq!(totals.total_kg, 8.5);
    }

    #[test]
    fn earnings_depend_on_revenue_only() {
        let sales = sample_sales();
        let cheap = aggregate(&sales, &[]);
        let costly = aggregate(&sales, &[ExpenseLine::new("fuel", 50_000.0)]);
        assert_eq!(cheap.earnings15, costly.earnings15);
        assert_eq!(costly.earnings15, costly.total_sales * EARNINGS_RATE);
        assert_eq!(aggregate(&[], &[ExpenseLine::new("fuel", 10.0)]).earnings15, 0.0);
    }

    #[test]
    fn profit_goes_negative_when_expenses_exceed_sales() {
        let totals = aggregate(&[SaleLine::new(1.0, 100.0)], &[ExpenseLine::new("net", 250.0)]);
        assert_eq!(totals.profit, -150.0);
        assert_eq!(totals.profit, totals.total_sales - totals.total_expenses);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let sales = sample_sales();
        let expenses = vec![ExpenseLine::new("ice", 1000.0), ExpenseLine::new("bait", 75.5)];
        assert_eq!(aggregate(&sales, &expenses), aggregate(&sales, &expenses));
    }

    #[test]
    fn period_totals_sum_day_totals() {
        let d1 = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let days = vec![
            DayRecord::new(d1, sample_sales(), vec![ExpenseLine::new("ice", 1000.0)]),
            DayRecord::new(d2, vec![SaleLine::new(4.0, 500.0)], vec![ExpenseLine::new("fuel", 3000.0)]),
        ];
        let period = period_totals(&days);
        assert_eq!(period.total_kg, 16.5);
        assert_eq!(period.total_sales, 9000.0);
        assert_eq!(period.total_expenses, 4000.0);
        assert_eq!(period.profit, 5000.0);
        assert_eq!(period.profit, days.iter().map(|d| d.profit).sum::<f64>());
        assert_eq!(period.earnings15, 1350.0);
    }

    #[test]
    fn period_totals_of_nothing_is_zero() {
        assert_eq!(period_totals(&[]), Totals::default());
    }

    #[test]
    fn empty_sides_total_positive_zero() {
        let sales_only = aggregate(&[SaleLine::new(10.0, 500.0)], &[]);
        let expenses_only = aggregate(&[], &[ExpenseLine::new("ice", 100.0)]);
        for value in [
            sales_only.total_expenses,
            expenses_only.total_kg,
            expenses_only.total_sales,
            expenses_only.earnings15,
        ] {
            assert_eq!(value.to_bits(), 0.0f64.to_bits());
        }
        for value in [
            period_totals(&[]).total_kg,
            period_totals(&[]).total_sales,
            period_totals(&[]).profit,
            period_totals(&[]).earnings15,
        ] {
            assert!(value.is_sign_positive());
        }
    }

    #[test]
    fn overflowing_products_count_as_zero() {
        let huge = parse_amount(&format!("1{}", "0".repeat(200)));
        let totals = aggregate(&[SaleLine::new(huge, huge), SaleLine::new(2.0, 50.0)], &[]);
        assert_eq!(totals.total_sales, 100.0);
        assert!(totals.earnings15.is_finite());
        assert!(totals.profit.is_finite());
    }
}
