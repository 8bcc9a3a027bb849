//! Data models for sale lines, expense lines and day records.
//! Wire format matches the sheet backend: camelCase totals, "YYYY-MM-DD" dates,
//! numbers that may arrive as strings or be missing.

use crate::amount;
use crate::ids::LineId;
use crate::totals::{aggregate, Totals};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Category given to expenses entered without one.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// One sale: `kg` sold at `price` per kg. `total` is always `kg * price`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSaleLine")]
pub struct SaleLine {
    pub id: LineId,
    kg: f64,
    price: f64,
    total: f64,
}

#[derive(Deserialize)]
struct RawSaleLine {
    #[serde(default)]
    id: LineId,
    #[serde(default, deserialize_with = "amount::lenient")]
    kg: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    price: f64,
}

impl From<RawSaleLine> for SaleLine {
    fn from(raw: RawSaleLine) -> Self {
        Self::with_id(raw.id, raw.kg, raw.price)
    }
}

impl SaleLine {
    pub fn new(kg: f64, price: f64) -> Self {
        Self::with_id(LineId::new(), kg, price)
    }

    pub fn with_id(id: LineId, kg: f64, price: f64) -> Self {
        let mut line = Self {
            id,
            kg: amount::finite_or_zero(kg),
            price: amount::finite_or_zero(price),
            total: 0.0,
        };
        line.recompute();
        line
    }

    pub fn kg(&self) -> f64 {
        self.kg
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn set_kg(&mut self, kg: f64) {
        self.kg = amount::finite_or_zero(kg);
        self.recompute();
    }

    pub fn set_price(&mut self, price: f64) {
        self.price = amount::finite_or_zero(price);
        self.recompute();
    }

    pub fn apply(&mut self, patch: SalePatch) {
        if let Some(kg) = patch.kg {
            self.set_kg(kg);
        }
        if let Some(price) = patch.price {
            self.set_price(price);
        }
    }

    fn recompute(&mut self) {
        self.total = amount::finite_or_zero(self.kg * self.price);
    }
}

/// Partial update of a sale line; `None` fields are left alone.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SalePatch {
    pub kg: Option<f64>,
    pub price: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    #[serde(default)]
    pub id: LineId,
    #[serde(default = "default_category", deserialize_with = "category_or_default")]
    pub category: String,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub amount: f64,
}

impl ExpenseLine {
    /// Blank categories fall back to [`DEFAULT_CATEGORY`].
    pub fn new(category: &str, amount: f64) -> Self {
        Self {
            id: LineId::new(),
            category: normalize_category(category),
            amount: amount::finite_or_zero(amount),
        }
    }

    pub fn apply(&mut self, patch: ExpensePatch) {
        if let Some(category) = patch.category {
            self.category = normalize_category(&category);
        }
        if let Some(amount) = patch.amount {
            self.amount = amount::finite_or_zero(amount);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpensePatch {
    pub category: Option<String>,
    pub amount: Option<f64>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

pub fn normalize_category(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        default_category()
    } else {
        trimmed.to_string()
    }
}

fn category_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => normalize_category(&s),
        serde_json::Value::Null => default_category(),
        other => normalize_category(&other.to_string()),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One calendar day: its lines plus the totals derived from them.
///
/// The totals are stored next to the lines because the backend persists them
/// that way. Anything built through [`DayRecord::new`] or passed through
/// [`DayRecord::recalculate`] has totals matching its lines; records decoded
/// from the backend keep whatever totals were stored until recalculated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    #[serde(with = "crate::date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sales: Vec<SaleLine>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub expenses: Vec<ExpenseLine>,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_kg: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_sales: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_expenses: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub profit: f64,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub earnings15: f64,
}

impl DayRecord {
    pub fn new(date: NaiveDate, sales: Vec<SaleLine>, expenses: Vec<ExpenseLine>) -> Self {
        let totals = aggregate(&sales, &expenses);
        let mut record = Self {
            date,
            sales,
            expenses,
            total_kg: 0.0,
            total_sales: 0.0,
            total_expenses: 0.0,
            profit: 0.0,
            earnings15: 0.0,
        };
        record.store_totals(totals);
        record
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, Vec::new(), Vec::new())
    }

    /// A day without lines is not persisted; saving it means deleting it.
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty() && self.expenses.is_empty()
    }

    /// Overwrite the stored totals with a fresh aggregation of the lines.
    pub fn recalculate(&mut self) {
        let totals = aggregate(&self.sales, &self.expenses);
        self.store_totals(totals);
    }

    pub fn recalculated(mut self) -> Self {
        self.recalculate();
        self
    }

    /// The totals as stored on the record (not recomputed).
    pub fn stored_totals(&self) -> Totals {
        Totals {
            total_kg: self.total_kg,
            total_sales: self.total_sales,
            total_expenses: self.total_expenses,
            profit: self.profit,
            earnings15: self.earnings15,
        }
    }

    fn store_totals(&mut self, totals: Totals) {
        self.total_kg = totals.total_kg;
        self.total_sales = totals.total_sales;
        self.total_expenses = totals.total_expenses;
        self.profit = totals.profit;
        self.earnings15 = totals.earnings15;
    }
}
