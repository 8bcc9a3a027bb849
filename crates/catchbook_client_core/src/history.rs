//! Editable copy of the saved days, one buffer per record.
//!
//! The sheet backend does not enforce one row per date, so the same date can
//! come back more than once. Each occurrence gets its own key (`2024-05-01`,
//! `2024-05-01#2`, ...) in order of appearance; duplicates are never merged.

use crate::date::{format_day, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::ids::LineId;
use crate::models::{DayRecord, ExpenseLine, ExpensePatch, SaleLine, SalePatch, DEFAULT_CATEGORY};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Identifies one editing buffer. Sorts newest date first, then by occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    pub date: NaiveDate,
    /// 1 for the first record with this date, 2 for the second, ...
    pub occurrence: u32,
}

impl HistoryKey {
    pub fn first(date: NaiveDate) -> Self {
        Self { date, occurrence: 1 }
    }
}

impl Ord for HistoryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .date
            .cmp(&self.date)
            .then(self.occurrence.cmp(&other.occurrence))
    }
}

impl PartialOrd for HistoryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.occurrence <= 1 {
            write!(f, "{}", format_day(self.date))
        } else {
            write!(f, "{}#{}", format_day(self.date), self.occurrence)
        }
    }
}

impl FromStr for HistoryKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (date_part, occurrence) = match s.split_once('#') {
            Some((d, n)) => {
                let n: u32 = n
                    .parse()
                    .map_err(|_| format!("Invalid occurrence in history key: {:?}", s))?;
                if n < 1 {
                    return Err(format!("Invalid occurrence in history key: {:?}", s));
                }
                (d, n)
            }
            None => (s, 1),
        };
        let date = NaiveDate::parse_from_str(date_part, DATE_FORMAT)
            .map_err(|e| format!("Invalid date in history key {:?}: {}", s, e))?;
        Ok(Self { date, occurrence })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryBook {
    entries: BTreeMap<HistoryKey, DayRecord>,
}

impl HistoryBook {
    /// Deep-copies `days`, numbering repeated dates in the order they appear.
    pub fn from_days(days: &[DayRecord]) -> Self {
        let mut seen: HashMap<NaiveDate, u32> = HashMap::new();
        let mut entries = BTreeMap::new();
        for day in days {
            let n = seen.entry(day.date).or_insert(0);
            *n += 1;
            entries.insert(
                HistoryKey {
                    date: day.date,
                    occurrence: *n,
                },
                day.clone(),
            );
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in display order.
    pub fn keys(&self) -> impl Iterator<Item = HistoryKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HistoryKey, &DayRecord)> {
        self.entries.iter()
    }

    pub fn get(&self, key: &HistoryKey) -> Option<&DayRecord> {
        self.entries.get(key)
    }

    pub fn add_sale_row(&mut self, key: &HistoryKey) -> Result<LineId> {
        let line = SaleLine::new(0.0, 0.0);
        let id = line.id.clone();
        self.edit(key, |entry| {
            entry.sales.push(line);
            Ok(())
        })?;
        Ok(id)
    }

    pub fn update_sale_row(&mut self, key: &HistoryKey, index: usize, patch: SalePatch) -> Result<()> {
        self.edit(key, |entry| {
            let line = entry.sales.get_mut(index).ok_or_else(|| no_such_line(key, index))?;
            line.apply(patch);
            Ok(())
        })
    }

    pub fn delete_sale_row(&mut self, key: &HistoryKey, index: usize) -> Result<()> {
        self.edit(key, |entry| {
            if index >= entry.sales.len() {
                return Err(no_such_line(key, index));
            }
            entry.sales.remove(index);
            Ok(())
        })
    }

    pub fn add_expense_row(&mut self, key: &HistoryKey) -> Result<LineId> {
        let line = ExpenseLine::new(DEFAULT_CATEGORY, 0.0);
        let id = line.id.clone();
        self.edit(key, |entry| {
            entry.expenses.push(line);
            Ok(())
        })?;
        Ok(id)
    }

    pub fn update_expense_row(
        &mut self,
        key: &HistoryKey,
        index: usize,
        patch: ExpensePatch,
    ) -> Result<()> {
        self.edit(key, |entry| {
            let line = entry
                .expenses
                .get_mut(index)
                .ok_or_else(|| no_such_line(key, index))?;
            line.apply(patch);
            Ok(())
        })
    }

    pub fn delete_expense_row(&mut self, key: &HistoryKey, index: usize) -> Result<()> {
        self.edit(key, |entry| {
            if index >= entry.expenses.len() {
                return Err(no_such_line(key, index));
            }
            entry.expenses.remove(index);
            Ok(())
        })
    }

    /// The record to send for `key`: fresh totals, date taken from the key.
    pub fn prepared(&self, key: &HistoryKey) -> Result<DayRecord> {
        let mut record = self
            .entries
            .get(key)
            .cloned()
            .ok_or_else(|| Error::UnknownEntry(key.to_string()))?;
        record.date = key.date;
        record.recalculate();
        Ok(record)
    }

    /// Every edit goes through here so the entry's totals never go stale.
    fn edit<F>(&mut self, key: &HistoryKey, f: F) -> Result<()>
    where
        F: FnOnce(&mut DayRecord) -> Result<()>,
    {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| Error::UnknownEntry(key.to_string()))?;
        f(entry)?;
        entry.recalculate();
        Ok(())
    }
}

fn no_such_line(key: &HistoryKey, index: usize) -> Error {
    Error::NoSuchLine {
        entry: key.to_string(),
        index,
    }
}
