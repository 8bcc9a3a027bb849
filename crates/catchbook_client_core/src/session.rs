//! The application state: the day being edited, every saved day, and the
//! history buffers built from them.
//!
//! Each remote-backed operation takes `&mut self`, so one session never has
//! two actions in flight. State is only replaced after the remote call has
//! succeeded; a failure leaves everything exactly as it was.

use crate::api::RemoteStore;
use crate::error::Result;
use crate::history::{HistoryBook, HistoryKey};
use crate::ids::LineId;
use crate::models::{DayRecord, ExpenseLine, ExpensePatch, SaleLine, SalePatch};
use crate::totals::{aggregate, period_totals, Totals};
use chrono::NaiveDate;
use std::sync::Arc;

/// What a save turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// The day had no lines, so it was deleted instead of stored as zeros.
    Deleted,
}

pub struct Session {
    remote: Arc<dyn RemoteStore>,
    date: NaiveDate,
    sales: Vec<SaleLine>,
    expenses: Vec<ExpenseLine>,
    all_days: Vec<DayRecord>,
    history: HistoryBook,
}

impl Session {
    pub fn new(remote: Arc<dyn RemoteStore>, date: NaiveDate) -> Self {
        Self {
            remote,
            date,
            sales: Vec::new(),
            expenses: Vec::new(),
            all_days: Vec::new(),
            history: HistoryBook::default(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn sales(&self) -> &[SaleLine] {
        &self.sales
    }

    pub fn expenses(&self) -> &[ExpenseLine] {
        &self.expenses
    }

    /// Saved days, newest first.
    pub fn all_days(&self) -> &[DayRecord] {
        &self.all_days
    }

    pub fn history(&self) -> &HistoryBook {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryBook {
        &mut self.history
    }

    /// Changes the key the current lines will be saved under. Use
    /// [`Session::load_day`] to switch to another day's lines.
    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = date;
    }

    pub fn add_sale(&mut self, kg: f64, price: f64) -> LineId {
        let line = SaleLine::new(kg, price);
        let id = line.id.clone();
        self.sales.push(line);
        id
    }

    /// Returns false when no line has that id.
    pub fn update_sale(&mut self, id: &LineId, patch: SalePatch) -> bool {
        match self.sales.iter_mut().find(|s| &s.id == id) {
            Some(line) => {
                line.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn delete_sale(&mut self, id: &LineId) -> bool {
        let before = self.sales.len();
        self.sales.retain(|s| &s.id != id);
        self.sales.len() != before
    }

    pub fn add_expense(&mut self, category: &str, amount: f64) -> LineId {
        let line = ExpenseLine::new(category, amount);
        let id = line.id.clone();
        self.expenses.push(line);
        id
    }

    pub fn update_expense(&mut self, id: &LineId, patch: ExpensePatch) -> bool {
        match self.expenses.iter_mut().find(|e| &e.id == id) {
            Some(line) => {
                line.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn delete_expense(&mut self, id: &LineId) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|e| &e.id != id);
        self.expenses.len() != before
    }

    /// Totals of the current lines, computed on every call.
    pub fn totals(&self) -> Totals {
        aggregate(&self.sales, &self.expenses)
    }

    pub fn current_record(&self) -> DayRecord {
        DayRecord::new(self.date, self.sales.clone(), self.expenses.clone())
    }

    /// Period figures over every saved day.
    pub fn period_totals(&self) -> Totals {
        period_totals(&self.all_days)
    }

    /// Replace the current day with what the backend has for `date`, or with
    /// an empty day if nothing is stored. Never merges with the lines on screen.
    pub async fn load_day(&mut self, date: NaiveDate) -> Result<()> {
        let record = self.remote.get_day(date).await?;
        match record {
            Some(rec) => {
                log::info!(
                    "[catchbook] load_day {} sales={} expenses={}",
                    date,
                    rec.sales.len(),
                    rec.expenses.len()
                );
                self.date = rec.date;
                self.sales = rec.sales;
                self.expenses = rec.expenses;
            }
            None => {
                log::info!("[catchbook] load_day {} not stored, starting empty", date);
                self.date = date;
                self.sales = Vec::new();
                self.expenses = Vec::new();
            }
        }
        Ok(())
    }

    /// Reload every saved day and rebuild the history buffers.
    pub async fn load_all_days(&mut self) -> Result<()> {
        let mut days = self.remote.get_all_days().await?;
        // Stable: same-date duplicates keep the backend's order.
        days.sort_by(|a, b| b.date.cmp(&a.date));
        log::info!("[catchbook] load_all_days count={}", days.len());
        self.history = HistoryBook::from_days(&days);
        self.all_days = days;
        Ok(())
    }

    /// Persist the current day (or delete it when it has no lines), then
    /// reload the saved days.
    pub async fn save(&mut self) -> Result<SaveOutcome> {
        let record = self.current_record();
        let outcome = self.store(record).await?;
        self.load_all_days().await?;
        Ok(outcome)
    }

    /// Persist one history buffer under its date, then reload.
    pub async fn save_history_entry(&mut self, key: &HistoryKey) -> Result<SaveOutcome> {
        let record = self.history.prepared(key)?;
        let outcome = self.store(record).await?;
        self.load_all_days().await?;
        Ok(outcome)
    }

    /// Delete the date behind a history buffer, then reload.
    pub async fn delete_history_entry(&mut self, key: &HistoryKey) -> Result<()> {
        if self.history.get(key).is_none() {
            return Err(crate::error::Error::UnknownEntry(key.to_string()));
        }
        log::info!("[catchbook] delete_day {}", key.date);
        self.remote.delete_day(key.date).await?;
        self.load_all_days().await
    }

    async fn store(&self, record: DayRecord) -> Result<SaveOutcome> {
        if record.is_empty() {
            log::info!("[catchbook] save {} has no lines, deleting", record.date);
            self.remote.delete_day(record.date).await?;
            Ok(SaveOutcome::Deleted)
        } else {
            log::info!(
                "[catchbook] save {} sales={} expenses={} total_sales={}",
                record.date,
                record.sales.len(),
                record.expenses.len(),
                record.total_sales
            );
            self.remote.save_day(&record).await?;
            Ok(SaveOutcome::Saved)
        }
    }
}
