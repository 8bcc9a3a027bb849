//! In-memory `RemoteStore`, rows kept in insertion order like the sheet does.
//! Used by the tests.

use crate::api::RemoteStore;
use crate::error::Result;
use crate::models::DayRecord;
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<DayRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing rows as-is, duplicates included.
    pub fn with_rows(rows: Vec<DayRecord>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    pub async fn rows(&self) -> Vec<DayRecord> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn get_day(&self, date: NaiveDate) -> Result<Option<DayRecord>> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|r| r.date == date).cloned())
    }

    async fn get_all_days(&self) -> Result<Vec<DayRecord>> {
        Ok(self.rows.lock().await.clone())
    }

    /// Replaces the first row with the same date, appends otherwise.
    async fn save_day(&self, record: &DayRecord) -> Result<()> {
        let mut rows = self.rows.lock().await;
        match rows.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => *existing = record.clone(),
            None => rows.push(record.clone()),
        }
        Ok(())
    }

    /// Removes every row with that date.
    async fn delete_day(&self, date: NaiveDate) -> Result<()> {
        self.rows.lock().await.retain(|r| r.date != date);
        Ok(())
    }
}
