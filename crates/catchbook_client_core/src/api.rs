//! Remote day store: the trait the session talks to, plus the HTTP client for
//! the sheet script's action protocol (`POST ?action=...`, JSON envelope with `ok`).

use crate::config::ClientConfig;
use crate::date::format_day;
use crate::error::{Error, Result};
use crate::models::DayRecord;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use std::fmt;

/// Longest piece of an unreadable response body kept in the error message.
const SNIPPET_LEN: usize = 200;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// `Ok(None)` when nothing is stored for that date.
    async fn get_day(&self, date: NaiveDate) -> Result<Option<DayRecord>>;
    async fn get_all_days(&self) -> Result<Vec<DayRecord>>;
    async fn save_day(&self, record: &DayRecord) -> Result<()>;
    async fn delete_day(&self, date: NaiveDate) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    GetDay,
    GetAllDays,
    SaveDay,
    DeleteDay,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::GetDay => "getDay",
            Action::GetAllDays => "getAllDays",
            Action::SaveDay => "saveDay",
            Action::DeleteDay => "deleteDay",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct HttpRemote {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRemote {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoint = config.api_url.clone().ok_or(Error::NotConfigured)?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, action: Action, body: Value) -> Result<Map<String, Value>> {
        log::debug!("[catchbook] {} -> {}", action, self.endpoint);
        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("action", action.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::warn!("[catchbook] {} failed to send: {}", action, e);
                e
            })?;
        let status = resp.status();
        let text = resp.text().await?;
        parse_envelope(status.as_u16(), &text).map_err(|e| {
            log::warn!("[catchbook] {} failed: {}", action, e);
            e
        })
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn get_day(&self, date: NaiveDate) -> Result<Option<DayRecord>> {
        let mut data = self
            .request(Action::GetDay, json!({ "date": format_day(date) }))
            .await?;
        match data.remove("record") {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| Error::Malformed(format!("getDay record: {}", e))),
        }
    }

    async fn get_all_days(&self) -> Result<Vec<DayRecord>> {
        let mut data = self.request(Action::GetAllDays, json!({})).await?;
        let rows = match data.remove("records") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(rows)) => rows,
            Some(other) => {
                return Err(Error::Malformed(format!(
                    "getAllDays records is not a list: {}",
                    snippet(&other.to_string())
                )))
            }
        };
        let total = rows.len();
        let records: Vec<DayRecord> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<DayRecord>(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("[catchbook] getAllDays skipping unreadable record: {}", e);
                    None
                }
            })
            .collect();
        log::debug!("[catchbook] getAllDays returned {} of {} records", records.len(), total);
        Ok(records)
    }

    async fn save_day(&self, record: &DayRecord) -> Result<()> {
        self.request(Action::SaveDay, json!({ "record": record })).await?;
        Ok(())
    }

    async fn delete_day(&self, date: NaiveDate) -> Result<()> {
        self.request(Action::DeleteDay, json!({ "date": format_day(date) }))
            .await?;
        Ok(())
    }
}

/// Turn a response body into the envelope object, or the matching failure.
/// The HTTP status is only reported, never interpreted: the relay signals
/// failures in the body.
pub(crate) fn parse_envelope(status: u16, text: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(text).map_err(|_| {
        Error::Malformed(format!("HTTP {} returned non-JSON body: {}", status, snippet(text)))
    })?;
    let map = match value {
        Value::Object(map) => map,
        _ => {
            return Err(Error::Malformed(format!(
                "HTTP {} returned JSON that is not an object: {}",
                status,
                snippet(text)
            )))
        }
    };
    if map.get("ok").and_then(Value::as_bool) != Some(true) {
        return Err(Error::Rejected(failure_reason(&map)));
    }
    Ok(map)
}

fn failure_reason(map: &Map<String, Value>) -> String {
    ["error", "message"]
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Null | Value::String(_) => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| "Request failed".to_string())
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_LEN).collect()
}
