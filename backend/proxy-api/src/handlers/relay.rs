use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use crate::AppState;

/// Longest piece of a non-JSON upstream answer echoed back to the caller.
const SNIPPET_LEN: usize = 200;

#[derive(Deserialize)]
pub struct RelayQuery {
    pub action: Option<String>,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing GAS_URL environment variable")]
    MissingGasUrl,

    #[error("Missing \"action\" parameter")]
    MissingAction,

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingAction => StatusCode::BAD_REQUEST,
            RelayError::MissingGasUrl | RelayError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn reject(self) -> (StatusCode, Json<Value>) {
        (self.status(), Json(json!({ "ok": false, "error": self.to_string() })))
    }
}

// Forward one action to the sheet script and hand its JSON back unchanged
pub async fn relay(
    State(state): State<AppState>,
    query: Result<Query<RelayQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let gas_url = state
        .config
        .gas_url
        .as_deref()
        .ok_or(RelayError::MissingGasUrl)
        .map_err(RelayError::reject)?;

    // An unreadable query (e.g. `action` given twice) counts as no action
    let query_action = match query {
        Ok(Query(query)) => query.action,
        Err(e) => {
            tracing::warn!("Unreadable query string: {}", e);
            return Err(RelayError::MissingAction.reject());
        }
    };

    let mut payload = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let body_action = payload.remove("action");
    let action = query_action
        .filter(|a| !a.is_empty())
        .or_else(|| match body_action {
            Some(Value::String(a)) if !a.is_empty() => Some(a),
            _ => None,
        })
        .ok_or(RelayError::MissingAction)
        .map_err(RelayError::reject)?;

    tracing::debug!("Relaying action {}", action);

    let raw = forward(&state.http, gas_url, &action, Value::Object(payload))
        .await
        .map_err(|e| {
            tracing::error!("Upstream request for {} failed: {:?}", action, e);
            e.reject()
        })?;

    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => Ok(Json(value)),
        Err(_) => {
            tracing::warn!("Upstream answered {} with non-JSON", action);
            Ok(Json(json!({
                "ok": false,
                "error": "Invalid JSON from GAS",
                "rawSnippet": raw.chars().take(SNIPPET_LEN).collect::<String>(),
            })))
        }
    }
}

async fn forward(
    http: &reqwest::Client,
    gas_url: &str,
    action: &str,
    payload: Value,
) -> Result<String, RelayError> {
    let resp = http
        .post(gas_url)
        .query(&[("action", action)])
        .json(&payload)
        .send()
        .await?;
    Ok(resp.text().await?)
}
