//! A throwaway HTTP backend speaking the sheet script's action protocol,
//! served on 127.0.0.1 with an ephemeral port.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

pub type Rows = Arc<Mutex<Vec<Value>>>;

/// Start `router` and return the base URL it answers on.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{}", addr)
}

/// A sheet backed by `rows`; endpoint is `{base}/exec`.
pub async fn spawn_sheet(rows: Rows) -> String {
    let router = Router::new().route("/exec", post(sheet)).with_state(rows);
    format!("{}/exec", serve(router).await)
}

/// An endpoint that always answers with `status` and an HTML page.
pub async fn spawn_html(status: StatusCode) -> String {
    let router = Router::new().route(
        "/exec",
        post(move || async move { (status, Html("<!DOCTYPE html><html><body>Sign in</body></html>")) }),
    );
    format!("{}/exec", serve(router).await)
}

/// An endpoint that always answers with the given JSON.
pub async fn spawn_json(body: Value) -> String {
    let router = Router::new().route(
        "/exec",
        post(move || {
            let body = body.clone();
            async move { Json(body) }
        }),
    );
    format!("{}/exec", serve(router).await)
}

async fn sheet(
    State(rows): State<Rows>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut rows = rows.lock().await;
    let date = body.get("date").and_then(Value::as_str).map(str::to_string);
    let answer = match query.get("action").map(String::as_str) {
        Some("getDay") => {
            let record = rows
                .iter()
                .find(|r| r.get("date").and_then(Value::as_str) == date.as_deref())
                .cloned()
                .unwrap_or(Value::Null);
            json!({ "ok": true, "record": record })
        }
        Some("getAllDays") => json!({ "ok": true, "records": rows.clone() }),
        Some("saveDay") => {
            let record = body.get("record").cloned().unwrap_or(Value::Null);
            let key = record.get("date").cloned();
            match rows.iter_mut().find(|r| r.get("date") == key.as_ref()) {
                Some(existing) => *existing = record,
                None => rows.push(record),
            }
            json!({ "ok": true })
        }
        Some("deleteDay") => {
            rows.retain(|r| r.get("date").and_then(Value::as_str) != date.as_deref());
            json!({ "ok": true })
        }
        _ => json!({ "ok": false, "error": "Unknown action" }),
    };
    Json(answer)
}
