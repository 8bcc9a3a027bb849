// Test helpers: fake upstream sheet scripts and request plumbing

use axum::{
    body::Body,
    extract::Query,
    http::{Request, StatusCode},
    response::{Html, Response},
    routing::post,
    Json, Router,
};
use catchbook_proxy::{router, AppState, Config};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    format!("http://{}", addr)
}

/// Upstream that answers `{"ok":true,"action":..,"body":..}` with what it received.
pub async fn spawn_echo_upstream() -> String {
    async fn echo(Query(query): Query<HashMap<String, String>>, Json(body): Json<Value>) -> Json<Value> {
        Json(json!({ "ok": true, "action": query.get("action"), "body": body }))
    }
    let app = Router::new().route("/exec", post(echo));
    format!("{}/exec", serve(app).await)
}

/// Upstream that answers every request with an HTML error page.
pub async fn spawn_html_upstream(page: String) -> String {
    let app = Router::new().route(
        "/exec",
        post(move || {
            let page = page.clone();
            async move { (StatusCode::FORBIDDEN, Html(page)) }
        }),
    );
    format!("{}/exec", serve(app).await)
}

pub fn relay_app(gas_url: Option<String>) -> Router {
    let config = Config {
        gas_url,
        port: 0,
        gas_timeout: Duration::from_secs(5),
    };
    router(AppState::new(config).expect("Failed to build app state"))
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

pub async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
