#![allow(dead_code)]

use std::sync::Arc;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use stockdash::identity::{MemoryStore, PendingNavigator, SessionAuthority, StorageKey};

pub const ALICE: &str = r#"{"id":1,"username":"alice","role":"editor","created_at":"2024-01-01T00:00:00Z"}"#;

pub fn user_json(role: &str) -> String {
    format!(r#"{{"id":5,"username":"u-{role}","role":"{role}","created_at":"2024-01-01T00:00:00Z"}}"#)
}

pub fn memory_store(token: Option<&str>, user: Option<&str>) -> Arc<MemoryStore> {
    let mut entries = Vec::new();
    if let Some(t) = token { entries.push((StorageKey::Token, t.to_string())); }
    if let Some(u) = user { entries.push((StorageKey::User, u.to_string())); }
    Arc::new(MemoryStore::with_entries(entries))
}

pub fn authority_with(store: Arc<MemoryStore>) -> (Arc<SessionAuthority>, Arc<PendingNavigator>) {
    let nav = Arc::new(PendingNavigator::new());
    (Arc::new(SessionAuthority::new(store, nav.clone())), nav)
}

fn header_str(headers: &HeaderMap, name: &str) -> Value {
    headers.get(name).and_then(|v| v.to_str().ok()).map(|s| Value::String(s.to_string())).unwrap_or(Value::Null)
}

async fn echo(headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "authorization": header_str(&headers, "authorization"),
        "content_type": header_str(&headers, "content-type"),
        "x_trace": header_str(&headers, "x-trace"),
    }))
}

fn product(id: i64, name: &str) -> Value {
    json!({
        "id": id, "name": name,
        "total_added_qty": 10, "total_added_amount": "25.00",
        "total_sold_qty": 4, "total_sold_amount": "18.00",
        "available_stock": 6
    })
}

async fn add(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get("authorization").is_none() {
        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Not authenticated"})));
    }
    let name = body["product_name"].as_str().unwrap_or_default().to_string();
    (StatusCode::OK, Json(json!({"success": true, "message": format!("Successfully added {}", body["quantity"]), "product": product(1, &name)})))
}

async fn sell(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["quantity"].as_i64().unwrap_or(0) > 6 {
        return (StatusCode::OK, Json(json!({"success": false, "message": "Insufficient stock", "product": null})));
    }
    (StatusCode::OK, Json(json!({"success": true, "message": "Successfully sold", "product": product(1, "Widget")})))
}

async fn summary(axum::extract::RawQuery(q): axum::extract::RawQuery) -> Json<Value> {
    match q {
        Some(q) if q.contains("start=") && q.contains("end=") => Json(json!({
            "products": [product(1, "Widget")],
            "total_added_qty_in_range": 3, "total_added_amount_in_range": "7.50",
            "total_sold_qty_in_range": 1, "total_sold_amount_in_range": 4.5
        })),
        _ => Json(json!({"products": [product(1, "Widget"), product(2, "Bolt")]})),
    }
}

async fn enhanced() -> Json<Value> {
    let mut p = product(1, "Widget");
    p["avg_purchase_price"] = json!("2.50");
    p["avg_selling_price"] = json!("4.50");
    p["profit_loss"] = json!("8.00");
    Json(json!({"products": [p]}))
}

async fn history(axum::extract::RawQuery(q): axum::extract::RawQuery) -> Json<Value> {
    Json(json!({
        "query": q,
        "transactions": [
            {"id": 2, "date": "2025-10-02", "product_name": "Widget", "transaction_type": "sell", "quantity": 1, "unit_price": "4.50", "total_amount": "4.50"},
            {"id": 1, "date": "2025-10-01", "product_name": "Widget", "transaction_type": "add", "quantity": 3, "unit_price": "2.50", "total_amount": "7.50"}
        ]
    }))
}

async fn delete_history(Path((kind, id)): Path<(String, i64)>) -> (StatusCode, Json<Value>) {
    if id == 404 {
        return (StatusCode::OK, Json(json!({"success": false, "message": format!("{} history record not found", kind), "updated_product": null})));
    }
    (StatusCode::OK, Json(json!({"success": true, "message": format!("Successfully deleted {} history record (ID: {})", kind, id), "updated_product": product(1, "Widget")})))
}

/// Fake inventory backend. `/expired` always answers 401, `/missing` 404,
/// `/broken` 400 with a FastAPI-style detail.
pub fn backend() -> Router {
    Router::new()
        .route("/echo", get(echo).post(echo))
        .route("/expired", get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Token expired"}))) }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }))
        .route("/broken", get(|| async { (StatusCode::BAD_REQUEST, Json(json!({"detail": "Invalid date range"}))) }))
        .route("/add", post(add))
        .route("/sell", post(sell))
        .route("/summary", get(summary))
        .route("/summary/enhanced", get(enhanced))
        .route("/products", get(|| async { Json(json!({"products": ["Bolt", "Widget"]})) }))
        .route("/daily-history", get(history))
        .route("/history/{kind}/{id}", delete(delete_history))
}

/// Serve `backend()` on an ephemeral port and return its base URL.
pub async fn spawn_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, backend()).await.expect("serve");
    });
    format!("http://{}", addr)
}
