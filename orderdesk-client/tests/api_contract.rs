//! ApiClient against a stub backend serving the dashboard endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::NaiveDate;
use orderdesk_client::{ClientConfig, ClientError, OrderQuery, OrderStatus, OrdersApi};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Default)]
struct Recorded {
    paged: bool,
    list_queries: Vec<HashMap<String, String>>,
    patches: Vec<(i64, Value)>,
}

type Shared = Arc<Mutex<Recorded>>;

fn order_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "order_number": format!("BF-20240105-{id:04}"),
        "user": {
            "id": 3,
            "telegram_id": 555001,
            "username": "budi",
            "first_name": "Budi",
            "last_name": "",
            "phone": "+62811000111"
        },
        "status": status,
        "status_display": "Pending",
        "payment_status": "settlement",
        "item_count": 2,
        "total": "45000.00",
        "created_at": "2024-01-05T07:05:00Z"
    })
}

async fn list_orders(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut rec = state.lock().unwrap();
    rec.list_queries.push(params);
    let orders = json!([order_json(7, "pending"), order_json(6, "preparing")]);
    if rec.paged {
        Json(json!({"count": 2, "next": null, "previous": null, "results": orders}))
    } else {
        Json(orders)
    }
}

async fn order_detail(Path(id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    if id != 7 {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut detail = order_json(7, "pending");
    let obj = detail.as_object_mut().unwrap();
    obj.insert("delivery_address".into(), json!("Jl. Sudirman 1"));
    obj.insert("phone".into(), json!("+62811000111"));
    obj.insert("notes".into(), json!("no chili"));
    obj.insert(
        "items".into(),
        json!([
            {"id": 1, "menu_item": 10, "name": "Nasi Goreng", "quantity": 2, "price": "15000.00", "subtotal": "30000.00"},
            {"id": 2, "menu_item": 11, "name": "Es Teh", "quantity": 3, "price": "5000.00", "subtotal": "15000.00"}
        ]),
    );
    obj.insert("updated_at".into(), json!("2024-01-05T07:10:00Z"));
    Ok(Json(detail))
}

async fn update_status(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.lock().unwrap().patches.push((id, body.clone()));
    if id == 7 {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "order_number": "BF-20240105-0007",
                "old_status": "pending",
                "new_status": body["status"],
            })),
        )
    } else if id == 9 {
        (
            StatusCode::OK,
            Json(json!({"success": false, "error": "already confirmed"})),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid status"})),
        )
    }
}

async fn stats() -> Json<Value> {
    Json(json!({
        "pending_orders": 4,
        "today": {"orders": 12, "revenue": "540000.00"},
        "weekly": {"orders": 80, "revenue": "3600000.00"},
        "total_customers": 57,
        "status_breakdown": {"pending": 4, "completed": 8, "refunded": 1}
    }))
}

async fn spawn_backend(paged: bool) -> (ClientConfig, Shared) {
    let state: Shared = Arc::new(Mutex::new(Recorded {
        paged,
        ..Default::default()
    }));
    let app = Router::new()
        .route("/api/v1/orders/", get(list_orders))
        .route("/api/v1/orders/{id}/", get(order_detail))
        .route("/api/v1/orders/{id}/update_status/", patch(update_status))
        .route("/api/v1/stats/", get(stats))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::new(format!("http://{addr}/api/v1")).with_timeout(5);
    (config, state)
}

#[tokio::test]
async fn list_orders_passes_filter_through() {
    let (config, state) = spawn_backend(false).await;
    let client = config.build_http_client().unwrap();

    let all = client.list_orders(&OrderQuery::all()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].order_number, "BF-20240105-0007");
    assert_eq!(all[0].customer.display_name(), "@budi");

    let query = OrderQuery::with_status(Some(OrderStatus::Preparing)).between(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
    );
    client.list_orders(&query).await.unwrap();

    let rec = state.lock().unwrap();
    assert!(rec.list_queries[0].is_empty());
    assert_eq!(rec.list_queries[1].get("status").map(String::as_str), Some("preparing"));
    assert_eq!(rec.list_queries[1].get("date_from").map(String::as_str), Some("2024-01-01"));
    assert_eq!(rec.list_queries[1].get("date_to").map(String::as_str), Some("2024-01-07"));
}

#[tokio::test]
async fn list_orders_accepts_paginated_envelope() {
    let (config, _state) = spawn_backend(true).await;
    let client = config.build_http_client().unwrap();

    let orders = client.list_orders(&OrderQuery::all()).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[1].status, OrderStatus::Preparing);
}

#[tokio::test]
async fn fetch_stats_and_detail() {
    let (config, _state) = spawn_backend(false).await;
    let client = config.build_http_client().unwrap();

    let stats = client.fetch_stats().await.unwrap();
    assert_eq!(stats.pending_orders, 4);
    assert_eq!(stats.today_orders(), 12);
    assert_eq!(stats.today_revenue(), Decimal::from_str("540000.00").unwrap());
    assert_eq!(stats.total_customers, 57);
    assert_eq!(stats.count_for(OrderStatus::Completed), 8);

    let detail = client.fetch_order_detail(7).await.unwrap();
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.item_count(), 5);
    assert_eq!(detail.items_total(), Decimal::from_str("45000.00").unwrap());
    assert_eq!(detail.notes.as_deref(), Some("no chili"));

    let missing = client.fetch_order_detail(99).await.unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
async fn update_status_sends_code_and_maps_rejection_to_error() {
    let (config, state) = spawn_backend(false).await;
    let client = config.build_http_client().unwrap();

    client
        .update_order_status(7, OrderStatus::Confirmed)
        .await
        .unwrap();

    let err = client
        .update_order_status(8, OrderStatus::Confirmed)
        .await
        .unwrap_err();
    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("Invalid status"));
        }
        other => panic!("unexpected error: {other}"),
    }

    // the HTTP status alone decides
    client
        .update_order_status(9, OrderStatus::Confirmed)
        .await
        .unwrap();

    let rec = state.lock().unwrap();
    assert_eq!(rec.patches.len(), 3);
    assert_eq!(rec.patches[0], (7, json!({"status": "confirmed"})));
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ClientConfig::new(format!("http://{addr}/api/v1"))
        .with_timeout(2)
        .build_http_client()
        .unwrap();
    let err = client.fetch_stats().await.unwrap_err();
    assert!(err.is_transport());
}
