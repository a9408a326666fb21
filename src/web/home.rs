use axum::Json;
use serde_json::{json, Value};

pub async fn home() -> Json<Value> {
    Json(json!({
        "name": "Taco Cloud",
        "links": {
            "design": "/design",
            "current_order": "/orders/current",
        },
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
