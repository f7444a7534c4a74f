use axum::{Json, response::IntoResponse};
use serde_json::json;

pub async fn hello() -> impl IntoResponse {
    Json(json!({ "message": "Hello" }))
}

pub async fn ping() -> impl IntoResponse {
    Json(json!({ "message": "pong" }))
}
