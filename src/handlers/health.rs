//! Liveness check

use actix_web::{get, HttpResponse};

use crate::domain::dto::users::response::ReadyResponse;

/// 서비스 준비 상태 확인
///
/// # Endpoint
/// `GET /ready` → `{"status":"ok"}`
#[get("/ready")]
pub async fn ready() -> HttpResponse {
    HttpResponse::Ok().json(ReadyResponse::ok())
}
