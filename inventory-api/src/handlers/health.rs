/// Health and readiness probes
use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::AppState;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Readiness: both backing stores must answer.
pub async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    let mut redis = state.redis.clone();
    let redis_ok = redis::cmd("PING")
        .query_async::<_, String>(&mut redis)
        .await
        .is_ok();

    let body = json!({
        "status": if db_ok && redis_ok { "ready" } else { "degraded" },
        "database": db_ok,
        "redis": redis_ok,
    });

    if db_ok && redis_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
