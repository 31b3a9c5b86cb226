//! 健康检查端点

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: CheckResult,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// 健康检查: 探测数据库连通性, 始终返回 200
async fn health(State(state): State<ServerState>) -> AppResult<axum::Json<HealthResponse>> {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(state.get_pool())
        .await
    {
        Ok(_) => CheckResult {
            ok: true,
            error: None,
        },
        Err(e) => CheckResult {
            ok: false,
            error: Some(e.to_string()),
        },
    };

    let status = if database.ok { "ok" } else { "degraded" };

    Ok(axum::Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
    }))
}
