use worker::{Env, Request, Response, Result};

/// Liveness endpoint
pub async fn handle_health(_req: Request, _env: Env) -> Result<Response> {
    let health_status = serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    });

    Response::from_json(&health_status)
}
