// Admin write surface for the metrics layers: per-metric overrides and
// full synthetic snapshots. All routes require the admin role; seller
// actions can never reach these.

use serde::Deserialize;
use worker::{Env, Request, Response, Result};

use crate::log_info;
use crate::middleware::{extract_caller, require_admin, Caller};
use crate::responses::{error_response, ApiResponse};
use crate::services::core::metrics::{OverrideStore, SnapshotStore};
use crate::types::{MetricKey, MetricVector, Timeframe};
use crate::utils::{query_param, ShopError, ShopResult};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertOverrideRequest {
    metric_key: String,
    period: String,
    value: f64,
}

fn admin_caller(req: &Request) -> ShopResult<Caller> {
    let caller = extract_caller(req)?;
    require_admin(&caller)?;
    Ok(caller)
}

/// `PUT /api/v1/admin/sellers/:id/overrides`
///
/// The stored original_value is whatever the resolution engine currently
/// shows for that metric and period, captured for audit display.
pub async fn handle_upsert_override(
    mut req: Request,
    env: Env,
    seller_id: &str,
) -> Result<Response> {
    let caller = match admin_caller(&req) {
        Ok(caller) => caller,
        Err(e) => return error_response(e),
    };

    let body: UpsertOverrideRequest = match req.json().await {
        Ok(body) => body,
        Err(e) => return error_response(ShopError::parse_error(format!("Invalid body: {}", e))),
    };
    let metric_key = match MetricKey::parse(&body.metric_key) {
        Ok(key) => key,
        Err(e) => return error_response(e),
    };
    let period = match Timeframe::parse(&body.period) {
        Ok(tf) => tf,
        Err(e) => return error_response(e),
    };

    let d1 = super::init_d1(&env).await?;
    if let Err(e) = d1.require_seller(seller_id).await {
        return error_response(e);
    }

    // Value currently observed for this metric/period, before the new
    // override takes effect
    let resolver = super::build_resolver(&d1, &env);
    let outcome = resolver.resolve(seller_id, &[period]).await;
    let original_value = outcome
        .views
        .get(&period)
        .and_then(|view| view.vector.get(metric_key))
        .unwrap_or_else(|| metric_key.default_value());

    match OverrideStore::upsert(
        d1.as_ref(),
        seller_id,
        metric_key,
        period,
        body.value,
        original_value,
    )
    .await
    {
        Ok(override_row) => {
            log_info!(
                "Override upserted",
                serde_json::json!({
                    "seller_id": seller_id,
                    "metric_key": metric_key.as_str(),
                    "period": period.as_str(),
                    "admin": caller.user_id,
                })
            );
            Response::from_json(&ApiResponse::success(override_row))
        }
        Err(e) => error_response(e),
    }
}

/// `DELETE /api/v1/admin/sellers/:id/overrides/:metricKey`
///
/// Removes the metric's overrides across all periods; resolution falls
/// back to computed/synthetic data.
pub async fn handle_delete_override(
    req: Request,
    env: Env,
    seller_id: &str,
    metric_key: &str,
) -> Result<Response> {
    if let Err(e) = admin_caller(&req) {
        return error_response(e);
    }
    let metric_key = match MetricKey::parse(metric_key) {
        Ok(key) => key,
        Err(e) => return error_response(e),
    };

    let d1 = super::init_d1(&env).await?;
    match OverrideStore::delete(d1.as_ref(), seller_id, metric_key).await {
        Ok(()) => Response::from_json(&ApiResponse::success(serde_json::json!({
            "sellerId": seller_id,
            "metricKey": metric_key.as_str(),
            "deleted": true,
        }))),
        Err(e) => error_response(e),
    }
}

/// `POST /api/v1/admin/sellers/:id/overrides/:metricKey/clear`
///
/// Zeroes the override value but keeps the rows; distinct from delete.
pub async fn handle_clear_override(
    req: Request,
    env: Env,
    seller_id: &str,
    metric_key: &str,
) -> Result<Response> {
    if let Err(e) = admin_caller(&req) {
        return error_response(e);
    }
    let metric_key = match MetricKey::parse(metric_key) {
        Ok(key) => key,
        Err(e) => return error_response(e),
    };

    let d1 = super::init_d1(&env).await?;
    match OverrideStore::clear(d1.as_ref(), seller_id, metric_key).await {
        Ok(()) => Response::from_json(&ApiResponse::success(serde_json::json!({
            "sellerId": seller_id,
            "metricKey": metric_key.as_str(),
            "cleared": true,
        }))),
        Err(e) => error_response(e),
    }
}

/// `PUT /api/v1/admin/sellers/:id/snapshots/:timeframe`
///
/// Body is the metric vector itself. Unknown keys are dropped on parse;
/// values are not range-checked here (overrides are the validated
/// per-metric write path).
pub async fn handle_upsert_snapshot(
    mut req: Request,
    env: Env,
    seller_id: &str,
    timeframe: &str,
) -> Result<Response> {
    let caller = match admin_caller(&req) {
        Ok(caller) => caller,
        Err(e) => return error_response(e),
    };
    let timeframe = match Timeframe::parse(timeframe) {
        Ok(tf) => tf,
        Err(e) => return error_response(e),
    };

    let vector: MetricVector = match req.json().await {
        Ok(vector) => vector,
        Err(e) => {
            return error_response(ShopError::parse_error(format!(
                "Invalid snapshot vector: {}",
                e
            )))
        }
    };

    let d1 = super::init_d1(&env).await?;
    if let Err(e) = d1.require_seller(seller_id).await {
        return error_response(e);
    }

    match SnapshotStore::upsert(d1.as_ref(), seller_id, timeframe, vector).await {
        Ok(snapshot) => {
            log_info!(
                "Snapshot upserted",
                serde_json::json!({
                    "seller_id": seller_id,
                    "timeframe": timeframe.as_str(),
                    "admin": caller.user_id,
                })
            );
            Response::from_json(&ApiResponse::success(snapshot))
        }
        Err(e) => error_response(e),
    }
}

/// `DELETE /api/v1/admin/sellers/:id/snapshots[?timeframe=...]`
///
/// Without the query parameter, deletes every snapshot the seller has.
pub async fn handle_delete_snapshots(req: Request, env: Env, seller_id: &str) -> Result<Response> {
    if let Err(e) = admin_caller(&req) {
        return error_response(e);
    }

    let timeframe = match req.url() {
        Ok(url) => match query_param(&url, "timeframe") {
            Some(raw) => match Timeframe::parse(&raw) {
                Ok(tf) => Some(tf),
                Err(e) => return error_response(e),
            },
            None => None,
        },
        Err(_) => None,
    };

    let d1 = super::init_d1(&env).await?;
    match SnapshotStore::delete(d1.as_ref(), seller_id, timeframe).await {
        Ok(()) => Response::from_json(&ApiResponse::success(serde_json::json!({
            "sellerId": seller_id,
            "timeframe": timeframe.map(|tf| tf.as_str()),
            "deleted": true,
        }))),
        Err(e) => error_response(e),
    }
}
