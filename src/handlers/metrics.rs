use worker::{Env, Request, Response, Result};

use crate::log_info;
use crate::middleware::{extract_caller, require_seller_access};
use crate::responses::{error_response, ApiResponse};
use crate::types::Timeframe;
use crate::utils::{parse_comma_list, query_param, ShopResult};

/// Resolved metrics for a seller across one or more timeframes.
///
/// `GET /api/v1/sellers/:id/metrics?timeframes=today,last7Days`
/// Defaults to all four timeframes when the parameter is absent.
pub async fn handle_get_seller_metrics(req: Request, env: Env, seller_id: &str) -> Result<Response> {
    let caller = match extract_caller(&req) {
        Ok(caller) => caller,
        Err(e) => return error_response(e),
    };
    if let Err(e) = require_seller_access(&caller, seller_id) {
        return error_response(e);
    }

    let timeframes = match parse_timeframes(&req) {
        Ok(tfs) => tfs,
        Err(e) => return error_response(e),
    };

    let d1 = super::init_d1(&env).await?;
    if let Err(e) = d1.require_seller(seller_id).await {
        return error_response(e);
    }

    let resolver = super::build_resolver(&d1, &env);
    let outcome = resolver.resolve(seller_id, &timeframes).await;

    log_info!(
        "Seller metrics resolved",
        serde_json::json!({
            "seller_id": seller_id,
            "caller": caller.user_id,
            "timeframes": timeframes.len(),
            "partial_errors": outcome.errors.len(),
        })
    );

    Response::from_json(&ApiResponse::success(outcome))
}

fn parse_timeframes(req: &Request) -> ShopResult<Vec<Timeframe>> {
    let url = req.url().map_err(worker_err)?;
    match query_param(&url, "timeframes") {
        Some(raw) => parse_comma_list(&raw)
            .iter()
            .map(|s| Timeframe::parse(s))
            .collect(),
        None => Ok(Timeframe::ALL.to_vec()),
    }
}

fn worker_err(e: worker::Error) -> crate::utils::ShopError {
    crate::utils::ShopError::internal_error(format!("Bad request URL: {}", e))
}
