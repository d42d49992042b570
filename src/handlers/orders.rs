// Order listing/detail endpoints backed by the synthetic order overlay.
// Mutations (status update, cancel) touch real orders only.

use serde::Deserialize;
use worker::{Env, Request, Response, Result, Url};

use crate::middleware::{extract_caller, require_seller_access, Caller};
use crate::responses::{error_response, ApiResponse};
use crate::types::{OrderDetail, OrderFilter, OrderStatus};
use crate::utils::{query_param, ShopError, ShopResult};

/// `GET /api/v1/sellers/:id/orders`
///
/// Query parameters: `status`, `dateFrom`, `dateTo`, `search`, `page`,
/// `pageSize`. Returns the merged real + synthetic listing.
pub async fn handle_list_orders(req: Request, env: Env, seller_id: &str) -> Result<Response> {
    let caller = match extract_caller(&req) {
        Ok(caller) => caller,
        Err(e) => return error_response(e),
    };
    if let Err(e) = require_seller_access(&caller, seller_id) {
        return error_response(e);
    }

    let url = req.url()?;
    let (filter, page, page_size) = match parse_listing_query(&url) {
        Ok(parsed) => parsed,
        Err(e) => return error_response(e),
    };

    let d1 = super::init_d1(&env).await?;
    if let Err(e) = d1.require_seller(seller_id).await {
        return error_response(e);
    }

    let overlay = super::build_order_overlay(&d1, &env);
    match overlay.list_orders(seller_id, &filter, page, page_size).await {
        Ok(page) => Response::from_json(&ApiResponse::success(page)),
        Err(e) => error_response(e),
    }
}

/// `GET /api/v1/orders/:id` - real storage first, synthetic on miss
pub async fn handle_get_order(req: Request, env: Env, order_id: &str) -> Result<Response> {
    let caller = match extract_caller(&req) {
        Ok(caller) => caller,
        Err(e) => return error_response(e),
    };

    let d1 = super::init_d1(&env).await?;
    let overlay = super::build_order_overlay(&d1, &env);

    let detail = match overlay.get_order(order_id).await {
        Ok(detail) => detail,
        Err(e) => return error_response(e),
    };
    if let Err(e) = require_order_access(&caller, &detail) {
        return error_response(e);
    }

    Response::from_json(&ApiResponse::success(detail))
}

#[derive(Deserialize)]
struct UpdateStatusRequest {
    status: String,
}

/// `POST /api/v1/orders/:id/status` - real orders only; synthetic orders
/// are read-only display records and reject the write.
pub async fn handle_update_order_status(
    mut req: Request,
    env: Env,
    order_id: &str,
) -> Result<Response> {
    let caller = match extract_caller(&req) {
        Ok(caller) => caller,
        Err(e) => return error_response(e),
    };

    let body: UpdateStatusRequest = match req.json().await {
        Ok(body) => body,
        Err(e) => return error_response(ShopError::parse_error(format!("Invalid body: {}", e))),
    };
    let status = match OrderStatus::parse(&body.status) {
        Ok(status) => status,
        Err(e) => return error_response(e),
    };

    let d1 = super::init_d1(&env).await?;
    let overlay = super::build_order_overlay(&d1, &env);

    // Ownership check needs the order's seller before mutating
    let detail = match overlay.get_order(order_id).await {
        Ok(detail) => detail,
        Err(e) => return error_response(e),
    };
    if let Err(e) = require_order_access(&caller, &detail) {
        return error_response(e);
    }

    match overlay.update_status(order_id, status).await {
        Ok(()) => Response::from_json(&ApiResponse::success(serde_json::json!({
            "orderId": order_id,
            "status": status.as_str(),
        }))),
        Err(e) => error_response(e),
    }
}

/// `POST /api/v1/orders/:id/cancel`
pub async fn handle_cancel_order(req: Request, env: Env, order_id: &str) -> Result<Response> {
    let caller = match extract_caller(&req) {
        Ok(caller) => caller,
        Err(e) => return error_response(e),
    };

    let d1 = super::init_d1(&env).await?;
    let overlay = super::build_order_overlay(&d1, &env);

    let detail = match overlay.get_order(order_id).await {
        Ok(detail) => detail,
        Err(e) => return error_response(e),
    };
    if let Err(e) = require_order_access(&caller, &detail) {
        return error_response(e);
    }

    match overlay.cancel(order_id).await {
        Ok(()) => Response::from_json(&ApiResponse::success(serde_json::json!({
            "orderId": order_id,
            "status": OrderStatus::Cancelled.as_str(),
        }))),
        Err(e) => error_response(e),
    }
}

fn require_order_access(caller: &Caller, detail: &OrderDetail) -> ShopResult<()> {
    require_seller_access(caller, &detail.order.seller_id)
}

fn parse_listing_query(url: &Url) -> ShopResult<(OrderFilter, u32, u32)> {
    let mut filter = OrderFilter::default();

    if let Some(raw) = query_param(url, "status") {
        filter.status = Some(OrderStatus::parse(&raw)?);
    }
    if let Some(raw) = query_param(url, "dateFrom") {
        filter.date_from = Some(parse_ms(&raw, "dateFrom")?);
    }
    if let Some(raw) = query_param(url, "dateTo") {
        filter.date_to = Some(parse_ms(&raw, "dateTo")?);
    }
    filter.search = query_param(url, "search").filter(|s| !s.is_empty());

    let page = query_param(url, "page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);
    let page_size = query_param(url, "pageSize")
        .and_then(|v| v.parse().ok())
        .unwrap_or(20);

    Ok((filter, page, page_size))
}

fn parse_ms(raw: &str, field: &str) -> ShopResult<i64> {
    raw.parse()
        .map_err(|_| ShopError::invalid_field(field, format!("{} must be epoch milliseconds", field)))
}
