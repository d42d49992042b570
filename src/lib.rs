use worker::*;

// Module declarations
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod services;
pub mod types;
pub mod utils;

use handlers::*;
use middleware::add_cors_headers;

#[cfg(target_arch = "wasm32")]
use worker::console_log;

#[cfg(not(target_arch = "wasm32"))]
macro_rules! console_log {
    ($($arg:tt)*) => {
        println!($($arg)*);
    };
}

#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    utils::logger::set_panic_hook();

    let url = req.url()?;
    let path = url.path().to_string();
    let method = req.method();

    console_log!("🌐 Request: {} {}", method, path);

    // Handle preflight requests
    if method == Method::Options {
        return add_cors_headers(Response::empty()?);
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let response = match (method.clone(), segments.as_slice()) {
        (Method::Get, ["api", "v1", "health"]) => handle_health(req, env).await,

        // Seller metrics (resolution engine)
        (Method::Get, ["api", "v1", "sellers", seller_id, "metrics"]) => {
            handle_get_seller_metrics(req, env, seller_id).await
        }

        // Order overlay
        (Method::Get, ["api", "v1", "sellers", seller_id, "orders"]) => {
            handle_list_orders(req, env, seller_id).await
        }
        (Method::Get, ["api", "v1", "orders", order_id]) => {
            handle_get_order(req, env, order_id).await
        }
        (Method::Post, ["api", "v1", "orders", order_id, "status"]) => {
            handle_update_order_status(req, env, order_id).await
        }
        (Method::Post, ["api", "v1", "orders", order_id, "cancel"]) => {
            handle_cancel_order(req, env, order_id).await
        }

        // Admin: per-metric overrides
        (Method::Put, ["api", "v1", "admin", "sellers", seller_id, "overrides"]) => {
            handle_upsert_override(req, env, seller_id).await
        }
        (Method::Delete, ["api", "v1", "admin", "sellers", seller_id, "overrides", metric_key]) => {
            handle_delete_override(req, env, seller_id, metric_key).await
        }
        (
            Method::Post,
            ["api", "v1", "admin", "sellers", seller_id, "overrides", metric_key, "clear"],
        ) => handle_clear_override(req, env, seller_id, metric_key).await,

        // Admin: synthetic snapshots
        (Method::Put, ["api", "v1", "admin", "sellers", seller_id, "snapshots", timeframe]) => {
            handle_upsert_snapshot(req, env, seller_id, timeframe).await
        }
        (Method::Delete, ["api", "v1", "admin", "sellers", seller_id, "snapshots"]) => {
            handle_delete_snapshots(req, env, seller_id).await
        }

        // Admin: deprecated legacy analytics blob
        (Method::Get, ["api", "v1", "admin", "sellers", seller_id, "legacy-analytics"]) => {
            handle_get_legacy_analytics(req, env, seller_id).await
        }
        (Method::Post, ["api", "v1", "admin", "sellers", seller_id, "legacy-analytics"]) => {
            handle_write_legacy_analytics(req, env, seller_id).await
        }

        _ => {
            console_log!("❌ Route not found: {} {}", method, path);
            Response::error("Not Found", 404)
        }
    };

    match response {
        Ok(resp) => add_cors_headers(resp),
        Err(e) => response_from_worker_error(e),
    }
}

// Surface unexpected worker errors in the same envelope as handler errors
fn response_from_worker_error(e: Error) -> Result<Response> {
    let resp = responses::error_response(utils::ShopError::internal_error(format!(
        "Unhandled error: {}",
        e
    )))?;
    add_cors_headers(resp)
}
