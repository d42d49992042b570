// Deprecated legacy-analytics admin surface. Reads stay supported for
// audit display; writes still work but new edits should go through the
// override endpoints.

use worker::{Env, Request, Response, Result};

use crate::log_warn;
use crate::middleware::{extract_caller, require_admin};
use crate::responses::{error_response, ApiResponse};
use crate::services::core::metrics::LegacyBlobStore;
use crate::types::{LegacyAuditEntry, MetricVector};
use crate::utils::{current_timestamp_ms, ShopError};

/// `GET /api/v1/admin/sellers/:id/legacy-analytics`
///
/// Returns the embedded blob's metrics (null when absent or empty) and
/// its audit trail.
pub async fn handle_get_legacy_analytics(
    req: Request,
    env: Env,
    seller_id: &str,
) -> Result<Response> {
    let caller = match extract_caller(&req) {
        Ok(caller) => caller,
        Err(e) => return error_response(e),
    };
    if let Err(e) = require_admin(&caller) {
        return error_response(e);
    }

    let d1 = super::init_d1(&env).await?;
    if let Err(e) = d1.require_seller(seller_id).await {
        return error_response(e);
    }

    match LegacyBlobStore::read(d1.as_ref(), seller_id).await {
        Ok((metrics, audit_trail)) => Response::from_json(&ApiResponse::success(
            serde_json::json!({
                "metrics": metrics,
                "auditTrail": audit_trail,
            }),
        )),
        Err(e) => error_response(e),
    }
}

/// `POST /api/v1/admin/sellers/:id/legacy-analytics`
///
/// Body is a partial metric vector. Merges into the existing blob and
/// appends an audit entry naming the caller and the changed fields.
pub async fn handle_write_legacy_analytics(
    mut req: Request,
    env: Env,
    seller_id: &str,
) -> Result<Response> {
    let caller = match extract_caller(&req) {
        Ok(caller) => caller,
        Err(e) => return error_response(e),
    };
    if let Err(e) = require_admin(&caller) {
        return error_response(e);
    }

    let partial: MetricVector = match req.json().await {
        Ok(vector) => vector,
        Err(e) => {
            return error_response(ShopError::parse_error(format!(
                "Invalid metric vector: {}",
                e
            )))
        }
    };
    if partial.is_empty() {
        return error_response(ShopError::validation_error(
            "Body must contain at least one known metric key",
        ));
    }

    let d1 = super::init_d1(&env).await?;
    if let Err(e) = d1.require_seller(seller_id).await {
        return error_response(e);
    }

    let entry = LegacyAuditEntry {
        changed_fields: partial.keys().map(|k| k.as_str().to_string()).collect(),
        actor: caller.user_id.clone(),
        timestamp: current_timestamp_ms(),
    };

    log_warn!(
        "Deprecated legacy-analytics write",
        serde_json::json!({
            "seller_id": seller_id,
            "admin": caller.user_id,
            "changed_fields": entry.changed_fields,
        })
    );

    match LegacyBlobStore::write(d1.as_ref(), seller_id, &partial, entry).await {
        Ok(()) => Response::from_json(&ApiResponse::success(serde_json::json!({
            "sellerId": seller_id,
            "written": true,
        }))),
        Err(e) => error_response(e),
    }
}
