use worker::Request;

use crate::utils::{ShopError, ShopResult};

/// Role supplied by the external authentication collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    Admin,
    Seller,
}

/// Identity of the current caller, extracted from request headers.
///
/// Session issuance and verification are external concerns; this service
/// only consumes the identity headers the auth layer injects.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: String,
    pub role: CallerRole,
}

/// Extract the caller identity from `X-User-ID` / `X-User-Role` headers
pub fn extract_caller(req: &Request) -> ShopResult<Caller> {
    let user_id = req
        .headers()
        .get("X-User-ID")
        .map_err(|e| ShopError::internal_error(format!("header read failed: {}", e)))?
        .ok_or_else(|| ShopError::authentication_error("Missing X-User-ID header"))?;

    let role = match req
        .headers()
        .get("X-User-Role")
        .ok()
        .flatten()
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "admin" => CallerRole::Admin,
        _ => CallerRole::Seller,
    };

    Ok(Caller { user_id, role })
}

/// Admin-only routes (override/snapshot writes, legacy audit views)
pub fn require_admin(caller: &Caller) -> ShopResult<()> {
    if caller.role != CallerRole::Admin {
        return Err(ShopError::access_denied("Admin access required"));
    }
    Ok(())
}

/// Seller routes: the caller must own the seller id or be an admin
pub fn require_seller_access(caller: &Caller, seller_id: &str) -> ShopResult<()> {
    if caller.role == CallerRole::Admin || caller.user_id == seller_id {
        return Ok(());
    }
    Err(ShopError::access_denied(
        "Not authorized for this seller's data",
    ))
}
