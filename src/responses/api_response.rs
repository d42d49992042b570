use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::utils::ShopError;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: u64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: now_ms(),
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            timestamp: now_ms(),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| {
            // Fallback to zero if system time is before Unix epoch
            std::time::Duration::from_secs(0)
        })
        .as_millis() as u64
}

/// Map a ShopError onto the response envelope with its HTTP status
pub fn error_response(err: ShopError) -> worker::Result<worker::Response> {
    let status = err.status.unwrap_or(500);
    let response = ApiResponse::<()>::error(err.message);
    Ok(worker::Response::from_json(&response)?.with_status(status))
}
