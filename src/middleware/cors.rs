use worker::{Response, Result};

/// Add CORS headers to response
pub fn add_cors_headers(mut response: Response) -> Result<Response> {
    let headers = response.headers_mut();

    headers.set("Access-Control-Allow-Origin", "*")?;
    headers.set(
        "Access-Control-Allow-Methods",
        "GET, POST, PUT, DELETE, OPTIONS",
    )?;
    headers.set(
        "Access-Control-Allow-Headers",
        "Content-Type, Authorization, X-User-ID, X-User-Role",
    )?;
    headers.set("Access-Control-Max-Age", "86400")?;

    Ok(response)
}
