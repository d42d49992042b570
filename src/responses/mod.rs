pub mod api_response;

pub use api_response::{error_response, ApiResponse};
