//! Request middleware

pub mod remote_user;

pub use remote_user::remote_user;

use axum::http::HeaderMap;

/// Whether the request was issued by HTMX
#[must_use]
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        == Some("true")
}
