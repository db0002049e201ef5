//! HTTP security headers middleware
//!
//! Adds standard security headers to every HTTP response to protect against
//! common web vulnerabilities such as clickjacking and MIME sniffing.

use axum::{extract::Request, middleware::Next, response::Response};
use http::HeaderValue;

/// Middleware that injects HTTP security headers into every response.
///
/// Headers applied:
/// - `X-Frame-Options: SAMEORIGIN` — prevents clickjacking
/// - `X-Content-Type-Options: nosniff` — prevents MIME-type sniffing
/// - `Referrer-Policy: no-referrer` — suppresses referrer info
/// - `Cross-Origin-Resource-Policy: cross-origin` — uploaded media stays
///   embeddable from other origins
pub async fn security_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert("x-frame-options", HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "cross-origin-resource-policy",
        HeaderValue::from_static("cross-origin"),
    );

    response
}
