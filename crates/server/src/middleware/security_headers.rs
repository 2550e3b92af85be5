//! Security headers for a JSON API.
//!
//! Responses are mostly JSON, plus whatever the optional static directory
//! serves. No CSP is set here since it would depend on that frontend.

use axum::{
    extract::Request,
    http::{
        HeaderValue,
        header::{self, HeaderName},
    },
    middleware::Next,
    response::Response,
};

/// Headers set on every response.
const ALWAYS: [(&str, &str); 4] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("cross-origin-opener-policy", "same-origin"),
];

/// Add security headers to all responses, and `Cache-Control: no-store`
/// to everything under `/api/` so tokens and admin data are never cached.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let is_api = request.uri().path().starts_with("/api/");
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in ALWAYS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    if is_api {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::{Router, body::Body, middleware::from_fn, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn headers_for(path: &str) -> axum::http::HeaderMap {
        let app = Router::new()
            .route("/api/ping", get(|| async { "pong" }))
            .route("/index.html", get(|| async { "<html></html>" }))
            .layer(from_fn(security_headers_middleware));
        let response = app
            .oneshot(axum::http::Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.headers().clone()
    }

    #[tokio::test]
    async fn test_api_responses_are_not_cacheable() {
        let headers = headers_for("/api/ping").await;
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn test_static_responses_keep_default_caching() {
        let headers = headers_for("/index.html").await;
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert!(!headers.contains_key(header::CACHE_CONTROL));
    }
}
