//! Security headers middleware.
//!
//! Adds standard security headers to every response. HSTS is opt-in via
//! the `BANKOPS__SECURITY__HSTS_ENABLED` environment variable because the
//! service commonly sits behind a TLS-terminating proxy.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

mod headers {
    pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
    pub const X_FRAME_OPTIONS: &str = "x-frame-options";
    pub const X_XSS_PROTECTION: &str = "x-xss-protection";
    pub const STRICT_TRANSPORT_SECURITY: &str = "strict-transport-security";
    pub const REFERRER_POLICY: &str = "referrer-policy";
}

/// Adds security headers to all responses.
pub async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;

    let response_headers = response.headers_mut();

    response_headers.insert(
        HeaderName::from_static(headers::X_CONTENT_TYPE_OPTIONS),
        HeaderValue::from_static("nosniff"),
    );
    response_headers.insert(
        HeaderName::from_static(headers::X_FRAME_OPTIONS),
        HeaderValue::from_static("DENY"),
    );
    response_headers.insert(
        HeaderName::from_static(headers::X_XSS_PROTECTION),
        HeaderValue::from_static("1; mode=block"),
    );
    response_headers.insert(
        HeaderName::from_static(headers::REFERRER_POLICY),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    let hsts_enabled = std::env::var("BANKOPS__SECURITY__HSTS_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    if hsts_enabled {
        response_headers.insert(
            HeaderName::from_static(headers::STRICT_TRANSPORT_SECURITY),
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, middleware, routing::get, Router};
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let app = Router::new()
            .route("/", get(ok_handler))
            .layer(middleware::from_fn(security_headers_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers.get(headers::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(headers.get(headers::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(headers::X_XSS_PROTECTION).unwrap(), "1; mode=block");
        assert_eq!(
            headers.get(headers::REFERRER_POLICY).unwrap(),
            "strict-origin-when-cross-origin"
        );
    }

    #[tokio::test]
    async fn test_hsts_absent_by_default() {
        let app = Router::new()
            .route("/", get(ok_handler))
            .layer(middleware::from_fn(security_headers_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(headers::STRICT_TRANSPORT_SECURITY)
            .is_none());
    }
}
