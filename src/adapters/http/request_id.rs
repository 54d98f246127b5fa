//! Request correlation middleware.
//!
//! Tags every request with a fresh UUID in `X-Request-ID` (request and
//! response), logs who asked for what, and runs the rest of the stack
//! inside a span carrying the id so every log line of the scrape can be
//! correlated.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderName, HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// Correlation header set on both request and response.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// `axum::middleware::from_fn` entry point.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    let value = HeaderValue::from_str(&id).ok();

    if let Some(value) = &value {
        req.headers_mut().insert(X_REQUEST_ID, value.clone());
    }

    let span = info_span!("request", request_id = %id);
    span.in_scope(|| {
        let remote = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_default();

        info!(
            method = %req.method(),
            request_url = %req.uri(),
            proto = ?req.version(),
            user_agent = header_str(&req, &header::USER_AGENT),
            referer = header_str(&req, &header::REFERER),
            remote = %remote,
            "request"
        );
    });

    let mut response = next.run(req).instrument(span).await;

    if let Some(value) = value {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }

    response
}

fn header_str<'a>(req: &'a Request, name: &HeaderName) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
