//! Request logging middleware for HTTP request/response tracking.
//!
//! Every request gets a UUID, echoed back in the `x-request-id` header, and one
//! structured log line on completion with method, path, status, and timing.

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
};
use futures::future::{Ready, ok};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use uuid::Uuid;

use super::categorize_performance;

/// Response header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Requests slower than this are logged as a warning.
const SLOW_REQUEST_MS: u128 = 2000;

/// Request logging middleware that captures request/response data.
///
/// This middleware logs:
/// - Request method and path
/// - Response status codes and timing
/// - Client address, user agent, and declared body size
#[derive(Clone)]
pub struct RequestLoggingMiddleware;

impl RequestLoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RequestLoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLoggingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestLoggingService { service })
    }
}

/// Request logging service implementation.
pub struct RequestLoggingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let request_id = Uuid::new_v4();

        let method = req.method().to_string();
        let path = req.path().to_string();
        let remote_addr = extract_real_ip(&req);
        let user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let content_length = req
            .headers()
            .get("content-length")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);

        tracing::debug!(
            request_id = %request_id,
            http.method = %method,
            http.path = %path,
            http.remote_addr = %remote_addr,
            http.user_agent = %user_agent,
            http.content_length = content_length,
            "request received"
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut response = fut.await?;
            let duration = start_time.elapsed();
            let duration_ms = duration.as_millis();
            let status_code = response.status().as_u16();

            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }

            let performance = categorize_performance(duration_ms as u64);
            macro_rules! log_response {
                ($level:ident) => {
                    tracing::$level!(
                        request_id = %request_id,
                        http.method = %method,
                        http.path = %path,
                        http.status_code = status_code,
                        http.content_length = content_length,
                        duration_ms = duration_ms as u64,
                        performance,
                        "{} {} {} {}ms",
                        method,
                        path,
                        status_code,
                        duration_ms
                    )
                };
            }

            match status_code {
                500..=599 => log_response!(error),
                400..=499 => log_response!(warn),
                _ => log_response!(info),
            }

            if duration_ms > SLOW_REQUEST_MS {
                tracing::warn!(
                    request_id = %request_id,
                    duration_ms = duration_ms as u64,
                    threshold_ms = SLOW_REQUEST_MS as u64,
                    "Slow request detected: {} {} ({}ms)",
                    method,
                    path,
                    duration_ms
                );
            }

            Ok(response)
        })
    }
}

/// Extract real IP address considering proxy headers.
pub fn extract_real_ip(req: &ServiceRequest) -> String {
    let headers_to_check = [
        "x-forwarded-for",
        "x-real-ip",
        "x-client-ip",
        "cf-connecting-ip", // Cloudflare
        "true-client-ip",   // Cloudflare Enterprise
    ];

    for header_name in &headers_to_check {
        if let Some(header_value) = req.headers().get(*header_name) {
            if let Ok(ip_str) = header_value.to_str() {
                // Take the first IP if multiple are present (comma-separated)
                let first_ip = ip_str.split(',').next().unwrap_or("").trim();
                if !first_ip.is_empty() && first_ip != "unknown" {
                    return first_ip.to_string();
                }
            }
        }
    }

    req.connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string()
}
