//! Request tracking middleware.
//!
//! This module provides:
//! - [`RequestId`]: Newtype for correlation ID extraction/generation
//! - [`extract_or_generate_request_id`]: Extract X-Request-ID header or generate UUID v7
//! - [`RequestTrackingLayer`]: Tower middleware that opens a request span,
//!   echoes the request ID, records HTTP metrics, and logs the error code of
//!   failed requests
//!
//! The layer reads the [`NormalizedError`] that
//! [`ApiFailure`](crate::ApiFailure) stores in response extensions, so the
//! completion log line of a failed request carries its external code.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{HeaderMap, HeaderValue, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

use faultline_lib::NormalizedError;

use crate::metrics::status_bucket;

/// Header carrying the request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
///
/// Empty or non-UTF-8 header values are replaced by a generated ID.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Strip the query string from a path for metric labels.
fn metric_path(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

/// Tower layer for request tracking.
///
/// Records:
/// - `http_requests_total`: Counter by method, path, status bucket
/// - `http_request_duration_seconds`: Histogram by method, path
#[derive(Debug, Clone, Default)]
pub struct RequestTrackingLayer;

impl<S> Layer<S> for RequestTrackingLayer {
    type Service = RequestTracking<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestTracking { inner }
    }
}

/// Middleware service produced by [`RequestTrackingLayer`].
#[derive(Debug, Clone)]
pub struct RequestTracking<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestTracking<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = TrackingFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let method = req.method().to_string();
        let path = metric_path(req.uri().path()).to_string();
        let request_id = extract_or_generate_request_id(req.headers());
        req.extensions_mut().insert(request_id.clone());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            path = %path,
        );
        span.in_scope(|| tracing::debug!("handling request"));

        let inner = span.in_scope(|| self.inner.call(req));

        TrackingFuture {
            inner,
            start: Instant::now(),
            method,
            path,
            request_id,
            span,
        }
    }
}

pin_project! {
    /// Future wrapper that records the outcome on completion.
    pub struct TrackingFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: String,
        path: String,
        request_id: RequestId,
        span: Span,
    }
}

impl<F, ResBody, E> Future for TrackingFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        let mut result = match this.inner.poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(result) => result,
        };

        let elapsed = this.start.elapsed();
        let status_label = match &result {
            Ok(response) => status_bucket(response.status().as_u16()),
            Err(_) => "5xx",
        };
        metrics::counter!(
            "http_requests_total",
            "method" => this.method.clone(),
            "path" => this.path.clone(),
            "status" => status_label
        )
        .increment(1);
        metrics::histogram!(
            "http_request_duration_seconds",
            "method" => this.method.clone(),
            "path" => this.path.clone()
        )
        .record(elapsed.as_secs_f64());

        let latency_ms = elapsed.as_secs_f64() * 1000.0;
        match &mut result {
            Ok(response) => {
                if let Ok(value) = HeaderValue::from_str(this.request_id.as_str()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                let status = response.status().as_u16();
                match response.extensions().get::<NormalizedError>() {
                    Some(error) => tracing::info!(
                        status = status,
                        latency_ms = latency_ms,
                        error_code = error.external_code().as_deref().unwrap_or("-"),
                        masked = error.is_masked(),
                        "request completed with error"
                    ),
                    None => tracing::info!(
                        status = status,
                        latency_ms = latency_ms,
                        "request completed"
                    ),
                }
            }
            Err(_) => tracing::error!(latency_ms = latency_ms, "request failed"),
        }

        Poll::Ready(result)
    }
}
