//! HTTP boundary for faultline errors.
//!
//! This crate is the framework edge of the error layer. Handlers return
//! `Result<T, ApiFailure>` and use `?` on any error; the conversion runs
//! [`faultline_lib::normalize`], so every failure leaves the service as one
//! catalog entry or the masked internal-error fallback.
//!
//! - [`ApiFailure`] / [`ErrorBody`]: error responses with the stable
//!   `{status, msg, detail, code}` body
//! - [`panic_response`] / [`not_found_fallback`]: boundary handlers for panics
//!   and unmatched routes
//! - [`logging`]: Structured JSON logging setup
//! - [`metrics`]: Prometheus metrics for error responses
//! - [`middleware`]: Request ID propagation and request tracking
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler  -> Result<T, ApiFailure>                     │
//! │    `?` on ApiError / rusqlite / anything else               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ApiFailure::from  -> faultline_lib::normalize              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  IntoResponse  -> status + ErrorBody JSON, log, metrics     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides a router exercising every normalization
//! branch. Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod error_response;
pub mod logging;
pub mod metrics;
pub mod middleware;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error_response::{not_found_fallback, panic_response, ApiFailure, ErrorBody};
pub use logging::{init_logging, LogFormat, LoggingConfig, LoggingError};
pub use metrics::{
    init_metrics, metrics_handler, record_error_response, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, RequestId, RequestTrackingLayer};
