//! Error responses at the framework edge.
//!
//! Every error body has the same shape, whatever produced it:
//!
//! ```json
//! {"status":400,"msg":"192.168.0.300 is invalid.","detail":"invalid IP : 192.168.0.300","code":"4000010"}
//! ```
//!
//! Framework exceptions carry no catalog entry, so `msg` and `code` are null.
//! Server-side faults always show the generic fallback text; their causes are
//! logged, never serialized.

use std::any::Any;
use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use faultline_lib::{normalize, HttpException, NormalizedError};

use crate::metrics::record_error_response;

/// Client-visible error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// HTTP status code.
    pub status: u16,

    /// User-facing message, if the error has one.
    pub msg: Option<String>,

    /// Developer-facing detail.
    pub detail: Option<String>,

    /// External error code (`"4000010"`); absent for framework exceptions.
    pub code: Option<String>,
}

impl From<&NormalizedError> for ErrorBody {
    fn from(error: &NormalizedError) -> Self {
        Self {
            status: error.status_code().as_u16(),
            msg: error.user_message().map(str::to_owned),
            detail: error.developer_detail().map(str::to_owned),
            code: error.external_code(),
        }
    }
}

/// Error type for axum handlers.
///
/// Any error convertible into [`anyhow::Error`] converts into `ApiFailure`
/// through [`normalize`], so handlers can use `?` on catalog entries,
/// database errors, and anything else alike.
///
/// # Example
///
/// ```
/// use faultline_lib::ErrorKind;
/// use faultline_service_shared::ApiFailure;
///
/// async fn get_user(id: u64) -> Result<String, ApiFailure> {
///     if id == 0 {
///         return Err(ErrorKind::NotFoundUser.entry().into());
///     }
///     Ok(format!("user-{}", id))
/// }
/// ```
pub struct ApiFailure(NormalizedError);

impl ApiFailure {
    /// A framework exception passed through with its own status.
    pub fn http(status: StatusCode, detail: impl Into<String>) -> Self {
        Self(NormalizedError::Http(
            HttpException::new(status).with_detail(detail),
        ))
    }

    /// A rejected JSON body, passed through with the rejection's own status
    /// and text.
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        Self::http(rejection.status(), rejection.body_text())
    }

    /// The normalized error this failure will respond with.
    pub fn normalized(&self) -> &NormalizedError {
        &self.0
    }

    pub fn into_inner(self) -> NormalizedError {
        self.0
    }
}

impl<E> From<E> for ApiFailure
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        Self(normalize(error))
    }
}

impl fmt::Debug for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiFailure").field(&self.0).finish()
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        report(&self.0);

        let status = self.0.status_code();
        let mut response = (status, Json(ErrorBody::from(&self.0))).into_response();
        // Picked up by RequestTrackingLayer for the completion log line.
        response.extensions_mut().insert(self.0);
        response
    }
}

fn report(error: &NormalizedError) {
    let status = error.status_code().as_u16();
    let code = error.external_code();
    record_error_response(code.as_deref().unwrap_or("none"), status);

    if error.status_code().is_server_error() {
        error!(
            status = status,
            code = code.as_deref().unwrap_or("-"),
            cause = %cause_chain(error),
            "request failed with server error"
        );
    } else {
        warn!(
            status = status,
            code = code.as_deref().unwrap_or("-"),
            detail = error.developer_detail().unwrap_or("-"),
            "request rejected"
        );
    }
}

/// Render the error and its causes as `outer: inner: root`.
fn cause_chain(error: &NormalizedError) -> String {
    let mut parts = Vec::new();
    let mut current: Option<&(dyn std::error::Error + 'static)> = std::error::Error::source(error);
    while let Some(cause) = current {
        parts.push(cause.to_string());
        current = cause.source();
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(": ")
    }
}

/// Response for a panicking handler, for use with
/// `tower_http::catch_panic::CatchPanicLayer::custom`.
///
/// The panic payload is logged; the client sees the generic fallback.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    };

    ApiFailure::from(anyhow::anyhow!("handler panicked: {}", message)).into_response()
}

/// Fallback handler for unmatched routes.
pub async fn not_found_fallback(uri: Uri) -> ApiFailure {
    ApiFailure::http(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultline_lib::entry::{INTERNAL_SERVER_ERROR_DETAIL, INTERNAL_SERVER_ERROR_MSG};
    use faultline_lib::ErrorKind;

    #[test]
    fn test_error_body_from_client_error() {
        let entry = ErrorKind::InvalidIp.format([("ip", "999.1.1.1")]).unwrap();
        let body = ErrorBody::from(&normalize(entry));

        assert_eq!(
            body,
            ErrorBody {
                status: 400,
                msg: Some("999.1.1.1 is invalid.".to_string()),
                detail: Some("invalid IP : 999.1.1.1".to_string()),
                code: Some("4000010".to_string()),
            }
        );
    }

    #[test]
    fn test_error_body_masks_server_errors() {
        let body = ErrorBody::from(&normalize(ErrorKind::CacheNotInitialized.entry()));

        assert_eq!(body.status, 500);
        assert_eq!(body.code.as_deref(), Some("5009999"));
        assert_eq!(body.msg.as_deref(), Some(INTERNAL_SERVER_ERROR_MSG));
        assert_eq!(body.detail.as_deref(), Some(INTERNAL_SERVER_ERROR_DETAIL));
    }

    #[test]
    fn test_error_body_for_http_exception() {
        let failure = ApiFailure::http(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
        let body = ErrorBody::from(failure.normalized());

        assert_eq!(body.status, 405);
        assert_eq!(body.msg, None);
        assert_eq!(body.code, None);
        assert_eq!(body.detail.as_deref(), Some("Method Not Allowed"));
    }

    #[test]
    fn test_from_rejection_keeps_status_and_text() {
        let rejection = Json::<serde_json::Value>::from_bytes(b"{not json").unwrap_err();
        let expected_detail = rejection.body_text();
        let failure = ApiFailure::from_rejection(rejection);
        let body = ErrorBody::from(failure.normalized());

        assert_eq!(body.status, 400);
        assert_eq!(body.code, None);
        assert_eq!(body.msg, None);
        assert_eq!(body.detail, Some(expected_detail));
    }

    #[test]
    fn test_error_body_serializes_nulls() {
        let failure = ApiFailure::http(StatusCode::NOT_FOUND, "gone");
        let json = serde_json::to_string(&ErrorBody::from(failure.normalized())).unwrap();
        assert_eq!(
            json,
            r#"{"status":404,"msg":null,"detail":"gone","code":null}"#
        );
    }

    #[test]
    fn test_into_response_sets_status_and_extension() {
        let failure = ApiFailure::from(ErrorKind::TokenExpired.entry());
        let response = failure.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let normalized = response
            .extensions()
            .get::<NormalizedError>()
            .expect("normalized error stored");
        assert_eq!(normalized.external_code().as_deref(), Some("4010006"));
    }

    #[test]
    fn test_cause_chain_lists_masked_entry() {
        let normalized = normalize(ErrorKind::DatabaseNotInitialized.entry());
        let chain = cause_chain(&normalized);
        assert!(chain.contains("5000004"), "chain was {}", chain);
        assert!(chain.contains("Database not initialized"));
    }

    #[test]
    fn test_cause_chain_without_cause() {
        let normalized = normalize(ErrorKind::TokenExpired.entry());
        assert_eq!(cause_chain(&normalized), "-");
    }

    #[test]
    fn test_panic_response_masks_payload() {
        let response = panic_response(Box::new("secret stack detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let normalized = response.extensions().get::<NormalizedError>().unwrap();
        assert!(normalized.is_masked());
        assert!(!normalized
            .user_message()
            .unwrap_or_default()
            .contains("secret"));
    }
}
