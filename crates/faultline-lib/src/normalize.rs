//! Exception normalization.
//!
//! [`normalize`] is the terminal handler for every failure that reaches the
//! request boundary. It maps any error onto exactly one of:
//!
//! 1. a client-facing catalog entry (4xx), passed through verbatim;
//! 2. the generic internal-error fallback (500/9999), with the original
//!    failure attached for server-side diagnostics;
//! 3. a framework [`HttpException`] that already carries its own status.
//!
//! Unknown error types never escape unclassified, and the function itself
//! never fails.

use std::fmt;

use http::StatusCode;
use rusqlite::ffi::ErrorCode as SqliteCode;

use crate::entry::{ApiError, ErrorSource};

/// A framework-level HTTP error that already carries its status code
/// (extractor rejections, routing misses, explicit aborts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpException {
    pub status: StatusCode,
    pub detail: Option<String>,
}

impl HttpException {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for HttpException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "HTTP {}: {}", self.status.as_u16(), detail),
            None => write!(f, "HTTP {}", self.status.as_u16()),
        }
    }
}

impl std::error::Error for HttpException {}

/// The closed set of errors that may reach a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedError {
    /// A catalog entry: a 4xx passed through, or the masked 500 fallback.
    Api(ApiError),
    /// A framework HTTP exception passed through unchanged.
    Http(HttpException),
}

impl NormalizedError {
    /// HTTP status to respond with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            NormalizedError::Api(api) => api.status().status_code(),
            NormalizedError::Http(http) => http.status,
        }
    }

    /// Client-visible error code; framework exceptions have none.
    pub fn external_code(&self) -> Option<String> {
        match self {
            NormalizedError::Api(api) => Some(api.external_code()),
            NormalizedError::Http(_) => None,
        }
    }

    pub fn user_message(&self) -> Option<&str> {
        match self {
            NormalizedError::Api(api) => api.user_message(),
            NormalizedError::Http(_) => None,
        }
    }

    pub fn developer_detail(&self) -> Option<&str> {
        match self {
            NormalizedError::Api(api) => api.developer_detail(),
            NormalizedError::Http(http) => http.detail.as_deref(),
        }
    }

    /// Whether the client sees the generic fallback instead of the real cause.
    pub fn is_masked(&self) -> bool {
        matches!(self, NormalizedError::Api(api) if api.is_internal_server_error())
    }

    /// The diagnostic cause retained behind a masked error.
    pub fn cause(&self) -> Option<&ErrorSource> {
        match self {
            NormalizedError::Api(api) => api.cause(),
            NormalizedError::Http(_) => None,
        }
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedError::Api(api) => fmt::Display::fmt(api, f),
            NormalizedError::Http(http) => fmt::Display::fmt(http, f),
        }
    }
}

impl std::error::Error for NormalizedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NormalizedError::Api(api) => std::error::Error::source(api),
            NormalizedError::Http(_) => None,
        }
    }
}

impl From<ApiError> for NormalizedError {
    fn from(error: ApiError) -> Self {
        normalize_api(error)
    }
}

/// Normalize a catalog entry: 5xx entries are masked behind the generic
/// fallback (keeping the original as its cause), 4xx entries pass through.
pub fn normalize_api(error: ApiError) -> NormalizedError {
    if error.status().is_server_error() && !error.is_internal_server_error() {
        NormalizedError::Api(ApiError::internal_server_error().with_source(error))
    } else {
        NormalizedError::Api(error)
    }
}

/// Map any failure onto the closed external error surface.
///
/// # Example
///
/// ```
/// use faultline_lib::{normalize, ApiError, NormalizedError, StatusClass};
///
/// let masked = normalize(anyhow::anyhow!("boom"));
/// assert!(masked.is_masked());
/// assert!(!masked.user_message().unwrap().contains("boom"));
///
/// let client = ApiError::new(StatusClass::NotFound, 5).with_detail("Not found user.");
/// assert_eq!(normalize(client.clone()), NormalizedError::Api(client));
/// ```
pub fn normalize<E>(error: E) -> NormalizedError
where
    E: Into<anyhow::Error>,
{
    let error = error.into();

    let error = match error.downcast::<NormalizedError>() {
        Ok(NormalizedError::Api(api)) => return normalize_api(api),
        Ok(http @ NormalizedError::Http(_)) => return http,
        Err(error) => error,
    };

    let error = match error.downcast::<ApiError>() {
        Ok(api) => return normalize_api(api),
        Err(error) => error,
    };

    let error = match error.downcast::<HttpException>() {
        Ok(http) => return NormalizedError::Http(http),
        Err(error) => error,
    };

    let error = match error.downcast::<rusqlite::Error>() {
        Ok(db) if is_transient_db_failure(&db) => {
            return NormalizedError::Api(ApiError::internal_server_error().with_source(db))
        }
        Ok(db) => anyhow::Error::from(db),
        Err(error) => error,
    };

    NormalizedError::Api(ApiError::internal_server_error().with_source(Unclassified(error)))
}

/// Whether a SQLite error is an operational failure of the data layer
/// (connectivity, locking, storage) rather than a programming error.
pub fn is_transient_db_failure(error: &rusqlite::Error) -> bool {
    match error {
        rusqlite::Error::SqliteFailure(failure, _) => matches!(
            failure.code,
            SqliteCode::DatabaseBusy
                | SqliteCode::DatabaseLocked
                | SqliteCode::CannotOpen
                | SqliteCode::SystemIoFailure
                | SqliteCode::DiskFull
                | SqliteCode::OutOfMemory
                | SqliteCode::DatabaseCorrupt
                | SqliteCode::NotADatabase
                | SqliteCode::FileLockingProtocolFailed
                | SqliteCode::OperationInterrupted
        ),
        _ => false,
    }
}

/// Wrapper marking a cause that matched no known failure type.
struct Unclassified(anyhow::Error);

impl fmt::Debug for Unclassified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unclassified({:?})", self.0)
    }
}

impl fmt::Display for Unclassified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unclassified error: {:#}", self.0)
    }
}

impl std::error::Error for Unclassified {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.0)
    }
}
