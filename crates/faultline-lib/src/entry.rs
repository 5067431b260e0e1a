//! A single API error definition and its formatted instances.
//!
//! [`ApiError`] is an immutable value: every transformation (formatting,
//! attaching a cause) returns a new entry, so the shared catalog templates are
//! never touched by request handling.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::status::StatusClass;
use crate::template;

/// Internal code of the generic internal-error fallback.
pub const INTERNAL_SERVER_ERROR_CODE: u16 = 9999;

/// Client-facing message of the generic internal-error fallback.
pub const INTERNAL_SERVER_ERROR_MSG: &str =
    "This is a server-side error. It will be automatically reported and fixed as soon as possible.";

/// Developer-facing detail of the generic internal-error fallback.
pub const INTERNAL_SERVER_ERROR_DETAIL: &str = "Internal Server Error";

/// Shared handle to the underlying cause of an error.
pub type ErrorSource = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// One kind of API error: status class, internal code, and message templates.
///
/// # Example
///
/// ```
/// use faultline_lib::{ApiError, StatusClass};
///
/// let invalid_ip = ApiError::new(StatusClass::BadRequest, 10)
///     .with_message("{ip} is invalid.")
///     .with_detail("invalid IP : {ip}");
///
/// let formatted = invalid_ip.format([("ip", "999.1.1.1")]).unwrap();
/// assert_eq!(formatted.external_code(), "4000010");
/// assert_eq!(formatted.user_message(), Some("999.1.1.1 is invalid."));
/// // The template itself is unchanged.
/// assert_eq!(invalid_ip.user_message(), Some("{ip} is invalid."));
/// ```
#[derive(Clone)]
pub struct ApiError {
    status: StatusClass,
    internal_code: u16,
    msg: Option<String>,
    detail: Option<String>,
    source: Option<ErrorSource>,
}

impl ApiError {
    /// Create an entry with no message, detail or cause.
    pub fn new(status: StatusClass, internal_code: u16) -> Self {
        Self {
            status,
            internal_code,
            msg: None,
            detail: None,
            source: None,
        }
    }

    /// The generic internal-error fallback (500/9999).
    ///
    /// Every masked server-side fault and every unrecognized failure ends up
    /// as this entry. Built without consulting the global catalog.
    pub fn internal_server_error() -> Self {
        Self::new(StatusClass::InternalServerError, INTERNAL_SERVER_ERROR_CODE)
            .with_message(INTERNAL_SERVER_ERROR_MSG)
            .with_detail(INTERNAL_SERVER_ERROR_DETAIL)
    }

    /// Set the user-facing message template.
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }

    /// Set the developer-facing detail template.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach the underlying cause, kept for server-side diagnostics only.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.source = Some(Arc::from(source.into()));
        self
    }

    /// Attach an already shared cause.
    pub fn with_shared_source(mut self, source: ErrorSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn status(&self) -> StatusClass {
        self.status
    }

    pub fn internal_code(&self) -> u16 {
        self.internal_code
    }

    /// Client-visible composite code: status followed by the internal code
    /// zero-padded to four digits (`400` + `2` → `"4000002"`).
    pub fn external_code(&self) -> String {
        format!("{}{:04}", self.status.as_u16(), self.internal_code)
    }

    pub fn user_message(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    pub fn developer_detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// The attached cause, if any.
    pub fn cause(&self) -> Option<&ErrorSource> {
        self.source.as_ref()
    }

    /// Whether this is the generic internal-error fallback.
    ///
    /// Status, code, message and detail must all match
    /// [`ApiError::internal_server_error`]; a hand-built 500/9999 carrying
    /// its own text is not the fallback.
    pub fn is_internal_server_error(&self) -> bool {
        self.status == StatusClass::InternalServerError
            && self.internal_code == INTERNAL_SERVER_ERROR_CODE
            && self.msg.as_deref() == Some(INTERNAL_SERVER_ERROR_MSG)
            && self.detail.as_deref() == Some(INTERNAL_SERVER_ERROR_DETAIL)
    }

    /// Render both templates with `values`, returning a new entry.
    ///
    /// The entry is returned unchanged when either template is absent or no
    /// values are given. Otherwise every value must be referenced by at least
    /// one template and every placeholder must have a value.
    ///
    /// # Errors
    ///
    /// - [`Error::UnusedPlaceholderValue`] if a value is referenced by neither template
    /// - [`Error::MissingPlaceholderValue`] if a placeholder has no value
    /// - [`Error::MalformedTemplate`] if a template cannot be parsed
    pub fn format<I, K, V>(&self, values: I) -> Result<ApiError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values: BTreeMap<String, String> = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let (Some(msg), Some(detail)) = (&self.msg, &self.detail) else {
            return Ok(self.clone());
        };
        if values.is_empty() {
            return Ok(self.clone());
        }

        let referenced: BTreeSet<&str> = template::placeholders(msg)?
            .union(&template::placeholders(detail)?)
            .copied()
            .collect();
        if let Some(unused) = values.keys().find(|k| !referenced.contains(k.as_str())) {
            return Err(Error::UnusedPlaceholderValue {
                name: unused.clone(),
                code: self.external_code(),
            });
        }

        Ok(ApiError {
            msg: Some(template::render(msg, &values)?),
            detail: Some(template::render(detail, &values)?),
            ..self.clone()
        })
    }
}

impl PartialEq for ApiError {
    /// Identity is status, code, and text; the attached cause is diagnostic only.
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status
            && self.internal_code == other.internal_code
            && self.msg == other.msg
            && self.detail == other.detail
    }
}

impl Eq for ApiError {}

impl fmt::Debug for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiError")
            .field("code", &self.external_code())
            .field("msg", &self.msg)
            .field("detail", &self.detail)
            .field("source", &self.source.as_ref().map(|s| s.to_string()))
            .finish()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .detail
            .as_deref()
            .or(self.msg.as_deref())
            .unwrap_or("no detail");
        write!(f, "[{}] {}", self.external_code(), text)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}
