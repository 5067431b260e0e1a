//! HTTP status families used to group catalog entries.

use std::fmt;

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// HTTP status family of a catalog entry.
///
/// Serialized as the bare status number (`400`, `401`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum StatusClass {
    /// The client is making a request in the wrong way.
    BadRequest,
    /// The client must present correct credentials.
    Unauthorized,
    /// The requested item could not be found.
    NotFound,
    /// An error occurred inside the server.
    InternalServerError,
}

impl StatusClass {
    /// Numeric HTTP status of this class.
    pub const fn as_u16(self) -> u16 {
        match self {
            StatusClass::BadRequest => 400,
            StatusClass::Unauthorized => 401,
            StatusClass::NotFound => 404,
            StatusClass::InternalServerError => 500,
        }
    }

    /// The matching [`http::StatusCode`].
    pub const fn status_code(self) -> StatusCode {
        match self {
            StatusClass::BadRequest => StatusCode::BAD_REQUEST,
            StatusClass::Unauthorized => StatusCode::UNAUTHORIZED,
            StatusClass::NotFound => StatusCode::NOT_FOUND,
            StatusClass::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether errors of this class are server-side faults (masked from clients).
    pub const fn is_server_error(self) -> bool {
        matches!(self, StatusClass::InternalServerError)
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

impl From<StatusClass> for u16 {
    fn from(value: StatusClass) -> Self {
        value.as_u16()
    }
}

impl TryFrom<u16> for StatusClass {
    type Error = Error;

    fn try_from(status: u16) -> Result<Self, Self::Error> {
        match status {
            400 => Ok(StatusClass::BadRequest),
            401 => Ok(StatusClass::Unauthorized),
            404 => Ok(StatusClass::NotFound),
            500 => Ok(StatusClass::InternalServerError),
            _ => Err(Error::UnknownStatusClass { status }),
        }
    }
}
