use thiserror::Error;

/// Convenient result alias for the faultline library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A message template could not be parsed.
    #[error("malformed template at byte {position}: {reason}")]
    MalformedTemplate { position: usize, reason: &'static str },

    /// A template references a placeholder that was not supplied.
    #[error("no value supplied for placeholder '{name}'")]
    MissingPlaceholderValue { name: String },

    /// A value was supplied that no template of the entry references.
    #[error("value '{name}' is not used by any template of error {code}")]
    UnusedPlaceholderValue { name: String, code: String },

    /// Two catalog entries share the same status class and internal code.
    #[error("error code {code} is defined by both {first} and {second}")]
    DuplicateErrorCode {
        code: String,
        first: String,
        second: String,
    },

    /// The process-wide catalog was already installed.
    #[error("error catalog is already installed")]
    AlreadyInstalled,

    /// A status code outside the catalog's status classes.
    #[error("status {status} is not a catalog status class")]
    UnknownStatusClass { status: u16 },
}
