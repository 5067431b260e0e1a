//! The closed catalog of API errors.
//!
//! Every error the API can return is one of the [`ErrorKind`] variants below,
//! grouped by status class:
//!
//! | Class | Meaning                                  |
//! |-------|------------------------------------------|
//! | 400   | the client is making a request wrongly   |
//! | 401   | credentials are missing or invalid       |
//! | 404   | the requested item could not be found    |
//! | 500   | an error occurred inside the server      |
//!
//! The `(status, internal code)` pair of each entry is a public contract:
//! clients branch on the resulting external code. [`ErrorCatalog::new`]
//! rejects catalogs in which two entries share a pair.
//!
//! # Example
//!
//! ```
//! use faultline_lib::ErrorKind;
//!
//! let err = ErrorKind::InvalidIp.format([("ip", "999.1.1.1")]).unwrap();
//! assert_eq!(err.external_code(), "4000010");
//! assert_eq!(err.user_message(), Some("999.1.1.1 is invalid."));
//! ```

use std::collections::HashMap;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::entry::ApiError;
use crate::error::{Error, Result};
use crate::status::StatusClass;

static CATALOG: OnceCell<ErrorCatalog> = OnceCell::new();

/// Every entry of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    // 400
    NoEmailOrPassword,
    EmailAlreadyExists,
    NotSupportedFeature,
    UnregisterFailure,
    MaxKeyCountExceed,
    MaxWhitelistCountExceed,
    InvalidIp,
    InvalidApiQuery,
    KakaoSendFailure,
    WebsocketInUse,
    InvalidEmailFormat,
    EmailLengthNotInRange,
    PasswordLengthNotInRange,
    // 401
    NotAuthorized,
    TokenExpired,
    TokenDecodeFailure,
    InvalidApiHeader,
    InvalidTimestamp,
    // 404
    NotFoundUser,
    NotFoundAccessKey,
    NotFoundApiKey,
    NotFoundPreset,
    // 500
    MiddlewareException,
    WebsocketError,
    DatabaseNotInitialized,
    CacheNotInitialized,
    VectorstoreNotInitialized,
    InternalServerError,
}

impl ErrorKind {
    /// All kinds in declaration order.
    pub const ALL: [ErrorKind; 28] = [
        ErrorKind::NoEmailOrPassword,
        ErrorKind::EmailAlreadyExists,
        ErrorKind::NotSupportedFeature,
        ErrorKind::UnregisterFailure,
        ErrorKind::MaxKeyCountExceed,
        ErrorKind::MaxWhitelistCountExceed,
        ErrorKind::InvalidIp,
        ErrorKind::InvalidApiQuery,
        ErrorKind::KakaoSendFailure,
        ErrorKind::WebsocketInUse,
        ErrorKind::InvalidEmailFormat,
        ErrorKind::EmailLengthNotInRange,
        ErrorKind::PasswordLengthNotInRange,
        ErrorKind::NotAuthorized,
        ErrorKind::TokenExpired,
        ErrorKind::TokenDecodeFailure,
        ErrorKind::InvalidApiHeader,
        ErrorKind::InvalidTimestamp,
        ErrorKind::NotFoundUser,
        ErrorKind::NotFoundAccessKey,
        ErrorKind::NotFoundApiKey,
        ErrorKind::NotFoundPreset,
        ErrorKind::MiddlewareException,
        ErrorKind::WebsocketError,
        ErrorKind::DatabaseNotInitialized,
        ErrorKind::CacheNotInitialized,
        ErrorKind::VectorstoreNotInitialized,
        ErrorKind::InternalServerError,
    ];

    /// An owned copy of this kind's template from the global catalog.
    pub fn entry(self) -> ApiError {
        ErrorCatalog::global().get(self).clone()
    }

    /// Format this kind's template from the global catalog with `values`.
    pub fn format<I, K, V>(self, values: I) -> Result<ApiError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        ErrorCatalog::global().get(self).format(values)
    }

    fn index(self) -> usize {
        self as usize
    }

    fn definition(self, config: &CatalogConfig) -> ApiError {
        use StatusClass::{BadRequest, InternalServerError, NotFound, Unauthorized};

        let (status, code, msg, detail): (StatusClass, u16, Option<String>, &str) = match self {
            ErrorKind::NoEmailOrPassword => (
                BadRequest,
                1,
                Some("Please enter both email and password.".into()),
                "Email and PW must be provided.",
            ),
            ErrorKind::EmailAlreadyExists => (
                BadRequest,
                2,
                Some("The email is already registered.".into()),
                "Email already exists.",
            ),
            ErrorKind::NotSupportedFeature => (
                BadRequest,
                3,
                Some("This feature is not available yet.".into()),
                "Not supported feature.",
            ),
            ErrorKind::UnregisterFailure => (
                BadRequest,
                4,
                Some("Failed to unregister.".into()),
                "Failed to unregister.",
            ),
            ErrorKind::MaxKeyCountExceed => (
                BadRequest,
                8,
                Some(format!(
                    "API key creation is possible up to {}.",
                    config.max_api_key
                )),
                "Max Key Count Reached",
            ),
            ErrorKind::MaxWhitelistCountExceed => (
                BadRequest,
                9,
                Some(format!(
                    "Whitelist creation is possible up to {}.",
                    config.max_api_whitelist
                )),
                "Max Whitelist Count Reached",
            ),
            ErrorKind::InvalidIp => (
                BadRequest,
                10,
                Some("{ip} is invalid.".into()),
                "invalid IP : {ip}",
            ),
            ErrorKind::InvalidApiQuery => (
                BadRequest,
                11,
                Some(
                    "Query string only allows 2 keys, and both must be submitted when requested."
                        .into(),
                ),
                "Query String Only Accept key and timestamp.",
            ),
            ErrorKind::KakaoSendFailure => (
                BadRequest,
                15,
                Some("Failed to send KAKAO MSG.".into()),
                "Failed to send KAKAO MSG.",
            ),
            ErrorKind::WebsocketInUse => (
                BadRequest,
                16,
                Some("The websocket is already in use.".into()),
                "Websocket is already in use.",
            ),
            ErrorKind::InvalidEmailFormat => (
                BadRequest,
                17,
                Some("Invalid email format.".into()),
                "Invalid Email Format.",
            ),
            ErrorKind::EmailLengthNotInRange => (
                BadRequest,
                18,
                Some("Please enter an email of 6 to 50 characters.".into()),
                "Email must be 6 ~ 50 characters.",
            ),
            ErrorKind::PasswordLengthNotInRange => (
                BadRequest,
                19,
                Some("Please enter a password of 6 to 100 characters.".into()),
                "Password must be 6 ~ 100 characters.",
            ),
            ErrorKind::NotAuthorized => (
                Unauthorized,
                1,
                Some("This service requires login.".into()),
                "Authorization Required",
            ),
            ErrorKind::TokenExpired => (
                Unauthorized,
                6,
                Some("Your session has expired and you have been logged out.".into()),
                "Token Expired",
            ),
            ErrorKind::TokenDecodeFailure => (
                Unauthorized,
                7,
                Some("This is an abnormal access.".into()),
                "Token has been compromised.",
            ),
            ErrorKind::InvalidApiHeader => (
                Unauthorized,
                12,
                Some("There is no hashed Secret in the header, or it is invalid.".into()),
                "Invalid HMAC secret in Header",
            ),
            ErrorKind::InvalidTimestamp => (
                Unauthorized,
                13,
                Some(
                    "The timestamp included in the query string must be in KST, must be less \
                     than the current time, and must be greater than the current time - 10 seconds."
                        .into(),
                ),
                "timestamp in Query String must be KST, Timestamp must be less than now, \
                 and greater than now - 10.",
            ),
            ErrorKind::NotFoundUser => (
                NotFound,
                5,
                Some("The user could not be found.".into()),
                "Not found user.",
            ),
            ErrorKind::NotFoundAccessKey => (
                NotFound,
                14,
                Some("Could not find an API key that matches the Access key.".into()),
                "Not found such API Access Key",
            ),
            ErrorKind::NotFoundApiKey => (
                NotFound,
                7,
                Some("Could not find an Api key that matches the provided conditions.".into()),
                "No API Key matched such conditions",
            ),
            ErrorKind::NotFoundPreset => (
                NotFound,
                13,
                Some("Could not find a preset that matches the provided conditions.".into()),
                "No preset matched such conditions",
            ),
            ErrorKind::MiddlewareException => (
                InternalServerError,
                2,
                None,
                "Middleware could not be initialized",
            ),
            ErrorKind::WebsocketError => (
                InternalServerError,
                3,
                Some("Problem with websocket connection".into()),
                "Websocket error",
            ),
            ErrorKind::DatabaseNotInitialized => (
                InternalServerError,
                4,
                Some("The database has not been initialized.".into()),
                "Database not initialized",
            ),
            ErrorKind::CacheNotInitialized => (
                InternalServerError,
                5,
                Some("The cache has not been initialized.".into()),
                "Cache not initialized",
            ),
            // Historically declared as 500/5 alongside the cache entry; 6 keeps codes unique.
            ErrorKind::VectorstoreNotInitialized => (
                InternalServerError,
                6,
                Some("The vector store has not been initialized.".into()),
                "Vector Store not initialized",
            ),
            ErrorKind::InternalServerError => return ApiError::internal_server_error(),
        };

        let entry = ApiError::new(status, code).with_detail(detail);
        match msg {
            Some(msg) => entry.with_message(msg),
            None => entry,
        }
    }
}

/// Read-only set of error templates, one per [`ErrorKind`].
///
/// Entries are never mutated after construction; [`ApiError::format`] and
/// [`ApiError::with_source`] produce independent values, so a catalog can be
/// shared across any number of concurrent requests without locking.
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    config: CatalogConfig,
    entries: Vec<ApiError>,
}

impl ErrorCatalog {
    /// Build the catalog, interpolating the configured limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateErrorCode`] if two entries share a
    /// `(status, internal code)` pair.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let entries: Vec<ApiError> = ErrorKind::ALL
            .iter()
            .map(|kind| kind.definition(config))
            .collect();
        check_unique(ErrorKind::ALL.iter().copied().zip(&entries))?;

        Ok(Self {
            config: *config,
            entries,
        })
    }

    /// Install the process-wide catalog.
    ///
    /// Must be called at startup, before the first [`ErrorCatalog::global`]
    /// call, for non-environment configuration to take effect.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateErrorCode`] if the definitions are inconsistent
    /// - [`Error::AlreadyInstalled`] if a catalog is already in place
    pub fn install(config: &CatalogConfig) -> Result<&'static ErrorCatalog> {
        let catalog = Self::new(config)?;
        CATALOG.set(catalog).map_err(|_| Error::AlreadyInstalled)?;
        let installed = CATALOG.get().ok_or(Error::AlreadyInstalled)?;
        debug!(
            max_api_key = config.max_api_key,
            max_api_whitelist = config.max_api_whitelist,
            entries = installed.entries.len(),
            "error catalog installed"
        );
        Ok(installed)
    }

    /// The process-wide catalog, built from [`CatalogConfig::from_env`] on
    /// first use unless [`ErrorCatalog::install`] ran earlier.
    ///
    /// # Panics
    ///
    /// Panics if the built-in definitions contain a duplicate code. This is a
    /// startup assertion on the catalog source, covered by the crate's tests.
    pub fn global() -> &'static ErrorCatalog {
        CATALOG.get_or_init(|| {
            Self::new(&CatalogConfig::from_env())
                .unwrap_or_else(|e| panic!("built-in error catalog is invalid: {}", e))
        })
    }

    /// The configuration the catalog was built with.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// The template for `kind`.
    pub fn get(&self, kind: ErrorKind) -> &ApiError {
        &self.entries[kind.index()]
    }

    /// Iterate over all entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (ErrorKind, &ApiError)> + '_ {
        ErrorKind::ALL.iter().copied().zip(self.entries.iter())
    }

    /// Find the kind whose external code is `external_code`.
    pub fn lookup(&self, external_code: &str) -> Option<ErrorKind> {
        self.entries()
            .find(|(_, entry)| entry.external_code() == external_code)
            .map(|(kind, _)| kind)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_unique<'a>(entries: impl IntoIterator<Item = (ErrorKind, &'a ApiError)>) -> Result<()> {
    let mut seen: HashMap<(StatusClass, u16), ErrorKind> = HashMap::new();
    for (kind, entry) in entries {
        let key = (entry.status(), entry.internal_code());
        if let Some(first) = seen.insert(key, kind) {
            return Err(Error::DuplicateErrorCode {
                code: entry.external_code(),
                first: format!("{:?}", first),
                second: format!("{:?}", kind),
            });
        }
    }
    Ok(())
}
