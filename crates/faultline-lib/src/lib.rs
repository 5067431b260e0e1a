//! Faultline library entry points.
//!
//! This crate owns the closed catalog of API errors, the named-placeholder
//! templates their messages are written in, and the normalizer that turns any
//! failure reaching the request boundary into exactly one catalog entry (or the
//! generic internal-error fallback). HTTP glue lives in
//! `faultline-service-shared`; consumers should only depend on the items
//! exported here instead of reimplementing classification.
//!

#![deny(warnings)]

pub mod catalog;
pub mod config;
pub mod entry;
pub mod error;
pub mod normalize;
pub mod status;
pub mod template;

pub use catalog::{ErrorCatalog, ErrorKind};
pub use config::CatalogConfig;
pub use entry::ApiError;
pub use error::{Error, Result};
pub use normalize::{normalize, normalize_api, HttpException, NormalizedError};
pub use status::StatusClass;
