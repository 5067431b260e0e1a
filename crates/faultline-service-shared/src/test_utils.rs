//! Test utilities for boundary testing.
//!
//! [`test_router`] exposes one route per normalization branch, wrapped in the
//! same layers a service would use.

use axum::{
    extract::{rejection::JsonRejection, Path},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;

use faultline_lib::{ApiError, ErrorKind};

use crate::{not_found_fallback, panic_response, ApiFailure, RequestTrackingLayer};

/// User ID that [`test_router`] knows about.
pub const KNOWN_USER_ID: u64 = 1;

/// Request body accepted by `POST /signup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signup {
    pub email: String,
    pub password: String,
}

fn find_user(id: u64) -> Result<String, ApiError> {
    if id == KNOWN_USER_ID {
        Ok("alice@example.com".to_string())
    } else {
        Err(ErrorKind::NotFoundUser.entry())
    }
}

async fn get_user(Path(id): Path<u64>) -> Result<String, ApiFailure> {
    Ok(find_user(id)?)
}

async fn check_ip(Path(ip): Path<String>) -> Result<String, ApiFailure> {
    if ip.parse::<std::net::IpAddr>().is_err() {
        return Err(ErrorKind::InvalidIp.format([("ip", ip)])?.into());
    }
    Ok(ip)
}

async fn signup(payload: Result<Json<Signup>, JsonRejection>) -> Result<String, ApiFailure> {
    let Json(signup) = payload.map_err(ApiFailure::from_rejection)?;
    if signup.email.is_empty() || signup.password.is_empty() {
        return Err(ErrorKind::NoEmailOrPassword.entry().into());
    }
    Err(ErrorKind::EmailAlreadyExists.entry().into())
}

async fn database() -> Result<String, ApiFailure> {
    Err(ErrorKind::DatabaseNotInitialized.entry().into())
}

async fn unknown() -> Result<String, ApiFailure> {
    Err(anyhow::anyhow!("boom: connection string postgres://admin:hunter2@db").into())
}

async fn explode() -> String {
    panic!("handler exploded with secret state")
}

/// Router exercising every normalization branch.
///
/// | Route               | Outcome                                  |
/// |---------------------|------------------------------------------|
/// | `GET /users/{id}`   | 200 for [`KNOWN_USER_ID`], else 404/5    |
/// | `GET /ip/{ip}`      | 200 for valid IPs, else formatted 400/10 |
/// | `POST /signup`      | 400/1, 400/2, or a JSON rejection        |
/// | `GET /database`     | masked 500/4                             |
/// | `GET /unknown`      | masked unrecognized error                |
/// | `GET /panic`        | masked panic                             |
/// | anything else       | 404 framework exception                  |
pub fn test_router() -> Router {
    Router::new()
        .route("/users/{id}", get(get_user))
        .route("/ip/{ip}", get(check_ip))
        .route("/signup", post(signup))
        .route("/database", get(database))
        .route("/unknown", get(unknown))
        .route("/panic", get(explode))
        .fallback(not_found_fallback)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(RequestTrackingLayer)
}
