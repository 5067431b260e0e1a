use faultline_lib::entry::{INTERNAL_SERVER_ERROR_DETAIL, INTERNAL_SERVER_ERROR_MSG};
use faultline_lib::{normalize, ApiError, ErrorKind, HttpException, NormalizedError, StatusClass};
use http::StatusCode;

fn expect_api(normalized: NormalizedError) -> ApiError {
    match normalized {
        NormalizedError::Api(api) => api,
        other => panic!("expected catalog entry, got {:?}", other),
    }
}

#[test]
fn server_side_entry_is_masked_with_original_attached() {
    let original = ErrorKind::DatabaseNotInitialized.entry();
    let api = expect_api(normalize(original.clone()));

    assert!(api.is_internal_server_error());
    assert_eq!(api.user_message(), Some(INTERNAL_SERVER_ERROR_MSG));
    assert_eq!(api.developer_detail(), Some(INTERNAL_SERVER_ERROR_DETAIL));

    let cause = api.cause().expect("original kept as cause");
    let kept = cause
        .downcast_ref::<ApiError>()
        .expect("cause is the catalog entry");
    assert_eq!(kept, &original);
}

#[test]
fn hand_built_fallback_code_with_custom_text_is_masked() {
    let leaky = ApiError::new(StatusClass::InternalServerError, 9999)
        .with_message("db at postgres://admin:hunter2@db is down")
        .with_detail("connection refused by postgres://admin:hunter2@db");
    let normalized = normalize(leaky.clone());

    assert!(normalized.is_masked());
    assert_eq!(normalized.user_message(), Some(INTERNAL_SERVER_ERROR_MSG));
    assert_eq!(normalized.developer_detail(), Some(INTERNAL_SERVER_ERROR_DETAIL));

    let api = expect_api(normalized);
    let kept = api
        .cause()
        .and_then(|cause| cause.downcast_ref::<ApiError>())
        .expect("custom entry kept as cause");
    assert_eq!(kept, &leaky);
}

#[test]
fn client_entry_passes_through_unchanged() {
    let original = ErrorKind::EmailAlreadyExists.entry();
    let api = expect_api(normalize(original.clone()));
    assert_eq!(api, original);
    assert_eq!(api.external_code(), "4000002");
    assert!(api.cause().is_none());
}

#[test]
fn formatted_client_entry_keeps_its_values() {
    let original = ErrorKind::InvalidIp
        .format([("ip", "300.0.0.1")])
        .expect("formats");
    let normalized = normalize(original);
    assert_eq!(normalized.user_message(), Some("300.0.0.1 is invalid."));
    assert_eq!(normalized.status_code(), StatusCode::BAD_REQUEST);
}

#[test]
fn generic_failure_never_leaks_its_message() {
    let normalized = normalize(anyhow::anyhow!("boom"));
    let api = expect_api(normalized.clone());

    assert!(api.is_internal_server_error());
    assert_eq!(normalized.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(normalized.external_code().as_deref(), Some("5009999"));
    assert!(!normalized.user_message().unwrap_or_default().contains("boom"));
    assert!(!normalized
        .developer_detail()
        .unwrap_or_default()
        .contains("boom"));
}

#[test]
fn operational_database_failure_is_masked() {
    // A directory that does not exist cannot hold a database file.
    let failure = rusqlite::Connection::open("/nonexistent-faultline-dir/sub/db.sqlite")
        .expect_err("open must fail");
    let normalized = normalize(failure);

    assert!(normalized.is_masked());
    let cause = normalized.cause().expect("cause attached");
    assert!(cause.downcast_ref::<rusqlite::Error>().is_some());
}

#[test]
fn non_operational_database_error_is_still_classified() {
    let conn = rusqlite::Connection::open_in_memory().expect("in-memory db");
    let failure = conn
        .query_row("SELECT 1 WHERE 0", [], |row| row.get::<_, i64>(0))
        .expect_err("no rows");
    let normalized = normalize(failure);
    assert!(normalized.is_masked());
}

#[test]
fn http_exception_passes_through() {
    let exception = HttpException::new(StatusCode::UNPROCESSABLE_ENTITY)
        .with_detail("missing field `email`");
    let normalized = normalize(exception.clone());
    assert_eq!(normalized, NormalizedError::Http(exception));
    assert_eq!(normalized.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn context_wrapped_entry_is_still_recognized() {
    let wrapped = anyhow::Error::new(ErrorKind::NotFoundUser.entry()).context("loading owner");
    let api = expect_api(normalize(wrapped));
    assert_eq!(api.external_code(), "4040005");
}

#[test]
fn normalization_is_idempotent() {
    let inputs: Vec<anyhow::Error> = vec![
        ErrorKind::TokenExpired.entry().into(),
        ErrorKind::CacheNotInitialized.entry().into(),
        HttpException::new(StatusCode::NOT_FOUND).into(),
        anyhow::anyhow!("unexpected"),
    ];

    for input in inputs {
        let once = normalize(input);
        let twice = normalize(once.clone());
        assert_eq!(twice, once);
    }
}
