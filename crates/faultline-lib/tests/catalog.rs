use faultline_lib::{ErrorCatalog, ErrorKind, StatusClass};

/// (kind, status, internal code) pairs that clients depend on.
const CONTRACT: &[(ErrorKind, u16, u16)] = &[
    (ErrorKind::NoEmailOrPassword, 400, 1),
    (ErrorKind::EmailAlreadyExists, 400, 2),
    (ErrorKind::NotSupportedFeature, 400, 3),
    (ErrorKind::UnregisterFailure, 400, 4),
    (ErrorKind::MaxKeyCountExceed, 400, 8),
    (ErrorKind::MaxWhitelistCountExceed, 400, 9),
    (ErrorKind::InvalidIp, 400, 10),
    (ErrorKind::InvalidApiQuery, 400, 11),
    (ErrorKind::KakaoSendFailure, 400, 15),
    (ErrorKind::WebsocketInUse, 400, 16),
    (ErrorKind::InvalidEmailFormat, 400, 17),
    (ErrorKind::EmailLengthNotInRange, 400, 18),
    (ErrorKind::PasswordLengthNotInRange, 400, 19),
    (ErrorKind::NotAuthorized, 401, 1),
    (ErrorKind::TokenExpired, 401, 6),
    (ErrorKind::TokenDecodeFailure, 401, 7),
    (ErrorKind::InvalidApiHeader, 401, 12),
    (ErrorKind::InvalidTimestamp, 401, 13),
    (ErrorKind::NotFoundUser, 404, 5),
    (ErrorKind::NotFoundAccessKey, 404, 14),
    (ErrorKind::NotFoundApiKey, 404, 7),
    (ErrorKind::NotFoundPreset, 404, 13),
    (ErrorKind::MiddlewareException, 500, 2),
    (ErrorKind::WebsocketError, 500, 3),
    (ErrorKind::DatabaseNotInitialized, 500, 4),
    (ErrorKind::CacheNotInitialized, 500, 5),
    (ErrorKind::VectorstoreNotInitialized, 500, 6),
    (ErrorKind::InternalServerError, 500, 9999),
];

#[test]
fn catalog_codes_match_published_contract() {
    let catalog = ErrorCatalog::global();
    assert_eq!(CONTRACT.len(), ErrorKind::ALL.len());

    for &(kind, status, code) in CONTRACT {
        let entry = catalog.get(kind);
        assert_eq!(entry.status().as_u16(), status, "{:?}", kind);
        assert_eq!(entry.internal_code(), code, "{:?}", kind);
        assert_eq!(
            entry.external_code(),
            format!("{}{:04}", status, code),
            "{:?}",
            kind
        );
        assert_eq!(catalog.lookup(&entry.external_code()), Some(kind));
    }
}

#[test]
fn every_entry_has_a_developer_detail() {
    for (kind, entry) in ErrorCatalog::global().entries() {
        assert!(
            entry.developer_detail().is_some(),
            "{:?} has no developer detail",
            kind
        );
    }
}

#[test]
fn only_middleware_exception_lacks_a_user_message() {
    let detail_only: Vec<ErrorKind> = ErrorCatalog::global()
        .entries()
        .filter(|(_, entry)| entry.user_message().is_none())
        .map(|(kind, _)| kind)
        .collect();
    assert_eq!(detail_only, vec![ErrorKind::MiddlewareException]);
}

#[test]
fn entry_returns_independent_copies() {
    let first = ErrorKind::InvalidIp.entry();
    let formatted = first.format([("ip", "1.2.3.4")]).expect("formats");
    let second = ErrorKind::InvalidIp.entry();

    assert_eq!(first, second);
    assert_ne!(formatted, second);
    assert_eq!(second.user_message(), Some("{ip} is invalid."));
}

#[test]
fn invalid_ip_entry_formats_user_message() {
    let err = ErrorKind::InvalidIp
        .format([("ip", "999.1.1.1")])
        .expect("formats");
    assert_eq!(err.user_message(), Some("999.1.1.1 is invalid."));
    assert_eq!(err.developer_detail(), Some("invalid IP : 999.1.1.1"));
    assert_eq!(err.status(), StatusClass::BadRequest);
}

#[test]
fn quota_entries_reject_format_values() {
    assert!(ErrorKind::MaxKeyCountExceed.format([("max", "5")]).is_err());
}
