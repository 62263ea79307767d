//! Integration tests for signed API access through the account authenticator

use std::sync::Arc;

use fantasy_wear::{
    commands::AppContext,
    config::{AppConfig, API_BASE_URL_ENV_VAR, CONSUMER_KEY_ENV_VAR, CONSUMER_SECRET_ENV_VAR, OAUTH_BASE_URL_ENV_VAR},
    core::clock::FixedClock,
    oauth::{AuthTokenResponse, ERROR_CODE_BAD_AUTHENTICATION, TOKEN_TYPE_OAUTH},
    storage::{Account, Preferences, Store},
    yahoo::FantasyApi,
    FantasyWearError, Token,
};
use tokio_util::sync::CancellationToken;
use wiremock::{
    matchers::{header_regex, method, path},
    Mock, MockServer, ResponseTemplate,
};

const NOW_SEC: i64 = 1_700_000_000;

const LEAGUES_XML: &str = "<fantasy_content><users><user><games><game><leagues>\
    <league><league_key>nfl.l.1</league_key><name>Office</name>\
    <scoring_type>head</scoring_type></league>\
    <league><league_key>nfl.l.2</league_key><name>Points</name>\
    <scoring_type>point</scoring_type></league>\
    </leagues></game></games></user></users></fantasy_content>";

struct TestApp {
    ctx: AppContext,
    _prefs_dir: tempfile::TempDir,
}

fn app_for(server: &MockServer, store: Store) -> TestApp {
    let uri = server.uri();
    let config = AppConfig::from_lookup(|name| match name {
        CONSUMER_KEY_ENV_VAR => Some("consumer".to_string()),
        CONSUMER_SECRET_ENV_VAR => Some("consumer-secret".to_string()),
        OAUTH_BASE_URL_ENV_VAR => Some(format!("{uri}/oauth/v2/")),
        API_BASE_URL_ENV_VAR => Some(format!("{uri}/fantasy/v2/")),
        _ => None,
    })
    .unwrap();
    let prefs_dir = tempfile::tempdir().unwrap();
    let ctx = AppContext::with_store(
        config,
        store,
        Preferences::at(prefs_dir.path().join("prefs.json")),
        Arc::new(FixedClock::from_secs(NOW_SEC)),
    )
    .unwrap();
    TestApp {
        ctx,
        _prefs_dir: prefs_dir,
    }
}

fn token(value: &str, expires: i64, authorization_expires: i64) -> Token {
    Token {
        token: value.to_string(),
        token_secret: format!("{value}-secret"),
        session_handle: "session".to_string(),
        expiration_time_sec: Some(expires),
        authorization_expiration_time_sec: Some(authorization_expires),
        ..Token::default()
    }
}

fn store_with(account: &Account, token: &Token) -> Store {
    let store = Store::new_in_memory().unwrap();
    store.add_account(account, token).unwrap();
    store
}

#[tokio::test]
async fn test_valid_token_signs_api_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fantasy/v2/users;use_login=1/games;is_available=1/leagues"))
        .and(header_regex("authorization", r#"oauth_token="current""#))
        .and(header_regex("authorization", r#"oauth_consumer_key="consumer""#))
        .respond_with(ResponseTemplate::new(200).set_body_string(LEAGUES_XML))
        .expect(1)
        .mount(&server)
        .await;

    let account = Account::new("GUID");
    let app = app_for(
        &server,
        store_with(&account, &token("current", NOW_SEC + 100, NOW_SEC + 1000)),
    );

    let leagues = app
        .ctx
        .yahoo
        .get_leagues(&account, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(leagues.len(), 1);
    assert_eq!(leagues[0].league_key, "nfl.l.1");
    assert_eq!(leagues[0].account_name, "GUID");
}

#[tokio::test]
async fn test_expired_token_is_refreshed_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/v2/get_token"))
        .and(header_regex("authorization", r#"oauth_session_handle="session""#))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "oauth_token=fresh&oauth_token_secret=fresh-secret&oauth_session_handle=session2\
             &oauth_expires_in=3600&oauth_authorization_expires_in=86400&xoauth_yahoo_guid=GUID",
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header_regex("authorization", r#"oauth_token="fresh""#))
        .respond_with(ResponseTemplate::new(200).set_body_string(LEAGUES_XML))
        .expect(1)
        .mount(&server)
        .await;

    let account = Account::new("GUID");
    let store = store_with(&account, &token("stale", NOW_SEC - 1, NOW_SEC + 1000));
    let app = app_for(&server, store.clone());

    app.ctx
        .yahoo
        .get_leagues(&account, &CancellationToken::new())
        .await
        .unwrap();

    let stored = store.token(&account).unwrap();
    assert_eq!(stored.token, "fresh");
    assert_eq!(stored.session_handle, "session2");
    assert_eq!(stored.expiration_time_sec, Some(NOW_SEC + 3600));
    assert_eq!(stored.authorization_expiration_time_sec, Some(NOW_SEC + 86400));
}

#[tokio::test]
async fn test_client_error_invalidates_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let account = Account::new("GUID");
    let store = store_with(&account, &token("current", NOW_SEC + 100, NOW_SEC + 1000));
    let app = app_for(&server, store.clone());

    let err = app
        .ctx
        .yahoo
        .get_leagues(&account, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(store.token(&account).unwrap().expiration_time_sec, Some(0));
}

#[tokio::test]
async fn test_rejected_refresh_removes_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/v2/get_token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let account = Account::new("GUID");
    let store = store_with(&account, &token("stale", NOW_SEC - 1, NOW_SEC + 1000));
    let app = app_for(&server, store.clone());
    let authenticator = &app.ctx.authenticator;

    let response = authenticator
        .get_auth_token(
            &authenticator.owner_identity(),
            &account,
            TOKEN_TYPE_OAUTH,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    match response {
        AuthTokenResponse::Error { code, .. } => assert_eq!(code, ERROR_CODE_BAD_AUTHENTICATION),
        other => panic!("unexpected response: {other:?}"),
    }
    assert!(store.accounts().unwrap().is_empty());

    // The API layer reports the loss as a permanent auth failure
    let err = app
        .ctx
        .yahoo
        .get_leagues(&account, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FantasyWearError::AuthPermanent { .. }));
}

#[tokio::test]
async fn test_server_error_during_refresh_is_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/v2/get_token"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let account = Account::new("GUID");
    let store = store_with(&account, &token("stale", NOW_SEC - 1, NOW_SEC + 1000));
    let app = app_for(&server, store.clone());

    let err = app
        .ctx
        .yahoo
        .get_leagues(&account, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FantasyWearError::AuthTransient { .. }));
    assert_eq!(store.accounts().unwrap(), vec![account]);
}
