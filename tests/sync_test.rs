//! End-to-end sync tests: Yahoo over HTTP, storage, and an in-process wearable

use std::sync::Arc;
use std::time::Duration;

use fantasy_wear::{
    commands::{AppContext, LocalWearable},
    config::{AppConfig, API_BASE_URL_ENV_VAR, CONSUMER_KEY_ENV_VAR, CONSUMER_SECRET_ENV_VAR},
    core::clock::FixedClock,
    protocol::{league_data, paths, WearTransport},
    storage::{Account, Preferences, Store},
    sync::{clean_unused_accounts, run_sync_loop, SyncRequest},
    Token,
};
use tokio_util::sync::CancellationToken;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const NOW_SEC: i64 = 1_700_000_000;

struct TestApp {
    ctx: AppContext,
    account: Account,
    _prefs_dir: tempfile::TempDir,
}

async fn mock_yahoo() -> MockServer {
    let server = MockServer::start().await;
    let uri = server.uri();
    Mock::given(method("GET"))
        .and(path("/fantasy/v2/users;use_login=1/games;is_available=1/leagues"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<fantasy_content><league><league_key>nfl.l.1</league_key><name>Office</name>\
             <scoring_type>head</scoring_type></league></fantasy_content>",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fantasy/v2/league/nfl.l.1/scoreboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "<fantasy_content><league><scoreboard><matchups><matchup><teams count=\"2\">\
             <team><name>Rival</name><team_logos><team_logo><url>{uri}/logos/rival.png</url>\
             </team_logo></team_logos><team_points><total>88.20</total></team_points></team>\
             <team><name>Mine</name><is_owned_by_current_login>1</is_owned_by_current_login>\
             <team_logos><team_logo><url>{uri}/logos/mine.png</url></team_logo></team_logos>\
             <team_points><total>101.50</total></team_points></team>\
             </teams></matchup></matchups></scoreboard></league></fantasy_content>"
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logos/mine.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"mine".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logos/rival.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"rival".to_vec()))
        .mount(&server)
        .await;
    server
}

fn app_for(server: &MockServer, last_sync_time_sec: i64) -> TestApp {
    let uri = server.uri();
    let config = AppConfig::from_lookup(|name| match name {
        CONSUMER_KEY_ENV_VAR => Some("consumer".to_string()),
        CONSUMER_SECRET_ENV_VAR => Some("consumer-secret".to_string()),
        API_BASE_URL_ENV_VAR => Some(format!("{uri}/fantasy/v2/")),
        _ => None,
    })
    .unwrap();

    let store = Store::new_in_memory().unwrap();
    let account = Account::new("GUID");
    store
        .add_account(
            &account,
            &Token {
                token: "token".to_string(),
                token_secret: "secret".to_string(),
                expiration_time_sec: Some(NOW_SEC + 3600),
                authorization_expiration_time_sec: Some(NOW_SEC + 86400),
                ..Token::default()
            },
        )
        .unwrap();
    store
        .set_last_sync_time_sec(&account, last_sync_time_sec)
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
        account,
        _prefs_dir: prefs_dir,
    }
}

#[tokio::test]
async fn test_initial_sync_is_acked_by_wearable() {
    let server = mock_yahoo().await;
    let app = app_for(&server, 0);
    let (wearable, _requests) = LocalWearable::connect();
    let adapter = app.ctx.sync_adapter(&wearable);

    let stats = adapter
        .on_perform_sync(&app.account, false, &CancellationToken::new())
        .await;

    assert_eq!(stats.num_updates, 1);
    assert!(!stats.has_error());
    assert_eq!(wearable.acks.pending(), 0);

    let items = wearable.wear().data_items().await.unwrap();
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.path, "league/GUID/nfl.l.1");
    assert!(league_data::is_manual_sync(&item.data_map));

    let matchup = league_data::matchup(&item.data_map).unwrap();
    assert_eq!(matchup.my_team.name, "Mine");
    assert_eq!(matchup.my_team.score, "101.50");
    assert_eq!(matchup.opponent_team.name, "Rival");
    assert_eq!(
        league_data::logo(&item.data_map).unwrap().data(),
        b"mine".as_slice()
    );
    assert_eq!(
        league_data::opponent_logo(&item.data_map).unwrap().data(),
        b"rival".as_slice()
    );

    assert_eq!(app.ctx.store.last_sync_time_sec(&app.account).unwrap(), NOW_SEC);
    assert_eq!(app.ctx.store.leagues(&app.account).unwrap().len(), 1);
}

#[tokio::test]
async fn test_wearable_sync_request_runs_manual_sync() {
    let server = mock_yahoo().await;
    // Synced recently, so nothing is due on the periodic schedule
    let app = app_for(&server, NOW_SEC - 100);
    let (wearable, requests) = LocalWearable::connect();
    let adapter = app.ctx.sync_adapter(&wearable);
    let cancel = CancellationToken::new();

    wearable.wear().send_message(paths::SYNC, b"").await.unwrap();

    let wear = wearable.wear();
    let (stats, ()) = tokio::join!(run_sync_loop(&adapter, requests, &cancel), async {
        for _ in 0..500 {
            if !wear.data_items().await.unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        cancel.cancel();
    });

    assert_eq!(stats.num_updates, 1);
    let items = wear.data_items().await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(league_data::is_manual_sync(&items[0].data_map));
}

#[tokio::test]
async fn test_sync_request_channel() {
    let (wearable, mut requests) = LocalWearable::connect();
    wearable.wear().send_message(paths::SYNC, b"").await.unwrap();
    assert_eq!(requests.recv().await, Some(SyncRequest::Manual));
}

#[tokio::test]
async fn test_removed_account_items_are_cleaned() {
    let server = mock_yahoo().await;
    let app = app_for(&server, 0);
    let (wearable, _requests) = LocalWearable::connect();
    app.ctx
        .sync_adapter(&wearable)
        .on_perform_sync(&app.account, false, &CancellationToken::new())
        .await;
    assert_eq!(wearable.host().data_items().await.unwrap().len(), 1);

    let deleted = clean_unused_accounts(&app.ctx.store, &wearable.host(), &[])
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert!(wearable.wear().data_items().await.unwrap().is_empty());
    assert!(app.ctx.store.accounts().unwrap().is_empty());
}
