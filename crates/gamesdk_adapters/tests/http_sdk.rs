use chrono::{Duration, Local};
use gamesdk_adapters::{connect, connect_with_client, HttpGameSdk};
use gamesdk_core::entities::{
    Achievement, CompletedSession, EndState, GameContext, GameRegistration, LobbyContext,
    LobbyPatch, Rule,
};
use gamesdk_core::{Error, SdkConfig, ServiceUrls};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use uuid::Uuid;

const VALID_KEY: &str = "band1TBBB";
const GAME_ID: &str = "d77e1d1f-6b46-4c89-9290-3b9cf8a7c001";
const PLAYER_ID: &str = "94dad160-f5c8-4817-8f2d-611e1436ffcd";
const OWNER_ID: &str = "9f01b00e-e627-497c-975c-452451cc0b55";
const LOBBY_ID: &str = "0b7c5a51-3a5f-4d3c-9d0e-5f9c1bd1a4e2";

fn id(value: &str) -> Uuid {
    Uuid::parse_str(value).unwrap()
}

fn config(server: &ServerGuard, api_key: &str) -> SdkConfig {
    SdkConfig::new(api_key, ServiceUrls::single(format!("{}/api", server.url())))
}

async fn mock_auth(server: &mut ServerGuard, expires_in: i64, hits: usize) -> Mock {
    server
        .mock("POST", "/api/registry/auth")
        .match_header("content-type", "application/json")
        .match_header("accept", "application/json")
        .match_body(Matcher::Json(json!({ "apiKey": VALID_KEY })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "access_token": "tok-123", "expires_in": expires_in }).to_string())
        .expect(hits)
        .create_async()
        .await
}

async fn connected(server: &mut ServerGuard) -> (HttpGameSdk, Mock) {
    let auth = mock_auth(server, 3600, 1).await;
    let sdk = connect(config(server, VALID_KEY)).await.unwrap();
    (sdk, auth)
}

#[tokio::test]
async fn valid_api_key_obtains_bearer_token() {
    let mut server = Server::new_async().await;
    let (sdk, auth) = connected(&mut server).await;

    assert!(!sdk.is_token_expired().await);
    assert_eq!(sdk.bearer_token().await.unwrap(), "tok-123");
    // Second read is served from the cache.
    assert_eq!(sdk.bearer_token().await.unwrap(), "tok-123");

    auth.assert_async().await;
}

#[tokio::test]
async fn invalid_api_key_fails_construction() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/registry/auth")
        .with_status(401)
        .create_async()
        .await;

    let result = connect(config(&server, "invalidkey")).await;
    assert!(matches!(result, Err(Error::AuthenticationFailed(_))));
}

#[tokio::test]
async fn revoked_api_key_fails_construction() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/registry/auth")
        .match_body(Matcher::Json(json!({ "apiKey": "band1TAAA" })))
        .with_status(403)
        .create_async()
        .await;

    let err = connect(config(&server, "band1TAAA")).await.err().unwrap();
    assert!(err.is_authentication());
}

#[tokio::test]
async fn malformed_auth_response_fails_construction() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/registry/auth")
        .with_status(200)
        .with_body(r#"{"access_token":"tok-123"}"#)
        .create_async()
        .await;

    let err = connect(config(&server, VALID_KEY)).await.err().unwrap();
    assert!(err.to_string().contains("expires_in"));
}

#[tokio::test]
async fn unreachable_server_fails_construction() {
    let config = SdkConfig::new(VALID_KEY, ServiceUrls::single("http://127.0.0.1:9/api"));
    let err = connect(config).await.err().unwrap();
    assert!(err.is_authentication());
}

#[tokio::test]
async fn register_game_with_all_fields() {
    let mut server = Server::new_async().await;
    let (sdk, _auth) = connected(&mut server).await;
    let games = server
        .mock("PATCH", "/api/registry/games")
        .match_header("authorization", "Bearer tok-123")
        .match_body(Matcher::PartialJson(json!({
            "title": "Duck!",
            "currentHost": "http://localhost:4242/duckgame",
            "currentPrice": 0.42,
            "rules": [{ "stepNumber": 1, "rule": "You are a duck." }],
            "achievements": [{
                "uniqueNumber": 240,
                "title": "Is It Still Breathing?",
                "description": "Stay underwater for over a minute.",
                "counterTotal": 60
            }]
        })))
        .with_status(200)
        .with_body(json!({ "uuid": GAME_ID }).to_string())
        .create_async()
        .await;

    let registration = GameRegistration::new("Duck!", "http://localhost:4242/duckgame")
        .with_description("Duck! is the world class duck game where you must duck.")
        .with_price(0.42)
        .with_rules(vec![Rule::new(1, "You are a duck.")])
        .with_screenshots(vec![
            "http://localhost:4242/assets/duckgame/screenshot1.png".to_string(),
        ])
        .with_achievements(vec![Achievement::new(
            240,
            "Is It Still Breathing?",
            "Stay underwater for over a minute.",
        )
        .with_counter_total(60)]);

    let ctx = sdk.register_game(&registration).await.unwrap();

    assert_eq!(ctx.game_id(), id(GAME_ID));
    games.assert_async().await;
}

#[tokio::test]
async fn register_game_required_fields_only_omits_optionals() {
    let mut server = Server::new_async().await;
    let (sdk, _auth) = connected(&mut server).await;
    let games = server
        .mock("PATCH", "/api/registry/games")
        .match_body(Matcher::Json(json!({
            "title": "Lobby Test Game",
            "currentHost": "http://localhost:4242/lobby"
        })))
        .with_status(200)
        .with_body(json!({ "uuid": GAME_ID }).to_string())
        .create_async()
        .await;

    let ctx = sdk
        .register_game(&GameRegistration::new(
            "Lobby Test Game",
            "http://localhost:4242/lobby",
        ))
        .await
        .unwrap();

    assert_eq!(ctx.game_id(), id(GAME_ID));
    games.assert_async().await;
}

#[tokio::test]
async fn create_lobby_returns_lobby_context() {
    let mut server = Server::new_async().await;
    let (sdk, _auth) = connected(&mut server).await;
    let lobby = server
        .mock("POST", "/api/lobby")
        .match_header("authorization", "Bearer tok-123")
        .match_body(Matcher::Json(json!({
            "gameId": GAME_ID,
            "ownerId": OWNER_ID,
            "maxPlayers": 2
        })))
        .with_status(201)
        .with_body(json!({ "uuid": LOBBY_ID }).to_string())
        .create_async()
        .await;

    let ctx = sdk
        .create_lobby(&GameContext::new(id(GAME_ID)), id(OWNER_ID), 2)
        .await
        .unwrap();

    assert_eq!(ctx.lobby_id(), id(LOBBY_ID));
    lobby.assert_async().await;
}

#[tokio::test]
async fn patch_lobby_existing_and_missing() {
    let mut server = Server::new_async().await;
    let (sdk, _auth) = connected(&mut server).await;
    let existing = server
        .mock("PATCH", format!("/api/lobby/{}", LOBBY_ID).as_str())
        .match_body(Matcher::Json(json!({ "closed": true })))
        .with_status(200)
        .create_async()
        .await;
    let missing_id = Uuid::new_v4();
    server
        .mock("PATCH", format!("/api/lobby/{}", missing_id).as_str())
        .with_status(404)
        .create_async()
        .await;

    sdk.patch_lobby(
        &LobbyContext::new(id(LOBBY_ID)),
        &LobbyPatch::default().closed(true),
    )
    .await
    .unwrap();
    existing.assert_async().await;

    let err = sdk
        .patch_lobby(
            &LobbyContext::new(missing_id),
            &LobbyPatch::default().player_count(2).closed(true),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OperationFailed(ref d) if d.contains("404")));
}

#[tokio::test]
async fn submit_completed_session_with_required_fields() {
    let mut server = Server::new_async().await;
    let (sdk, _auth) = connected(&mut server).await;
    let submit = server
        .mock("POST", Matcher::Regex(r"^/api/statistics/submit".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("playerId".to_string(), PLAYER_ID.to_string()),
            Matcher::UrlEncoded("gameId".to_string(), GAME_ID.to_string()),
        ]))
        .match_body(Matcher::PartialJson(json!({ "endState": "WIN" })))
        .with_status(200)
        .create_async()
        .await;

    let now = Local::now().naive_local();
    let session = CompletedSession::new(now - Duration::hours(2), now - Duration::minutes(20), EndState::Win);

    let added = sdk
        .submit_completed_session(&GameContext::new(id(GAME_ID)), id(PLAYER_ID), &session)
        .await
        .unwrap();

    assert!(added);
    submit.assert_async().await;
}

#[tokio::test]
async fn update_achievement_progress_with_and_without_amount() {
    let mut server = Server::new_async().await;
    let (sdk, _auth) = connected(&mut server).await;
    let without_amount = server
        .mock("POST", Matcher::Regex(r"^/api/statistics/achievements/1\b".to_string()))
        .match_body(Matcher::Json(json!({ "newProgressAmount": null })))
        .with_status(200)
        .create_async()
        .await;
    let with_amount = server
        .mock("POST", Matcher::Regex(r"^/api/statistics/achievements/2\b".to_string()))
        .match_query(Matcher::UrlEncoded("gameId".to_string(), GAME_ID.to_string()))
        .match_body(Matcher::Json(json!({ "newProgressAmount": 10 })))
        .with_status(200)
        .create_async()
        .await;

    let game = GameContext::new(id(GAME_ID));
    assert!(sdk
        .update_achievement_progress(&game, id(PLAYER_ID), 1, None)
        .await
        .unwrap());
    assert!(sdk
        .update_achievement_progress(&game, id(PLAYER_ID), 2, Some(10))
        .await
        .unwrap());

    without_amount.assert_async().await;
    with_amount.assert_async().await;
}

#[tokio::test]
async fn forbidden_operation_is_authentication_failure() {
    let mut server = Server::new_async().await;
    let (sdk, _auth) = connected(&mut server).await;
    server
        .mock("POST", "/api/lobby")
        .with_status(403)
        .create_async()
        .await;

    let err = sdk
        .create_lobby(&GameContext::new(id(GAME_ID)), id(OWNER_ID), 2)
        .await
        .unwrap_err();
    assert!(err.is_authentication());
}

#[tokio::test]
async fn expired_token_is_renewed_before_request() {
    let mut server = Server::new_async().await;
    // Lifetime equal to the margin: every freshness check re-authenticates.
    let auth = mock_auth(&mut server, 10, 2).await;
    let games = server
        .mock("PATCH", "/api/registry/games")
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_body(json!({ "uuid": GAME_ID }).to_string())
        .create_async()
        .await;

    let sdk = connect(config(&server, VALID_KEY)).await.unwrap();
    assert!(sdk.is_token_expired().await);

    sdk.register_game(&GameRegistration::new("Game", "http://host"))
        .await
        .unwrap();

    auth.assert_async().await;
    games.assert_async().await;
}

#[tokio::test]
async fn custom_client_is_used() {
    let mut server = Server::new_async().await;
    let auth = server
        .mock("POST", "/api/registry/auth")
        .match_header("user-agent", "custom-host/1.0")
        .with_status(200)
        .with_body(json!({ "access_token": "tok-123", "expires_in": 3600 }).to_string())
        .create_async()
        .await;

    let client = reqwest::Client::builder()
        .user_agent("custom-host/1.0")
        .build()
        .unwrap();
    connect_with_client(config(&server, VALID_KEY), client)
        .await
        .unwrap();

    auth.assert_async().await;
}
