use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use anicatalog::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const ADMIN_KEY: &str = "test-admin-key";
const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef";

const AIRING: &str = "\
Naruto 2012 (Lunes)
1x01|http://cdn.example/naruto/1x01.mp4
1x02|http://cdn.example/naruto/1x02.mp4
2x01|http://cdn.example/naruto/2x01.mp4
Frieren 2023 (Viernes)
1x01.mp4 | http://cdn.example/frieren/1x01.mp4
";

const FINISHED: &str = "\
Bleach 2004
1x01|http://cdn.example/bleach/1x01.mp4
";

fn test_config() -> Config {
    let db_path =
        std::env::temp_dir().join(format!("anicatalog-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}?mode=rwc", db_path.display());
    config.server.admin_api_key = Some(ADMIN_KEY.to_string());
    config.tokens.signing_secret = Some(SECRET.to_string());
    config.ingest.upsert_interval_ms = 0;
    config
}

async fn spawn_with(config: Config) -> Router {
    let state = anicatalog::api::create_app_state(config, None)
        .await
        .expect("Failed to create app state");
    anicatalog::api::router(state)
}

async fn spawn_app() -> Router {
    let app = spawn_with(test_config()).await;

    for (section, text) in [("airing", AIRING), ("finished", FINISHED)] {
        let response = app
            .clone()
            .oneshot(ingest_request(section, text, Some(ADMIN_KEY)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    app
}

fn ingest_request(section: &str, text: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/api/catalog/ingest?section={section}"))
        .header("Content-Type", "text/plain");
    if let Some(key) = key {
        builder = builder.header("X-Api-Key", key);
    }
    builder.body(Body::from(text.to_string())).unwrap()
}

fn token_request(reference: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/episodes/token")
        .header("Content-Type", "application/json")
        .body(Body::from(json!({ "reference": reference }).to_string()))
        .unwrap()
}

fn resolve_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/episodes/resolve");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn issue_token(app: &Router, reference: &str) -> String {
    let response = app.clone().oneshot(token_request(reference)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_listing_hides_video_urls() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/anime").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(!text.contains("cdn.example"));
    assert!(!text.contains("video_url"));

    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_listing_filters_by_airing() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/anime?airing=false")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    let anime = json["data"].as_array().unwrap();
    assert_eq!(anime.len(), 1);
    assert_eq!(anime[0]["id"], "bleach");
    assert_eq!(anime[0]["is_airing"], false);
}

#[tokio::test]
async fn test_get_anime_detail() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/anime/naruto")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Naruto");
    assert_eq!(json["data"]["year"], 2012);
    assert_eq!(json["data"]["day"], "Lunes");
    assert_eq!(json["data"]["seasons"].as_array().unwrap().len(), 2);
    assert_eq!(
        json["data"]["seasons"][0]["episodes"][1]["reference"],
        "naruto-1-2"
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/anime/one-piece")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_token_then_resolve() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(token_request("naruto-2-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["expires_in"], 300);
    let token = json["data"]["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(resolve_request(Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("cache-control").unwrap(),
        "no-store"
    );

    let json = body_json(response).await;
    assert_eq!(
        json["data"]["video_url"],
        "http://cdn.example/naruto/2x01.mp4"
    );
    assert_eq!(json["data"]["anime_name"], "Naruto");
    assert_eq!(json["data"]["episode_number"], 1);
}

#[tokio::test]
async fn test_token_can_be_redeemed_repeatedly() {
    let app = spawn_app().await;
    let token = issue_token(&app, "frieren-1-1").await;

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(resolve_request(Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_resolve_rejects_bad_tokens() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(resolve_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(resolve_request(Some("not-a-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let mut token = issue_token(&app, "naruto-1-1").await;
    let last = token.pop().unwrap();
    token.push(if last == 'A' { 'B' } else { 'A' });

    let response = app
        .clone()
        .oneshot(resolve_request(Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_resolve_missing_episode_is_not_found() {
    let app = spawn_app().await;

    for reference in ["naruto-1-9", "naruto-5-1", "one-piece-1-1"] {
        let token = issue_token(&app, reference).await;
        let response = app
            .clone()
            .oneshot(resolve_request(Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{reference}");
    }
}

#[tokio::test]
async fn test_token_rejects_bad_references() {
    let app = spawn_app().await;

    for reference in ["", "   ", "naruto", "naruto-1", "-1-1", "naruto-x-1"] {
        let response = app.clone().oneshot(token_request(reference)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{reference:?}");
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
    }
}

#[tokio::test]
async fn test_token_without_secret_is_server_error() {
    let mut config = test_config();
    config.tokens.signing_secret = None;
    let app = spawn_with(config).await;

    let response = app.clone().oneshot(token_request("naruto-1-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    for reference in ["", "naruto", "naruto-x-1"] {
        let response = app.clone().oneshot(token_request(reference)).await.unwrap();
        assert_eq!(
            response.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "{reference:?}"
        );
    }
}

#[tokio::test]
async fn test_ingest_requires_admin_key() {
    let app = spawn_with(test_config()).await;

    let response = app
        .clone()
        .oneshot(ingest_request("airing", AIRING, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(ingest_request("airing", AIRING, Some("wrong")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(ingest_request("airing", AIRING, Some(ADMIN_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["anime"], 2);
    assert_eq!(json["data"]["episodes"], 4);
    assert_eq!(json["data"]["upserted"], 2);
}

#[tokio::test]
async fn test_ingest_disabled_without_admin_key() {
    let mut config = test_config();
    config.server.admin_api_key = None;
    let app = spawn_with(config).await;

    let response = app
        .clone()
        .oneshot(ingest_request("airing", AIRING, Some(ADMIN_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ingest_disabled_with_empty_admin_key() {
    let mut config = test_config();
    config.server.admin_api_key = Some(String::new());
    let app = spawn_with(config).await;

    for key in [Some(""), None, Some("anything")] {
        let response = app
            .clone()
            .oneshot(ingest_request("airing", AIRING, key))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{key:?}");
    }

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/anime").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_ingest_rejects_empty_presented_key() {
    let app = spawn_with(test_config()).await;

    let response = app
        .clone()
        .oneshot(ingest_request("airing", AIRING, Some("")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reingest_moves_title_between_sections() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(ingest_request(
            "finished",
            "Naruto 2012\n1x01|http://cdn.example/naruto/final.mp4\n",
            Some(ADMIN_KEY),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/anime?airing=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    let airing = json["data"].as_array().unwrap();
    assert_eq!(airing.len(), 1);
    assert_eq!(airing[0]["id"], "frieren");

    let token = issue_token(&app, "naruto-1-1").await;
    let response = app
        .clone()
        .oneshot(resolve_request(Some(&token)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["video_url"],
        "http://cdn.example/naruto/final.mp4"
    );
}

#[tokio::test]
async fn test_system_status() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let json = body_json(response).await;
    assert_eq!(json["data"]["database"], true);
    assert_eq!(json["data"]["anime_count"], 3);
    assert_eq!(json["data"]["tokens_enabled"], true);
    assert_eq!(json["data"]["token_ttl_seconds"], 300);
}

#[tokio::test]
async fn test_health_probes() {
    let app = spawn_with(test_config()).await;

    for uri in ["/api/system/health/live", "/api/system/health/ready"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = spawn_with(test_config()).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
