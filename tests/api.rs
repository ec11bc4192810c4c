//! Relay endpoints driven through the router, with the upstream TTS API mocked.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use varco_tts_tester::config::{Config, UpstreamUrls};
use varco_tts_tester::{create_router, AppState};

struct TestApp {
    dir: TempDir,
    router: Router,
}

impl TestApp {
    fn new(catalog: &str, upstream_base: &str) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("voice.json"), catalog).unwrap();
        std::fs::create_dir(dir.path().join("public")).unwrap();
        std::fs::write(
            dir.path().join("public/index.html"),
            "<html>tester</html>",
        )
        .unwrap();

        let config = Config {
            port: 0,
            voices_file: dir.path().join("voice.json"),
            static_dir: dir.path().join("public"),
            upstream: UpstreamUrls {
                lite: format!("{}/lite", upstream_base),
                standard: format!("{}/standard", upstream_base),
            },
        };
        let router = create_router(Arc::new(AppState::from_config(&config)), &config.static_dir);

        Self { dir, router }
    }

    fn dir(&self) -> &Path {
        self.dir.path()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

const CATALOG: &str = r#"[
    {"speaker_uuid": "u1", "speaker_name": "김태리(기쁨)", "saas_name": "태리", "description": "여성, 밝음"},
    {"speaker_uuid": "u2", "speaker_name": "박민준", "description": "남성"}
]"#;

fn synth_body(mode: &str) -> Value {
    json!({
        "apiKey": "secret",
        "mode": mode,
        "text": " 안녕하세요 ",
        "language": "korean",
        "voice": "u1"
    })
}

async fn no_upstream_calls() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_voices_returns_raw_catalog() {
    let upstream = no_upstream_calls().await;
    let app = TestApp::new(CATALOG, &upstream.uri());

    let (status, body) = app.get("/api/voices").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["speaker_uuid"], "u1");
}

#[tokio::test]
async fn test_voices_cached_until_reload() {
    let upstream = no_upstream_calls().await;
    let app = TestApp::new(CATALOG, &upstream.uri());
    app.get("/api/voices").await;

    std::fs::write(app.dir().join("voice.json"), r#"[{"uuid":"new"}]"#).unwrap();

    let (_, cached) = app.get("/api/voices").await;
    assert_eq!(cached["data"].as_array().unwrap().len(), 2);

    let (_, reloaded) = app.get("/api/voices?reload=1").await;
    assert_eq!(reloaded["data"], json!([{ "uuid": "new" }]));
}

#[tokio::test]
async fn test_voices_repeated_reload_key_serves_cache() {
    let upstream = no_upstream_calls().await;
    let app = TestApp::new(CATALOG, &upstream.uri());
    app.get("/api/voices").await;

    std::fs::write(app.dir().join("voice.json"), "[]").unwrap();

    let (status, body) = app.get("/api/voices?reload=1&reload=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_voices_post_alias_with_reload_body() {
    let upstream = no_upstream_calls().await;
    let app = TestApp::new(CATALOG, &upstream.uri());
    app.post("/api/voices", json!({})).await;

    std::fs::write(app.dir().join("voice.json"), "[]").unwrap();

    let (_, cached) = app.post("/api/voices", json!({ "reload": false })).await;
    assert_eq!(cached["data"].as_array().unwrap().len(), 2);

    let (status, reloaded) = app.post("/api/voices", json!({ "reload": true })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reloaded["data"], json!([]));

    std::fs::write(app.dir().join("voice.json"), r#"[1]"#).unwrap();
    let (_, query_reload) = app
        .send(Request::post("/api/voices?reload=true").body(Body::empty()).unwrap())
        .await;
    assert_eq!(query_reload["data"], json!([1]));
}

#[tokio::test]
async fn test_malformed_catalog_is_server_error() {
    let upstream = no_upstream_calls().await;
    let app = TestApp::new(r#"{"not": "an array"}"#, &upstream.uri());

    let (status, body) = app.get("/api/voices").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "ok": false, "error": "voice.json must be an array" }));
}

#[tokio::test]
async fn test_synthesize_standard_forwards_seed() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/standard/synthesize"))
        .and(header("openapi_key", "secret"))
        .and(body_json(json!({
            "text": "안녕하세요",
            "language": "korean",
            "voice": "u1",
            "properties": { "speed": 1.5 },
            "return_metadata": true,
            "n_fm_steps": 8,
            "seed": 42
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "audio": "UklGRg==" })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = TestApp::new(CATALOG, &upstream.uri());
    let mut body = synth_body("standard");
    body["seed"] = json!(42);
    body["n_fm_steps"] = json!("8");
    body["speed"] = json!("1.5");
    body["pitch"] = json!("");
    body["return_metadata"] = json!(true);

    let (status, response) = app.post("/api/synthesize", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "ok": true, "data": { "audio": "UklGRg==" } }));
}

#[tokio::test]
async fn test_synthesize_lite_omits_seed() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/lite/synthesize"))
        .and(body_json(json!({
            "text": "안녕하세요",
            "language": "korean",
            "voice": "u1",
            "properties": {},
            "return_metadata": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "audio": "" })))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = TestApp::new(CATALOG, &upstream.uri());
    let mut body = synth_body("lite");
    body["seed"] = json!(42);
    body["n_fm_steps"] = json!(8);

    let (status, response) = app.post("/api/synthesize", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["ok"], true);
}

#[tokio::test]
async fn test_synthesize_unknown_mode_rejected() {
    let upstream = no_upstream_calls().await;
    let app = TestApp::new(CATALOG, &upstream.uri());

    let (status, body) = app.post("/api/synthesize", synth_body("exotic")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "ok": false, "error": "mode must be lite|standard" }));
}

#[tokio::test]
async fn test_synthesize_missing_text_rejected() {
    let upstream = no_upstream_calls().await;
    let app = TestApp::new(CATALOG, &upstream.uri());

    let mut body = synth_body("lite");
    body.as_object_mut().unwrap().remove("text");

    let (status, body) = app.post("/api/synthesize", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "ok": false, "error": "text is required" }));
}

#[tokio::test]
async fn test_synthesize_invalid_number_rejected() {
    let upstream = no_upstream_calls().await;
    let app = TestApp::new(CATALOG, &upstream.uri());

    let mut body = synth_body("standard");
    body["speed"] = json!("abc");

    let (status, body) = app.post("/api/synthesize", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid number");
}

#[tokio::test]
async fn test_synthesize_non_json_body_rejected() {
    let upstream = no_upstream_calls().await;
    let app = TestApp::new(CATALOG, &upstream.uri());

    let (status, body) = app
        .send(
            Request::post("/api/synthesize")
                .header("content-type", "application/json")
                .body(Body::from("{oops"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_upstream_failure_echoed() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("invalid key"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let app = TestApp::new(CATALOG, &upstream.uri());
    let (status, body) = app.post("/api/synthesize", synth_body("lite")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["ok"], false);
    assert_eq!(body["status"], 401);
    assert_eq!(body["statusText"], "Unauthorized");
    assert!(body["contentType"].as_str().unwrap().starts_with("text/plain"));
    assert_eq!(body["body"], "invalid key");
}

#[tokio::test]
async fn test_upstream_non_json_success_passed_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain text result"))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = TestApp::new(CATALOG, &upstream.uri());
    let (status, body) = app.post("/api/synthesize", synth_body("lite")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "data": "plain text result" }));
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let app = TestApp::new(CATALOG, "http://127.0.0.1:9");
    let (status, body) = app.post("/api/synthesize", synth_body("lite")).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_health_and_static_files() {
    let upstream = no_upstream_calls().await;
    let app = TestApp::new(CATALOG, &upstream.uri());

    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("<html>tester</html>".into()));
}
