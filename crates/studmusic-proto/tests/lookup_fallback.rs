//! Lookup against an in-process provider. Each failure mode must produce the
//! fallback list exactly.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use studmusic_proto::catalog::{fallback_tracks, Track};
use studmusic_proto::config::LookupConfig;
use studmusic_proto::lookup::{TrackLookup, UNKNOWN_ARTIST};
use tokio::net::TcpListener;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn lookup(endpoint: String) -> TrackLookup {
    let config = LookupConfig {
        endpoint,
        token: Some("test-token".into()),
        ..LookupConfig::default()
    };
    TrackLookup::new(&config)
}

async fn server_error() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn malformed() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "{\"tracks\": [unterminated")
}

async fn wrong_shape() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "{\"error\": \"no tracks here\"}")
}

async fn search(headers: HeaderMap, query: axum::extract::RawQuery) -> impl IntoResponse {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer test-token");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, String::new());
    }
    let query = query.0.unwrap_or_default();
    assert!(query.contains("q=night+drive") || query.contains("q=night%20drive"));
    assert!(query.contains("type=track"));
    assert!(query.contains("limit=6"));

    let body = serde_json::json!({
        "tracks": { "items": [
            {
                "id": "sp1",
                "name": "Nightcall",
                "artists": [{ "name": "Kavinsky" }],
                "album": { "name": "OutRun", "images": [{ "url": "https://img/outrun" }] },
                "duration_ms": 258_000
            },
            { "id": "sp2", "name": "Untitled" }
        ]}
    });
    (StatusCode::OK, body.to_string())
}

#[tokio::test]
async fn network_error_yields_fallback() {
    // Bind then drop so the port is closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let tracks = lookup(format!("http://{}/v1/search", addr))
        .fetch_tracks("anything")
        .await;
    assert_eq!(tracks, fallback_tracks());
}

#[tokio::test]
async fn http_500_yields_fallback() {
    let base = serve(Router::new().route("/v1/search", get(server_error))).await;
    let tracks = lookup(format!("{}/v1/search", base)).fetch_tracks("anything").await;
    assert_eq!(tracks, fallback_tracks());
}

#[tokio::test]
async fn malformed_body_yields_fallback() {
    let base = serve(Router::new().route("/v1/search", get(malformed))).await;
    let tracks = lookup(format!("{}/v1/search", base)).fetch_tracks("anything").await;
    assert_eq!(tracks, fallback_tracks());
}

#[tokio::test]
async fn body_without_items_yields_fallback() {
    let base = serve(Router::new().route("/v1/search", get(wrong_shape))).await;
    let tracks = lookup(format!("{}/v1/search", base)).fetch_tracks("anything").await;
    assert_eq!(tracks, fallback_tracks());
}

#[tokio::test]
async fn custom_fallback_is_returned_unchanged() {
    let base = serve(Router::new().route("/v1/search", get(server_error))).await;
    let custom = vec![Track {
        id: "local".into(),
        title: "Local".into(),
        artist: "Me".into(),
        album: "Demo".into(),
        duration: 60,
        cover_url: String::new(),
        genre: "Demo".into(),
    }];
    let tracks = lookup(format!("{}/v1/search", base))
        .with_fallback(custom.clone())
        .fetch_tracks("anything")
        .await;
    assert_eq!(tracks, custom);
}

#[tokio::test]
async fn success_maps_provider_tracks() {
    let base = serve(Router::new().route("/v1/search", get(search))).await;
    let tracks = lookup(format!("{}/v1/search", base)).fetch_tracks("night drive").await;

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].id, "sp1");
    assert_eq!(tracks[0].artist, "Kavinsky");
    assert_eq!(tracks[0].duration, 258);
    assert_eq!(tracks[0].cover_url, "https://img/outrun");
    assert_eq!(tracks[1].title, "Untitled");
    assert_eq!(tracks[1].artist, UNKNOWN_ARTIST);
}

#[tokio::test]
async fn missing_token_is_rejected_then_falls_back() {
    let base = serve(Router::new().route("/v1/search", get(search))).await;
    let config = LookupConfig {
        endpoint: format!("{}/v1/search", base),
        token: None,
        ..LookupConfig::default()
    };
    // Guard against a token leaking in from the environment.
    if std::env::var(studmusic_proto::config::TOKEN_ENV).is_ok() {
        return;
    }
    let tracks = TrackLookup::new(&config).fetch_tracks("night drive").await;
    assert_eq!(tracks, fallback_tracks());
}
