//! Test utilities: in-memory databases, fake upstream APIs and app construction.

use axum_test::TestServer;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::{Config, SourcesConfig, UpstreamSource};
use crate::types::AnimalType;

/// A fresh, migrated in-memory database.
///
/// In-memory SQLite databases are per connection, so the pool holds exactly one that never
/// expires.
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    crate::migrator().run(&pool).await.expect("Failed to run migrations");
    pool
}

/// Bytes served by the fake primary image hosts (a PNG signature and IHDR chunk header)
pub fn sample_image() -> Vec<u8> {
    vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52]
}

/// Bytes served by the fake fallback hosts (a JPEG start-of-image marker and JFIF header)
pub fn fallback_image() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00]
}

fn upstream_url(server: &MockServer, path: &str) -> Url {
    Url::parse(&format!("{}{path}", server.uri())).expect("mock server url")
}

/// Test configuration with every upstream pointing at `server`:
/// primaries at `/{type}/primary`, fallbacks at `/{type}/fallback`.
pub fn create_test_config(server: &MockServer) -> Config {
    let source = |animal_type: AnimalType| UpstreamSource {
        primary_url: upstream_url(server, &format!("/{animal_type}/primary")),
        fallback_url: upstream_url(server, &format!("/{animal_type}/fallback")),
    };

    let mut config = Config::default();
    config.host = "127.0.0.1".to_string();
    config.port = 0;
    config.database.url = "sqlite::memory:".to_string();
    config.sources = SourcesConfig {
        cat: source(AnimalType::Cat),
        dog: source(AnimalType::Dog),
        bear: source(AnimalType::Bear),
    };
    config.request_timeout = std::time::Duration::from_secs(2);
    config.enable_metrics = false;
    config
}

/// Mount healthy upstreams on `server`: each primary answers in its own JSON shape pointing at
/// `/images/{type}.png`, which serves [`sample_image`] as `image/png`. Fallbacks serve
/// [`fallback_image`] as `image/jpeg`.
pub async fn mount_upstreams(server: &MockServer) {
    let image = |animal_type: &str| format!("{}/images/{animal_type}.png", server.uri());

    Mock::given(method("GET"))
        .and(path("/cat/primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "MTk3ODA3Mg", "url": image("cat"), "width": 500, "height": 375}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dog/primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": image("dog"),
            "status": "success"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bear/primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "Yz4bDhQq1xA",
            "urls": {"regular": image("bear"), "small": format!("{}?w=400", image("bear"))}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/images/(cat|dog|bear)\.png$"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sample_image(), "image/png"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/(cat|dog|bear)/fallback$"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(fallback_image(), "image/jpeg"))
        .mount(server)
        .await;
}

/// Application wired to a fresh in-memory database and to upstreams on `upstream`
pub async fn create_test_app(upstream: &MockServer) -> (TestServer, SqlitePool) {
    let pool = create_test_pool().await;
    let app = crate::Application::new_with_pool(create_test_config(upstream), Some(pool.clone()))
        .await
        .expect("Failed to create application");
    (app.into_test_server(), pool)
}
