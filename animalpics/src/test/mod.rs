//! End-to-end tests: the full router against a fake upstream and an in-memory database.

use crate::api::models::animal_pictures::AnimalPictureResponse;
use crate::config::CorsOrigin;
use crate::test_utils::{create_test_app, create_test_config, create_test_pool, mount_upstreams, sample_image};
use axum::http::StatusCode;
use base64::{Engine, engine::general_purpose::STANDARD};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Follows a user through the service: check health, save a batch, read it back, browse docs.
#[test_log::test(tokio::test)]
async fn test_e2e_save_and_read_back() {
    let upstream = MockServer::start().await;
    mount_upstreams(&upstream).await;
    let (server, _pool) = create_test_app(&upstream).await;

    server.get("/healthz").await.assert_text("OK");

    // Nothing stored yet
    server.get("/api/animalpicture/dog/latest").await.assert_status(StatusCode::NOT_FOUND);

    let saved = server.post("/api/animalpicture/dog").add_query_param("count", 2).await;
    saved.assert_status_ok();
    let saved: AnimalPictureResponse = saved.json();
    assert_eq!(saved.animal_type, "dog");
    assert_eq!(STANDARD.decode(&saved.image_data).unwrap(), sample_image());

    let latest: AnimalPictureResponse = server.get("/api/animalpicture/dog/latest").await.json();
    assert_eq!(latest.id, saved.id);
    assert_eq!(latest.content_type, "image/png");

    // Two primary lookups and two image downloads for the batch
    let requests = upstream.received_requests().await.unwrap();
    assert_eq!(requests.iter().filter(|r| r.url.path() == "/dog/primary").count(), 2);
    assert_eq!(requests.iter().filter(|r| r.url.path() == "/images/dog.png").count(), 2);

    let doc: serde_json::Value = server.get("/api-docs/openapi.json").await.json();
    assert!(doc["paths"]["/animalpicture/{animal_type}/latest"].is_object());
    server.get("/docs").await.assert_status_ok();

    let page = server.get("/").await;
    page.assert_status_ok();
    assert!(page.text().contains("Animal Pictures"));
}

/// A download failure after the first picture ends the batch early but still succeeds.
#[test_log::test(tokio::test)]
async fn test_e2e_batch_stops_at_first_later_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/cat.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sample_image(), "image/png"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/images/cat.png"))
        .respond_with(ResponseTemplate::new(502))
        .with_priority(2)
        .mount(&upstream)
        .await;
    mount_upstreams(&upstream).await;
    let (server, pool) = create_test_app(&upstream).await;

    let response = server.post("/api/animalpicture/cat").add_query_param("count", 5).await;

    response.assert_status_ok();
    let picture: AnimalPictureResponse = response.json();
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM animal_pictures").fetch_one(&pool).await.unwrap();
    assert_eq!(stored, 1);

    let latest: AnimalPictureResponse = server.get("/api/animalpicture/cat/latest").await.json();
    assert_eq!(latest.id, picture.id);

    let downloads = upstream
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/images/cat.png")
        .count();
    assert_eq!(downloads, 2, "no attempts after the failed one");
}

/// Pictures are kept separately per type, and the newest one wins.
#[test_log::test(tokio::test)]
async fn test_e2e_latest_tracks_each_type() {
    let upstream = MockServer::start().await;
    mount_upstreams(&upstream).await;
    let (server, _pool) = create_test_app(&upstream).await;

    let cat: AnimalPictureResponse = server.post("/api/animalpicture/cat").await.json();
    let bear: AnimalPictureResponse = server.post("/api/animalpicture/bear").await.json();
    let newer_cat: AnimalPictureResponse = server.post("/api/animalpicture/CAT").await.json();

    assert!(newer_cat.id > cat.id);
    let latest_cat: AnimalPictureResponse = server.get("/api/animalpicture/cat/latest").await.json();
    let latest_bear: AnimalPictureResponse = server.get("/api/animalpicture/bear/latest").await.json();
    assert_eq!(latest_cat.id, newer_cat.id);
    assert_eq!(latest_bear.id, bear.id);
    assert_eq!(latest_bear.animal_type, "bear");
}

#[tokio::test]
async fn test_e2e_cors_wildcard_by_default() {
    let upstream = MockServer::start().await;
    let (server, _pool) = create_test_app(&upstream).await;

    let response = server.get("/healthz").add_header("origin", "https://anywhere.example").await;

    assert_eq!(
        response.headers().get("access-control-allow-origin").map(|v| v.to_str().unwrap()),
        Some("*")
    );
}

#[tokio::test]
async fn test_e2e_cors_configured_origin() {
    let upstream = MockServer::start().await;
    let mut config = create_test_config(&upstream);
    config.cors.allowed_origins = vec![CorsOrigin::Url(Url::parse("https://pictures.example.com/").unwrap())];
    let app = crate::Application::new_with_pool(config, Some(create_test_pool().await))
        .await
        .unwrap();
    let server = app.into_test_server();

    let allowed = server.get("/healthz").add_header("origin", "https://pictures.example.com").await;
    assert_eq!(
        allowed.headers().get("access-control-allow-origin").map(|v| v.to_str().unwrap()),
        Some("https://pictures.example.com")
    );

    let other = server.get("/healthz").add_header("origin", "https://elsewhere.example").await;
    assert!(other.headers().get("access-control-allow-origin").is_none());
}
