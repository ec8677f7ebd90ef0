use crate::common::{client_for, mount_page, png_bytes, result_json};
use serde_json::json;
use std::time::Duration;
use unsplash_stream::config::{ClientConfig, ExhaustionPolicy, SearchConfig};
use unsplash_stream::search::{ImageFetch, ImageSource, NetworkErrorKind, PageFetch, PageSource};
use unsplash_stream::state::ImageFailure;
use unsplash_stream::RawEntry;
use unsplash_stream::UnsplashClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_page_success() {
    let mock_server = MockServer::start().await;
    let page = json!([
        result_json(&mock_server, "1", "a tree", false),
        result_json(&mock_server, "2", "a lake", true),
    ]);
    mount_page(&mock_server, "nature", 0, page).await;

    let client = client_for(&mock_server);
    let fetched = client.fetch_page("nature", 0).await;

    let entries = match fetched {
        PageFetch::Page(entries) => entries,
        other => panic!("Expected a page, got {:?}", other),
    };
    assert_eq!(entries.len(), 2);
    let RawEntry::Result(first) = &entries[0] else {
        panic!("First entry should decode");
    };
    assert_eq!(first.photo_id(), Some("1"));
    assert_eq!(first.caption(), Some("a tree"));
}

#[tokio::test]
async fn test_fetch_page_empty_array() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "nature", 7, json!([])).await;

    let client = client_for(&mock_server);
    assert!(matches!(client.fetch_page("nature", 7).await, PageFetch::Empty));
}

#[tokio::test]
async fn test_fetch_page_http_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/napi/topics/nature/photos"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!([{"id": "x"}])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(matches!(
        client.fetch_page("nature", 0).await,
        PageFetch::HttpError { status_code: 503 }
    ));
}

#[tokio::test]
async fn test_fetch_page_not_json() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/napi/topics/nature/photos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(matches!(
        client.fetch_page("nature", 0).await,
        PageFetch::ParseError { .. }
    ));
}

#[tokio::test]
async fn test_fetch_page_unknown_topic_path_is_http_error() {
    // Nothing mounted: wiremock answers 404
    let mock_server = MockServer::start().await;

    let client = client_for(&mock_server);
    assert!(matches!(
        client.fetch_page("nature", 0).await,
        PageFetch::HttpError { status_code: 404 }
    ));
}

#[tokio::test]
async fn test_fetch_page_connection_refused() {
    // Bind and release a port so nothing is listening on it
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let client = UnsplashClient::with_base_url(&format!("http://127.0.0.1:{}/napi", port)).unwrap();

    match client.fetch_page("nature", 0).await {
        PageFetch::NetworkError { kind, .. } => assert_eq!(kind, NetworkErrorKind::Connect),
        other => panic!("Expected a network error, got {:?}", other),
    }
}

/// Client against the mock server that gives up on a request after one second
fn impatient_client(server: &MockServer) -> UnsplashClient {
    let client_config = ClientConfig {
        timeout_secs: 1,
        ..ClientConfig::default()
    };
    let search_config = SearchConfig {
        base_url: format!("{}/napi", server.uri()),
        per_page: 16,
        topics: vec!["nature".to_string()],
        limit: 1,
        on_exhausted: ExhaustionPolicy::Reset,
        max_consecutive_unavailable: None,
    };
    UnsplashClient::new(&client_config, &search_config).unwrap()
}

#[tokio::test]
async fn test_fetch_page_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/napi/topics/nature/photos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = impatient_client(&mock_server);

    match client.fetch_page("nature", 0).await {
        PageFetch::NetworkError { kind, .. } => assert_eq!(kind, NetworkErrorKind::Timeout),
        other => panic!("Expected a timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_image_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/slow.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png_bytes(1, 1))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = impatient_client(&mock_server);
    let fetched = client
        .fetch_image(&format!("{}/img/slow.png", mock_server.uri()))
        .await;

    match fetched {
        ImageFetch::NetworkError { kind, .. } => assert_eq!(kind, NetworkErrorKind::Timeout),
        other => panic!("Expected a timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_image_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(4, 3)))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let fetched = client
        .fetch_image(&format!("{}/img/a.png", mock_server.uri()))
        .await;

    let image = match fetched {
        ImageFetch::Image(image) => image,
        other => panic!("Expected an image, got {:?}", other),
    };
    assert_eq!((image.width(), image.height()), (4, 3));
}

#[tokio::test]
async fn test_fetch_image_failures() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/garbage.png"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not an image"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let garbage = client
        .fetch_image(&format!("{}/img/garbage.png", mock_server.uri()))
        .await;
    assert_eq!(garbage.failure(), Some(ImageFailure::DecodeError));

    let missing = client
        .fetch_image(&format!("{}/img/missing.png", mock_server.uri()))
        .await;
    assert!(matches!(missing, ImageFetch::HttpError { status_code: 404 }));

    let invalid = client.fetch_image("not a url").await;
    assert_eq!(invalid.failure(), Some(ImageFailure::NetworkError));
}

#[tokio::test]
async fn test_custom_page_size_in_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/napi/topics/travel/photos"))
        .and(wiremock::matchers::query_param("per_page", "4"))
        .and(wiremock::matchers::query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "t"}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = UnsplashClient::with_base_url(&format!("{}/napi", mock_server.uri()))
        .unwrap()
        .with_per_page(4);

    assert!(matches!(client.fetch_page("travel", 2).await, PageFetch::Page(_)));
}
