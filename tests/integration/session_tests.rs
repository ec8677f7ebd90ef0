use crate::common::{client_for, mount_empty_fallback, mount_images, mount_page, result_json};
use futures::StreamExt;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use unsplash_stream::config::ExhaustionPolicy;
use unsplash_stream::search::search;
use unsplash_stream::{Record, SearchRequest, SearchSession, SkipReason};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fresh_page(server: &MockServer, page: u32) -> Value {
    Value::Array(
        (0..16)
            .map(|i| result_json(server, &format!("p{}-{}", page, i), "caption", false))
            .collect(),
    )
}

#[tokio::test]
async fn test_nature_partial_fill_keeps_polling() {
    let mock_server = MockServer::start().await;
    let page = json!([
        {
            "id": "1",
            "plus": false,
            "alt_description": "a tree",
            "urls": { "full": format!("{}/img/a.png", mock_server.uri()) }
        },
        {
            "id": "2",
            "plus": true,
            "alt_description": "a premium tree",
            "urls": { "full": format!("{}/img/b.png", mock_server.uri()) }
        }
    ]);
    mount_page(&mock_server, "nature", 0, page).await;
    mount_empty_fallback(&mock_server).await;
    mount_images(&mock_server).await;

    let request = SearchRequest::single("nature", 2).unwrap();
    let mut session = SearchSession::with_client(request, client_for(&mock_server));

    let record = session.next_record().await.expect("Expected one record");
    assert_eq!(record.id.as_deref(), Some("1"));
    assert_eq!(record.text, "a tree");
    assert_eq!(record.topic, "nature");
    assert_eq!((record.image.width(), record.image.height()), (1, 1));

    // The second record never comes; the session keeps polling
    let second = tokio::time::timeout(Duration::from_millis(500), session.next_record()).await;
    assert!(second.is_err(), "No second record can exist");

    let requests = mock_server.received_requests().await.unwrap();
    let page_requests = requests
        .iter()
        .filter(|r| r.url.path() == "/napi/topics/nature/photos")
        .count();
    assert!(page_requests > 1, "Expected repeated page requests, got {}", page_requests);

    // The premium image is never downloaded
    assert!(requests.iter().all(|r| r.url.path() != "/img/b.png"));
    assert!(session.stats().skipped_for(SkipReason::Plus) >= 1);
}

#[tokio::test]
async fn test_exact_limit_across_pages() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "nature", 0, fresh_page(&mock_server, 0)).await;
    mount_page(&mock_server, "nature", 1, fresh_page(&mock_server, 1)).await;
    mount_empty_fallback(&mock_server).await;
    mount_images(&mock_server).await;

    let request = SearchRequest::single("nature", 20).unwrap();
    let client = client_for(&mock_server);
    let records: Vec<Record> = search(request, client.clone(), client).collect().await;

    assert_eq!(records.len(), 20);
    let ids: HashSet<_> = records.iter().filter_map(|r| r.id.clone()).collect();
    assert_eq!(ids.len(), 20);

    // Only the 20 pulled records had their images downloaded
    let requests = mock_server.received_requests().await.unwrap();
    let image_requests = requests
        .iter()
        .filter(|r| r.url.path().starts_with("/img/"))
        .count();
    assert_eq!(image_requests, 20);
}

#[tokio::test]
async fn test_broken_images_are_skipped() {
    let mock_server = MockServer::start().await;
    let page = json!([
        result_json(&mock_server, "ok-1", "first", false),
        result_json(&mock_server, "broken", "second", false),
        result_json(&mock_server, "ok-2", "third", false),
    ]);
    mount_page(&mock_server, "nature", 0, page).await;
    mount_empty_fallback(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/img/broken.png"))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(1)
        .mount(&mock_server)
        .await;
    mount_images(&mock_server).await;

    let request = SearchRequest::single("nature", 2).unwrap();
    let client = client_for(&mock_server);
    let records: Vec<Record> = search(request, client.clone(), client).collect().await;

    let ids: Vec<_> = records.iter().filter_map(|r| r.id.as_deref()).collect();
    assert_eq!(ids, vec!["ok-1", "ok-2"]);
}

#[tokio::test]
async fn test_duplicates_across_pages() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        "nature",
        0,
        json!([
            result_json(&mock_server, "a", "first", false),
            result_json(&mock_server, "b", "second", false),
        ]),
    )
    .await;
    mount_page(
        &mock_server,
        "nature",
        1,
        json!([
            result_json(&mock_server, "b", "second again", false),
            result_json(&mock_server, "c", "third", false),
        ]),
    )
    .await;
    mount_empty_fallback(&mock_server).await;
    mount_images(&mock_server).await;

    let request = SearchRequest::single("nature", 3).unwrap();
    let mut session = SearchSession::with_client(request, client_for(&mock_server));

    let mut ids = Vec::new();
    while let Some(record) = session.next_record().await {
        ids.push(record.id.unwrap());
    }

    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(session.stats().skipped_for(SkipReason::Duplicate), 1);
}

#[tokio::test]
async fn test_server_errors_give_up_when_capped() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/napi/topics/nature/photos"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&mock_server)
        .await;

    let request = SearchRequest::single("nature", 5)
        .unwrap()
        .with_exhaustion_policy(ExhaustionPolicy::Advance)
        .with_max_consecutive_unavailable(Some(4));
    let mut session = SearchSession::with_client(request, client_for(&mock_server));

    assert!(session.next_record().await.is_none());
    assert_eq!(session.stats().pages_requested, 4);
    assert_eq!(session.cursor("nature"), Some(4));
}

#[tokio::test]
async fn test_multiple_topics() {
    let mock_server = MockServer::start().await;
    for topic in ["nature", "travel"] {
        let page = json!([
            result_json(&mock_server, &format!("{}-1", topic), topic, false),
            result_json(&mock_server, &format!("{}-2", topic), topic, false),
        ]);
        mount_page(&mock_server, topic, 0, page).await;
    }
    mount_empty_fallback(&mock_server).await;
    mount_images(&mock_server).await;

    let request = SearchRequest::new(vec!["nature".to_string(), "travel".to_string()], 4)
        .unwrap()
        .with_seed(3);
    let client = client_for(&mock_server);
    let records: Vec<Record> = search(request, client.clone(), client).collect().await;

    assert_eq!(records.len(), 4);
    for record in &records {
        assert_eq!(record.text, record.topic);
        assert!(record.id.as_deref().unwrap().starts_with(&record.topic));
    }
}
