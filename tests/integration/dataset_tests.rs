use crate::common::{client_for, mount_empty_fallback, mount_images, mount_page, result_json};
use futures::StreamExt;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};
use unsplash_stream::config::load_config;
use unsplash_stream::output::{DirectorySink, RecordSink};
use unsplash_stream::{unsplash_dataset, SearchRequest, SearchSession, UnsplashClient};
use wiremock::MockServer;

async fn nature_server() -> MockServer {
    let mock_server = MockServer::start().await;
    let page = json!([
        result_json(&mock_server, "1", "a tree", false),
        result_json(&mock_server, "2", "a lake", false),
        result_json(&mock_server, "3", "a premium hill", true),
    ]);
    mount_page(&mock_server, "nature", 0, page).await;
    mount_empty_fallback(&mock_server).await;
    mount_images(&mock_server).await;
    mock_server
}

#[tokio::test]
async fn test_dataset_passes_are_isolated() {
    let mock_server = nature_server().await;
    let dataset = unsplash_dataset(client_for(&mock_server), "nature", 2).unwrap();

    let first = dataset.take_all().await;
    let second = dataset.take_all().await;

    let ids = |records: &Vec<unsplash_stream::Record>| -> Vec<String> {
        records.iter().filter_map(|r| r.id.clone()).collect()
    };
    assert_eq!(ids(&first), vec!["1", "2"]);
    assert_eq!(ids(&second), vec!["1", "2"]);
}

#[tokio::test]
async fn test_dataset_is_lazy() {
    let mock_server = nature_server().await;
    let dataset = unsplash_dataset(client_for(&mock_server), "nature", 1).unwrap();

    assert!(mock_server.received_requests().await.unwrap().is_empty());

    let mut stream = dataset.stream();
    let record = stream.next().await.expect("Expected a record");
    assert_eq!(record.text, "a tree");
    assert!(stream.next().await.is_none());

    // One page and one image, nothing fetched past the limit
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_config_driven_run_writes_manifest() {
    let mock_server = nature_server().await;
    let output = TempDir::new().unwrap();

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
[search]
base-url = "{}/napi"
topics = ["nature"]
limit = 2

[client]
user-agent = "unsplash-stream-tests"
timeout-secs = 5

[output]
directory = "{}"
"#,
        mock_server.uri(),
        output.path().display()
    )
    .unwrap();
    config_file.flush().unwrap();

    let config = load_config(config_file.path()).unwrap();
    let client = Arc::new(UnsplashClient::new(&config.client, &config.search).unwrap());
    let request = SearchRequest::from_config(&config.search).unwrap();
    let mut sink =
        DirectorySink::create(output.path(), &config.output.manifest_file).unwrap();

    let mut session = SearchSession::with_client(request, client);
    while let Some(record) = session.next_record().await {
        sink.write_record(&record).unwrap();
    }
    sink.finish().unwrap();

    assert_eq!(sink.written(), 2);
    assert!(output.path().join("00000-1.png").exists());
    assert!(output.path().join("00001-2.png").exists());

    let manifest = std::fs::read_to_string(output.path().join("manifest.jsonl")).unwrap();
    let lines: Vec<Value> = manifest
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["id"], "1");
    assert_eq!(lines[0]["text"], "a tree");
    assert_eq!(lines[0]["topic"], "nature");
    assert_eq!(lines[1]["file"], "00001-2.png");
    assert_eq!(lines[1]["width"], 1);
}
