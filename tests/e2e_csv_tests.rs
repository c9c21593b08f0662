//! End-to-end tests for CSV upload parsing.

mod common;

use common::*;
use serde_json::Value;

#[tokio::test]
async fn test_csv_with_header_round_trips() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let data = format!(
        "url,title,folder\n\
         https://youtu.be/{},First,\n\
         https://www.youtube.com/watch?v={},Second,Music\n",
        VIDEO_1, VIDEO_2
    );
    let response = client
        .parse_csv("videos.csv", "text/csv", data.into_bytes())
        .await;
    assert_eq!(response.status(), 200);

    let report: Value = response.json().await.unwrap();
    assert_eq!(report["validCount"], 2);
    assert_eq!(report["invalidCount"], 0);
    assert_eq!(report["duplicatesRemoved"], 0);

    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows[0]["rowIndex"], 2);
    assert_eq!(rows[1]["rowIndex"], 3);
    assert_eq!(rows[1]["folder"], "Music");
}

#[tokio::test]
async fn test_csv_duplicates_are_reported_not_dropped() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let data = format!(
        "url\nhttps://www.youtube.com/watch?v={}\nhttps://youtu.be/{}\n",
        VIDEO_1, VIDEO_1
    );
    let response = client
        .parse_csv("videos.csv", "text/csv", data.into_bytes())
        .await;
    assert_eq!(response.status(), 200);

    let report: Value = response.json().await.unwrap();
    assert_eq!(report["validCount"], 1);
    assert_eq!(report["duplicatesRemoved"], 1);
    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["status"], "duplicate");
}

#[tokio::test]
async fn test_rejects_non_csv_uploads_before_parsing() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .parse_csv("notes.txt", "text/plain", b"hello".to_vec())
        .await;
    assert_eq!(response.status(), 415);
}

#[tokio::test]
async fn test_legacy_excel_mimetype_is_accepted() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let data = format!("https://youtu.be/{}\n", VIDEO_1);
    let response = client
        .parse_csv("export", "application/vnd.ms-excel", data.into_bytes())
        .await;
    assert_eq!(response.status(), 200);

    let report: Value = response.json().await.unwrap();
    // Headerless: column 0 is the URL source, indices start at 1
    assert_eq!(report["validCount"], 1);
    assert_eq!(report["rows"][0]["rowIndex"], 1);
}

#[tokio::test]
async fn test_oversized_file_is_rejected_whole() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let mut data = String::from("url\n");
    for i in 0..5000 {
        data.push_str(&format!("https://example.com/{}\n", i));
    }
    let response = client
        .parse_csv("big.csv", "text/csv", data.into_bytes())
        .await;
    assert_eq!(response.status(), 413);
}

#[tokio::test]
async fn test_empty_file_is_a_bad_request() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.parse_csv("empty.csv", "text/csv", Vec::new()).await;
    assert_eq!(response.status(), 400);
}
