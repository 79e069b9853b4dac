//! Live client against an httpmock server, through pipeline and export.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use following_scraper::exporter::{export_run, summary_path};
use following_scraper::pipeline::FollowingPipeline;
use following_scraper::testing::numbered_payload;
use following_scraper::{OutputFormat, ProfileRecord};
use instagram_client::InstagramClient;

fn client_for(server: &MockServer) -> InstagramClient {
    InstagramClient::new(&server.base_url(), Duration::from_secs(5), None).unwrap()
}

#[tokio::test]
async fn alice_with_three_edges_exports_three_records() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/alice/").query_param("__a", "1");
            then.status(200).json_body(numbered_payload("a", 3));
        })
        .await;

    let client = client_for(&server);
    let output = FollowingPipeline::new(&client, 10)
        .with_delay(Duration::ZERO)
        .run(&["alice"])
        .await;

    assert_eq!(output.records.len(), 3);
    assert!(output.records.iter().all(|r| r.followed_by == "alice"));

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("following.json");
    let report = export_run(&output.records, &output.summary, &output_path, OutputFormat::Both)
        .unwrap()
        .unwrap();

    let exported: Vec<ProfileRecord> =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(exported, output.records);
    assert!(report.csv_path.unwrap().exists());

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(summary_path(&output_path)).unwrap())
            .unwrap();
    assert_eq!(summary, json!({ "alice": 3 }));
}

#[tokio::test]
async fn not_found_user_completes_with_nothing_exported() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nouser/");
            then.status(404).body("Sorry, this page isn't available.");
        })
        .await;

    let client = client_for(&server);
    let output = FollowingPipeline::new(&client, 10)
        .with_delay(Duration::ZERO)
        .run(&["nouser"])
        .await;

    mock.assert_async().await;
    assert!(output.is_empty());
    assert_eq!(output.stats.users_failed, 1);

    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("following.json");
    let report =
        export_run(&output.records, &output.summary, &output_path, OutputFormat::Json).unwrap();

    assert!(report.is_none());
    assert!(!output_path.exists());
    assert!(!summary_path(&output_path).exists());
}

#[tokio::test]
async fn html_login_wall_is_treated_as_no_data() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/alice/");
            then.status(200).body("<!DOCTYPE html><html>Login</html>");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/bob/");
            then.status(200).json_body(numbered_payload("b", 2));
        })
        .await;

    let client = client_for(&server);
    let output = FollowingPipeline::new(&client, 10)
        .with_delay(Duration::ZERO)
        .run(&["alice", "bob"])
        .await;

    assert_eq!(output.records.len(), 2);
    assert_eq!(output.summary.get("alice"), None);
    assert_eq!(output.summary["bob"], 2);
}
