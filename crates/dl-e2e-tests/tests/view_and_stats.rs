//! E2E tests for reading a debug log from disk: paging, links, stats.

mod helpers;

use serde_json::json;

use helpers::TestHarness;

fn ids(result: &dl_log_parser::ToolResult) -> Vec<u64> {
    result.data.as_ref().unwrap()["page"]["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect()
}

/// Every record is reachable by walking pages, none twice.
#[tokio::test]
async fn e2e_pages_cover_every_record() {
    let h = TestHarness::with_sample();

    let mut seen = Vec::new();
    for page in 1..=3 {
        let result = h
            .run("view_log", json!({"orderby": "id", "order": "asc", "page": page}))
            .await
            .unwrap();
        assert!(result.success);
        seen.extend(ids(&result));
    }
    assert_eq!(seen, [1, 2, 3, 4, 5]);

    let past_end = h.run("view_log", json!({"page": 4})).await.unwrap();
    assert!(past_end.success);
    assert!(ids(&past_end).is_empty());
}

/// The impossible date is reported, not fatal.
#[tokio::test]
async fn e2e_malformed_line_is_skipped() {
    let h = TestHarness::with_sample();
    let result = h.run("view_log", json!({})).await.unwrap();
    let data = result.data.as_ref().unwrap();
    assert_eq!(data["total_records"], 5);
    assert_eq!(data["malformed_lines"], 1);
}

/// Paths under the configured root become source links; traces come through verbatim.
#[tokio::test]
async fn e2e_links_and_trace() {
    let h = TestHarness::with_sample();
    let result = h
        .run("view_log", json!({"type": "fatal_error"}))
        .await
        .unwrap();
    let record = &result.data.as_ref().unwrap()["page"]["records"][0];
    let message = record["message"].as_str().unwrap();
    assert!(message.starts_with("Uncaught Error"));
    assert!(message.contains(r#"href="source.php?file=wp-content/plugins/shop/shop.php""#));
    assert_eq!(
        record["trace"],
        json!(["#0 /srv/wp/wp-includes/class-wp-hook.php(324): shop_boot('')", "#1 {main}"])
    );
    assert_eq!(record["time"], "2024 1. 15. 12:01:10");
}

#[tokio::test]
async fn e2e_stats_from_disk() {
    let h = TestHarness::with_sample();
    let result = h
        .run("log_stats", json!({"now": "2024-01-17T12:00:00Z"}))
        .await
        .unwrap();
    let data = result.data.as_ref().unwrap();
    assert_eq!(data["total"], 5);
    assert_eq!(data["total_lines"], 10);
    assert_eq!(data["by_type"]["Log Parser error"], 1);
    assert_eq!(data["by_period"]["today"], 1);
    assert_eq!(data["by_period"]["yesterday"], 2);
    assert_eq!(data["by_period"]["earlier"], 2);
}

/// A missing log surfaces as an error from the tool, once.
#[tokio::test]
async fn e2e_missing_log() {
    let h = TestHarness::with_sample();
    std::fs::remove_file(&h.log_path).unwrap();
    let err = h.run("view_log", json!({})).await.unwrap_err();
    assert!(matches!(err, dl_log_parser::LogError::SourceUnavailable { .. }));
}
