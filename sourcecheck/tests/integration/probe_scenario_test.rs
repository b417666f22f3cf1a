//! Integration Test: 混在シナリオでの分類と集計
//!
//! 正常・HTTPエラー・切断後に回復・無応答の4エンドポイントを同時に確認する。

use std::time::Duration;

use serde_json::json;
use sourcecheck::progress::ProgressSink;
use sourcecheck::runner::run_checks;
use sourcecheck_common::config::ProbeConfig;
use sourcecheck_common::types::{Category, Endpoint, ProbeOutcome};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::http::{refused_base_url, spawn_flaky_server};

#[derive(Default)]
struct RecordingSink {
    lines: Vec<(String, Category)>,
}

impl ProgressSink for RecordingSink {
    fn on_outcome(&mut self, outcome: &ProbeOutcome) {
        self.lines.push((outcome.key().to_string(), outcome.status));
    }
}

fn config(concurrency: usize, timeout_ms: u64, max_retries: u32) -> ProbeConfig {
    ProbeConfig {
        concurrency,
        timeout_ms,
        max_retries,
        ..Default::default()
    }
}

/// A: 200(5件) / B: 500 / C: 切断→200(0件) / D: 無応答
#[tokio::test]
async fn test_mixed_scenario_classification() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a/"))
        .and(query_param("ac", "list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 1,
            "list": [{"vod_id": 1}, {"vod_id": 2}, {"vod_id": 3}, {"vod_id": 4}, {"vod_id": 5}]
        })))
        .expect(1)
        .mount(&mock)
        .await;

    Mock::given(method("GET"))
        .and(path("/b/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock)
        .await;

    Mock::given(method("GET"))
        .and(path("/d/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"list": [1]}))
                .set_delay(Duration::from_secs(10)),
        )
        .expect(1)
        .mount(&mock)
        .await;

    let flaky = spawn_flaky_server(1, r#"{"code":1,"list":[]}"#).await;

    let endpoints = vec![
        Endpoint::new("A", "Source A", format!("{}/a/", mock.uri())),
        Endpoint::new("B", "Source B", format!("{}/b/", mock.uri())),
        Endpoint::new("C", "Source C", flaky.base_url()),
        Endpoint::new("D", "Source D", format!("{}/d/", mock.uri())),
    ];

    let mut sink = RecordingSink::default();
    let output = run_checks(&config(4, 1000, 1), endpoints, &mut sink)
        .await
        .unwrap();
    let report = output.report;

    let keys: Vec<&str> = report.results.iter().map(|o| o.key()).collect();
    assert_eq!(keys, vec!["A", "B", "C", "D"]);

    let a = &report.results[0];
    assert_eq!(a.status, Category::Success);
    assert_eq!(a.item_count, 5);

    let b = &report.results[1];
    assert_eq!(b.status, Category::HttpError);
    assert_eq!(b.http_status, Some(500));

    let c = &report.results[2];
    assert_eq!(c.status, Category::SuccessNoData);
    assert_eq!(c.item_count, 0);
    assert_eq!(flaky.connections(), 2, "C should be retried exactly once");

    let d = &report.results[3];
    assert_eq!(d.status, Category::Timeout);
    assert!(d.elapsed_ms >= 1000);

    assert_eq!(report.success_count, 1);
    assert_eq!(report.no_data_count, 1);
    assert_eq!(report.failed_count, 2);
    assert_eq!(report.total_count, 4);
    assert!(report.is_consistent());

    // 進捗はタスクごとに1回だけ
    assert_eq!(sink.lines.len(), 4);
    // 無応答のDが最後に確定する
    assert_eq!(sink.lines.last().unwrap().0, "D");

    flaky.stop().await;
}

/// 常に切断されるエンドポイントは 1 + 再試行回数 だけ試行される
#[tokio::test]
async fn test_persistent_disconnect_exhausts_retries() {
    let flaky = spawn_flaky_server(usize::MAX, "{}").await;
    let endpoints = vec![Endpoint::new("flaky", "Flaky", flaky.base_url())];

    let mut sink = RecordingSink::default();
    let output = run_checks(&config(1, 2000, 3), endpoints, &mut sink)
        .await
        .unwrap();

    let outcome = &output.report.results[0];
    assert_eq!(outcome.status, Category::NetworkError);
    assert!(outcome.http_status.is_none());
    assert!(outcome
        .error_message
        .as_deref()
        .unwrap()
        .contains("after 4 attempts"));
    assert_eq!(flaky.connections(), 4);
    assert_eq!(sink.lines.len(), 1);

    flaky.stop().await;
}

/// 接続拒否は通信エラーとして分類され、実行は継続する
#[tokio::test]
async fn test_connection_refused_does_not_abort_run() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": [1, 2]})))
        .mount(&mock)
        .await;

    let endpoints = vec![
        Endpoint::new("down", "Down", refused_base_url()),
        Endpoint::new("up", "Up", format!("{}/", mock.uri())),
    ];

    let output = run_checks(&config(2, 2000, 1), endpoints, &mut RecordingSink::default())
        .await
        .unwrap();

    assert_eq!(output.report.results[0].status, Category::NetworkError);
    assert_eq!(output.report.results[1].status, Category::Success);
    assert_eq!(output.report.results[1].item_count, 2);
    assert_eq!(output.report.failed_count, 1);
}

/// 実HTTPでも同時実行数の上限を超えない
#[tokio::test]
async fn test_peak_in_flight_respects_limit_over_http() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"list": [1]}))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(12)
        .mount(&mock)
        .await;

    let endpoints: Vec<Endpoint> = (0..12)
        .map(|i| {
            Endpoint::new(
                format!("s{:02}", i),
                format!("Source {}", i),
                format!("{}/s{:02}/", mock.uri(), i),
            )
        })
        .collect();
    let expected: Vec<String> = endpoints.iter().map(|e| e.key.clone()).collect();

    let output = run_checks(&config(3, 5000, 0), endpoints, &mut RecordingSink::default())
        .await
        .unwrap();

    assert!(output.stats.peak_in_flight <= 3);
    assert!(output.stats.peak_in_flight >= 1);
    let keys: Vec<String> = output
        .report
        .results
        .iter()
        .map(|o| o.key().to_string())
        .collect();
    assert_eq!(keys, expected);
    assert_eq!(output.report.success_count, 12);
}
