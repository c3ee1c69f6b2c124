use crate::stub::{SilentEndpoint, StubReply, StubServer, closed_endpoint, write_input};
use engine_config::settings::{BatchSettings, paths::RunPaths};
use engine_runtime::{error::BatchError, execution::executor::run};
use serde_json::{Value, json};
use std::{fs, path::Path, time::Duration};
use tracing_test::traced_test;

const THREE_CUSTOMERS: &str = "\
customerID,gender,SeniorCitizen,tenure,MonthlyCharges,TotalCharges,Contract
7590-VHVEG,Female,0,1,29.85,29.85,Month-to-month
5575-GNVDE,Male,0,34,56.95,1889.5,One year
3668-QPYBK,Male,1,2,53.85,,Month-to-month
";

fn settings(api_url: String) -> BatchSettings {
    BatchSettings {
        api_url,
        ..BatchSettings::default()
    }
}

fn paths(dir: &Path, input: &str) -> RunPaths {
    RunPaths {
        input: write_input(dir, input),
        output: dir.join("out/scored.csv"),
        summary: dir.join("out/summary.json"),
    }
}

/// Output rows keyed by header name.
fn read_output(path: &Path) -> Vec<Vec<(String, String)>> {
    let mut reader = csv::Reader::from_path(path).expect("output is readable");
    let headers: Vec<String> = reader
        .headers()
        .expect("output has a header")
        .iter()
        .map(String::from)
        .collect();
    reader
        .records()
        .map(|record| {
            let record = record.expect("output row parses");
            headers
                .iter()
                .cloned()
                .zip(record.iter().map(String::from))
                .collect()
        })
        .collect()
}

fn cell<'a>(row: &'a [(String, String)], column: &str) -> &'a str {
    row.iter()
        .find(|(name, _)| name == column)
        .map(|(_, value)| value.as_str())
        .unwrap_or_else(|| panic!("missing column {column}"))
}

fn read_summary(path: &Path) -> Value {
    let contents = fs::read_to_string(path).expect("summary exists");
    serde_json::from_str(&contents).expect("summary is JSON")
}

#[traced_test]
#[tokio::test]
async fn all_rows_scored_high_risk() {
    let stub = StubServer::fixed(0.82, "Yes").await;
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path(), THREE_CUSTOMERS);

    let summary = run(&settings(stub.url()), &paths).await.unwrap();

    assert_eq!(summary.total_customers, 3);
    assert_eq!(summary.success_rate, 100.0);
    assert_eq!(summary.statistics.high_risk_count, 3);
    assert!((summary.statistics.average_probability - 0.82).abs() < 1e-9);

    let rows = read_output(&paths.output);
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(cell(row, "prediction_status"), "success");
        assert_eq!(cell(row, "churn_probability"), "0.82");
        assert_eq!(cell(row, "churn_prediction"), "Yes");
        assert_eq!(cell(row, "error_message"), "");
    }
    // Input cells are carried through verbatim, empty ones included.
    assert_eq!(cell(&rows[2], "TotalCharges"), "");
    assert_eq!(cell(&rows[1], "Contract"), "One year");

    let json = read_summary(&paths.summary);
    assert_eq!(json["statistics"]["high_risk_count"], 3);
    assert_eq!(json["success_rate"], 100.0);
    assert!(logs_contain("Batch processing completed"));
}

#[traced_test]
#[tokio::test]
async fn server_error_fails_only_its_row() {
    let stub = StubServer::start(|customer| match customer["customerID"].as_str() {
        Some("first") => StubReply::error(500, "model not loaded"),
        _ => StubReply::prediction(0.2, "No"),
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path(), "customerID,tenure\nfirst,1\nsecond,2\n");

    let summary = run(&settings(stub.url()), &paths).await.unwrap();

    let rows = read_output(&paths.output);
    assert_eq!(cell(&rows[0], "prediction_status"), "failed");
    assert!(cell(&rows[0], "error_message").contains("500"));
    assert_eq!(cell(&rows[0], "churn_probability"), "");
    assert_eq!(cell(&rows[0], "churn_prediction"), "");
    assert_eq!(cell(&rows[1], "prediction_status"), "success");
    assert_eq!(cell(&rows[1], "churn_probability"), "0.2");

    assert_eq!(summary.success_rate, 50.0);
    assert_eq!(summary.failures.http_error, 1);
    assert_eq!(summary.statistics.low_risk_count, 1);
    assert!(logs_contain("HTTP_ERROR"));
}

#[tokio::test]
async fn missing_input_produces_no_files() {
    let stub = StubServer::fixed(0.5, "No").await;
    let dir = tempfile::tempdir().unwrap();
    let paths = RunPaths {
        input: dir.path().join("does-not-exist.csv"),
        output: dir.path().join("scored.csv"),
        summary: dir.path().join("summary.json"),
    };

    let err = run(&settings(stub.url()), &paths).await.unwrap_err();

    assert!(matches!(err, BatchError::Input(_)));
    assert!(!paths.output.exists());
    assert!(!paths.summary.exists());
    assert!(stub.requests().is_empty());
}

#[traced_test]
#[tokio::test]
async fn unreachable_endpoint_fails_every_row_but_completes() {
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path(), THREE_CUSTOMERS);

    let summary = run(&settings(closed_endpoint().await), &paths)
        .await
        .unwrap();

    assert_eq!(summary.successful_predictions, 0);
    assert_eq!(summary.failed_predictions, 3);
    assert_eq!(summary.failures.network_error, 3);
    assert_eq!(summary.success_rate, 0.0);
    assert_eq!(summary.statistics.average_probability, 0.0);
    assert_eq!(summary.statistics.bucketed(), 0);

    for row in read_output(&paths.output) {
        assert_eq!(cell(&row, "prediction_status"), "failed");
        assert!(cell(&row, "error_message").starts_with("Request failed"));
    }
    assert_eq!(read_summary(&paths.summary)["total_customers"], 3);
}

#[tokio::test]
async fn hung_endpoint_times_out_each_row() {
    let endpoint = SilentEndpoint::start().await;
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path(), "customerID,tenure
A,1
B,2
");
    let settings = BatchSettings {
        timeout: Duration::from_secs(1),
        ..settings(endpoint.url())
    };

    let summary = tokio::time::timeout(Duration::from_secs(15), run(&settings, &paths))
        .await
        .expect("a hung endpoint must not hang the run")
        .unwrap();

    assert_eq!(summary.total_customers, 2);
    assert_eq!(summary.failures.network_error, 2);
    assert_eq!(summary.successful_predictions, 0);
    for row in read_output(&paths.output) {
        assert_eq!(cell(&row, "prediction_status"), "failed");
        let message = cell(&row, "error_message");
        assert!(message.starts_with("Request failed"), "{message}");
        assert!(message.contains("timed out"), "{message}");
    }
}

#[tokio::test]
async fn repeated_runs_write_identical_rows() {
    let stub = StubServer::fixed(0.45, "No").await;
    let dir = tempfile::tempdir().unwrap();
    let first = paths(dir.path(), THREE_CUSTOMERS);
    let second = RunPaths {
        output: dir.path().join("again/scored.csv"),
        summary: dir.path().join("again/summary.json"),
        ..first.clone()
    };

    let a = run(&settings(stub.url()), &first).await.unwrap();
    let b = run(&settings(stub.url()), &second).await.unwrap();

    assert_eq!(
        fs::read(&first.output).unwrap(),
        fs::read(&second.output).unwrap()
    );
    assert_ne!(a.run_id, b.run_id);
    assert_eq!(a.statistics, b.statistics);
    assert_eq!(a.total_customers, b.total_customers);
}

#[tokio::test]
async fn concurrent_scoring_keeps_input_order() {
    let stub = StubServer::start(|customer| {
        let tenure = customer["tenure"].as_f64().unwrap_or(0.0);
        StubReply::prediction(tenure / 100.0, "No")
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let input: String = std::iter::once("customerID,tenure\n".to_string())
        .chain((0..40).map(|i| format!("c{i},{i}\n")))
        .collect();
    let paths = paths(dir.path(), &input);
    let settings = BatchSettings {
        concurrency: 8,
        ..settings(stub.url())
    };

    let summary = run(&settings, &paths).await.unwrap();

    assert_eq!(summary.successful_predictions, 40);
    let rows = read_output(&paths.output);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(cell(row, "customerID"), format!("c{i}"));
        assert_eq!(
            cell(row, "churn_probability").parse::<f64>().unwrap(),
            i as f64 / 100.0
        );
    }
    assert_eq!(stub.requests().len(), 40);
}

#[tokio::test]
async fn payload_carries_typed_fields() {
    let stub = StubServer::fixed(0.1, "No").await;
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path(), THREE_CUSTOMERS);

    run(&settings(stub.url()), &paths).await.unwrap();

    let requests = stub.requests();
    assert_eq!(requests.len(), 3);
    let first = &requests[0];
    assert_eq!(first["customerID"], json!("7590-VHVEG"));
    assert_eq!(first["SeniorCitizen"], json!(0));
    assert_eq!(first["MonthlyCharges"], json!(29.85));
    assert_eq!(first["TotalCharges"], json!(29.85));
    assert_eq!(requests[2]["TotalCharges"], Value::Null);
    assert_eq!(
        first.keys().cloned().collect::<Vec<_>>(),
        vec![
            "customerID",
            "gender",
            "SeniorCitizen",
            "tenure",
            "MonthlyCharges",
            "TotalCharges",
            "Contract"
        ]
    );
}

#[tokio::test]
async fn http_errors_are_not_retried() {
    let stub = StubServer::start(|_| StubReply::error(503, "busy")).await;
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path(), THREE_CUSTOMERS);
    let settings = BatchSettings {
        max_attempts: 3,
        ..settings(stub.url())
    };

    let summary = run(&settings, &paths).await.unwrap();

    assert_eq!(summary.failures.http_error, 3);
    assert_eq!(summary.retries, 0);
    assert_eq!(stub.requests().len(), 3);
}

#[tokio::test]
async fn malformed_success_body_is_an_unknown_failure() {
    let stub = StubServer::start(|customer| match customer["customerID"].as_str() {
        Some("text") => StubReply::Text(200, "not json".into()),
        _ => StubReply::prediction(0.5, "Maybe"),
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(dir.path(), "customerID\ntext\nlabel\n");

    let summary = run(&settings(stub.url()), &paths).await.unwrap();

    assert_eq!(summary.failures.unknown, 2);
    assert_eq!(summary.successful_predictions, 0);
    for row in read_output(&paths.output) {
        assert!(cell(&row, "error_message").starts_with("Invalid response body"));
    }
}

#[tokio::test]
async fn input_prediction_columns_are_superseded() {
    let stub = StubServer::fixed(0.9, "Yes").await;
    let dir = tempfile::tempdir().unwrap();
    let paths = paths(
        dir.path(),
        "customerID,prediction_status,churn_probability\nA,stale,0.1\n",
    );

    run(&settings(stub.url()), &paths).await.unwrap();

    let contents = fs::read_to_string(&paths.output).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("customerID,churn_probability,churn_prediction,prediction_status,error_message")
    );
    assert_eq!(lines.next(), Some("A,0.9,Yes,success,"));
}
