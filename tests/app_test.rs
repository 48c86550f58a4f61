mod common;

use common::{Call, FakeGateway};
use eduagent_client::{App, Config};

fn temp_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("eduagent_app_{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn test_full_loop_writes_report() {
    let _ = tracing_subscriber::fmt::try_init();
    let report_dir = temp_dir();
    let config = Config {
        report_dir: report_dir.to_string_lossy().to_string(),
        answer_text: Some("Q1. A BST keeps smaller keys on the left.".to_string()),
        learn_goal: Some("Databases & SQL".to_string()),
        ..Config::default()
    };

    let gateway = FakeGateway::new();
    let app = App::with_gateway(config, gateway.clone());
    app.run().await.unwrap();

    let calls = gateway.calls();
    assert!(matches!(calls[0], Call::Analyse(_)));
    assert!(matches!(calls[1], Call::Grade { .. }));
    assert!(matches!(calls[2], Call::Learn { .. }));

    let mut entries = tokio::fs::read_dir(&report_dir).await.unwrap();
    let report = entries.next_entry().await.unwrap().unwrap();
    let text = tokio::fs::read_to_string(report.path()).await.unwrap();
    assert_eq!(text, "GRADE REPORT\n");

    tokio::fs::remove_dir_all(&report_dir).await.unwrap();
}

#[tokio::test]
async fn test_loop_without_answers_skips_grading() {
    let gateway = FakeGateway::new();
    let app = App::with_gateway(Config::default(), gateway.clone());

    app.run().await.unwrap();

    assert_eq!(gateway.calls().len(), 1);
    assert!(app.study().relay().paper_result().is_some());
    assert!(app.study().relay().grade_result().is_none());
}

#[tokio::test]
async fn test_missing_paper_file_is_an_error() {
    let gateway = FakeGateway::new();
    let config = Config {
        paper_file: Some("/nonexistent/eduagent/paper.pdf".to_string()),
        ..Config::default()
    };

    let app = App::with_gateway(config, gateway.clone());
    assert!(app.run().await.is_err());
    assert!(gateway.calls().is_empty());
}
