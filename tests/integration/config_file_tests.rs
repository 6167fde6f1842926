//! Configuration loading from files

use redrive::{PipelineConfig, PipelineError, WindowConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[tokio::test]
async fn test_load_full_file() {
    let file = write_config(
        r#"
window:
  max_batch_count: 10
  max_message_size: 256000
redrive:
  max_attempts: 5
  throttle_ms: 100
  retry_on: [ThrottlingException]
  backoff_multiplier: 2.0
  max_throttle_ms: 1600
  jitter: true
loader:
  max_batch_size: 100
  max_cached_items: 1000
  max_pools: 8
logging:
  level: debug
  json: true
"#,
    );

    let config = PipelineConfig::from_file(file.path()).await.unwrap();

    assert_eq!(config.window, WindowConfig::event_put());
    assert_eq!(config.redrive.max_attempts, 5);
    assert_eq!(config.redrive.retry_on, vec!["ThrottlingException".to_string()]);
    assert!(config.redrive.jitter);
    assert!(config.redrive.retry_unclassified);
    assert_eq!(config.loader.max_pools, 8);
    assert!(config.loader.cache);
    assert!(config.logging.json);
}

#[tokio::test]
async fn test_missing_sections_use_defaults() {
    let file = write_config("redrive:\n  max_attempts: 3\n");

    let config = PipelineConfig::from_file(file.path()).await.unwrap();

    assert_eq!(config.redrive.max_attempts, 3);
    assert_eq!(config.redrive.throttle_ms, 500);
    assert_eq!(config.window, PipelineConfig::default().window);
}

#[tokio::test]
async fn test_invalid_values_are_rejected() {
    let file = write_config("window:\n  max_batch_count: 0\n");

    match PipelineConfig::from_file(file.path()).await {
        Err(PipelineError::Config(message)) => assert!(message.starts_with("window: ")),
        other => panic!("expected config error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = PipelineConfig::from_file(dir.path().join("absent.yaml")).await;

    assert!(matches!(result, Err(PipelineError::Config(_))));
}
