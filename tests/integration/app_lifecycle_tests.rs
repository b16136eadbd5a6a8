/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use serde_json::{Value, json};

use clipkeep::app_config::Config;
use clipkeep::app_controller::Controller;
use clipkeep::doctor;
use clipkeep::errors::{AppError, StoreError};
use crate::common;

/// Test the controller initialization with the test configuration
#[tokio::test]
async fn test_controller_initialization_withTestConfig_shouldStartRegistry() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert!(!controller.is_initialized());

    controller.start().await;

    assert!(controller.is_initialized());
    let registry = &controller.context().registry;
    assert_eq!(
        registry.wired_services(),
        vec!["clipboard".to_string(), "sensitiveDetector".to_string()]
    );
    assert!(registry.failed_services().is_empty());
    assert!(registry.is_monitoring());

    controller.shutdown().await;
    assert!(!controller.is_initialized());
    assert!(!registry.is_monitoring());
    Ok(())
}

/// Test that an invalid configuration is rejected up front
#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = common::memory_config();
    config.storage.search_limit = 0;

    match Controller::with_config(config) {
        Err(AppError::Config(message)) => assert!(message.contains("search_limit")),
        Err(other) => panic!("Expected configuration error, got {:?}", other),
        Ok(_) => panic!("Invalid configuration was accepted"),
    }
}

/// Test that an unopenable database surfaces as a store error
#[test]
fn test_controller_withUnopenableDatabase_shouldFailWithStoreError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory")?;

    let mut config = common::sqlite_config(&temp_dir);
    config.storage.database_path = Some(blocker.join("clips.db"));

    assert!(matches!(
        Controller::with_config(config),
        Err(AppError::Store(StoreError::Backend(_)))
    ));
    Ok(())
}

/// Test the health report of the core services
#[tokio::test]
async fn test_healthCheck_afterStart_shouldReportCoreServicesHealthy() -> Result<()> {
    let controller = common::memory_controller()?;
    controller.start().await;
    controller
        .invoke("clipboard:addItem", json!({ "content": "tracked" }))
        .await;

    let response = controller.invoke("services:healthCheck", Value::Null).await;

    let reports = response.data.expect("health data");
    assert_eq!(reports["clipboard"]["status"], "healthy");
    assert_eq!(reports["clipboard"]["details"]["backend"], "memory");
    assert_eq!(reports["clipboard"]["details"]["items"], 1);
    assert_eq!(reports["sensitiveDetector"]["status"], "healthy");

    let status = controller.invoke("services:status", Value::Null).await;
    let status = status.data.expect("status data");
    assert_eq!(status["initialized"], true);
    assert_eq!(status["services"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(status["services"][0]["status"], "active");

    controller.shutdown().await;
    Ok(())
}

/// Test that history written through one controller is visible to the next
#[tokio::test]
async fn test_sqliteController_afterRestart_shouldKeepHistory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::sqlite_config(&temp_dir);

    {
        let controller = Controller::with_config(config.clone())?;
        controller.start().await;
        let added = controller
            .invoke("clipboard:addItem", json!({ "content": "before restart" }))
            .await;
        assert!(added.success, "{:?}", added.error);
        controller.shutdown().await;
    }

    let controller = Controller::with_config(config)?;
    controller.start().await;

    let history = controller.invoke("clipboard:getHistory", Value::Null).await;
    let items = history.data.expect("history data");
    assert_eq!(items[0]["content"], "before restart");

    let info = controller.invoke("system:platformInfo", Value::Null).await;
    assert_eq!(info.data.expect("platform data")["storage"], "sqlite");

    controller.shutdown().await;
    Ok(())
}

/// Test the doctor report against a temporary data directory
#[test]
fn test_doctor_withWritableDataDir_shouldPass() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::sqlite_config(&temp_dir);

    let report = doctor::run(&config);

    assert!(report.passed(), "{:?}", report.results);
    assert_eq!(report.exit_code(), 0);
    let names: Vec<&str> = report.results.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["configuration", "data directory", "sqlite", "detector"]);
    Ok(())
}

/// Test that the doctor flags an invalid configuration
#[test]
fn test_doctor_withInvalidConfig_shouldExitWithOne() {
    let mut config = Config::default();
    config.services.health_check_interval_secs = 0;
    config.storage.backend = clipkeep::app_config::StorageBackend::Memory;

    let report = doctor::run(&config);

    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.exit_code(), 1);
}
