/*!
 * End-to-end workflows driven through the gateway
 */

use anyhow::Result;
use serde_json::{Value, json};

use clipkeep::app_controller::Controller;
use clipkeep::gateway::Response;
use crate::common;

async fn add(controller: &Controller, content: &str, timestamp: i64) -> i64 {
    let response = controller
        .invoke(
            "clipboard:addItem",
            json!({ "content": content, "timestamp": timestamp }),
        )
        .await;
    assert!(response.success, "{:?}", response.error);
    response
        .data
        .and_then(|d| d["id"].as_i64())
        .expect("saved id")
}

fn contents(response: Response) -> Vec<String> {
    response
        .data
        .and_then(|d| d.as_array().cloned())
        .unwrap_or_default()
        .iter()
        .filter_map(|item| item["content"].as_str().map(str::to_string))
        .collect()
}

async fn run_history_workflow(controller: &Controller) -> Result<()> {
    let first = add(controller, "meeting notes", 1_000).await;
    let second = add(controller, "Card 4111 2222 3333 4444", 3_000).await;
    let third = add(controller, "Meeting room B", 2_000).await;
    assert!(first < second && second < third);

    // Newest first by timestamp, not by id
    let history = controller.invoke("clipboard:getHistory", Value::Null).await;
    assert_eq!(
        contents(history),
        vec!["Card 4111 2222 3333 4444", "Meeting room B", "meeting notes"]
    );

    let search = controller
        .invoke("clipboard:search", json!({ "query": "MEETING" }))
        .await;
    assert_eq!(contents(search), vec!["Meeting room B", "meeting notes"]);

    let card = controller
        .invoke("clipboard:getItem", json!({ "id": second }))
        .await;
    assert_eq!(card.data.expect("item")["category"], "Credit Card");

    let toggled = controller
        .invoke("clipboard:toggleFavorite", json!({ "id": first }))
        .await;
    assert_eq!(toggled.data, Some(json!(true)));
    let favorites = controller.invoke("clipboard:getFavorites", Value::Null).await;
    assert_eq!(contents(favorites), vec!["meeting notes"]);

    let stats = controller.invoke("clipboard:getStats", Value::Null).await;
    let stats = stats.data.expect("stats");
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["favorites"], 1);
    assert_eq!(stats["byType"]["text"], 3);
    assert_eq!(stats["lastTimestamp"], 3_000);

    let deleted = controller
        .invoke("clipboard:delete", json!({ "id": third }))
        .await;
    assert_eq!(deleted.data, Some(json!(true)));
    let missing = controller
        .invoke("clipboard:getItem", json!({ "id": third }))
        .await;
    assert!(!missing.success);

    let cleared = controller.invoke("clipboard:clearAll", Value::Null).await;
    assert!(cleared.success);
    let history = controller.invoke("clipboard:getHistory", Value::Null).await;
    assert!(contents(history).is_empty());

    // Clearing also forgets the last capture, so re-adding is accepted
    let readded = controller
        .invoke("clipboard:addItem", json!({ "content": "Meeting room B" }))
        .await;
    assert_eq!(readded.data.expect("outcome")["outcome"], "saved");

    Ok(())
}

#[tokio::test]
async fn test_historyWorkflow_withMemoryBackend_shouldBehaveConsistently() -> Result<()> {
    let controller = common::memory_controller()?;
    controller.start().await;

    run_history_workflow(&controller).await?;

    controller.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_historyWorkflow_withSqliteBackend_shouldBehaveConsistently() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::sqlite_config(&temp_dir))?;
    controller.start().await;

    run_history_workflow(&controller).await?;

    controller.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_addItem_withRepeatedContent_shouldReportDuplicate() -> Result<()> {
    let controller = common::memory_controller()?;

    controller
        .invoke("clipboard:addItem", json!({ "content": "twice" }))
        .await;
    let repeated = controller
        .invoke("clipboard:addItem", json!({ "content": "twice" }))
        .await;

    assert!(repeated.success);
    assert_eq!(
        repeated.data,
        Some(json!({ "outcome": "skippedDuplicate" }))
    );
    Ok(())
}

#[tokio::test]
async fn test_addItem_withBlankContent_shouldReportSkip() -> Result<()> {
    let controller = common::memory_controller()?;

    let response = controller
        .invoke("clipboard:addItem", json!({ "content": "   " }))
        .await;

    assert_eq!(response.data, Some(json!({ "outcome": "skippedBlank" })));
    let stats = controller.invoke("clipboard:getStats", Value::Null).await;
    assert_eq!(stats.data.expect("stats")["total"], 0);
    Ok(())
}
