/*!
 * Tests for the in-memory clipboard store
 */

use anyhow::Result;

use clipkeep::database::{ClipboardStore, ContentType, MemoryStore, NewClipboardItem};
use crate::common;

#[tokio::test]
async fn test_saveItem_shouldAssignStrictlyIncreasingIds() -> Result<()> {
    let store = MemoryStore::new();

    let ids = common::seed_store(&store, &["a", "b", "c", "d"], 1_000).await?;

    assert_eq!(ids[0], 1);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    Ok(())
}

#[tokio::test]
async fn test_saveItem_shouldFillDerivedFields() -> Result<()> {
    let store = MemoryStore::new();
    let id = store
        .save_item(NewClipboardItem::text("Hello World").with_source("terminal"))
        .await?;

    let item = store.get_item(id).await?.expect("item should exist");
    assert_eq!(item.content, "Hello World");
    assert_eq!(item.content_type, ContentType::Text);
    assert_eq!(item.search_index, "hello world");
    assert_eq!(item.source.as_deref(), Some("terminal"));
    assert!(!item.is_favorite);
    assert!(item.timestamp > 0);
    Ok(())
}

#[tokio::test]
async fn test_getItems_shouldOrderNewestFirstAndPage() -> Result<()> {
    let store = MemoryStore::new();
    store.save_item(common::text_at("old", 100)).await?;
    store.save_item(common::text_at("newest", 300)).await?;
    store.save_item(common::text_at("middle", 200)).await?;

    let all = store.get_items(50, 0).await?;
    let contents: Vec<&str> = all.iter().map(|i| i.content.as_str()).collect();
    assert_eq!(contents, vec!["newest", "middle", "old"]);
    assert!(all.windows(2).all(|pair| pair[0].timestamp >= pair[1].timestamp));

    let page = store.get_items(1, 1).await?;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].content, "middle");

    assert!(store.get_items(10, 5).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_getItems_withEqualTimestamps_shouldKeepInsertionOrder() -> Result<()> {
    let store = MemoryStore::new();
    let first = store.save_item(common::text_at("first", 500)).await?;
    let second = store.save_item(common::text_at("second", 500)).await?;

    let items = store.get_items(10, 0).await?;
    assert_eq!(items[0].id, first);
    assert_eq!(items[1].id, second);
    Ok(())
}

#[tokio::test]
async fn test_searchItems_shouldMatchCaseInsensitiveSubstring() -> Result<()> {
    let store = MemoryStore::new();
    common::seed_store(&store, &["Rust Book", "grocery list", "TRUSTED host"], 10).await?;

    let results = store.search_items("rust", 50).await?;

    let contents: Vec<&str> = results.iter().map(|i| i.content.as_str()).collect();
    assert_eq!(contents, vec!["TRUSTED host", "Rust Book"]);
    assert!(results.iter().all(|i| i.search_index.contains("rust")));

    assert_eq!(store.search_items("rust", 1).await?.len(), 1);
    assert!(store.search_items("missing", 50).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_toggleFavorite_twice_shouldRestoreState() -> Result<()> {
    let store = MemoryStore::new();
    let id = store.save_item(NewClipboardItem::text("pin me")).await?;

    assert_eq!(store.toggle_favorite(id).await?, Some(true));
    assert_eq!(store.favorite_items().await?.len(), 1);

    assert_eq!(store.toggle_favorite(id).await?, Some(false));
    assert!(store.favorite_items().await?.is_empty());

    assert_eq!(store.toggle_favorite(999).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_deleteItem_shouldRemoveExactlyOne() -> Result<()> {
    let store = MemoryStore::new();
    let ids = common::seed_store(&store, &["a", "b", "c"], 1).await?;

    assert!(store.delete_item(ids[1]).await?);
    assert!(!store.delete_item(ids[1]).await?);

    let remaining: Vec<i64> = store.get_items(10, 0).await?.iter().map(|i| i.id).collect();
    assert_eq!(remaining, vec![ids[2], ids[0]]);
    Ok(())
}

#[tokio::test]
async fn test_cleanup_shouldEmptyStoreWithoutReusingIds() -> Result<()> {
    let store = MemoryStore::new();
    let ids = common::seed_store(&store, &["a", "b"], 1).await?;

    store.cleanup().await?;

    assert!(store.get_items(50, 0).await?.is_empty());
    assert_eq!(store.stats().await?.total, 0);

    let next = store.save_item(NewClipboardItem::text("c")).await?;
    assert!(next > ids[1]);
    Ok(())
}

#[tokio::test]
async fn test_stats_onEmptyStore_shouldBeZero() -> Result<()> {
    let store = MemoryStore::new();
    let stats = store.stats().await?;

    assert_eq!(stats.total, 0);
    assert_eq!(stats.favorites, 0);
    assert_eq!(stats.last_timestamp, None);
    Ok(())
}

#[tokio::test]
async fn test_settings_shouldOverwriteExistingKey() -> Result<()> {
    let store = MemoryStore::new();
    assert_eq!(store.get_setting("theme").await?, None);

    store.set_setting("theme", "light").await?;
    store.set_setting("theme", "dark").await?;

    assert_eq!(store.get_setting("theme").await?.as_deref(), Some("dark"));
    Ok(())
}
