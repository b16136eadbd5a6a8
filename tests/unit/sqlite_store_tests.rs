/*!
 * Tests for the SQLite clipboard store
 */

use anyhow::Result;
use rusqlite::Connection;

use clipkeep::database::{ClipboardStore, ContentType, NewClipboardItem, SqliteStore};
use crate::common;

#[tokio::test]
async fn test_saveItem_shouldAssignStrictlyIncreasingIds() -> Result<()> {
    let store = SqliteStore::new_in_memory()?;

    let ids = common::seed_store(&store, &["a", "b", "c"], 1_000).await?;

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    Ok(())
}

#[tokio::test]
async fn test_saveItem_shouldRoundTripAllFields() -> Result<()> {
    let store = SqliteStore::new_in_memory()?;
    let new_item = NewClipboardItem {
        content: "/home/user/report.pdf".to_string(),
        content_type: ContentType::File,
        timestamp: Some(1_700_000_000_000),
        is_favorite: true,
        category: Some("documents".to_string()),
        source: Some("files".to_string()),
        metadata: Some(r#"{"size":42}"#.to_string()),
    };

    let id = store.save_item(new_item).await?;
    let item = store.get_item(id).await?.expect("item should exist");

    assert_eq!(item.content, "/home/user/report.pdf");
    assert_eq!(item.content_type, ContentType::File);
    assert_eq!(item.timestamp, 1_700_000_000_000);
    assert!(item.is_favorite);
    assert_eq!(item.category.as_deref(), Some("documents"));
    assert_eq!(item.source.as_deref(), Some("files"));
    assert_eq!(item.metadata.as_deref(), Some(r#"{"size":42}"#));
    assert_eq!(item.search_index, "/home/user/report.pdf");

    assert!(store.get_item(id + 100).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_getItems_shouldOrderNewestFirstAndPage() -> Result<()> {
    let store = SqliteStore::new_in_memory()?;
    store.save_item(common::text_at("old", 100)).await?;
    store.save_item(common::text_at("newest", 300)).await?;
    store.save_item(common::text_at("middle", 200)).await?;
    store.save_item(common::text_at("middle twin", 200)).await?;

    let contents: Vec<String> = store
        .get_items(50, 0)
        .await?
        .into_iter()
        .map(|i| i.content)
        .collect();
    assert_eq!(contents, vec!["newest", "middle", "middle twin", "old"]);

    let page = store.get_items(2, 1).await?;
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].content, "middle");
    assert_eq!(page[1].content, "middle twin");
    Ok(())
}

#[tokio::test]
async fn test_searchItems_shouldTreatWildcardsLiterally() -> Result<()> {
    let store = SqliteStore::new_in_memory()?;
    common::seed_store(&store, &["100% done", "1000 done", "under_score", "underXscore"], 1).await?;

    let percent = store.search_items("0%", 50).await?;
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].content, "100% done");

    let underscore = store.search_items("under_", 50).await?;
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].content, "under_score");

    let upper = store.search_items("DONE", 50).await?;
    assert_eq!(upper.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_toggleFavorite_twice_shouldRestoreState() -> Result<()> {
    let store = SqliteStore::new_in_memory()?;
    let id = store.save_item(NewClipboardItem::text("pin me")).await?;

    assert_eq!(store.toggle_favorite(id).await?, Some(true));
    assert_eq!(store.favorite_items().await?.len(), 1);
    assert_eq!(store.toggle_favorite(id).await?, Some(false));
    assert!(store.favorite_items().await?.is_empty());

    assert_eq!(store.toggle_favorite(12345).await?, None);
    Ok(())
}

#[tokio::test]
async fn test_deleteAndClear_shouldRemoveItemsButKeepIdsIncreasing() -> Result<()> {
    let store = SqliteStore::new_in_memory()?;
    let ids = common::seed_store(&store, &["a", "b", "c"], 1).await?;

    assert!(store.delete_item(ids[0]).await?);
    assert!(!store.delete_item(ids[0]).await?);
    assert_eq!(store.stats().await?.total, 2);

    store.clear().await?;
    assert!(store.get_items(50, 0).await?.is_empty());

    let next = store.save_item(NewClipboardItem::text("d")).await?;
    assert!(next > ids[2]);
    Ok(())
}

#[tokio::test]
async fn test_stats_shouldAggregateTypesAndFavorites() -> Result<()> {
    let store = SqliteStore::new_in_memory()?;
    store.save_item(common::text_at("a", 10)).await?;
    store
        .save_item(common::text_at("img", 40).with_type(ContentType::Image))
        .await?;
    let file = store
        .save_item(common::text_at("/tmp/x", 20).with_type(ContentType::File))
        .await?;
    store.toggle_favorite(file).await?;

    let stats = store.stats().await?;
    assert_eq!(stats.total, 3);
    assert_eq!(stats.favorites, 1);
    assert_eq!(stats.by_type.text, 1);
    assert_eq!(stats.by_type.image, 1);
    assert_eq!(stats.by_type.file, 1);
    assert_eq!(stats.last_timestamp, Some(40));

    store.clear().await?;
    let empty = store.stats().await?;
    assert_eq!(empty.total, 0);
    assert_eq!(empty.last_timestamp, None);
    Ok(())
}

#[tokio::test]
async fn test_settings_shouldUpsert() -> Result<()> {
    let store = SqliteStore::new_in_memory()?;

    store.set_setting("hotkey", "Ctrl+Shift+V").await?;
    store.set_setting("hotkey", "Ctrl+Alt+V").await?;

    assert_eq!(store.get_setting("hotkey").await?.as_deref(), Some("Ctrl+Alt+V"));
    assert_eq!(store.get_setting("missing").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_open_afterReopen_shouldPersistItemsAndSettings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::temp_db_path(&temp_dir);

    let id = {
        let store = SqliteStore::open(&path)?;
        let id = store.save_item(common::text_at("survives restart", 77)).await?;
        store.toggle_favorite(id).await?;
        store.set_setting("theme", "dark").await?;
        id
    };

    let reopened = SqliteStore::open(&path)?;
    let item = reopened.get_item(id).await?.expect("item should persist");
    assert_eq!(item.content, "survives restart");
    assert!(item.is_favorite);
    assert_eq!(reopened.get_setting("theme").await?.as_deref(), Some("dark"));
    assert_eq!(reopened.connection().path(), path.as_path());
    Ok(())
}

#[tokio::test]
async fn test_open_withVersionOneDatabase_shouldMigrateAndKeepItems() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("v1.db");

    {
        let conn = Connection::open(&path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE schema_version (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                version INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            );
            INSERT INTO schema_version (id, version, updated_at) VALUES (1, 1, datetime('now'));

            CREATE TABLE clipboard_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('text', 'image', 'file')),
                timestamp INTEGER NOT NULL,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                category TEXT,
                source TEXT,
                metadata TEXT,
                search_index TEXT NOT NULL
            );
            INSERT INTO clipboard_items (content, type, timestamp, search_index)
            VALUES ('legacy entry', 'text', 5, 'legacy entry');
            "#,
        )?;
    }

    let store = SqliteStore::open(&path)?;

    let items = store.get_items(10, 0).await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content, "legacy entry");

    store.set_setting("migrated", "yes").await?;
    assert_eq!(store.get_setting("migrated").await?.as_deref(), Some("yes"));

    let version: i32 = store.connection().execute(|conn| {
        Ok(conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?)
    })?;
    assert_eq!(version, 2);
    Ok(())
}
