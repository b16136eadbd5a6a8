/*!
 * Repository layer for database operations.
 *
 * [`SqliteStore`] implements [`ClipboardStore`] over a
 * [`DatabaseConnection`], keeping the SQL out of the rest of the crate.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use super::connection::DatabaseConnection;
use super::models::{ClipboardItem, ClipboardStats, ContentType, NewClipboardItem};
use super::ClipboardStore;
use crate::errors::StoreError;

const ITEM_COLUMNS: &str =
    "id, content, type, timestamp, is_favorite, category, source, metadata, search_index";

/// Clipboard store persisted in SQLite
#[derive(Clone)]
pub struct SqliteStore {
    /// Database connection
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Create a store over an existing connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open (or create) the database file at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = DatabaseConnection::new(path)?;
        Ok(Self::new(db))
    }

    /// Create a store with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn map_item(row: &Row<'_>) -> rusqlite::Result<ClipboardItem> {
        Ok(ClipboardItem {
            id: row.get(0)?,
            content: row.get(1)?,
            content_type: row
                .get::<_, String>(2)?
                .parse()
                .unwrap_or(ContentType::Text),
            timestamp: row.get(3)?,
            is_favorite: row.get(4)?,
            category: row.get(5)?,
            source: row.get(6)?,
            metadata: row.get(7)?,
            search_index: row.get(8)?,
        })
    }

    fn query_items<P: rusqlite::Params>(
        conn: &Connection,
        sql: &str,
        params: P,
    ) -> Result<Vec<ClipboardItem>> {
        let mut stmt = conn.prepare(sql)?;
        let items = stmt
            .query_map(params, Self::map_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn get_item_sync(conn: &Connection, id: i64) -> Result<Option<ClipboardItem>> {
        let item = conn
            .query_row(
                &format!("SELECT {} FROM clipboard_items WHERE id = ?1", ITEM_COLUMNS),
                [id],
                Self::map_item,
            )
            .optional()?;
        Ok(item)
    }
}

/// Convert a caller limit to an SQL bound
fn sql_bound(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl ClipboardStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn save_item(&self, item: NewClipboardItem) -> Result<i64, StoreError> {
        // Id 0 is a placeholder; AUTOINCREMENT assigns the real one
        let item = ClipboardItem::from_new(0, item);

        let id = self
            .db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO clipboard_items (
                        content, type, timestamp, is_favorite, category, source, metadata, search_index
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    "#,
                    params![
                        item.content,
                        item.content_type.to_string(),
                        item.timestamp,
                        item.is_favorite,
                        item.category,
                        item.source,
                        item.metadata,
                        item.search_index,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        debug!("Saved clipboard item {}", id);
        Ok(id)
    }

    async fn get_items(&self, limit: usize, offset: usize) -> Result<Vec<ClipboardItem>, StoreError> {
        let (limit, offset) = (sql_bound(limit), sql_bound(offset));

        let items = self
            .db
            .execute_async(move |conn| {
                Self::query_items(
                    conn,
                    &format!(
                        "SELECT {} FROM clipboard_items ORDER BY timestamp DESC, id ASC LIMIT ?1 OFFSET ?2",
                        ITEM_COLUMNS
                    ),
                    params![limit, offset],
                )
            })
            .await?;

        Ok(items)
    }

    async fn get_item(&self, id: i64) -> Result<Option<ClipboardItem>, StoreError> {
        let item = self
            .db
            .execute_async(move |conn| Self::get_item_sync(conn, id))
            .await?;
        Ok(item)
    }

    async fn search_items(&self, query: &str, limit: usize) -> Result<Vec<ClipboardItem>, StoreError> {
        // instr() rather than LIKE so '%' and '_' in the query match literally
        let search_term = query.to_lowercase();
        let limit = sql_bound(limit);

        let items = self
            .db
            .execute_async(move |conn| {
                Self::query_items(
                    conn,
                    &format!(
                        "SELECT {} FROM clipboard_items WHERE instr(search_index, ?1) > 0 \
                         ORDER BY timestamp DESC, id ASC LIMIT ?2",
                        ITEM_COLUMNS
                    ),
                    params![search_term, limit],
                )
            })
            .await?;

        Ok(items)
    }

    async fn favorite_items(&self) -> Result<Vec<ClipboardItem>, StoreError> {
        let items = self
            .db
            .execute_async(|conn| {
                Self::query_items(
                    conn,
                    &format!(
                        "SELECT {} FROM clipboard_items WHERE is_favorite = 1 ORDER BY timestamp DESC, id ASC",
                        ITEM_COLUMNS
                    ),
                    [],
                )
            })
            .await?;
        Ok(items)
    }

    async fn toggle_favorite(&self, id: i64) -> Result<Option<bool>, StoreError> {
        let state = self
            .db
            .transaction_async(move |tx| {
                let changed = tx.execute(
                    "UPDATE clipboard_items SET is_favorite = 1 - is_favorite WHERE id = ?1",
                    [id],
                )?;

                if changed == 0 {
                    return Ok(None);
                }

                let is_favorite: bool = tx.query_row(
                    "SELECT is_favorite FROM clipboard_items WHERE id = ?1",
                    [id],
                    |row| row.get(0),
                )?;
                Ok(Some(is_favorite))
            })
            .await?;
        Ok(state)
    }

    async fn delete_item(&self, id: i64) -> Result<bool, StoreError> {
        let deleted = self
            .db
            .execute_async(move |conn| {
                let changed = conn.execute("DELETE FROM clipboard_items WHERE id = ?1", [id])?;
                Ok(changed > 0)
            })
            .await?;
        Ok(deleted)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let removed = self
            .db
            .execute_async(|conn| Ok(conn.execute("DELETE FROM clipboard_items", [])?))
            .await?;

        info!("Clipboard history cleared ({} items)", removed);
        Ok(())
    }

    async fn stats(&self) -> Result<ClipboardStats, StoreError> {
        let stats = self
            .db
            .execute_async(|conn| {
                let stats = conn.query_row(
                    r#"
                    SELECT
                        COUNT(*),
                        COUNT(CASE WHEN is_favorite = 1 THEN 1 END),
                        COUNT(CASE WHEN type = 'text' THEN 1 END),
                        COUNT(CASE WHEN type = 'image' THEN 1 END),
                        COUNT(CASE WHEN type = 'file' THEN 1 END),
                        MAX(timestamp)
                    FROM clipboard_items
                    "#,
                    [],
                    |row| {
                        let mut stats = ClipboardStats {
                            total: row.get::<_, i64>(0)? as u64,
                            favorites: row.get::<_, i64>(1)? as u64,
                            last_timestamp: row.get(5)?,
                            ..ClipboardStats::default()
                        };
                        stats.by_type.text = row.get::<_, i64>(2)? as u64;
                        stats.by_type.image = row.get::<_, i64>(3)? as u64;
                        stats.by_type.file = row.get::<_, i64>(4)? as u64;
                        Ok(stats)
                    },
                )?;
                Ok(stats)
            })
            .await?;
        Ok(stats)
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        let key = key.to_string();

        let value = self
            .db
            .execute_async(move |conn| {
                let value = conn
                    .query_row(
                        "SELECT value FROM app_settings WHERE key = ?1",
                        [key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await?;
        Ok(value)
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let key = key.to_string();
        let value = value.to_string();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO app_settings (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                    "#,
                    params![key, value],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}
