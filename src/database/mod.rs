/*!
 * Clipboard history storage.
 *
 * This module provides the [`ClipboardStore`] abstraction and two backends:
 * - [`MemoryStore`]: process-local, nothing survives a restart
 * - [`SqliteStore`]: SQLite-based persistence with schema versioning
 *
 * Every backend orders results newest first. Items sharing a timestamp keep
 * insertion order (lower id first).
 */

use async_trait::async_trait;
use std::cmp::Ordering;

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;
pub mod memory;

// Re-export main types
pub use connection::DatabaseConnection;
pub use memory::MemoryStore;
pub use models::{ClipboardItem, ClipboardStats, ContentType, NewClipboardItem, TypeCounts};
pub use repository::SqliteStore;

use crate::errors::StoreError;

/// Common trait for all clipboard store backends
#[async_trait]
pub trait ClipboardStore: Send + Sync {
    /// Short backend identifier used in logs and diagnostics
    fn backend_name(&self) -> &'static str;

    /// Store a new item and return its id
    async fn save_item(&self, item: NewClipboardItem) -> Result<i64, StoreError>;

    /// Page through all items, newest first
    async fn get_items(&self, limit: usize, offset: usize) -> Result<Vec<ClipboardItem>, StoreError>;

    /// Fetch a single item
    async fn get_item(&self, id: i64) -> Result<Option<ClipboardItem>, StoreError>;

    /// Case-insensitive substring search, newest first
    async fn search_items(&self, query: &str, limit: usize) -> Result<Vec<ClipboardItem>, StoreError>;

    /// All favorite items, newest first
    async fn favorite_items(&self) -> Result<Vec<ClipboardItem>, StoreError>;

    /// Flip the favorite flag; returns the new state, or `None` for an unknown id
    async fn toggle_favorite(&self, id: i64) -> Result<Option<bool>, StoreError>;

    /// Remove one item; returns whether it existed
    async fn delete_item(&self, id: i64) -> Result<bool, StoreError>;

    /// Remove every item
    async fn clear(&self) -> Result<(), StoreError>;

    /// Same as [`clear`](Self::clear), under the name hosts use on shutdown
    async fn cleanup(&self) -> Result<(), StoreError> {
        self.clear().await
    }

    /// Aggregate counts over all items
    async fn stats(&self) -> Result<ClipboardStats, StoreError>;

    /// Read a stored setting
    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a stored setting
    async fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Ordering used by every listing: timestamp descending, then id ascending
pub(crate) fn newest_first(a: &ClipboardItem, b: &ClipboardItem) -> Ordering {
    b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id))
}
