/*!
 * In-memory clipboard store.
 *
 * Items live in a process-local map and every query is a full scan. Nothing
 * survives a restart and ids restart at 1 with each new store.
 */

use async_trait::async_trait;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;

use super::models::{ClipboardItem, ClipboardStats, NewClipboardItem};
use super::{ClipboardStore, newest_first};
use crate::errors::StoreError;

#[derive(Default)]
struct Inner {
    items: HashMap<i64, ClipboardItem>,
    settings: HashMap<String, String>,
    next_id: i64,
}

/// Clipboard store backed by a map behind a read/write lock
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        info!("Clipboard store initialized (in-memory)");
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    /// Whether the store holds no items
    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    fn sorted_matching<F>(&self, predicate: F) -> Vec<ClipboardItem>
    where
        F: Fn(&ClipboardItem) -> bool,
    {
        let inner = self.inner.read();
        let mut items: Vec<ClipboardItem> = inner
            .items
            .values()
            .filter(|item| predicate(item))
            .cloned()
            .collect();
        items.sort_by(newest_first);
        items
    }
}

#[async_trait]
impl ClipboardStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn save_item(&self, item: NewClipboardItem) -> Result<i64, StoreError> {
        let mut inner = self.inner.write();

        // Default store created through `Default` starts at zero
        if inner.next_id < 1 {
            inner.next_id = 1;
        }

        let id = inner.next_id;
        inner.next_id += 1;
        inner.items.insert(id, ClipboardItem::from_new(id, item));

        debug!("Saved clipboard item {}", id);
        Ok(id)
    }

    async fn get_items(&self, limit: usize, offset: usize) -> Result<Vec<ClipboardItem>, StoreError> {
        Ok(self
            .sorted_matching(|_| true)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn get_item(&self, id: i64) -> Result<Option<ClipboardItem>, StoreError> {
        Ok(self.inner.read().items.get(&id).cloned())
    }

    async fn search_items(&self, query: &str, limit: usize) -> Result<Vec<ClipboardItem>, StoreError> {
        let search_term = query.to_lowercase();
        Ok(self
            .sorted_matching(|item| item.matches(&search_term))
            .into_iter()
            .take(limit)
            .collect())
    }

    async fn favorite_items(&self) -> Result<Vec<ClipboardItem>, StoreError> {
        Ok(self.sorted_matching(|item| item.is_favorite))
    }

    async fn toggle_favorite(&self, id: i64) -> Result<Option<bool>, StoreError> {
        let mut inner = self.inner.write();
        Ok(inner.items.get_mut(&id).map(|item| {
            item.is_favorite = !item.is_favorite;
            item.is_favorite
        }))
    }

    async fn delete_item(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().items.remove(&id).is_some())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.inner.write().items.clear();
        info!("Clipboard store cleaned up");
        Ok(())
    }

    async fn stats(&self) -> Result<ClipboardStats, StoreError> {
        let inner = self.inner.read();
        let mut stats = ClipboardStats::default();

        for item in inner.items.values() {
            stats.total += 1;
            if item.is_favorite {
                stats.favorites += 1;
            }
            stats.by_type.record(item.content_type);
            stats.last_timestamp = stats.last_timestamp.max(Some(item.timestamp));
        }

        Ok(stats)
    }

    async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.read().settings.get(key).cloned())
    }

    async fn set_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner
            .write()
            .settings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
