/*!
 * Clipboard entity models and DTOs.
 *
 * These structures are shared by every store backend and map directly
 * to the `clipboard_items` table of the SQLite backend.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of clipboard content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Plain or rich text
    #[default]
    Text,
    /// Image data, stored as an encoded string
    Image,
    /// File path or file list
    File,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Text => write!(f, "text"),
            ContentType::Image => write!(f, "image"),
            ContentType::File => write!(f, "file"),
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ContentType::Text),
            "image" => Ok(ContentType::Image),
            "file" => Ok(ContentType::File),
            _ => Err(anyhow::anyhow!("Invalid content type: {}", s)),
        }
    }
}

/// A stored clipboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardItem {
    /// Store-assigned identifier, strictly increasing
    pub id: i64,
    /// Captured content
    pub content: String,
    /// Kind of content
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Capture time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Whether the user pinned this entry
    pub is_favorite: bool,
    /// Free-form category (sensitive captures carry the detector label)
    pub category: Option<String>,
    /// Application the content came from
    pub source: Option<String>,
    /// Opaque host metadata, usually JSON
    pub metadata: Option<String>,
    /// Lowercased copy of `content` used for substring search
    pub search_index: String,
}

impl ClipboardItem {
    /// Materialize a new item with the given id
    pub fn from_new(id: i64, item: NewClipboardItem) -> Self {
        let search_index = search_index_for(&item.content);
        Self {
            id,
            content: item.content,
            content_type: item.content_type,
            timestamp: item.timestamp.unwrap_or_else(now_millis),
            is_favorite: item.is_favorite,
            category: item.category,
            source: item.source,
            metadata: item.metadata,
            search_index,
        }
    }

    /// Check whether the item matches a lowercased search term
    pub fn matches(&self, search_term: &str) -> bool {
        self.search_index.contains(search_term)
    }
}

/// Input for saving a clipboard entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClipboardItem {
    /// Captured content
    pub content: String,
    /// Kind of content
    #[serde(default, rename = "type")]
    pub content_type: ContentType,
    /// Capture time; the current time is used when unset
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Initial favorite flag
    #[serde(default)]
    pub is_favorite: bool,
    /// Free-form category
    #[serde(default)]
    pub category: Option<String>,
    /// Application the content came from
    #[serde(default)]
    pub source: Option<String>,
    /// Opaque host metadata
    #[serde(default)]
    pub metadata: Option<String>,
}

impl NewClipboardItem {
    /// Create a text item captured now
    pub fn text<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set an explicit capture time
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the content type
    pub fn with_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Set the source application
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Per-type item counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts {
    pub text: u64,
    pub image: u64,
    pub file: u64,
}

impl TypeCounts {
    /// Count one item of the given type
    pub fn record(&mut self, content_type: ContentType) {
        match content_type {
            ContentType::Text => self.text += 1,
            ContentType::Image => self.image += 1,
            ContentType::File => self.file += 1,
        }
    }
}

/// Aggregate statistics over a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardStats {
    /// Number of stored items
    pub total: u64,
    /// Number of favorite items
    pub favorites: u64,
    /// Item counts per content type
    pub by_type: TypeCounts,
    /// Timestamp of the newest item
    pub last_timestamp: Option<i64>,
}

/// Lowercased search index for content
pub fn search_index_for(content: &str) -> String {
    content.to_lowercase()
}

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
