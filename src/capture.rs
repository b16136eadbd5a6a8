/*!
 * Clipboard capture pipeline.
 *
 * The host feeds every clipboard change into [`HistoryRecorder::capture`],
 * which drops blank and repeated content, classifies the rest with the
 * [`SensitiveDetector`] and writes it to the configured store.
 */

use log::{debug, info};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::app_config::{CaptureConfig, SecurityConfig};
use crate::database::{ClipboardStore, NewClipboardItem};
use crate::detector::{SensitiveDetector, SensitiveKind};
use crate::errors::StoreError;

/// What happened to a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CaptureOutcome {
    /// Stored under the given id
    Saved {
        id: i64,
        sensitive: Option<SensitiveKind>,
        masked: bool,
    },
    /// Content was empty or whitespace only
    SkippedBlank,
    /// Content matched the previous capture
    SkippedDuplicate,
}

impl CaptureOutcome {
    /// Id of the stored item, if one was stored
    pub fn saved_id(&self) -> Option<i64> {
        match self {
            CaptureOutcome::Saved { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Writes captured clipboard content to a store
pub struct HistoryRecorder {
    store: Arc<dyn ClipboardStore>,
    detector: SensitiveDetector,
    security: SecurityConfig,
    capture: CaptureConfig,
    /// SHA-256 of the last content accepted
    last_digest: Mutex<Option<[u8; 32]>>,
}

impl HistoryRecorder {
    pub fn new(
        store: Arc<dyn ClipboardStore>,
        detector: SensitiveDetector,
        security: SecurityConfig,
        capture: CaptureConfig,
    ) -> Self {
        Self {
            store,
            detector,
            security,
            capture,
            last_digest: Mutex::new(None),
        }
    }

    /// Record one clipboard change
    pub async fn capture(&self, mut item: NewClipboardItem) -> Result<CaptureOutcome, StoreError> {
        if item.content.trim().is_empty() {
            debug!("Ignoring blank clipboard content");
            return Ok(CaptureOutcome::SkippedBlank);
        }

        let digest: [u8; 32] = Sha256::digest(item.content.as_bytes()).into();
        {
            let mut last = self.last_digest.lock();
            if self.capture.skip_duplicates && last.as_ref() == Some(&digest) {
                debug!("Ignoring clipboard content identical to the previous capture");
                return Ok(CaptureOutcome::SkippedDuplicate);
            }
            *last = Some(digest);
        }

        let scan = self.detector.scan(&item.content);
        let mut masked = false;

        if let Some(kind) = scan.kind {
            info!("Sensitive content detected in capture: {}", kind);

            if self.security.tag_sensitive && item.category.is_none() {
                item.category = Some(kind.label().to_string());
            }

            if self.security.mask_on_save {
                item.content = self.detector.mask(&item.content);
                masked = true;
            }
        }

        match self.store.save_item(item).await {
            Ok(id) => Ok(CaptureOutcome::Saved {
                id,
                sensitive: scan.kind,
                masked,
            }),
            Err(e) => {
                // A failed save must not suppress the retry of the same content
                *self.last_digest.lock() = None;
                Err(e)
            }
        }
    }

    /// Forget the previous capture so identical content is accepted again
    pub fn reset(&self) {
        *self.last_digest.lock() = None;
    }
}
