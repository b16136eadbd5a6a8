/*!
 * Shared application context.
 *
 * Holds every long-lived component so handlers receive their dependencies
 * explicitly instead of reaching for globals.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serde_json::json;
use std::sync::Arc;

use crate::app_config::{Config, StorageBackend};
use crate::capture::HistoryRecorder;
use crate::database::{ClipboardStore, MemoryStore, SqliteStore};
use crate::detector::SensitiveDetector;
use crate::registry::{Service, ServiceRegistry};

/// Components shared by the gateway and the CLI
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn ClipboardStore>,
    pub detector: SensitiveDetector,
    pub recorder: HistoryRecorder,
    pub registry: Arc<ServiceRegistry>,
}

impl AppContext {
    /// Build every component from the configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let store: Arc<dyn ClipboardStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::Sqlite => {
                let path = config.storage.resolved_database_path()?;
                Arc::new(SqliteStore::open(path)?)
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// Build the context around an existing store
    pub fn with_store(config: Config, store: Arc<dyn ClipboardStore>) -> Self {
        let detector = SensitiveDetector::new(config.security.max_scan_chars);
        let recorder = HistoryRecorder::new(
            store.clone(),
            detector.clone(),
            config.security.clone(),
            config.capture.clone(),
        );

        info!("Using {} clipboard store", store.backend_name());

        Self {
            config,
            store,
            detector,
            recorder,
            registry: ServiceRegistry::new(),
        }
    }

    /// Registry adapters for the components that report health
    pub fn core_services(&self) -> Vec<Arc<dyn Service>> {
        vec![
            Arc::new(StoreService {
                store: self.store.clone(),
            }),
            Arc::new(DetectorService {
                detector: self.detector.clone(),
            }),
        ]
    }
}

/// Exposes the clipboard store to the registry
struct StoreService {
    store: Arc<dyn ClipboardStore>,
}

#[async_trait]
impl Service for StoreService {
    fn name(&self) -> &str {
        "clipboard"
    }

    async fn initialize(&self) -> Result<()> {
        // Touch the backend so a broken database fails registration
        self.store.stats().await?;
        Ok(())
    }

    async fn health_check(&self) -> Option<Result<serde_json::Value>> {
        let result = self.store.stats().await.map(|stats| {
            json!({
                "backend": self.store.backend_name(),
                "items": stats.total,
            })
        });
        Some(result.map_err(anyhow::Error::from))
    }
}

/// Exposes the sensitive data detector to the registry
struct DetectorService {
    detector: SensitiveDetector,
}

#[async_trait]
impl Service for DetectorService {
    fn name(&self) -> &str {
        "sensitiveDetector"
    }

    async fn health_check(&self) -> Option<Result<serde_json::Value>> {
        let disabled = self.detector.disabled_rule_count();
        if disabled > 0 {
            return Some(Err(anyhow::anyhow!("{} detection rules failed to compile", disabled)));
        }
        Some(Ok(json!({ "rules": self.detector.rule_count() })))
    }
}
