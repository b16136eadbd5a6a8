use log::info;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::context::AppContext;
use crate::database::ClipboardStore;
use crate::errors::{AppError, StoreError};
use crate::gateway::{Gateway, Response};

// @module: Application controller wiring the backend together

/// Owns the application context and its gateway
pub struct Controller {
    // @field: Shared components
    context: Arc<AppContext>,
    // @field: Command router over the context
    gateway: Gateway,
}

impl Controller {
    /// Create a new controller for test purposes backed by an in-memory store
    pub fn new_for_test() -> Result<Self, AppError> {
        let mut config = Config::default();
        config.storage.backend = crate::app_config::StorageBackend::Memory;
        Self::with_config(config)
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        validate(&config)?;

        let context = AppContext::from_config(config).map_err(StoreError::from)?;

        Ok(Self::from_context(context))
    }

    /// Create a controller around an existing store
    pub fn with_store(config: Config, store: Arc<dyn ClipboardStore>) -> Result<Self, AppError> {
        validate(&config)?;
        Ok(Self::from_context(AppContext::with_store(config, store)))
    }

    fn from_context(context: AppContext) -> Self {
        let context = Arc::new(context);
        let gateway = Gateway::new(context.clone());
        Self { context, gateway }
    }

    /// Register the core services and start health monitoring
    pub async fn start(&self) {
        let interval = Duration::from_secs(self.context.config.services.health_check_interval_secs);
        self.context
            .registry
            .initialize(self.context.core_services(), interval)
            .await;

        info!(
            "Clipkeep backend ready ({} store)",
            self.context.store.backend_name()
        );
    }

    /// Check whether the service registry has been started
    pub fn is_initialized(&self) -> bool {
        self.context.registry.is_initialized()
    }

    /// Shared application context
    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    /// Command gateway
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Shorthand for a gateway call
    pub async fn invoke(&self, channel: &str, payload: serde_json::Value) -> Response {
        self.gateway.invoke(channel, payload).await
    }

    /// Stop monitoring and release every service
    pub async fn shutdown(&self) {
        self.context.registry.shutdown().await;
        info!("Clipkeep backend stopped");
    }
}

fn validate(config: &Config) -> Result<(), AppError> {
    config
        .validate()
        .map_err(|e| AppError::Config(format!("{:#}", e)))
}
