/*!
 * Service registry and health monitoring.
 *
 * Long-lived backend components implement [`Service`] and are registered
 * with a [`ServiceRegistry`]. The registry tracks a status per service,
 * polls health checks on a fixed interval, and publishes lifecycle events
 * on a broadcast channel.
 */

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, error, info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::database::models::now_millis;
use crate::errors::RegistryError;

/// Capacity of the lifecycle event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A component managed by the registry
#[async_trait]
pub trait Service: Send + Sync {
    /// Registry key
    fn name(&self) -> &str;

    /// Called once on registration
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Report health details; `None` when the service has no health check
    async fn health_check(&self) -> Option<Result<serde_json::Value>> {
        None
    }

    /// Called once on registry shutdown
    async fn cleanup(&self) -> Result<()> {
        Ok(())
    }
}

/// Lifecycle state of a registered service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Registered,
    Active,
    Failed,
    Error,
}

/// Status record kept per service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub name: String,
    pub status: ServiceState,
    /// Milliseconds since the Unix epoch
    pub last_check: i64,
    pub error: Option<String>,
}

/// Result of one health check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthReport {
    Healthy { details: serde_json::Value },
    Unknown { details: String },
    Unhealthy { error: String },
}

/// Lifecycle events published by the registry
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Initialized,
    ServiceRegistered { name: String },
    RegistrationFailed { name: String, error: String },
    StatusChanged {
        name: String,
        status: ServiceState,
        error: Option<String>,
    },
    Shutdown,
}

/// Registry of named services
pub struct ServiceRegistry {
    services: RwLock<Vec<Arc<dyn Service>>>,
    statuses: RwLock<HashMap<String, ServiceStatus>>,
    wired: RwLock<BTreeSet<String>>,
    failed: RwLock<BTreeSet<String>>,
    monitor: Mutex<Option<JoinHandle<()>>>,
    initialized: RwLock<bool>,
    events: broadcast::Sender<RegistryEvent>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            services: RwLock::new(Vec::new()),
            statuses: RwLock::new(HashMap::new()),
            wired: RwLock::new(BTreeSet::new()),
            failed: RwLock::new(BTreeSet::new()),
            monitor: Mutex::new(None),
            initialized: RwLock::new(false),
            events,
        })
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: RegistryEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Register the given services and start health monitoring
    pub async fn initialize(
        self: &Arc<Self>,
        services: Vec<Arc<dyn Service>>,
        health_interval: Duration,
    ) {
        info!("Initializing service registry...");

        for service in services {
            self.register(service).await;
        }

        self.start_health_monitoring(health_interval);
        *self.initialized.write() = true;

        info!(
            "Service registry initialized ({} wired, {} failed)",
            self.wired.read().len(),
            self.failed.read().len()
        );
        self.emit(RegistryEvent::Initialized);
    }

    /// Whether `initialize` completed and `shutdown` has not run since
    pub fn is_initialized(&self) -> bool {
        *self.initialized.read()
    }

    /// Register a service; returns false if its initialization failed
    pub async fn register(&self, service: Arc<dyn Service>) -> bool {
        let name = service.name().to_string();

        {
            let mut services = self.services.write();
            services.retain(|s| s.name() != name);
            services.push(service.clone());
        }
        self.statuses.write().insert(
            name.clone(),
            ServiceStatus {
                name: name.clone(),
                status: ServiceState::Registered,
                last_check: now_millis(),
                error: None,
            },
        );

        match service.initialize().await {
            Ok(()) => {
                self.wired.write().insert(name.clone());
                self.failed.write().remove(&name);
                self.update_status(&name, ServiceState::Active, None);
                info!("Service '{}' registered successfully", name);
                self.emit(RegistryEvent::ServiceRegistered { name });
                true
            }
            Err(e) => {
                let err = RegistryError::InitializationFailed {
                    name: name.clone(),
                    message: format!("{:#}", e),
                };
                error!("{}", err);
                self.wired.write().remove(&name);
                self.failed.write().insert(name.clone());
                self.update_status(&name, ServiceState::Failed, Some(format!("{:#}", e)));
                self.emit(RegistryEvent::RegistrationFailed {
                    name,
                    error: err.to_string(),
                });
                false
            }
        }
    }

    /// Look up a service by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.services
            .read()
            .iter()
            .find(|s| s.name() == name)
            .cloned()
    }

    /// Status of a single service
    pub fn status(&self, name: &str) -> Option<ServiceStatus> {
        self.statuses.read().get(name).cloned()
    }

    /// Statuses of all services, ordered by name
    pub fn statuses(&self) -> Vec<ServiceStatus> {
        let mut statuses: Vec<ServiceStatus> = self.statuses.read().values().cloned().collect();
        statuses.sort_by(|a, b| a.name.cmp(&b.name));
        statuses
    }

    /// Names of services that initialized successfully
    pub fn wired_services(&self) -> Vec<String> {
        self.wired.read().iter().cloned().collect()
    }

    /// Names of services that failed to initialize
    pub fn failed_services(&self) -> Vec<String> {
        self.failed.read().iter().cloned().collect()
    }

    /// Update the status of a registered service; unknown names are ignored
    pub fn update_status(&self, name: &str, status: ServiceState, error: Option<String>) {
        let changed = {
            let mut statuses = self.statuses.write();
            match statuses.get_mut(name) {
                Some(entry) => {
                    entry.status = status;
                    entry.last_check = now_millis();
                    entry.error = error.clone();
                    true
                }
                None => false,
            }
        };

        if changed {
            self.emit(RegistryEvent::StatusChanged {
                name: name.to_string(),
                status,
                error,
            });
        }
    }

    /// Run every service's health check concurrently
    pub async fn health_check(&self) -> BTreeMap<String, HealthReport> {
        let services: Vec<Arc<dyn Service>> = self.services.read().clone();

        let checks = services.iter().map(|service| async move {
            (service.name().to_string(), service.health_check().await)
        });

        let mut reports = BTreeMap::new();
        for (name, outcome) in join_all(checks).await {
            let report = match outcome {
                Some(Ok(details)) => {
                    self.update_status(&name, ServiceState::Active, None);
                    HealthReport::Healthy { details }
                }
                Some(Err(e)) => {
                    let message = format!("{:#}", e);
                    warn!(
                        "{}",
                        RegistryError::Unhealthy {
                            name: name.clone(),
                            message: message.clone(),
                        }
                    );
                    self.update_status(&name, ServiceState::Error, Some(message.clone()));
                    HealthReport::Unhealthy { error: message }
                }
                None => HealthReport::Unknown {
                    details: "No health check available".to_string(),
                },
            };
            reports.insert(name, report);
        }

        debug!("Health check completed for {} services", reports.len());
        reports
    }

    /// Poll health checks every `interval`, replacing any running monitor
    pub fn start_health_monitoring(self: &Arc<Self>, interval: Duration) {
        let registry: Weak<Self> = Arc::downgrade(self);

        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);

            loop {
                ticker.tick().await;
                match registry.upgrade() {
                    Some(registry) => {
                        registry.health_check().await;
                    }
                    None => break,
                }
            }
        });

        if let Some(previous) = self.monitor.lock().replace(handle) {
            previous.abort();
        }

        info!("Health monitoring started (every {:?})", interval);
    }

    /// Stop the health monitor if one is running
    pub fn stop_health_monitoring(&self) {
        if let Some(handle) = self.monitor.lock().take() {
            handle.abort();
            info!("Health monitoring stopped");
        }
    }

    /// Whether a health monitor is running
    pub fn is_monitoring(&self) -> bool {
        self.monitor
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop monitoring, clean up every service and forget them
    pub async fn shutdown(&self) {
        info!("Shutting down service registry...");

        self.stop_health_monitoring();

        let services: Vec<Arc<dyn Service>> = self.services.read().clone();
        for service in services {
            match service.cleanup().await {
                Ok(()) => debug!("Service '{}' cleaned up", service.name()),
                Err(e) => error!("Failed to clean up service '{}': {:#}", service.name(), e),
            }
        }

        self.services.write().clear();
        self.statuses.write().clear();
        self.wired.write().clear();
        self.failed.write().clear();
        *self.initialized.write() = false;

        info!("Service registry shutdown completed");
        self.emit(RegistryEvent::Shutdown);
    }
}

impl Drop for ServiceRegistry {
    fn drop(&mut self) {
        if let Some(handle) = self.monitor.get_mut().take() {
            handle.abort();
        }
    }
}
