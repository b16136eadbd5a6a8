/*!
 * # Clipkeep - clipboard history backend
 *
 * A Rust library that stores clipboard history, flags sensitive content and
 * exposes everything through a channel-based command gateway.
 *
 * ## Features
 *
 * - Clipboard history with favorites, search, statistics and settings
 * - Two storage backends:
 *   - in-memory (nothing survives a restart)
 *   - SQLite with schema versioning
 * - Sensitive content detection and masking (keys, cards, SSNs, emails, secrets)
 * - Capture pipeline that skips blank and repeated content
 * - Service registry with periodic health checks
 * - JSON command gateway with a uniform `{ success, data, error }` envelope
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: The `ClipboardStore` trait and its backends:
 *   - `database::memory`: In-memory store
 *   - `database::repository`: SQLite store
 *   - `database::schema`: SQLite schema and migrations
 * - `detector`: Sensitive content detection and masking
 * - `capture`: Capture pipeline in front of the store
 * - `registry`: Service registry and health monitoring
 * - `context`: Shared application context
 * - `gateway`: Channel routing and response envelopes
 * - `doctor`: Environment diagnostics
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod capture;
pub mod context;
pub mod database;
pub mod detector;
pub mod doctor;
pub mod errors;
pub mod gateway;
pub mod registry;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use capture::{CaptureOutcome, HistoryRecorder};
pub use context::AppContext;
pub use database::{
    ClipboardItem, ClipboardStats, ClipboardStore, ContentType, MemoryStore, NewClipboardItem,
    SqliteStore,
};
pub use detector::{ScanResult, SensitiveDetector, SensitiveKind};
pub use errors::{AppError, GatewayError, RegistryError, StoreError};
pub use gateway::{Command, Gateway, Response};
pub use registry::{HealthReport, Service, ServiceRegistry, ServiceState, ServiceStatus};
