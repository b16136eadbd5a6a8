/*!
 * Command gateway.
 *
 * The single entry point between a host (desktop shell, CLI, tests) and the
 * backend. A host calls [`Gateway::invoke`] with a channel name such as
 * `clipboard:search` and a JSON payload; the gateway turns that into a typed
 * [`Command`], runs it against the [`AppContext`] and always answers with a
 * [`Response`] envelope. Handler errors never escape as `Err`: they are
 * logged and reported as `{ "success": false, "error": ... }`.
 */

use log::{debug, error, info};
use serde_json::{json, Value};
use std::sync::Arc;

pub mod command;
pub mod response;

pub use command::{Command, CHANNELS};
pub use response::Response;

use crate::context::AppContext;
use crate::errors::{GatewayError, StoreError};

/// Routes commands to handlers over a shared context
#[derive(Clone)]
pub struct Gateway {
    ctx: Arc<AppContext>,
}

impl Gateway {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    /// Shared context behind this gateway
    pub fn context(&self) -> &Arc<AppContext> {
        &self.ctx
    }

    /// Parse and run a raw channel call
    pub async fn invoke(&self, channel: &str, payload: Value) -> Response {
        match Command::parse(channel, payload) {
            Ok(command) => self.dispatch(command).await,
            Err(e) => {
                error!("Rejected call on {}: {}", channel, e);
                Response::failure(e.to_string())
            }
        }
    }

    /// Run a typed command
    pub async fn dispatch(&self, command: Command) -> Response {
        let channel = command.channel();

        if channel.starts_with("security:") {
            info!("Security-sensitive call: {}", channel);
        } else {
            debug!("Gateway call: {}", channel);
        }

        match self.handle(command).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error on {}: {}", channel, e);
                Response::failure(e.to_string())
            }
        }
    }

    async fn handle(&self, command: Command) -> Result<Response, GatewayError> {
        let ctx = &self.ctx;
        let storage = &ctx.config.storage;

        let response = match command {
            Command::GetHistory { limit, offset } => {
                let items = ctx
                    .store
                    .get_items(limit.unwrap_or(storage.default_limit), offset.unwrap_or(0))
                    .await?;
                Response::ok(items)
            }
            Command::AddItem(item) => Response::ok(ctx.recorder.capture(item).await?),
            Command::Search { query, limit } => {
                let items = ctx
                    .store
                    .search_items(&query, limit.unwrap_or(storage.search_limit))
                    .await?;
                Response::ok(items)
            }
            Command::GetStats => Response::ok(ctx.store.stats().await?),
            Command::GetItem { id } => match ctx.store.get_item(id).await? {
                Some(item) => Response::ok(item),
                None => return Err(StoreError::NotFound(id).into()),
            },
            Command::GetFavorites => Response::ok(ctx.store.favorite_items().await?),
            Command::ToggleFavorite { id } => match ctx.store.toggle_favorite(id).await? {
                Some(is_favorite) => Response::ok(is_favorite),
                None => return Err(StoreError::NotFound(id).into()),
            },
            Command::Delete { id } => Response::ok(ctx.store.delete_item(id).await?),
            Command::ClearAll => {
                ctx.store.clear().await?;
                ctx.recorder.reset();
                Response::empty()
            }
            Command::Scan { content } => Response::ok(ctx.detector.scan(&content)),
            Command::Mask { content } => Response::ok(ctx.detector.mask(&content)),
            Command::ServiceStatus => Response::ok(json!({
                "initialized": ctx.registry.is_initialized(),
                "services": ctx.registry.statuses(),
                "wired": ctx.registry.wired_services(),
                "failed": ctx.registry.failed_services(),
            })),
            Command::HealthCheck => Response::ok(ctx.registry.health_check().await),
            Command::GetSetting { key } => Response::ok(ctx.store.get_setting(&key).await?),
            Command::SetSetting { key, value } => {
                ctx.store.set_setting(&key, &value).await?;
                Response::empty()
            }
            Command::PlatformInfo => Response::ok(json!({
                "os": std::env::consts::OS,
                "arch": std::env::consts::ARCH,
                "family": std::env::consts::FAMILY,
                "version": env!("CARGO_PKG_VERSION"),
                "storage": ctx.store.backend_name(),
            })),
        };

        Ok(response)
    }
}
