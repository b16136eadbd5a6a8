/*!
 * Typed gateway commands.
 *
 * Each channel name maps to exactly one [`Command`] variant. Payloads arrive
 * as JSON and are deserialized into the variant's fields; channels whose
 * fields are all optional also accept a missing (`null`) payload.
 */

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::database::NewClipboardItem;
use crate::errors::GatewayError;

/// Every channel routed by the gateway
pub const CHANNELS: &[&str] = &[
    "clipboard:getHistory",
    "clipboard:addItem",
    "clipboard:search",
    "clipboard:getStats",
    "clipboard:getItem",
    "clipboard:getFavorites",
    "clipboard:toggleFavorite",
    "clipboard:delete",
    "clipboard:clearAll",
    "security:scan",
    "security:mask",
    "services:status",
    "services:healthCheck",
    "storage:getSetting",
    "storage:setSetting",
    "system:platformInfo",
];

/// A request routed through the gateway
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    GetHistory {
        limit: Option<usize>,
        offset: Option<usize>,
    },
    AddItem(NewClipboardItem),
    Search {
        query: String,
        limit: Option<usize>,
    },
    GetStats,
    GetItem {
        id: i64,
    },
    GetFavorites,
    ToggleFavorite {
        id: i64,
    },
    Delete {
        id: i64,
    },
    ClearAll,
    Scan {
        content: String,
    },
    Mask {
        content: String,
    },
    ServiceStatus,
    HealthCheck,
    GetSetting {
        key: String,
    },
    SetSetting {
        key: String,
        value: String,
    },
    PlatformInfo,
}

#[derive(Deserialize, Default)]
struct PagePayload {
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    offset: Option<usize>,
}

#[derive(Deserialize)]
struct SearchPayload {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct IdPayload {
    id: i64,
}

#[derive(Deserialize)]
struct ContentPayload {
    content: String,
}

#[derive(Deserialize)]
struct KeyPayload {
    key: String,
}

#[derive(Deserialize)]
struct SettingPayload {
    key: String,
    value: String,
}

impl Command {
    /// Build a command from a channel name and its JSON payload
    pub fn parse(channel: &str, payload: Value) -> Result<Self, GatewayError> {
        let command = match channel {
            "clipboard:getHistory" => {
                let page: PagePayload = decode_optional(channel, payload)?;
                Command::GetHistory {
                    limit: page.limit,
                    offset: page.offset,
                }
            }
            "clipboard:addItem" => Command::AddItem(decode(channel, payload)?),
            "clipboard:search" => {
                let search: SearchPayload = decode(channel, payload)?;
                Command::Search {
                    query: search.query,
                    limit: search.limit,
                }
            }
            "clipboard:getStats" => Command::GetStats,
            "clipboard:getItem" => Command::GetItem {
                id: decode::<IdPayload>(channel, payload)?.id,
            },
            "clipboard:getFavorites" => Command::GetFavorites,
            "clipboard:toggleFavorite" => Command::ToggleFavorite {
                id: decode::<IdPayload>(channel, payload)?.id,
            },
            "clipboard:delete" => Command::Delete {
                id: decode::<IdPayload>(channel, payload)?.id,
            },
            "clipboard:clearAll" => Command::ClearAll,
            "security:scan" => Command::Scan {
                content: decode::<ContentPayload>(channel, payload)?.content,
            },
            "security:mask" => Command::Mask {
                content: decode::<ContentPayload>(channel, payload)?.content,
            },
            "services:status" => Command::ServiceStatus,
            "services:healthCheck" => Command::HealthCheck,
            "storage:getSetting" => Command::GetSetting {
                key: decode::<KeyPayload>(channel, payload)?.key,
            },
            "storage:setSetting" => {
                let setting: SettingPayload = decode(channel, payload)?;
                Command::SetSetting {
                    key: setting.key,
                    value: setting.value,
                }
            }
            "system:platformInfo" => Command::PlatformInfo,
            other => return Err(GatewayError::UnknownChannel(other.to_string())),
        };

        Ok(command)
    }

    /// Channel name this command is routed on
    pub fn channel(&self) -> &'static str {
        match self {
            Command::GetHistory { .. } => "clipboard:getHistory",
            Command::AddItem(_) => "clipboard:addItem",
            Command::Search { .. } => "clipboard:search",
            Command::GetStats => "clipboard:getStats",
            Command::GetItem { .. } => "clipboard:getItem",
            Command::GetFavorites => "clipboard:getFavorites",
            Command::ToggleFavorite { .. } => "clipboard:toggleFavorite",
            Command::Delete { .. } => "clipboard:delete",
            Command::ClearAll => "clipboard:clearAll",
            Command::Scan { .. } => "security:scan",
            Command::Mask { .. } => "security:mask",
            Command::ServiceStatus => "services:status",
            Command::HealthCheck => "services:healthCheck",
            Command::GetSetting { .. } => "storage:getSetting",
            Command::SetSetting { .. } => "storage:setSetting",
            Command::PlatformInfo => "system:platformInfo",
        }
    }
}

fn decode<T: DeserializeOwned>(channel: &str, payload: Value) -> Result<T, GatewayError> {
    serde_json::from_value(payload).map_err(|e| GatewayError::InvalidPayload {
        channel: channel.to_string(),
        message: e.to_string(),
    })
}

fn decode_optional<T: DeserializeOwned + Default>(
    channel: &str,
    payload: Value,
) -> Result<T, GatewayError> {
    if payload.is_null() {
        return Ok(T::default());
    }
    decode(channel, payload)
}
