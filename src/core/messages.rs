//! Wire format of the extension message bus.

use super::settings::{Settings, SettingsPatch};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNKNOWN_MESSAGE: &str = "Unknown message type";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    GetSettings,
    UpdateSettings {
        #[serde(default)]
        settings: SettingsPatch,
    },
    Panic,
    Enable,
    Disable,
}

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Unknown message type")]
    Unknown(#[source] serde_json::Error),
}

pub fn parse_message(text: &str) -> Result<Message, MessageError> {
    serde_json::from_str(text).map_err(MessageError::Unknown)
}

impl Message {
    /// The change the background worker persists before forwarding this
    /// message to tabs. Reads persist nothing.
    pub fn persisted_patch(&self) -> Option<SettingsPatch> {
        match self {
            Message::GetSettings => None,
            Message::UpdateSettings { settings } => Some(settings.clone()),
            Message::Panic | Message::Disable => Some(SettingsPatch::enabled(false)),
            Message::Enable => Some(SettingsPatch::enabled(true)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub settings: Option<Settings>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            success: true,
            settings: Some(settings),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            settings: None,
            error: Some(error.into()),
        }
    }
}
