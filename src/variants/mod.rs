//! Built-in launcher tables, compiled into the binaries.

use crate::config::{ConfigError, LauncherConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Messages, WhatsApp, Discord and Gmail.
    Chat,
    /// Music, notation and video production apps.
    Create,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Create => "create",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Self::Chat => include_str!("chat.toml"),
            Self::Create => include_str!("create.toml"),
        }
    }

    pub fn config(self) -> Result<LauncherConfig, ConfigError> {
        LauncherConfig::from_toml(self.source())
    }
}
