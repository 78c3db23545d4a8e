//! Configuration schema and loading.
//!
//! Configuration is read once at startup and never mutated by the pipeline.
//!
//! ```toml
//! [settings]
//! force_string_format = false
//! pending_ttl_secs = 60
//!
//! [messages]
//! chat_not_found = "&cNo chat is available for this message."
//!
//! [moderation.caps]
//! percent = 80
//! length = 6
//! block = false
//!
//! [[chats]]
//! name = "global"
//! symbol = "!"
//! format = "&6[G] &7{prefix}{player}{suffix}&8: &f{message}"
//!
//! [[chats]]
//! name = "local"
//! format = "&7{prefix}{player}{suffix}&8: &f{message}"
//! ```

use chatty_core::{Chat, ChattyError, MESSAGE_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path, sync::Arc, time::Duration};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for ChattyError {
    fn from(err: ConfigError) -> Self {
        ChattyError::Config(Box::new(err))
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChattyConfig {
    pub settings: Settings,
    pub messages: Messages,
    pub moderation: ModerationConfig,
    pub chats: Vec<ChatConfig>,
}

impl ChattyConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let mut config: ChattyConfig = toml::from_str(raw)?;
        if config.chats.is_empty() {
            debug!("no chats configured, using the default chat");
            config.chats.push(ChatConfig::default());
        }
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loading chatty config");
        Self::from_toml_str(&raw)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.settings.validate()?;

        let caps = &self.moderation.caps;
        if caps.percent > 100 {
            return Err(ConfigError::Invalid(format!(
                "moderation.caps.percent must be within 0..=100, got {}",
                caps.percent
            )));
        }

        let mut names = HashSet::new();
        for chat in &self.chats {
            if chat.name.is_empty() {
                return Err(ConfigError::Invalid("chat name must not be empty".into()));
            }
            if !names.insert(chat.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate chat name `{}`",
                    chat.name
                )));
            }
            if !chat.format.contains(MESSAGE_PLACEHOLDER) {
                return Err(ConfigError::Invalid(format!(
                    "format of chat `{}` has no {MESSAGE_PLACEHOLDER} placeholder",
                    chat.name
                )));
            }
        }
        Ok(())
    }

    /// The configured chats, in declaration order.
    pub fn chats(&self) -> Vec<Arc<Chat>> {
        self.chats.iter().map(|chat| Arc::new(chat.to_chat())).collect()
    }
}

/// How finalize callbacks are paired with pending contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correlation {
    /// Oldest pending context overall.
    Fifo,
    /// Oldest pending context of the event's sender.
    #[default]
    PerSender,
}

/// Pipeline behaviour switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Write the result back onto the host event as a legacy string instead
    /// of delivering rich text directly.
    pub force_string_format: bool,
    /// Seconds a context may wait for its finalize callback.
    pub pending_ttl_secs: u64,
    /// Upper bound on waiting contexts.
    pub pending_capacity: Option<usize>,
    pub correlation: Correlation,
}

impl Settings {
    pub fn pending_ttl(&self) -> Duration {
        Duration::from_secs(self.pending_ttl_secs)
    }

    /// A pending queue must hold at least one context.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pending_capacity == Some(0) {
            return Err(ConfigError::Invalid(
                "settings.pending_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            force_string_format: false,
            pending_ttl_secs: 60,
            pending_capacity: None,
            correlation: Correlation::default(),
        }
    }
}

/// Notices sent to players, in legacy `&` notation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub chat_not_found: String,
    pub caps_found: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            chat_not_found: "&cNo chat is available for this message.".into(),
            caps_found: "&cPlease don't abuse capital letters.".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    pub caps: CapsConfig,
}

/// Thresholds for caps moderation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsConfig {
    pub enabled: bool,
    /// Minimum share of uppercase letters, 0..=100.
    pub percent: u8,
    /// Messages shorter than this are never checked.
    pub length: usize,
    /// Cancel flagged messages instead of only lower-casing them.
    pub block: bool,
}

impl Default for CapsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            percent: 80,
            length: 6,
            block: false,
        }
    }
}

/// One `[[chats]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub name: String,
    pub format: String,
    pub symbol: String,
    pub permission_required: bool,
}

impl ChatConfig {
    pub fn to_chat(&self) -> Chat {
        Chat::new(&self.name, &self.format)
            .with_symbol(&self.symbol)
            .with_permission_required(self.permission_required)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            name: "default".into(),
            format: "{prefix}{player}{suffix}&8: &f{message}".into(),
            symbol: String::new(),
            permission_required: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = ChattyConfig::from_toml_str("").unwrap();
        assert!(!config.settings.force_string_format);
        assert_eq!(config.settings.pending_ttl(), Duration::from_secs(60));
        assert_eq!(config.settings.correlation, Correlation::PerSender);
        assert_eq!(config.moderation.caps.percent, 80);
        assert_eq!(config.chats.len(), 1);
        assert_eq!(config.chats()[0].name(), "default");
    }

    #[test]
    fn parses_full_config() {
        let raw = r##"
            [settings]
            force_string_format = true
            pending_ttl_secs = 5
            correlation = "fifo"

            [moderation.caps]
            percent = 50
            length = 3
            block = true

            [[chats]]
            name = "global"
            symbol = "!"
            format = "&6[G] {player}: {message}"

            [[chats]]
            name = "staff"
            symbol = "#"
            permission_required = true
            format = "&c[S] {player}: {message}"
        "##;
        let config = ChattyConfig::from_toml_str(raw).unwrap();

        assert!(config.settings.force_string_format);
        assert_eq!(config.settings.correlation, Correlation::Fifo);
        assert!(config.moderation.caps.block);
        assert_eq!(config.moderation.caps.length, 3);

        let chats = config.chats();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].symbol(), "!");
        assert!(chats[1].is_permission_required());
        // untouched sections keep their defaults
        assert_eq!(
            config.messages.chat_not_found,
            Messages::default().chat_not_found
        );
    }

    #[test]
    fn rejects_duplicate_chat_names() {
        let raw = r#"
            [[chats]]
            name = "a"
            format = "{message}"

            [[chats]]
            name = "a"
            format = "{message}"
        "#;
        assert!(matches!(
            ChattyConfig::from_toml_str(raw),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_zero_pending_capacity() {
        let raw = r#"
            [settings]
            pending_capacity = 0
        "#;
        assert!(matches!(
            ChattyConfig::from_toml_str(raw),
            Err(ConfigError::Invalid(_))
        ));

        let config = ChattyConfig::from_toml_str("[settings]\npending_capacity = 1").unwrap();
        assert_eq!(config.settings.pending_capacity, Some(1));
    }

    #[test]
    fn rejects_format_without_message() {
        let raw = r#"
            [[chats]]
            name = "broken"
            format = "{player} said something"
        "#;
        assert!(matches!(
            ChattyConfig::from_toml_str(raw),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_percent() {
        let raw = "[moderation.caps]\npercent = 101\n";
        assert!(matches!(
            ChattyConfig::from_toml_str(raw),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            ChattyConfig::from_toml_str("[settings"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let error = ChattyConfig::load(Path::new("/nonexistent/chatty.toml")).unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
        let wrapped: ChattyError = error.into();
        assert!(matches!(wrapped, ChattyError::Config(_)));
    }
}
