//! Chat channel definitions.

/// Placeholder replaced with the sender's name.
pub const PLAYER_PLACEHOLDER: &str = "{player}";

/// Placeholder replaced with the message body.
pub const MESSAGE_PLACEHOLDER: &str = "{message}";

/// Placeholder replaced with the sender's prefix, if any.
pub const PREFIX_PLACEHOLDER: &str = "{prefix}";

/// Placeholder replaced with the sender's suffix, if any.
pub const SUFFIX_PLACEHOLDER: &str = "{suffix}";

/// A configured chat channel.
///
/// Chats are loaded once at startup and shared read-only (usually behind an
/// `Arc`) by every pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    name: String,
    format: String,
    symbol: String,
    permission_required: bool,
}

impl Chat {
    /// Create a chat that matches every message and needs no permission.
    pub fn new(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: format.into(),
            symbol: String::new(),
            permission_required: false,
        }
    }

    /// Set the trigger symbol a message must start with.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    /// Require the `chatty.chat.<name>` permission to write to this chat.
    pub fn with_permission_required(mut self, required: bool) -> Self {
        self.permission_required = required;
        self
    }

    /// The chat's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The format template, in legacy `&` notation.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The trigger symbol. Empty means "matches everything".
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Whether writing requires [`Chat::permission`].
    pub fn is_permission_required(&self) -> bool {
        self.permission_required
    }

    /// Permission key that grants write access.
    pub fn permission(&self) -> String {
        format!("chatty.chat.{}", self.name)
    }

    /// Whether a raw message triggers this chat.
    pub fn matches(&self, message: &str) -> bool {
        self.symbol.is_empty() || message.starts_with(&self.symbol)
    }
}
