//! # Host Collaborators
//!
//! Narrow interfaces to everything the pipeline does not own: the chat
//! event the host hands out, permissions, the audience that receives rendered
//! text, prefix/suffix lookup and the legacy text encoder.

use crate::{
    context::{PlayerId, Sender},
    text::Component,
};
use std::{collections::HashSet, sync::Arc};

/// Format the host uses when nobody rewrites it.
pub const DEFAULT_HOST_FORMAT: &str = "<%1$s> %2$s";

/// Mutable view of one host chat event.
///
/// The host adapter copies its event into this struct before each callback
/// and copies the fields back afterwards. The same event goes through both
/// the early and the finalize callback.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    pub sender: Arc<Sender>,
    pub message: String,
    /// Host format string with `%1$s` (player) and `%2$s` (message) markers.
    pub format: String,
    pub recipients: HashSet<PlayerId>,
    pub cancelled: bool,
    /// Set when the early callback queued a context for this event. The
    /// finalize callback only pairs events carrying the mark, so the adapter
    /// must carry it between the two callbacks like the other fields.
    pub queued: bool,
}

impl ChatEvent {
    pub fn new(
        sender: Arc<Sender>,
        message: impl Into<String>,
        recipients: HashSet<PlayerId>,
    ) -> Self {
        Self {
            sender,
            message: message.into(),
            format: DEFAULT_HOST_FORMAT.to_owned(),
            recipients,
            cancelled: false,
            queued: false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

/// Answers permission checks.
pub trait PermissionOracle: Send + Sync + 'static {
    fn has_permission(&self, sender: &Sender, permission: &str) -> bool;
}

/// Somewhere a rendered message can be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Player(PlayerId),
    Console,
}

/// Delivers rendered text to players and the console.
pub trait AudienceSink: Send + Sync + 'static {
    /// Deliver `message` to `target`. `source` identifies the author, if any.
    ///
    /// Fire-and-forget: delivery failures are the sink's business.
    fn send_message(&self, target: Target, source: Option<PlayerId>, message: &Component);

    /// Players currently connected.
    fn online_players(&self) -> Vec<PlayerId>;

    /// Online players accepted by `predicate`, as targets.
    fn filter_audience(&self, predicate: &dyn Fn(PlayerId) -> bool) -> Vec<Target> {
        self.online_players()
            .into_iter()
            .filter(|id| predicate(*id))
            .map(Target::Player)
            .collect()
    }

    /// The console sink.
    fn console(&self) -> Target {
        Target::Console
    }
}

/// Looks up a sender's prefix and suffix, in legacy `&` notation.
pub trait PrefixProvider: Send + Sync + 'static {
    fn prefix(&self, sender: &Sender) -> Option<String>;
    fn suffix(&self, sender: &Sender) -> Option<String>;
}

/// A [`PrefixProvider`] for servers without a prefix plugin.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPrefixProvider;

impl PrefixProvider for NullPrefixProvider {
    fn prefix(&self, _sender: &Sender) -> Option<String> {
        None
    }

    fn suffix(&self, _sender: &Sender) -> Option<String> {
        None
    }
}

/// Flattens rich text into the host's legacy string encoding.
pub trait LegacyEncoder: Send + Sync + 'static {
    fn encode(&self, component: &Component) -> String;
}
