//! Chat selection.
//!
//! Picks the chat a raw message belongs to. Chats are tried in declaration
//! order, so symbol-triggered chats should be declared before a catch-all
//! chat with an empty symbol.

use chatty_core::{Chat, PermissionOracle, Sender};
use std::sync::Arc;

/// First-match selector over the configured chats.
#[derive(Debug, Clone, Default)]
pub struct ChatSelector {
    chats: Vec<Arc<Chat>>,
}

impl ChatSelector {
    pub fn new(chats: impl IntoIterator<Item = Arc<Chat>>) -> Self {
        Self {
            chats: chats.into_iter().collect(),
        }
    }

    /// The chats in priority order.
    pub fn chats(&self) -> &[Arc<Chat>] {
        &self.chats
    }

    /// Get the number of chats.
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    /// Check if no chat is configured.
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Return the first chat whose trigger matches `message` and which
    /// `predicate` accepts.
    pub fn select_chat<P>(&self, message: &str, predicate: P) -> Option<Arc<Chat>>
    where
        P: Fn(&Chat) -> bool,
    {
        self.chats
            .iter()
            .find(|candidate| {
                let chat: &Chat = candidate;
                chat.matches(message) && predicate(chat)
            })
            .cloned()
    }

    /// Predicate accepting chats that need no permission or whose permission
    /// `sender` holds.
    pub fn permission_predicate<'a>(
        permissions: &'a dyn PermissionOracle,
        sender: &'a Sender,
    ) -> impl Fn(&Chat) -> bool + 'a {
        move |chat| {
            !chat.is_permission_required() || permissions.has_permission(sender, &chat.permission())
        }
    }
}
