//! # Message Contexts
//!
//! A context is the per-event record threaded through every stage. The early
//! phase works on [`RawContext`] (plain strings, as the host delivered them);
//! the late and post phases work on [`RichContext`] (rendered [`Component`]s).
//! The switch between the two is an explicit conversion,
//! [`RichContext::from_raw`], so each phase's contract states exactly which
//! text representation it sees.
//!
//! Both types implement [`Context`], which is all a stage processor needs to
//! fold strategies over either of them.

use crate::{chat::Chat, text::Component};
use std::{collections::HashSet, fmt, sync::Arc};

/// Identity of a connected player.
///
/// Wide enough for a host to pack a UUID into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u128);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// The originator of a chat message.
///
/// Shared by `Arc`; the pipeline never copies the sender itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: PlayerId,
    pub name: String,
}

impl Sender {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Common view over raw and rich contexts.
///
/// Stage processors and [`TransformResultBuilder`](crate::TransformResultBuilder)
/// only go through this trait.
pub trait Context: Clone + fmt::Debug + Send + Sync + 'static {
    /// Text representation carried by this context.
    type Text: Clone + fmt::Debug + Send + Sync + 'static;

    /// The selected chat.
    fn chat(&self) -> &Arc<Chat>;

    /// The message originator.
    fn sender(&self) -> &Arc<Sender>;

    /// Whether the pipeline must stop at the next boundary.
    fn is_cancelled(&self) -> bool;

    /// Mark or unmark the context as cancelled.
    fn set_cancelled(&mut self, cancelled: bool);

    /// The format template.
    fn format(&self) -> &Self::Text;

    /// Replace the format template.
    fn set_format(&mut self, format: Self::Text);

    /// The message body.
    fn message(&self) -> &Self::Text;

    /// Replace the message body.
    fn set_message(&mut self, message: Self::Text);

    /// Addressees of the message.
    fn recipients(&self) -> &HashSet<PlayerId>;

    /// Mutable access to the addressees.
    fn recipients_mut(&mut self) -> &mut HashSet<PlayerId>;
}

/// Context of the early phase: text is still the raw string.
#[derive(Debug, Clone)]
pub struct RawContext {
    pub chat: Arc<Chat>,
    pub sender: Arc<Sender>,
    pub cancelled: bool,
    pub format: String,
    pub recipients: HashSet<PlayerId>,
    pub message: String,
}

impl RawContext {
    /// Build a fresh, not-cancelled context using the chat's format.
    pub fn new(
        chat: Arc<Chat>,
        sender: Arc<Sender>,
        message: impl Into<String>,
        recipients: HashSet<PlayerId>,
    ) -> Self {
        let format = chat.format().to_owned();
        Self {
            chat,
            sender,
            cancelled: false,
            format,
            recipients,
            message: message.into(),
        }
    }
}

/// Context of the late and post phases: text is rich.
#[derive(Debug, Clone)]
pub struct RichContext {
    pub chat: Arc<Chat>,
    pub sender: Arc<Sender>,
    pub cancelled: bool,
    pub format: Component,
    pub recipients: HashSet<PlayerId>,
    pub message: Component,
}

impl RichContext {
    /// Convert a raw context, supplying the already rendered format and
    /// message. Chat, sender, recipients and cancellation carry over.
    pub fn from_raw(raw: RawContext, format: Component, message: Component) -> Self {
        Self {
            chat: raw.chat,
            sender: raw.sender,
            cancelled: raw.cancelled,
            format,
            recipients: raw.recipients,
            message,
        }
    }
}

macro_rules! impl_context {
    ($ty:ty, $text:ty) => {
        impl Context for $ty {
            type Text = $text;

            fn chat(&self) -> &Arc<Chat> {
                &self.chat
            }

            fn sender(&self) -> &Arc<Sender> {
                &self.sender
            }

            fn is_cancelled(&self) -> bool {
                self.cancelled
            }

            fn set_cancelled(&mut self, cancelled: bool) {
                self.cancelled = cancelled;
            }

            fn format(&self) -> &Self::Text {
                &self.format
            }

            fn set_format(&mut self, format: Self::Text) {
                self.format = format;
            }

            fn message(&self) -> &Self::Text {
                &self.message
            }

            fn set_message(&mut self, message: Self::Text) {
                self.message = message;
            }

            fn recipients(&self) -> &HashSet<PlayerId> {
                &self.recipients
            }

            fn recipients_mut(&mut self) -> &mut HashSet<PlayerId> {
                &mut self.recipients
            }
        }
    };
}

impl_context!(RawContext, String);
impl_context!(RichContext, Component);

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawContext {
        let chat = Arc::new(Chat::new("default", "{player}: {message}"));
        let sender = Arc::new(Sender::new(PlayerId(1), "Steve"));
        RawContext::new(chat, sender, "hi", HashSet::from([PlayerId(1), PlayerId(2)]))
    }

    #[test]
    fn raw_context_takes_chat_format() {
        let context = raw();
        assert_eq!(context.format, "{player}: {message}");
        assert!(!context.is_cancelled());
    }

    #[test]
    fn conversion_keeps_identity_and_recipients() {
        let mut context = raw();
        context.recipients.remove(&PlayerId(2));
        let sender = Arc::clone(&context.sender);

        let rich = RichContext::from_raw(context, Component::text("f"), Component::text("m"));
        assert!(Arc::ptr_eq(&rich.sender, &sender));
        assert_eq!(rich.recipients, HashSet::from([PlayerId(1)]));
        assert_eq!(rich.message.plain_text(), "m");
    }
}
