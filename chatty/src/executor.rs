//! # Event Executor
//!
//! Wires the two host callbacks to the pipeline.
//!
//! ```text
//! on_chat (early, concurrent)          on_finalize (monitor, serial)
//! ───────────────────────────          ─────────────────────────────
//! select chat ──none──► notify+cancel  not queued ──────────► NoPending
//!                                      pop pending ──none──► NoPending
//! build RawContext                     sync recipients/message from event
//! early processor ──cancel──► cancel   RawContext ──► RichContext
//! write recipients/message to event    late processor
//! push pending, mark event queued ────►  cancelled (here or elsewhere)? stop
//!                                      post processor
//!                                      dispatch (legacy string | direct)
//! ```
//!
//! The finalize callback must be registered at the host's lowest (monitor)
//! priority so it observes the event after every other listener.

use chatty_core::{
    AudienceSink, Chat, ChatEvent, ChattyError, Component, LegacyEncoder, MESSAGE_PLACEHOLDER,
    PLAYER_PLACEHOLDER, PermissionOracle, PrefixProvider, RawContext, RichContext, Target,
};
use chatty_std::{
    ChatSelector, ComponentRenderer, EarlyProcessor, LegacySerializer, PendingMessages,
    RichProcessor, StageProcessor,
    config::{ChattyConfig, Correlation, Messages, Settings},
    strategies::{CapsModerationStrategy, PrefixStrategy, SymbolStrategy},
};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Host format marker for the player name.
pub const LEGACY_PLAYER_MARKER: &str = "%1$s";

/// Host format marker for the message body.
pub const LEGACY_MESSAGE_MARKER: &str = "%2$s";

/// What the early callback did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarlyOutcome {
    /// The event was already cancelled by someone else.
    Skipped,
    /// No chat accepted the message; the event was cancelled.
    ChatNotFound,
    /// An early strategy cancelled the message; the event was cancelled.
    Cancelled,
    /// The context waits for the finalize callback.
    Pending,
}

/// How a finished message left the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Written back onto the event as a legacy format string.
    Legacy,
    /// Delivered as rich text; the host event was cancelled.
    Direct,
}

/// What the finalize callback did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// Nothing was pending for this event.
    NoPending,
    /// Cancelled by a late strategy or another listener.
    Cancelled,
    /// The message was dispatched.
    Dispatched(DispatchMode),
}

/// Top-level orchestrator for one plugin instance.
///
/// `Send + Sync`; share it behind an `Arc` between the host's worker threads
/// and its main thread.
pub struct EventExecutor {
    selector: ChatSelector,
    permissions: Arc<dyn PermissionOracle>,
    audience: Arc<dyn AudienceSink>,
    encoder: Arc<dyn LegacyEncoder>,
    format_parser: LegacySerializer,
    renderer: ComponentRenderer,
    settings: Settings,
    chat_not_found: Component,
    early: EarlyProcessor,
    late: RichProcessor,
    post: RichProcessor,
    pending: PendingMessages<RawContext>,
}

impl EventExecutor {
    /// Start building an executor around the host collaborators.
    pub fn builder(
        audience: Arc<dyn AudienceSink>,
        permissions: Arc<dyn PermissionOracle>,
    ) -> EventExecutorBuilder {
        EventExecutorBuilder::new(audience, permissions)
    }

    /// Build an executor with the standard strategies:
    ///
    /// - early: symbol stripping, then caps moderation (if enabled)
    /// - late: prefix/suffix substitution
    /// - post: none
    pub fn from_config(
        config: &ChattyConfig,
        audience: Arc<dyn AudienceSink>,
        permissions: Arc<dyn PermissionOracle>,
        prefixes: Arc<dyn PrefixProvider>,
    ) -> Result<Self, ChattyError> {
        config.validate()?;
        let parser = LegacySerializer::ampersand();

        let mut early = StageProcessor::early().register(SymbolStrategy::new());
        if config.moderation.caps.enabled {
            early.register_mut(CapsModerationStrategy::from_config(
                &config.moderation.caps,
                Arc::clone(&audience),
                parser.deserialize(&config.messages.caps_found),
            ));
        }
        let late = StageProcessor::late().register(PrefixStrategy::new(prefixes));

        Self::builder(audience, permissions)
            .chats(config.chats())
            .settings(config.settings.clone())
            .messages(&config.messages)
            .early(early.build())
            .late(late.build())
            .build()
    }

    /// Contexts waiting for their finalize callback.
    pub fn pending(&self) -> &PendingMessages<RawContext> {
        &self.pending
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Early callback: select, moderate and queue.
    pub async fn on_chat(&self, event: &mut ChatEvent) -> EarlyOutcome {
        if event.is_cancelled() {
            trace!(sender = %event.sender.name, "event already cancelled, skipping");
            return EarlyOutcome::Skipped;
        }

        let predicate =
            ChatSelector::permission_predicate(self.permissions.as_ref(), event.sender.as_ref());
        let Some(chat) = self.selector.select_chat(&event.message, predicate) else {
            debug!(sender = %event.sender.name, "no chat accepts message");
            self.audience.send_message(
                Target::Player(event.sender.id),
                None,
                &self.chat_not_found,
            );
            event.set_cancelled(true);
            return EarlyOutcome::ChatNotFound;
        };

        let context = RawContext::new(
            chat,
            Arc::clone(&event.sender),
            event.message.clone(),
            event.recipients.clone(),
        );
        let context = self.early.handle(context).await.into_context();

        if context.cancelled {
            debug!(sender = %event.sender.name, chat = context.chat.name(), "early phase cancelled message");
            event.set_cancelled(true);
            return EarlyOutcome::Cancelled;
        }

        event.recipients.clone_from(&context.recipients);
        event.message.clone_from(&context.message);
        trace!(sender = %event.sender.name, chat = context.chat.name(), "context pending");
        self.pending.push(context);
        event.queued = true;
        EarlyOutcome::Pending
    }

    /// Finalize callback: pair, transform and dispatch.
    pub async fn on_finalize(&self, event: &mut ChatEvent) -> FinalizeOutcome {
        let evicted = self.pending.evict_expired(self.settings.pending_ttl());
        if evicted > 0 {
            warn!(evicted, "dropped contexts whose finalize callback never arrived");
        }

        // Only events the early callback queued are paired.
        if !std::mem::take(&mut event.queued) {
            trace!(sender = %event.sender.name, "event was not queued");
            return FinalizeOutcome::NoPending;
        }

        let sender = event.sender.id;
        let popped = match self.settings.correlation {
            Correlation::Fifo => self.pending.pop_if(|context| context.sender.id == sender),
            Correlation::PerSender => self.pending.pop_for(sender),
        };
        let Some(mut context) = popped else {
            warn!(sender = %event.sender.name, "no pending context pairs with event");
            return FinalizeOutcome::NoPending;
        };

        context.recipients.clone_from(&event.recipients);
        context.message.clone_from(&event.message);

        let rich = self.enrich(context);
        let late = self.late.handle(rich).await.into_context();
        if late.cancelled || event.is_cancelled() {
            debug!(
                sender = %event.sender.name,
                late_cancelled = late.cancelled,
                event_cancelled = event.is_cancelled(),
                "message not dispatched"
            );
            return FinalizeOutcome::Cancelled;
        }

        let post = self.post.handle(late).await.into_context();
        FinalizeOutcome::Dispatched(self.dispatch(event, &post))
    }

    /// [`on_chat`](Self::on_chat) for hosts calling from plain threads.
    pub fn on_chat_blocking(&self, event: &mut ChatEvent) -> EarlyOutcome {
        futures::executor::block_on(self.on_chat(event))
    }

    /// [`on_finalize`](Self::on_finalize) for hosts calling from plain threads.
    pub fn on_finalize_blocking(&self, event: &mut ChatEvent) -> FinalizeOutcome {
        futures::executor::block_on(self.on_finalize(event))
    }

    // Format comes from configuration (`&` codes); the message is player
    // input and stays plain text.
    fn enrich(&self, context: RawContext) -> RichContext {
        let format = self.format_parser.deserialize(&context.format);
        let message = Component::text(context.message.as_str());
        RichContext::from_raw(context, format, message)
    }

    fn dispatch(&self, event: &mut ChatEvent, context: &RichContext) -> DispatchMode {
        if self.settings.force_string_format {
            event.format = self
                .encoder
                .encode(&context.format)
                .replace('%', "%%")
                .replacen(PLAYER_PLACEHOLDER, LEGACY_PLAYER_MARKER, 1)
                .replacen(MESSAGE_PLACEHOLDER, LEGACY_MESSAGE_MARKER, 1);
            event.message = self.encoder.encode(&context.message);
            debug!(sender = %event.sender.name, "dispatching through host format");
            return DispatchMode::Legacy;
        }

        let message = self.renderer.construct(context);
        let targets = self
            .audience
            .filter_audience(&|player| context.recipients.contains(&player));
        debug!(
            sender = %event.sender.name,
            recipients = targets.len(),
            "dispatching rendered message"
        );
        for target in targets.into_iter().chain([self.audience.console()]) {
            self.audience
                .send_message(target, Some(event.sender.id), &message);
        }
        event.set_cancelled(true);
        DispatchMode::Direct
    }
}

/// Builder for [`EventExecutor`].
///
/// Processors default to empty; the selector must end up with at least one chat.
pub struct EventExecutorBuilder {
    audience: Arc<dyn AudienceSink>,
    permissions: Arc<dyn PermissionOracle>,
    encoder: Arc<dyn LegacyEncoder>,
    chats: Vec<Arc<Chat>>,
    settings: Settings,
    chat_not_found: Component,
    early: Option<EarlyProcessor>,
    late: Option<RichProcessor>,
    post: Option<RichProcessor>,
}

impl EventExecutorBuilder {
    fn new(audience: Arc<dyn AudienceSink>, permissions: Arc<dyn PermissionOracle>) -> Self {
        Self {
            audience,
            permissions,
            encoder: Arc::new(LegacySerializer::section()),
            chats: Vec::new(),
            settings: Settings::default(),
            chat_not_found: LegacySerializer::ampersand()
                .deserialize(&Messages::default().chat_not_found),
            early: None,
            late: None,
            post: None,
        }
    }

    /// Chats in priority order.
    pub fn chats(mut self, chats: impl IntoIterator<Item = Arc<Chat>>) -> Self {
        self.chats.extend(chats);
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Notices sent by the executor itself, parsed from `&` codes.
    pub fn messages(mut self, messages: &Messages) -> Self {
        self.chat_not_found = LegacySerializer::ampersand().deserialize(&messages.chat_not_found);
        self
    }

    /// Encoder for legacy dispatch. Defaults to `§` codes.
    pub fn encoder(mut self, encoder: Arc<dyn LegacyEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn early(mut self, processor: EarlyProcessor) -> Self {
        self.early = Some(processor);
        self
    }

    pub fn late(mut self, processor: RichProcessor) -> Self {
        self.late = Some(processor);
        self
    }

    pub fn post(mut self, processor: RichProcessor) -> Self {
        self.post = Some(processor);
        self
    }

    pub fn build(self) -> Result<EventExecutor, ChattyError> {
        if self.chats.is_empty() {
            return Err(ChattyError::NoChats);
        }
        self.settings.validate()?;
        let pending = match self.settings.pending_capacity {
            Some(capacity) => PendingMessages::with_capacity(capacity),
            None => PendingMessages::new(),
        };

        Ok(EventExecutor {
            selector: ChatSelector::new(self.chats),
            permissions: self.permissions,
            audience: self.audience,
            encoder: self.encoder,
            format_parser: LegacySerializer::ampersand(),
            renderer: ComponentRenderer::new(),
            settings: self.settings,
            chat_not_found: self.chat_not_found,
            early: self.early.unwrap_or_else(|| StageProcessor::early().build()),
            late: self.late.unwrap_or_else(|| StageProcessor::late().build()),
            post: self.post.unwrap_or_else(|| StageProcessor::post().build()),
            pending,
        })
    }
}
