//! Testing utilities for Chatty.
//!
//! This module provides doubles for the host collaborators and strategies
//! with scripted behaviour.
//!
//! # Features
//!
//! - [`RecordingAudience`]: An audience sink that records every delivery
//! - [`StaticPermissions`]: A permission oracle backed by a grant list
//! - [`RecordingStrategy`]: A strategy that logs its label and can cancel or stop
//! - [`PanickingStrategy`]: A strategy that always panics
//! - [`raw_context`], [`rich_context`]: Context fixtures

use chatty_core::{
    AudienceSink, Chat, Component, Context, Phase, PermissionOracle, PlayerId, RawContext,
    RichContext, Sender, Strategy, Target, TransformResult,
};
use std::{
    collections::HashSet,
    marker::PhantomData,
    sync::{Arc, Mutex},
};

// ============================================================================
// Recording Audience
// ============================================================================

/// One recorded delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub target: Target,
    pub source: Option<PlayerId>,
    pub message: Component,
}

/// An audience sink that records every message it is asked to deliver.
///
/// Clones share the same record.
///
/// # Example
///
/// ```rust,ignore
/// let audience = RecordingAudience::with_online([PlayerId(1), PlayerId(2)]);
/// let executor = EventExecutor::builder(Arc::new(audience.clone()), permissions).build()?;
///
/// // ... run events ...
///
/// assert_eq!(audience.texts_for(Target::Console), vec!["Steve: hi"]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingAudience {
    online: Arc<Mutex<Vec<PlayerId>>>,
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl RecordingAudience {
    /// Create an audience with nobody online.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an audience with the given players online.
    pub fn with_online(players: impl IntoIterator<Item = PlayerId>) -> Self {
        let audience = Self::new();
        audience.online.lock().unwrap().extend(players);
        audience
    }

    /// Get a clone of every recorded delivery.
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Plain text of every message delivered to `target`.
    pub fn texts_for(&self, target: Target) -> Vec<String> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .filter(|delivery| delivery.target == target)
            .map(|delivery| delivery.message.plain_text())
            .collect()
    }

    /// Get the number of recorded deliveries.
    pub fn count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }

    /// Clear all recorded deliveries.
    pub fn clear(&self) {
        self.deliveries.lock().unwrap().clear();
    }
}

impl AudienceSink for RecordingAudience {
    fn send_message(&self, target: Target, source: Option<PlayerId>, message: &Component) {
        self.deliveries.lock().unwrap().push(Delivery {
            target,
            source,
            message: message.clone(),
        });
    }

    fn online_players(&self) -> Vec<PlayerId> {
        self.online.lock().unwrap().clone()
    }
}

// ============================================================================
// Static Permissions
// ============================================================================

/// A permission oracle answering from an explicit grant list.
#[derive(Clone, Default)]
pub struct StaticPermissions {
    grants: Arc<Mutex<HashSet<(PlayerId, String)>>>,
}

impl StaticPermissions {
    /// Create an oracle that denies everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `permission` to `player`.
    pub fn grant(&self, player: PlayerId, permission: impl Into<String>) {
        self.grants
            .lock()
            .unwrap()
            .insert((player, permission.into()));
    }
}

impl PermissionOracle for StaticPermissions {
    fn has_permission(&self, sender: &Sender, permission: &str) -> bool {
        self.grants
            .lock()
            .unwrap()
            .contains(&(sender.id, permission.to_owned()))
    }
}

// ============================================================================
// Recording Strategy
// ============================================================================

/// Shared log of strategy labels, in call order.
pub type StrategyLog = Arc<Mutex<Vec<&'static str>>>;

/// What a [`RecordingStrategy`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behaviour {
    /// Pass the context through.
    #[default]
    Pass,
    /// Cancel the context.
    Cancel,
    /// Stop the phase without cancelling.
    Stop,
}

/// A strategy that appends its label to a shared log.
///
/// # Example
///
/// ```rust,ignore
/// let log = RecordingStrategy::<RawContext>::shared_log();
/// let early = StageProcessor::early()
///     .register(RecordingStrategy::new(Phase::Early, "first", log.clone()))
///     .build();
///
/// early.handle(context).await;
/// assert_eq!(*log.lock().unwrap(), vec!["first"]);
/// ```
pub struct RecordingStrategy<C> {
    phase: Phase,
    label: &'static str,
    log: StrategyLog,
    behaviour: Behaviour,
    _context: PhantomData<fn(C) -> C>,
}

impl<C> RecordingStrategy<C> {
    /// Create a recording strategy that passes contexts through.
    pub fn new(phase: Phase, label: &'static str, log: StrategyLog) -> Self {
        Self {
            phase,
            label,
            log,
            behaviour: Behaviour::Pass,
            _context: PhantomData,
        }
    }

    /// Create an empty log to share between strategies.
    pub fn shared_log() -> StrategyLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    /// Set what the strategy returns.
    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }
}

impl<C: Context> Strategy<C> for RecordingStrategy<C> {
    fn phase(&self) -> Phase {
        self.phase
    }

    async fn handle(&self, context: C) -> TransformResult<C> {
        self.log.lock().unwrap().push(self.label);
        match self.behaviour {
            Behaviour::Pass => TransformResult::pass(context),
            Behaviour::Cancel => TransformResult::builder(context).with_cancelled().build(),
            Behaviour::Stop => TransformResult::builder(context).stop().build(),
        }
    }
}

// ============================================================================
// Panicking Strategy
// ============================================================================

/// A strategy that panics on every call.
pub struct PanickingStrategy {
    phase: Phase,
}

impl PanickingStrategy {
    pub fn new(phase: Phase) -> Self {
        Self { phase }
    }
}

impl<C: Context> Strategy<C> for PanickingStrategy {
    fn phase(&self) -> Phase {
        self.phase
    }

    async fn handle(&self, _context: C) -> TransformResult<C> {
        panic!("strategy fault")
    }
}

// ============================================================================
// Context Fixtures
// ============================================================================

/// A raw context from player 1 ("Steve") in a catch-all chat, addressed to
/// players 1 and 2.
pub fn raw_context(message: impl Into<String>) -> RawContext {
    raw_context_from(PlayerId(1), "Steve", message)
}

/// A raw context from the given sender in a catch-all chat.
pub fn raw_context_from(id: PlayerId, name: &str, message: impl Into<String>) -> RawContext {
    RawContext::new(
        Arc::new(Chat::new("default", "{player}: {message}")),
        Arc::new(Sender::new(id, name)),
        message,
        HashSet::from([PlayerId(1), PlayerId(2)]),
    )
}

/// A raw context from player 1 ("Steve") in `chat`.
pub fn raw_context_in(chat: Chat, message: impl Into<String>) -> RawContext {
    RawContext::new(
        Arc::new(chat),
        Arc::new(Sender::new(PlayerId(1), "Steve")),
        message,
        HashSet::from([PlayerId(1), PlayerId(2)]),
    )
}

/// A rich context with an unstyled format and message.
pub fn rich_context(sender: &str, format: &str, message: &str) -> RichContext {
    let raw = raw_context_from(PlayerId(1), sender, message);
    RichContext::from_raw(raw, Component::text(format), Component::text(message))
}
