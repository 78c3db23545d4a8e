//! # chatty-core
//!
//! Core types and traits for the Chatty chat-message pipeline.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! strategy authors and host adapters that don't need the full `chatty-std`
//! implementation.
//!
//! # Pipeline Model
//!
//! A host delivers one logical chat message through two callbacks. Chatty
//! splits the work into three phases:
//!
//! ## Early ([`Phase::Early`])
//!
//! Runs on [`RawContext`] while the host is still deciding who receives the
//! message. Moderation and filtering live here. Several events may be in
//! this phase at once.
//!
//! ## Late ([`Phase::Late`])
//!
//! Runs on [`RichContext`] after every other listener has observed the
//! event. Formatting that needs rich text (prefixes, colors) lives here.
//!
//! ## Post ([`Phase::Post`])
//!
//! Final rich-text transforms, skipped if the event was cancelled elsewhere.
//!
//! Each phase folds [`Strategy`] values in order; every strategy returns a
//! [`TransformResult`] that either continues, stops the phase ([`Flow::Stop`]),
//! or cancels the context outright.
//!
//! # Error Types
//!
//! - [`ChattyError`] - Top-level error type
//! - [`StageError`] - Stage assembly and execution errors

#![deny(clippy::wildcard_imports)]

mod chat;
mod context;
mod error;
mod host;
mod result;
mod strategy;
mod text;

// Re-exports
pub use chat::{
    Chat, MESSAGE_PLACEHOLDER, PLAYER_PLACEHOLDER, PREFIX_PLACEHOLDER, SUFFIX_PLACEHOLDER,
};
pub use context::{Context, PlayerId, RawContext, RichContext, Sender};
pub use error::{BoxError, ChattyError, StageError};
pub use host::{
    AudienceSink, ChatEvent, DEFAULT_HOST_FORMAT, LegacyEncoder, NullPrefixProvider,
    PermissionOracle, PrefixProvider, Target,
};
pub use result::{Flow, TransformResult, TransformResultBuilder};
pub use strategy::{DynStrategy, Phase, Strategy};
pub use text::{Component, NamedColor, Span, Style};
