//! # chatty-std
//!
//! Standard implementations for the Chatty chat-message pipeline.
//!
//! This crate provides:
//! - **Stage processing**: [`StageProcessor`] and its builder
//! - **Selection**: [`ChatSelector`]
//! - **Correlation**: [`PendingMessages`]
//! - **Rendering**: [`ComponentRenderer`], [`LegacySerializer`]
//! - **Configuration**: [`config::ChattyConfig`]
//! - **Standard strategies**: caps moderation, symbol stripping, prefixes
//! - **Instrumentation**: logging and tracing wrappers

#![deny(clippy::wildcard_imports)]

// Re-export core traits
pub use chatty_core;

// Modules
pub mod config;
pub mod correlator;
pub mod instrument;
pub mod legacy;
pub mod processor;
pub mod render;
pub mod selector;
pub mod strategies;
pub mod testing;

pub use correlator::PendingMessages;
pub use legacy::LegacySerializer;
pub use processor::{EarlyProcessor, RichProcessor, StageProcessor, StageProcessorBuilder};
pub use render::ComponentRenderer;
pub use selector::ChatSelector;
