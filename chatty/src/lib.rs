//! # chatty - Multi-Phase Chat-Message Pipeline
//!
//! `chatty` processes player chat messages for a game server in three phases:
//!
//! - **early**: concurrent, plain-text moderation and chat selection
//! - **late**: serial, rich-text enrichment after every other listener ran
//! - **post**: serial, final adjustments right before delivery
//!
//! The [`EventExecutor`] wires the host's two chat callbacks to the phases.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chatty::prelude::*;
//!
//! let config = ChattyConfig::load(Path::new("chatty.toml"))?;
//! let executor = Arc::new(EventExecutor::from_config(
//!     &config,
//!     audience,
//!     permissions,
//!     Arc::new(NullPrefixProvider),
//! )?);
//!
//! // Early-priority chat listener, any thread:
//! executor.on_chat_blocking(&mut event);
//!
//! // Monitor-priority chat listener, main thread:
//! executor.on_finalize_blocking(&mut event);
//! ```

#![deny(clippy::wildcard_imports)]

pub mod executor;

pub use chatty_core::{
    // Host surface
    AudienceSink,
    // Errors
    BoxError,
    // Chats
    Chat,
    ChatEvent,
    ChattyError,
    // Text model
    Component,
    // Contexts
    Context,
    DynStrategy,
    // Results
    Flow,
    LegacyEncoder,
    NamedColor,
    NullPrefixProvider,
    PermissionOracle,
    // Strategies
    Phase,
    PlayerId,
    PrefixProvider,
    RawContext,
    RichContext,
    Sender,
    Span,
    StageError,
    Strategy,
    Style,
    Target,
    TransformResult,
    TransformResultBuilder,
};

pub use chatty_std::{
    ChatSelector, ComponentRenderer, EarlyProcessor, LegacySerializer, PendingMessages,
    RichProcessor, StageProcessor, StageProcessorBuilder,
};

pub use executor::{
    DispatchMode, EarlyOutcome, EventExecutor, EventExecutorBuilder, FinalizeOutcome,
};

/// Configuration schema and loading.
pub mod config {
    pub use chatty_std::config::{
        CapsConfig, ChatConfig, ChattyConfig, ConfigError, Correlation, Messages,
        ModerationConfig, Settings,
    };
}

/// Standard strategies.
pub mod strategies {
    #![allow(clippy::wildcard_imports)]
    pub use chatty_std::strategies::*;
}

/// Logging and tracing wrappers.
pub mod instrument {
    pub use chatty_std::instrument::{LoggingStrategy, TracingStrategy};
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use chatty_std::testing::*;
}

/// Prelude module - common imports for Chatty.
///
/// # Usage
///
/// ```rust,ignore
/// use chatty::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AudienceSink, Chat, ChatEvent, ChattyError, Component, Context, EarlyOutcome,
        EventExecutor, FinalizeOutcome, Flow, NullPrefixProvider, PermissionOracle, Phase,
        PlayerId, PrefixProvider, RawContext, RichContext, Sender, StageProcessor, Strategy,
        Target, TransformResult,
        config::ChattyConfig,
    };
}
