//! Logging strategy for context observation.

use chatty_core::{Context, Phase, Strategy, TransformResult};

/// A strategy that logs the context and passes it through.
///
/// # Example
///
/// ```rust,ignore
/// let early = StageProcessor::early()
///     .register(LoggingStrategy::named(Phase::Early, "before-moderation"))
///     .register(caps)
///     .build();
/// ```
pub struct LoggingStrategy {
    phase: Phase,
    name: &'static str,
}

impl LoggingStrategy {
    /// Create a new `LoggingStrategy` for `phase` with a default name.
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            name: "context",
        }
    }

    /// Create a new `LoggingStrategy` with a custom name.
    ///
    /// The name is used in log messages to identify the position in the stage.
    pub fn named(phase: Phase, name: &'static str) -> Self {
        Self { phase, name }
    }
}

impl<C: Context> Strategy<C> for LoggingStrategy {
    fn phase(&self) -> Phase {
        self.phase
    }

    async fn handle(&self, context: C) -> TransformResult<C> {
        tracing::debug!(
            name = %self.name,
            phase = %self.phase,
            chat = context.chat().name(),
            sender = %context.sender().name,
            message = ?context.message(),
            recipients = context.recipients().len(),
            "Processing context"
        );
        TransformResult::pass(context)
    }
}
