//! Stage processors.
//!
//! A [`StageProcessor`] owns the ordered strategies of one phase and folds a
//! context through them. Strategies are registered through a builder and the
//! frozen processor is shared by every pipeline run.

use chatty_core::{
    Context, DynStrategy, Flow, Phase, RawContext, RichContext, StageError, Strategy,
    TransformResult,
};
use futures::FutureExt;
use std::{any::Any, panic::AssertUnwindSafe};
use tracing::{debug, trace, warn};

/// Processor for the early phase.
pub type EarlyProcessor = StageProcessor<RawContext>;

/// Processor for the late or post phase.
pub type RichProcessor = StageProcessor<RichContext>;

/// An immutable, ordered set of strategies for one phase.
///
/// # Example
/// ```ignore
/// let early = StageProcessor::early()
///     .register(SymbolStrategy::new())
///     .register(caps)
///     .build();
///
/// let result = early.handle(context).await;
/// ```
pub struct StageProcessor<C: Context> {
    phase: Phase,
    strategies: Vec<Box<dyn DynStrategy<C>>>,
}

impl StageProcessor<RawContext> {
    /// Start building the early processor.
    pub fn early() -> StageProcessorBuilder<RawContext> {
        StageProcessorBuilder::new(Phase::Early)
    }
}

impl StageProcessor<RichContext> {
    /// Start building the late processor.
    pub fn late() -> StageProcessorBuilder<RichContext> {
        StageProcessorBuilder::new(Phase::Late)
    }

    /// Start building the post processor.
    pub fn post() -> StageProcessorBuilder<RichContext> {
        StageProcessorBuilder::new(Phase::Post)
    }
}

impl<C: Context> StageProcessor<C> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get the number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if the processor has no strategies.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Fold `context` through every strategy in registration order.
    ///
    /// Stops right after a strategy cancels the context or returns
    /// [`Flow::Stop`]. A strategy that panics is skipped: the context it
    /// received continues to the next strategy.
    pub async fn handle(&self, context: C) -> TransformResult<C> {
        let mut current = context;

        for (index, strategy) in self.strategies.iter().map(Box::as_ref).enumerate() {
            let fallback = current.clone();
            let run = async move { strategy.handle_dyn(current).await };

            let result = match AssertUnwindSafe(run).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => {
                    let error = StageError::Panicked(panic_message(payload.as_ref()));
                    warn!(phase = %self.phase, index, %error, "strategy failed, passing context through");
                    TransformResult::pass(fallback)
                }
            };

            if result.is_cancelled() {
                debug!(phase = %self.phase, index, "context cancelled");
                return result;
            }
            if result.flow() == Flow::Stop {
                trace!(phase = %self.phase, index, "phase short-circuited");
                return result;
            }
            current = result.into_context();
        }

        TransformResult::pass(current)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

/// Builder for a [`StageProcessor`].
pub struct StageProcessorBuilder<C: Context> {
    phase: Phase,
    strategies: Vec<Box<dyn DynStrategy<C>>>,
}

impl<C: Context> StageProcessorBuilder<C> {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            strategies: Vec::new(),
        }
    }

    /// Register a strategy, skipping it with a warning if its phase differs.
    pub fn register<S: Strategy<C>>(mut self, strategy: S) -> Self {
        self.register_mut(strategy);
        self
    }

    /// Register a strategy (mutable version).
    pub fn register_mut<S: Strategy<C>>(&mut self, strategy: S) {
        if let Err(error) = self.try_register_mut(strategy) {
            warn!(%error, "strategy not registered");
        }
    }

    /// Register a strategy, failing if its phase differs.
    pub fn try_register<S: Strategy<C>>(mut self, strategy: S) -> Result<Self, StageError> {
        self.try_register_mut(strategy)?;
        Ok(self)
    }

    fn try_register_mut<S: Strategy<C>>(&mut self, strategy: S) -> Result<(), StageError> {
        let found = strategy.phase();
        if found != self.phase {
            return Err(StageError::PhaseMismatch {
                expected: self.phase,
                found,
            });
        }
        self.strategies.push(Box::new(strategy));
        Ok(())
    }

    /// Get the number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if the builder has no strategies.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Build the immutable processor.
    pub fn build(self) -> StageProcessor<C> {
        StageProcessor {
            phase: self.phase,
            strategies: self.strategies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Behaviour, PanickingStrategy, RecordingStrategy, raw_context};

    #[tokio::test]
    async fn empty_processor_passes_through() {
        let processor = StageProcessor::early().build();
        let result = processor.handle(raw_context("Hello")).await;

        assert!(!result.is_cancelled());
        assert_eq!(result.flow(), Flow::Next);
        assert_eq!(result.context().message, "Hello");
    }

    #[tokio::test]
    async fn strategies_run_in_registration_order() {
        let log = RecordingStrategy::<RawContext>::shared_log();
        let processor = StageProcessor::early()
            .register(RecordingStrategy::new(Phase::Early, "a", log.clone()))
            .register(RecordingStrategy::new(Phase::Early, "b", log.clone()))
            .register(RecordingStrategy::new(Phase::Early, "c", log.clone()))
            .build();

        let _ = processor.handle(raw_context("x")).await;
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn cancellation_short_circuits() {
        let log = RecordingStrategy::<RawContext>::shared_log();
        let processor = StageProcessor::early()
            .register(RecordingStrategy::new(Phase::Early, "a", log.clone()))
            .register(
                RecordingStrategy::new(Phase::Early, "cancel", log.clone())
                    .with_behaviour(Behaviour::Cancel),
            )
            .register(RecordingStrategy::new(Phase::Early, "never", log.clone()))
            .build();

        let result = processor.handle(raw_context("x")).await;
        assert!(result.is_cancelled());
        assert_eq!(*log.lock().unwrap(), vec!["a", "cancel"]);
    }

    #[tokio::test]
    async fn stop_skips_rest_without_cancelling() {
        let log = RecordingStrategy::<RawContext>::shared_log();
        let processor = StageProcessor::early()
            .register(
                RecordingStrategy::new(Phase::Early, "stop", log.clone())
                    .with_behaviour(Behaviour::Stop),
            )
            .register(RecordingStrategy::new(Phase::Early, "never", log.clone()))
            .build();

        let result = processor.handle(raw_context("x")).await;
        assert!(!result.is_cancelled());
        assert_eq!(result.flow(), Flow::Stop);
        assert_eq!(*log.lock().unwrap(), vec!["stop"]);
    }

    #[tokio::test]
    async fn panicking_strategy_is_isolated() {
        let log = RecordingStrategy::<RawContext>::shared_log();
        let processor = StageProcessor::early()
            .register(PanickingStrategy::new(Phase::Early))
            .register(RecordingStrategy::new(Phase::Early, "after", log.clone()))
            .build();

        let result = processor.handle(raw_context("still here")).await;
        assert!(!result.is_cancelled());
        assert_eq!(result.context().message, "still here");
        assert_eq!(*log.lock().unwrap(), vec!["after"]);
    }

    #[test]
    fn phase_mismatch_is_rejected() {
        let log = RecordingStrategy::<RichContext>::shared_log();
        let error = StageProcessor::post()
            .try_register(RecordingStrategy::new(Phase::Late, "late", log))
            .err();

        assert_eq!(
            error,
            Some(StageError::PhaseMismatch {
                expected: Phase::Post,
                found: Phase::Late,
            })
        );
    }

    #[test]
    fn register_skips_mismatched_phase() {
        let log = RecordingStrategy::<RichContext>::shared_log();
        let builder = StageProcessor::late()
            .register(RecordingStrategy::new(Phase::Post, "post", log.clone()))
            .register(RecordingStrategy::new(Phase::Late, "late", log));

        assert_eq!(builder.len(), 1);
    }
}
