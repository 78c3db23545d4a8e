use chatty_core::{Context, Phase, Strategy, TransformResult};
use tracing::Instrument;

/// A strategy wrapper that runs the inner strategy inside a `tracing` span.
///
/// The span records the wrapper's name, the phase, the chat and the sender,
/// so everything the inner strategy logs is attributed to one chat event.
pub struct TracingStrategy<S> {
    inner: S,
    name: &'static str,
}

impl<S> TracingStrategy<S> {
    /// Create a new `TracingStrategy` wrapper around a strategy.
    pub const fn new(inner: S, name: &'static str) -> Self {
        Self { inner, name }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: Clone> Clone for TracingStrategy<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            name: self.name,
        }
    }
}

impl<C, S> Strategy<C> for TracingStrategy<S>
where
    C: Context,
    S: Strategy<C>,
{
    fn phase(&self) -> Phase {
        self.inner.phase()
    }

    async fn handle(&self, context: C) -> TransformResult<C> {
        let span = tracing::info_span!(
            "chat_strategy",
            strategy = %self.name,
            phase = %self.inner.phase(),
            chat = %context.chat().name(),
            sender = %context.sender().name,
        );

        self.inner.handle(context).instrument(span).await
    }
}
