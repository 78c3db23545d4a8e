//! # Transform Strategies
//!
//! A strategy is the unit of work inside a stage: it receives a context and
//! returns a [`TransformResult`]. Every strategy is tagged with the [`Phase`]
//! it belongs to, and a stage processor refuses strategies of another phase.
//!
//! # Phases
//!
//! - [`Phase::Early`]: before the host broadcasts, on raw strings. May run
//!   concurrently for different events.
//! - [`Phase::Late`]: after every other listener has seen the event, on rich
//!   text. Serial.
//! - [`Phase::Post`]: final touches right before rendering. Serial, and
//!   skipped when another listener cancelled the event.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`Strategy`] uses native `async fn` for zero-cost static dispatch.
//! Processors store strategies as [`DynStrategy`] trait objects.

use crate::{context::Context, result::TransformResult};
use std::{fmt, future::Future, pin::Pin};

/// The pipeline phase a strategy runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Moderation and filtering on the raw message.
    Early,
    /// Raw-to-rich transforms once the host has settled the event.
    Late,
    /// Final rich-text transforms before dispatch.
    Post,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Early => "early",
            Phase::Late => "late",
            Phase::Post => "post",
        })
    }
}

/// A single pipeline stage.
///
/// A strategy may inspect the message, rewrite message or format, shrink
/// the recipient set, mark the context cancelled, and notify the sender.
/// Side effects are not rolled back when a later strategy short-circuits.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Strategy` for `{C}`",
    label = "missing `Strategy` implementation",
    note = "Strategies must implement `phase` and `handle` for the context type `{C}`."
)]
pub trait Strategy<C: Context>: Send + Sync + 'static {
    /// The phase this strategy belongs to.
    fn phase(&self) -> Phase;

    /// Transform the context.
    fn handle(&self, context: C) -> impl Future<Output = TransformResult<C>> + Send;
}

/// Object-safe version of [`Strategy`].
pub trait DynStrategy<C: Context>: Send + Sync + 'static {
    /// The phase this strategy belongs to (dynamic dispatch version).
    fn phase_dyn(&self) -> Phase;

    /// Transform the context (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        context: C,
    ) -> Pin<Box<dyn Future<Output = TransformResult<C>> + Send + 'a>>;
}

// Blanket implementation: any Strategy is a DynStrategy.
impl<C: Context, S: Strategy<C>> DynStrategy<C> for S {
    fn phase_dyn(&self) -> Phase {
        self.phase()
    }

    fn handle_dyn<'a>(
        &'a self,
        context: C,
    ) -> Pin<Box<dyn Future<Output = TransformResult<C>> + Send + 'a>> {
        Box::pin(self.handle(context))
    }
}

// Allow boxed strategies wherever a Strategy is expected. Calls go through
// the trait object; `self.handle_dyn` would resolve to the blanket impl on
// the box itself and recurse.
impl<C: Context> Strategy<C> for Box<dyn DynStrategy<C>> {
    fn phase(&self) -> Phase {
        (**self).phase_dyn()
    }

    async fn handle(&self, context: C) -> TransformResult<C> {
        (**self).handle_dyn(context).await
    }
}
