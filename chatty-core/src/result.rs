//! Strategy outcomes.

use crate::context::{Context, PlayerId};
use std::collections::HashSet;

/// Whether the rest of the current phase should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Carry the context into the next strategy.
    #[default]
    Next,
    /// Skip the remaining strategies of this phase without cancelling.
    Stop,
}

/// Outcome of a strategy: the (possibly rewritten) context and a flow signal.
///
/// Cancellation lives on the context itself, so a cancelled result always
/// short-circuits regardless of [`Flow`].
#[derive(Debug, Clone)]
#[must_use]
pub struct TransformResult<C> {
    context: C,
    flow: Flow,
}

impl<C: Context> TransformResult<C> {
    /// Pass the context through unchanged.
    pub fn pass(context: C) -> Self {
        Self {
            context,
            flow: Flow::Next,
        }
    }

    /// Start from `context`; defaults to "continue, same message".
    pub fn builder(context: C) -> TransformResultBuilder<C> {
        TransformResultBuilder {
            context,
            flow: Flow::Next,
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn is_cancelled(&self) -> bool {
        self.context.is_cancelled()
    }
}

/// Builder for [`TransformResult`].
#[must_use]
pub struct TransformResultBuilder<C> {
    context: C,
    flow: Flow,
}

impl<C: Context> TransformResultBuilder<C> {
    pub fn with_message(mut self, message: C::Text) -> Self {
        self.context.set_message(message);
        self
    }

    pub fn with_format(mut self, format: C::Text) -> Self {
        self.context.set_format(format);
        self
    }

    pub fn with_recipients(mut self, recipients: HashSet<PlayerId>) -> Self {
        *self.context.recipients_mut() = recipients;
        self
    }

    /// Keep only the recipients accepted by `keep`.
    pub fn retain_recipients<F>(mut self, keep: F) -> Self
    where
        F: FnMut(&PlayerId) -> bool,
    {
        self.context.recipients_mut().retain(keep);
        self
    }

    pub fn with_cancelled(mut self) -> Self {
        self.context.set_cancelled(true);
        self
    }

    /// Short-circuit the rest of the phase.
    pub fn stop(mut self) -> Self {
        self.flow = Flow::Stop;
        self
    }

    pub fn build(self) -> TransformResult<C> {
        TransformResult {
            context: self.context,
            flow: self.flow,
        }
    }
}
