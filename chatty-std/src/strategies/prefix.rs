//! Prefix and suffix substitution.

use crate::legacy::LegacySerializer;
use chatty_core::{
    Component, PREFIX_PLACEHOLDER, Phase, PrefixProvider, RichContext, SUFFIX_PLACEHOLDER,
    Strategy, TransformResult,
};
use std::sync::Arc;

/// Fills `{prefix}` and `{suffix}` in the format from a [`PrefixProvider`].
///
/// Missing values render as nothing, so the placeholders never leak into
/// the final message.
pub struct PrefixStrategy {
    provider: Arc<dyn PrefixProvider>,
    serializer: LegacySerializer,
}

impl PrefixStrategy {
    /// Provider values are parsed as `&`-coded text.
    pub fn new(provider: Arc<dyn PrefixProvider>) -> Self {
        Self {
            provider,
            serializer: LegacySerializer::ampersand(),
        }
    }

    pub fn with_serializer(mut self, serializer: LegacySerializer) -> Self {
        self.serializer = serializer;
        self
    }

    fn lookup(&self, value: Option<String>) -> Component {
        value
            .map(|raw| self.serializer.deserialize(&raw))
            .unwrap_or_default()
    }
}

impl Strategy<RichContext> for PrefixStrategy {
    fn phase(&self) -> Phase {
        Phase::Late
    }

    async fn handle(&self, context: RichContext) -> TransformResult<RichContext> {
        let prefix = self.lookup(self.provider.prefix(&context.sender));
        let suffix = self.lookup(self.provider.suffix(&context.sender));
        let format = context
            .format
            .substitute_first(&[(PREFIX_PLACEHOLDER, &prefix), (SUFFIX_PLACEHOLDER, &suffix)]);

        TransformResult::builder(context).with_format(format).build()
    }
}
