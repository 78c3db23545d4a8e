//! Caps moderation.

use crate::config::CapsConfig;
use chatty_core::{
    AudienceSink, Component, Phase, RawContext, Strategy, Target, TransformResult,
};
use std::sync::Arc;
use tracing::debug;

/// Lower-cases (and optionally blocks) messages with too many capitals.
pub struct CapsModerationStrategy {
    percent: u32,
    length: usize,
    block: bool,
    audience: Arc<dyn AudienceSink>,
    notice: Component,
}

impl CapsModerationStrategy {
    /// `percent` is clamped to `0..=100`. Messages shorter than `length`
    /// characters are never checked.
    pub fn new(
        percent: u32,
        length: usize,
        block: bool,
        audience: Arc<dyn AudienceSink>,
        notice: Component,
    ) -> Self {
        Self {
            percent: percent.min(100),
            length,
            block,
            audience,
            notice,
        }
    }

    pub fn from_config(
        config: &CapsConfig,
        audience: Arc<dyn AudienceSink>,
        notice: Component,
    ) -> Self {
        Self::new(
            u32::from(config.percent),
            config.length,
            config.block,
            audience,
            notice,
        )
    }
}

impl Strategy<RawContext> for CapsModerationStrategy {
    fn phase(&self) -> Phase {
        Phase::Early
    }

    async fn handle(&self, context: RawContext) -> TransformResult<RawContext> {
        if context.message.chars().count() < self.length
            || uppercase_percent(&context.message) < self.percent
        {
            return TransformResult::pass(context);
        }

        debug!(sender = %context.sender.name, block = self.block, "caps found");
        self.audience
            .send_message(Target::Player(context.sender.id), None, &self.notice);

        let lowered = context.message.to_lowercase();
        let builder = TransformResult::builder(context).with_message(lowered);
        if self.block {
            builder.with_cancelled().build()
        } else {
            builder.build()
        }
    }
}

/// Share of uppercase letters among all letters, truncated to an integer.
///
/// A letter counts as uppercase when it has a distinct lowercase form.
/// Text without letters has no caps to flag and yields 0.
pub fn uppercase_percent(message: &str) -> u32 {
    let mut letters: u64 = 0;
    let mut upper: u64 = 0;
    for c in message.chars().filter(|c| c.is_alphabetic()) {
        letters += 1;
        if c.is_uppercase() && c.to_lowercase().ne(std::iter::once(c)) {
            upper += 1;
        }
    }
    if letters == 0 {
        return 0;
    }
    (upper * 100 / letters) as u32
}
